// Copyright (c) 2025 - Cowboy AI, Inc.
//! Container Infra Synthesizer
//!
//! Reads a topology request, composes it, and writes the resulting
//! template document.
//!
//! Run with: cargo run --bin container-infra -- --config demos/webapp.json
//!
//! Account and region come from `CDK_DEFAULT_ACCOUNT` / `CDK_DEFAULT_REGION`.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info};

use cim_container_infra::adapters::{ManifestWriter, NetworkCatalog};
use cim_container_infra::{deploy, synthesize, StackEnvironment, TopologyRequest};

/// Compose a container workload topology into a template document
#[derive(Parser, Debug)]
#[command(name = "container-infra")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Topology request (JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// Catalog of existing networks available for lookup (JSON)
    #[arg(short, long)]
    networks: Option<PathBuf>,

    /// Lookup context entries, e.g. `--context vpcname=shared`
    #[arg(long = "context", value_name = "KEY=VALUE")]
    context: Vec<String>,

    /// Stack name
    #[arg(long, env = "STACK_NAME", default_value = "my-container-infra")]
    stack_name: String,

    /// Write the document here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the declared-state mapping instead of the template document
    #[arg(long)]
    state: bool,
}

fn parse_context(entry: &str) -> Result<(String, String)> {
    match entry.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => bail!("context entry `{entry}` is not KEY=VALUE"),
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    debug!("Arguments: {:?}", cli);

    let text = fs::read_to_string(&cli.config)
        .with_context(|| format!("reading topology request {}", cli.config.display()))?;
    let request = TopologyRequest::from_json(&text)
        .with_context(|| format!("parsing topology request {}", cli.config.display()))?;

    let catalog = match &cli.networks {
        Some(path) => NetworkCatalog::load(path)
            .with_context(|| format!("loading network catalog {}", path.display()))?,
        None => NetworkCatalog::new(),
    };

    let mut env = StackEnvironment::from_env(cli.stack_name.clone());
    for entry in &cli.context {
        let (key, value) = parse_context(entry)?;
        env = env.with_context(key, value);
    }

    let topology = synthesize(&request, &env, &catalog).context("synthesis failed")?;

    let sink: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    if cli.state {
        let mut sink = sink;
        serde_json::to_writer_pretty(&mut sink, &topology.declared_state())
            .context("writing declared state")?;
        writeln!(sink)?;
        return Ok(());
    }

    let mut writer = ManifestWriter::new(sink);
    deploy(topology, &mut writer).context("writing template")?;

    if let Some(path) = &cli.output {
        info!("✅ Wrote template to {}", path.display());
    }
    Ok(())
}
