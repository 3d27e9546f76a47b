// Copyright (c) 2025 - Cowboy AI, Inc.

//! Manifest writer
//!
//! Provisioner that renders the finished template as a pretty JSON
//! document onto any writer (a file, stdout, or a buffer in tests).

use std::io::Write;

use tracing::info;

use crate::errors::{CompositionError, CompositionResult};
use crate::ports::Provisioner;
use crate::template::Template;

/// Writes each registered template as one JSON document
#[derive(Debug)]
pub struct ManifestWriter<W: Write> {
    writer: W,
    registered: usize,
}

impl<W: Write> ManifestWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            registered: 0,
        }
    }

    /// Number of templates written so far
    pub fn registered(&self) -> usize {
        self.registered
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Provisioner for ManifestWriter<W> {
    fn register(&mut self, template: &Template) -> CompositionResult<()> {
        let document = template.to_json_pretty()?;
        self.writer.write_all(document.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer
            .flush()
            .map_err(|e| CompositionError::Provisioning(format!("flushing manifest: {e}")))?;

        self.registered += 1;
        info!(
            "Registered template with {} declarations and {} outputs",
            template.len(),
            template.outputs().len()
        );
        Ok(())
    }
}
