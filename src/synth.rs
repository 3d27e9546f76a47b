// Copyright (c) 2025 - Cowboy AI, Inc.
//! Synthesis Pass
//!
//! Runs every resolver and composer in dependency order over one
//! [`TopologyRequest`]:
//!
//! ```text
//! network → cluster → task definition → service → { scaling, monitoring }
//! ```
//!
//! The pass owns its [`Template`]. A failure anywhere aborts the pass and
//! drops the template; only a fully composed [`ResolvedTopology`] can reach
//! [`deploy`].

use tracing::info;

use crate::compose::{
    attach_scaling, compose_cluster, compose_service, compose_task_definition, declare_topic,
    init_monitoring, provide_network, subscribe_email, MonitoringHandle,
};
use crate::config::resolve::{
    resolve_cluster, resolve_container, resolve_monitoring, resolve_network, resolve_scaling,
    resolve_service, resolve_task,
};
use crate::config::{MonitoringConfig, StackEnvironment, TopicRequest, TopologyRequest};
use crate::domain::naming::service_id;
use crate::domain::{
    ClusterHandle, LogicalId, NetworkHandle, ScalingAttachmentHandle, ServiceHandle,
    TaskDefinitionHandle, TopicHandle,
};
use crate::errors::{CompositionError, CompositionResult};
use crate::ports::{NetworkLookup, Provisioner};
use crate::template::{DeclaredState, Template};

/// Logical id of the network
pub const NETWORK_ID: &str = "vpc";

/// Logical id of the cluster when the request names none
pub const DEFAULT_CLUSTER_ID: &str = "cluster";

/// Logical id of the alarm topic when the request names none
pub const DEFAULT_TOPIC_ID: &str = "alarm-topic";

/// Logical id of the monitoring dashboard
pub const DASHBOARD_ID: &str = "dashboard";

/// Fully composed, immutable result of one pass
#[derive(Debug, Clone)]
pub struct ResolvedTopology {
    network: NetworkHandle,
    cluster: ClusterHandle,
    task_definition: TaskDefinitionHandle,
    service: ServiceHandle,
    scaling: Option<ScalingAttachmentHandle>,
    alarm_topic: Option<TopicHandle>,
    monitoring: Option<MonitoringHandle>,
    template: Template,
}

impl ResolvedTopology {
    pub fn network(&self) -> &NetworkHandle {
        &self.network
    }

    pub fn cluster(&self) -> &ClusterHandle {
        &self.cluster
    }

    pub fn task_definition(&self) -> &TaskDefinitionHandle {
        &self.task_definition
    }

    pub fn service(&self) -> &ServiceHandle {
        &self.service
    }

    pub fn scaling(&self) -> Option<&ScalingAttachmentHandle> {
        self.scaling.as_ref()
    }

    pub fn alarm_topic(&self) -> Option<&TopicHandle> {
        self.alarm_topic.as_ref()
    }

    pub fn monitoring(&self) -> Option<&MonitoringHandle> {
        self.monitoring.as_ref()
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// `{ resource type -> [ {id, properties} ] }` of everything declared
    pub fn declared_state(&self) -> DeclaredState {
        self.template.declared_state()
    }
}

fn logical_id(
    raw: Option<&String>,
    default: &str,
    config: &'static str,
) -> CompositionResult<LogicalId> {
    let raw = raw.map(|r| r.trim()).filter(|r| !r.is_empty()).unwrap_or(default);
    LogicalId::new(raw).map_err(|e| CompositionError::invalid(config, "id", e.to_string()))
}

fn declare_alarm_topic(
    template: &mut Template,
    request: &TopicRequest,
) -> CompositionResult<TopicHandle> {
    let id = logical_id(request.id.as_ref(), DEFAULT_TOPIC_ID, "TopicRequest")?;
    let topic = declare_topic(template, &id, request.display_name.as_deref())?;
    for address in &request.email_subscriptions {
        subscribe_email(template, &topic, address)?;
    }
    Ok(topic)
}

/// Compose the whole topology described by `request`
pub fn synthesize(
    request: &TopologyRequest,
    env: &StackEnvironment,
    lookup: &dyn NetworkLookup,
) -> CompositionResult<ResolvedTopology> {
    info!("Synthesizing stack `{}`", env.stack_name);
    let mut template = Template::new();

    let network_request = resolve_network(&request.network, env)?;
    let network = provide_network(
        &mut template,
        &LogicalId::new(NETWORK_ID)?,
        &network_request,
        lookup,
    )?;

    let cluster_id = logical_id(
        request.cluster.id.as_ref(),
        DEFAULT_CLUSTER_ID,
        "ClusterRequest",
    )?;
    let cluster = compose_cluster(
        &mut template,
        &cluster_id,
        &resolve_cluster(&request.cluster, network.clone()),
    )?;

    let sizing = resolve_task(&request.task)?;
    let containers = request
        .containers
        .iter()
        .map(resolve_container)
        .collect::<CompositionResult<Vec<_>>>()?;
    let task_definition = compose_task_definition(&mut template, &sizing, &containers)?;

    let service_spec = resolve_service(&request.service)?;
    let service = compose_service(
        &mut template,
        &service_id(sizing.family())?,
        &cluster,
        &task_definition,
        &service_spec,
    )?;

    let scaling = match &request.scaling {
        Some(config) => Some(attach_scaling(
            &mut template,
            &service,
            &resolve_scaling(config)?,
        )?),
        None => None,
    };

    let alarm_topic = match &request.alarm_topic {
        Some(topic) => Some(declare_alarm_topic(&mut template, topic)?),
        None => None,
    };

    let monitoring = match &request.monitoring {
        Some(monitoring) => {
            let config = MonitoringConfig {
                dashboard_name: monitoring.dashboard_name.clone(),
                alarm_topic: alarm_topic.clone(),
                alarm_name_prefix: monitoring.alarm_name_prefix.clone(),
            };
            let mut handle = init_monitoring(
                &mut template,
                &LogicalId::new(DASHBOARD_ID)?,
                &resolve_monitoring(&config)?,
            )?;

            if let Some(header) = &monitoring.header {
                handle.add_header(&mut template, header)?;
            }
            let default_display = service_spec
                .service_name
                .clone()
                .unwrap_or_else(|| sizing.family().to_string());
            for entry in &monitoring.services {
                let display_name = entry
                    .display_name
                    .as_deref()
                    .unwrap_or(default_display.as_str());
                handle.monitor_service(
                    &mut template,
                    &service,
                    display_name,
                    entry.thresholds.as_ref(),
                )?;
            }
            Some(handle)
        }
        None => None,
    };

    info!(
        "Synthesized stack `{}`: {} declarations, {} outputs",
        env.stack_name,
        template.len(),
        template.outputs().len()
    );
    Ok(ResolvedTopology {
        network,
        cluster,
        task_definition,
        service,
        scaling,
        alarm_topic,
        monitoring,
        template,
    })
}

/// Hand a finished topology to the provisioning collaborator
///
/// Consumes the topology; it is discarded once registered.
pub fn deploy(topology: ResolvedTopology, provisioner: &mut dyn Provisioner) -> CompositionResult<()> {
    provisioner.register(&topology.template)
}
