// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cluster Composer

use serde_json::json;
use tracing::info;

use crate::config::ClusterConfig;
use crate::domain::{ClusterHandle, LogicalId, ResourceType};
use crate::errors::CompositionResult;
use crate::template::{Declaration, Template};

/// Bind a compute cluster to the configured network
pub fn compose_cluster(
    template: &mut Template,
    id: &LogicalId,
    config: &ClusterConfig,
) -> CompositionResult<ClusterHandle> {
    let insights = if config.observability_enabled {
        "enabled"
    } else {
        "disabled"
    };

    template.declare(Declaration::new(
        ResourceType::Cluster,
        id.clone(),
        json!({
            "ClusterSettings": [{ "Name": "containerInsights", "Value": insights }],
        }),
    ))?;

    info!(
        "Composed cluster `{}` on network `{}` (container insights {})",
        id,
        config.network.name(),
        insights
    );
    Ok(ClusterHandle::new(
        id.clone(),
        config.network.clone(),
        config.observability_enabled,
    ))
}
