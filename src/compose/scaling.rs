// Copyright (c) 2025 - Cowboy AI, Inc.
//! Scaling Composer

use serde_json::json;
use tracing::info;

use crate::domain::reference::join;
use crate::domain::{
    LogicalId, ResourceRef, ResourceType, ScalingAttachmentHandle, ScalingPolicy, ServiceHandle,
    UtilizationMetric, UtilizationPolicy,
};
use crate::errors::CompositionResult;
use crate::template::{Declaration, Template};

/// Attach bounded autoscaling to `service`
///
/// Registers the scalable target, then one target-tracking policy for CPU
/// and one for memory. Fails with
/// [`crate::CompositionError::InvalidScalingRange`] before declaring
/// anything when `min_count > max_count`.
pub fn attach_scaling(
    template: &mut Template,
    service: &ServiceHandle,
    policy: &ScalingPolicy,
) -> CompositionResult<ScalingAttachmentHandle> {
    policy.validate()?;

    let resource_id = join(
        "/",
        vec![
            json!("service"),
            ResourceRef::Ref(service.cluster().clone()).to_value(),
            ResourceRef::attribute(service.id(), "Name").to_value(),
        ],
    );
    let target = template.declare(Declaration::new(
        ResourceType::ScalableTarget,
        service.id().child("scalable-target")?,
        json!({
            "MinCapacity": policy.min_count,
            "MaxCapacity": policy.max_count,
            "ResourceId": resource_id,
            "ScalableDimension": "ecs:service:DesiredCount",
            "ServiceNamespace": "ecs",
        }),
    ))?;

    let policies = vec![
        track_utilization(template, &target, UtilizationMetric::Cpu, policy.cpu_target_percent)?,
        track_utilization(
            template,
            &target,
            UtilizationMetric::Memory,
            policy.memory_target_percent,
        )?,
    ];

    info!(
        "Attached scaling to `{}`: {}..={} tasks, cpu {}%, memory {}%",
        service.id(),
        policy.min_count,
        policy.max_count,
        policy.cpu_target_percent,
        policy.memory_target_percent
    );
    Ok(ScalingAttachmentHandle {
        target,
        service: service.id().clone(),
        min_count: policy.min_count,
        max_count: policy.max_count,
        policies,
    })
}

fn track_utilization(
    template: &mut Template,
    target: &LogicalId,
    metric: UtilizationMetric,
    target_percent: f64,
) -> CompositionResult<UtilizationPolicy> {
    let id = target.child(metric.segment())?;
    template.declare(Declaration::new(
        ResourceType::ScalingPolicy,
        id.clone(),
        json!({
            "PolicyName": id.as_str().replace('/', "-"),
            "PolicyType": "TargetTrackingScaling",
            "ScalingTargetId": ResourceRef::Ref(target.clone()).to_value(),
            "TargetTrackingScalingPolicyConfiguration": {
                "PredefinedMetricSpecification": {
                    "PredefinedMetricType": metric.predefined_metric_type(),
                },
                "TargetValue": target_percent,
            },
        }),
    ))?;

    Ok(UtilizationPolicy {
        id,
        metric,
        target_percent,
    })
}
