// Copyright (c) 2025 - Cowboy AI, Inc.
//! Task Composer
//!
//! Builds a Fargate task definition from validated sizing and attaches one
//! container definition per [`ContainerSpec`]. Each container gets its own
//! log group scoped to the task family and one TCP port mapping per port.
//!
//! ```text
//! taskdef-<family>                              task definition
//! taskdef-<family>/execution-role               pulls images, writes logs
//! taskdef-<family>/container-<name>/log-group   one per container
//! ```

use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::config::ContainerSpec;
use crate::domain::naming::{container_id, task_definition_id};
use crate::domain::reference::pseudo;
use crate::domain::{
    ContainerHandle, LogSink, LogicalId, PortMapping, Protocol, ResourceRef, ResourceSizing,
    ResourceType, RetentionWindow, TaskDefinitionHandle,
};
use crate::errors::{CompositionError, CompositionResult};
use crate::template::{Declaration, Template};

/// Retention of every container log group
pub const LOG_RETENTION: RetentionWindow = RetentionWindow::OneDay;

const EXECUTION_ROLE_POLICY: &str =
    "arn:aws:iam::aws:policy/service-role/AmazonECSTaskExecutionRolePolicy";

/// Compose a task definition with its containers, in order
pub fn compose_task_definition(
    template: &mut Template,
    sizing: &ResourceSizing,
    containers: &[ContainerSpec],
) -> CompositionResult<TaskDefinitionHandle> {
    if containers.is_empty() {
        return Err(CompositionError::EmptyTaskDefinition {
            family: sizing.family().to_string(),
        });
    }

    let id = task_definition_id(sizing.family())?;
    let role = declare_execution_role(template, &id)?;

    let mut handles = Vec::with_capacity(containers.len());
    for spec in containers {
        handles.push(attach_container(template, &id, sizing.family(), spec)?);
    }

    let definitions: Vec<Value> = handles.iter().map(container_definition).collect();
    template.declare(Declaration::new(
        ResourceType::TaskDefinition,
        id.clone(),
        json!({
            "Family": sizing.family(),
            "Cpu": sizing.cpu().units().to_string(),
            "Memory": sizing.memory_limit_mib().to_string(),
            "NetworkMode": "awsvpc",
            "RequiresCompatibilities": ["FARGATE"],
            "ExecutionRoleArn": ResourceRef::attribute(&role, "Arn").to_value(),
            "ContainerDefinitions": definitions,
        }),
    ))?;

    info!(
        "Composed task definition `{}` ({} cpu, {} MiB) with {} containers",
        id,
        sizing.cpu(),
        sizing.memory_limit_mib(),
        handles.len()
    );
    Ok(TaskDefinitionHandle::new(
        id,
        sizing.family(),
        sizing.cpu(),
        sizing.memory_limit_mib(),
        handles,
    ))
}

fn declare_execution_role(
    template: &mut Template,
    task_definition: &LogicalId,
) -> CompositionResult<LogicalId> {
    template.declare(Declaration::new(
        ResourceType::Role,
        task_definition.child("execution-role")?,
        json!({
            "AssumeRolePolicyDocument": {
                "Version": "2012-10-17",
                "Statement": [{
                    "Effect": "Allow",
                    "Principal": { "Service": "ecs-tasks.amazonaws.com" },
                    "Action": "sts:AssumeRole",
                }],
            },
            "ManagedPolicyArns": [EXECUTION_ROLE_POLICY],
        }),
    ))
}

fn attach_container(
    template: &mut Template,
    task_definition: &LogicalId,
    family: &str,
    spec: &ContainerSpec,
) -> CompositionResult<ContainerHandle> {
    let scope = task_definition.child(container_id(&spec.image))?;

    // A repeated short name collides here, before the task definition exists.
    let log_group = template.declare(Declaration::new(
        ResourceType::LogGroup,
        scope.child("log-group")?,
        json!({ "RetentionInDays": LOG_RETENTION.days() }),
    ))?;

    let port_mappings = spec
        .tcp_ports
        .iter()
        .map(|port| PortMapping {
            container_port: *port,
            protocol: Protocol::Tcp,
        })
        .collect::<Vec<_>>();

    debug!(
        "Attached container `{}` ({}) with {} port mappings",
        spec.image.short_name(),
        spec.image,
        port_mappings.len()
    );
    Ok(ContainerHandle {
        name: spec.image.short_name().to_string(),
        image: spec.image.clone(),
        port_mappings,
        log_sink: LogSink {
            log_group,
            stream_prefix: family.to_string(),
            retention: LOG_RETENTION,
        },
    })
}

fn container_definition(container: &ContainerHandle) -> Value {
    let mut options = Map::new();
    options.insert(
        "awslogs-group".into(),
        ResourceRef::Ref(container.log_sink.log_group.clone()).to_value(),
    );
    options.insert("awslogs-region".into(), pseudo("Region"));
    options.insert(
        "awslogs-stream-prefix".into(),
        Value::String(container.log_sink.stream_prefix.clone()),
    );

    let port_mappings: Vec<Value> = container
        .port_mappings
        .iter()
        .map(|m| {
            json!({
                "ContainerPort": m.container_port.value(),
                "Protocol": m.protocol.as_str(),
            })
        })
        .collect();

    json!({
        "Name": container.name,
        "Image": container.image.as_str(),
        "Essential": true,
        "PortMappings": port_mappings,
        "LogConfiguration": {
            "LogDriver": "awslogs",
            "Options": options,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Cpu, ImageReference, Port};
    use pretty_assertions::assert_eq;

    fn sizing() -> ResourceSizing {
        ResourceSizing::new(Cpu::Half, 1024, "webapp").unwrap()
    }

    fn container(image: &str, ports: &[u32]) -> ContainerSpec {
        ContainerSpec {
            image: ImageReference::parse(image).unwrap(),
            tcp_ports: ports.iter().map(|p| Port::new(*p).unwrap()).collect(),
        }
    }

    #[test]
    fn test_empty_task_definition() {
        let mut template = Template::new();
        let err = compose_task_definition(&mut template, &sizing(), &[]).unwrap_err();
        assert_eq!(
            err,
            CompositionError::EmptyTaskDefinition {
                family: "webapp".into()
            }
        );
        assert!(template.is_empty());
    }

    #[test]
    fn test_single_container_single_port() {
        let mut template = Template::new();
        let handle = compose_task_definition(
            &mut template,
            &sizing(),
            &[container("repo/app:latest", &[8000])],
        )
        .unwrap();

        assert_eq!(handle.family(), "webapp");
        assert_eq!(handle.cpu(), Cpu::Half);
        assert_eq!(handle.memory_limit_mib(), 1024);
        assert_eq!(handle.containers().len(), 1);

        let app = &handle.containers()[0];
        assert_eq!(app.name, "app");
        assert_eq!(
            app.port_mappings,
            vec![PortMapping {
                container_port: Port::new(8000).unwrap(),
                protocol: Protocol::Tcp,
            }]
        );
        assert_eq!(app.log_sink.stream_prefix, "webapp");
        assert_eq!(app.log_sink.retention, RetentionWindow::OneDay);
        assert_eq!(
            app.log_sink.log_group.as_str(),
            "taskdef-webapp/container-app/log-group"
        );
    }

    #[test]
    fn test_declared_task_definition() {
        let mut template = Template::new();
        let handle = compose_task_definition(
            &mut template,
            &sizing(),
            &[container("repo/app:latest", &[8000])],
        )
        .unwrap();

        let declared = template.get(handle.id()).unwrap();
        assert_eq!(declared.property("Cpu"), Some(&json!("512")));
        assert_eq!(declared.property("Memory"), Some(&json!("1024")));
        assert_eq!(
            declared.property("ContainerDefinitions").unwrap()[0]["PortMappings"],
            json!([{ "ContainerPort": 8000, "Protocol": "tcp" }])
        );
        assert_eq!(template.count_of(ResourceType::LogGroup), 1);
        assert_eq!(template.count_of(ResourceType::Role), 1);
    }

    #[test]
    fn test_containers_keep_order() {
        let mut template = Template::new();
        let handle = compose_task_definition(
            &mut template,
            &sizing(),
            &[
                container("nginx:1.25", &[80, 443]),
                container("ghcr.io/acme/sidecar", &[]),
            ],
        )
        .unwrap();

        let names: Vec<_> = handle.containers().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["nginx", "sidecar"]);
        assert_eq!(handle.default_container().unwrap().port_mappings.len(), 2);
        assert_eq!(template.count_of(ResourceType::LogGroup), 2);
    }

    #[test]
    fn test_same_short_name_twice_rejected() {
        let mut template = Template::new();
        let err = compose_task_definition(
            &mut template,
            &sizing(),
            &[container("a/app:1", &[]), container("b/app:2", &[])],
        )
        .unwrap_err();
        assert_eq!(
            err,
            CompositionError::DuplicateIdentifier {
                id: "taskdef-webapp/container-app/log-group".into()
            }
        );
    }
}
