// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service Composer
//!
//! Binds a task definition to a cluster. The [`ExposurePolicy`] variant
//! selects one of two branches:
//!
//! ```text
//! Direct { port, publicly_reachable }
//!   <id>-security-group          ingress 0.0.0.0/0 tcp/<port>
//!   <id>                         AssignPublicIp from publicly_reachable
//!
//! LoadBalanced { listener_port, publicly_reachable }
//!   <id>/load-balancer                   scheme from publicly_reachable
//!   <id>/load-balancer/security-group    ingress 0.0.0.0/0 tcp/<listener_port>
//!   <id>/load-balancer/listener          HTTP on <listener_port>
//!   <id>/load-balancer/target-group      IP targets on the container port
//!   <id>-security-group                  ingress from the load balancer only
//!   <id>                                 registered with the target group
//!   output <id>-endpoint                 load balancer DNS name
//! ```
//!
//! Both branches enable the deployment circuit breaker with rollback.

use serde_json::{json, Value};
use tracing::info;

use crate::config::ServiceSpec;
use crate::domain::{
    ClusterHandle, ExposurePolicy, Ipv4Cidr, LoadBalancerHandle, LogicalId, Port, ResourceRef,
    ResourceType, ServiceHandle, TaskDefinitionHandle,
};
use crate::errors::{CompositionError, CompositionResult};
use crate::template::{Declaration, Template};

/// Compose a service for `task_definition` on `cluster`
pub fn compose_service(
    template: &mut Template,
    id: &LogicalId,
    cluster: &ClusterHandle,
    task_definition: &TaskDefinitionHandle,
    spec: &ServiceSpec,
) -> CompositionResult<ServiceHandle> {
    let display = spec
        .service_name
        .clone()
        .unwrap_or_else(|| id.to_string());

    let handle = match spec.exposure {
        ExposurePolicy::Direct {
            port,
            publicly_reachable,
        } => {
            let security_group = declare_security_group(
                template,
                id.suffixed("security-group")?,
                &display,
                cluster,
                ingress_from_anywhere(port),
            )?;

            let service = ServiceDeclaration {
                id,
                cluster,
                task_definition,
                spec,
                security_group: &security_group,
                assign_public_ip: publicly_reachable,
            };
            template.declare(service.build(Vec::new())?)?;

            info!(
                "Composed service `{}` exposed directly on tcp/{} (public ip {})",
                id, port, publicly_reachable
            );
            ServiceHandle::new(
                id.clone(),
                cluster.id().clone(),
                task_definition.id().clone(),
                spec.desired_count,
                security_group,
                None,
            )
        }

        ExposurePolicy::LoadBalanced {
            listener_port,
            publicly_reachable,
        } => {
            let (container_name, container_port) = routed_container(task_definition)?;
            let front_end = declare_front_end(
                template,
                id,
                &display,
                cluster,
                listener_port,
                container_port,
                publicly_reachable,
            )?;

            let security_group = declare_security_group(
                template,
                id.suffixed("security-group")?,
                &display,
                cluster,
                ingress_from_group(&front_end.id.child("security-group")?, container_port),
            )?;

            let service = ServiceDeclaration {
                id,
                cluster,
                task_definition,
                spec,
                security_group: &security_group,
                assign_public_ip: false,
            };
            let load_balancers = vec![json!({
                "ContainerName": container_name,
                "ContainerPort": container_port.value(),
                "TargetGroupArn": ResourceRef::Ref(front_end.target_group.clone()).to_value(),
            })];
            template.declare(service.build(load_balancers)?.depends_on(&front_end.listener))?;

            info!(
                "Composed service `{}` behind {} load balancer on port {}",
                id,
                front_end.scheme(),
                listener_port
            );
            ServiceHandle::new(
                id.clone(),
                cluster.id().clone(),
                task_definition.id().clone(),
                spec.desired_count,
                security_group,
                Some(front_end),
            )
        }
    };

    Ok(handle)
}

/// Container a load balancer routes to: the first container and its first port
fn routed_container(task_definition: &TaskDefinitionHandle) -> CompositionResult<(String, Port)> {
    let container = task_definition.default_container().ok_or_else(|| {
        CompositionError::EmptyTaskDefinition {
            family: task_definition.family().to_string(),
        }
    })?;
    let mapping = container.port_mappings.first().ok_or_else(|| {
        CompositionError::invalid(
            "ContainerConfig",
            "tcp_ports",
            format!(
                "container `{}` needs a port to sit behind a load balancer",
                container.name
            ),
        )
    })?;
    Ok((container.name.clone(), mapping.container_port))
}

fn ingress_from_anywhere(port: Port) -> Value {
    json!({
        "CidrIp": Ipv4Cidr::ANY.to_string(),
        "FromPort": port.value(),
        "ToPort": port.value(),
        "IpProtocol": "tcp",
    })
}

fn ingress_from_group(group: &LogicalId, port: Port) -> Value {
    json!({
        "SourceSecurityGroupId": ResourceRef::attribute(group, "GroupId").to_value(),
        "FromPort": port.value(),
        "ToPort": port.value(),
        "IpProtocol": "tcp",
    })
}

fn declare_security_group(
    template: &mut Template,
    id: LogicalId,
    display: &str,
    cluster: &ClusterHandle,
    ingress: Value,
) -> CompositionResult<LogicalId> {
    template.declare(Declaration::new(
        ResourceType::SecurityGroup,
        id,
        json!({
            "GroupDescription": format!("security group for service {display}"),
            "VpcId": cluster.network().vpc().to_value(),
            "SecurityGroupIngress": [ingress],
            "SecurityGroupEgress": [{ "CidrIp": Ipv4Cidr::ANY.to_string(), "IpProtocol": "-1" }],
        }),
    ))
}

fn subnet_values(cluster: &ClusterHandle, public: bool) -> CompositionResult<Vec<Value>> {
    let network = cluster.network();
    let subnets = network.subnets_for(public);
    if subnets.is_empty() {
        let placement = if public { "public" } else { "any" };
        return Err(CompositionError::invalid(
            "ServiceConfig",
            "exposure",
            format!("network `{}` has no {placement} subnets", network.name()),
        ));
    }
    Ok(subnets.iter().map(ResourceRef::to_value).collect())
}

fn declare_front_end(
    template: &mut Template,
    service: &LogicalId,
    display: &str,
    cluster: &ClusterHandle,
    listener_port: Port,
    container_port: Port,
    internet_facing: bool,
) -> CompositionResult<LoadBalancerHandle> {
    let id = service.child("load-balancer")?;

    let security_group = declare_security_group(
        template,
        id.child("security-group")?,
        display,
        cluster,
        ingress_from_anywhere(listener_port),
    )?;

    let subnets = subnet_values(cluster, internet_facing)?;
    let scheme = if internet_facing {
        "internet-facing"
    } else {
        "internal"
    };
    template.declare(Declaration::new(
        ResourceType::LoadBalancer,
        id.clone(),
        json!({
            "Type": "application",
            "Scheme": scheme,
            "Subnets": subnets,
            "SecurityGroups": [ResourceRef::attribute(&security_group, "GroupId").to_value()],
        }),
    ))?;

    let target_group = template.declare(Declaration::new(
        ResourceType::TargetGroup,
        id.child("target-group")?,
        json!({
            "Port": container_port.value(),
            "Protocol": "HTTP",
            "TargetType": "ip",
            "VpcId": cluster.network().vpc().to_value(),
        }),
    ))?;

    let listener = template.declare(Declaration::new(
        ResourceType::Listener,
        id.child("listener")?,
        json!({
            "LoadBalancerArn": ResourceRef::Ref(id.clone()).to_value(),
            "Port": listener_port.value(),
            "Protocol": "HTTP",
            "DefaultActions": [{
                "Type": "forward",
                "TargetGroupArn": ResourceRef::Ref(target_group.clone()).to_value(),
            }],
        }),
    ))?;

    let endpoint_output = format!("{}-endpoint", service.as_str().replace('/', "-"));
    template.output(
        endpoint_output.clone(),
        ResourceRef::attribute(&id, "DNSName").to_value(),
        Some(format!("Load balancer endpoint of {display}")),
    )?;

    Ok(LoadBalancerHandle {
        id,
        listener,
        target_group,
        internet_facing,
        listener_port,
        endpoint_output,
    })
}

struct ServiceDeclaration<'a> {
    id: &'a LogicalId,
    cluster: &'a ClusterHandle,
    task_definition: &'a TaskDefinitionHandle,
    spec: &'a ServiceSpec,
    security_group: &'a LogicalId,
    assign_public_ip: bool,
}

impl ServiceDeclaration<'_> {
    fn build(&self, load_balancers: Vec<Value>) -> CompositionResult<Declaration> {
        let subnets = subnet_values(self.cluster, self.assign_public_ip)?;
        let assign_public_ip = if self.assign_public_ip {
            "ENABLED"
        } else {
            "DISABLED"
        };
        let mut declaration = Declaration::new(
            ResourceType::Service,
            self.id.clone(),
            json!({
                "Cluster": self.cluster.reference().to_value(),
                "TaskDefinition": self.task_definition.reference().to_value(),
                "DesiredCount": self.spec.desired_count,
                "LaunchType": "FARGATE",
                "DeploymentConfiguration": {
                    "DeploymentCircuitBreaker": { "Enable": true, "Rollback": true },
                },
                "NetworkConfiguration": {
                    "AwsvpcConfiguration": {
                        "AssignPublicIp": assign_public_ip,
                        "SecurityGroups": [
                            ResourceRef::attribute(self.security_group, "GroupId").to_value()
                        ],
                        "Subnets": subnets,
                    },
                },
            }),
        );

        if let Some(name) = &self.spec.service_name {
            declaration
                .properties
                .insert("ServiceName".into(), Value::String(name.clone()));
        }
        if !load_balancers.is_empty() {
            declaration
                .properties
                .insert("LoadBalancers".into(), Value::Array(load_balancers));
        }
        Ok(declaration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::task::compose_task_definition;
    use crate::config::ContainerSpec;
    use crate::domain::{Cpu, ImageReference, NetworkHandle, NetworkOrigin, ResourceSizing};
    use pretty_assertions::assert_eq;

    fn cluster() -> ClusterHandle {
        let network = NetworkHandle::new(
            LogicalId::new("vpc").unwrap(),
            "shared",
            NetworkOrigin::Imported,
            ResourceRef::Existing("vpc-1".into()),
            vec![ResourceRef::Existing("subnet-public".into())],
            vec![ResourceRef::Existing("subnet-private".into())],
        );
        ClusterHandle::new(LogicalId::new("cluster").unwrap(), network, false)
    }

    fn private_only_cluster() -> ClusterHandle {
        let network = NetworkHandle::new(
            LogicalId::new("vpc").unwrap(),
            "isolated",
            NetworkOrigin::Imported,
            ResourceRef::Existing("vpc-2".into()),
            vec![],
            vec![ResourceRef::Existing("subnet-private".into())],
        );
        ClusterHandle::new(LogicalId::new("cluster").unwrap(), network, false)
    }

    fn task(template: &mut Template, ports: &[u32]) -> TaskDefinitionHandle {
        compose_task_definition(
            template,
            &ResourceSizing::new(Cpu::Half, 1024, "webapp").unwrap(),
            &[ContainerSpec {
                image: ImageReference::parse("repo/app:latest").unwrap(),
                tcp_ports: ports.iter().map(|p| Port::new(*p).unwrap()).collect(),
            }],
        )
        .unwrap()
    }

    fn spec(exposure: ExposurePolicy, desired_count: u32) -> ServiceSpec {
        ServiceSpec {
            exposure,
            desired_count,
            service_name: None,
        }
    }

    fn service_id() -> LogicalId {
        LogicalId::new("service-webapp").unwrap()
    }

    #[test]
    fn test_direct_private_service() {
        let mut template = Template::new();
        let task = task(&mut template, &[80]);
        let exposure = ExposurePolicy::Direct {
            port: Port::new(80).unwrap(),
            publicly_reachable: false,
        };
        let handle =
            compose_service(&mut template, &service_id(), &cluster(), &task, &spec(exposure, 1))
                .unwrap();

        assert_eq!(handle.cluster().as_str(), "cluster");
        assert_eq!(handle.task_definition(), task.id());
        assert!(handle.front_end().is_none());

        let group = template.get(handle.security_group()).unwrap();
        assert_eq!(
            group.property("SecurityGroupIngress"),
            Some(&json!([{ "CidrIp": "0.0.0.0/0", "FromPort": 80, "ToPort": 80, "IpProtocol": "tcp" }]))
        );
        assert_eq!(
            group.property("GroupDescription"),
            Some(&json!("security group for service service-webapp"))
        );

        let service = template.get(handle.id()).unwrap();
        let network = &service.property("NetworkConfiguration").unwrap()["AwsvpcConfiguration"];
        assert_eq!(network["AssignPublicIp"], json!("DISABLED"));
        assert_eq!(network["Subnets"], json!(["subnet-private"]));
        assert_eq!(
            service.property("DeploymentConfiguration").unwrap()["DeploymentCircuitBreaker"],
            json!({ "Enable": true, "Rollback": true })
        );
    }

    #[test]
    fn test_direct_public_service_with_name() {
        let mut template = Template::new();
        let task = task(&mut template, &[8080]);
        let exposure = ExposurePolicy::Direct {
            port: Port::new(8080).unwrap(),
            publicly_reachable: true,
        };
        let mut spec = spec(exposure, 1);
        spec.service_name = Some("api".into());
        let handle =
            compose_service(&mut template, &service_id(), &cluster(), &task, &spec).unwrap();

        let service = template.get(handle.id()).unwrap();
        assert_eq!(service.property("ServiceName"), Some(&json!("api")));
        assert_eq!(
            service.property("NetworkConfiguration").unwrap()["AwsvpcConfiguration"]["AssignPublicIp"],
            json!("ENABLED")
        );
        assert_eq!(
            template.get(handle.security_group()).unwrap().property("GroupDescription"),
            Some(&json!("security group for service api"))
        );
    }

    #[test]
    fn test_zero_desired_count_allowed() {
        let mut template = Template::new();
        let task = task(&mut template, &[80]);
        let exposure = ExposurePolicy::Direct {
            port: Port::new(80).unwrap(),
            publicly_reachable: false,
        };
        let handle =
            compose_service(&mut template, &service_id(), &cluster(), &task, &spec(exposure, 0))
                .unwrap();
        assert_eq!(handle.desired_count(), 0);
        assert_eq!(
            template.get(handle.id()).unwrap().property("DesiredCount"),
            Some(&json!(0))
        );
    }

    #[test]
    fn test_load_balanced_internet_facing() {
        let mut template = Template::new();
        let task = task(&mut template, &[8000]);
        let exposure = ExposurePolicy::LoadBalanced {
            listener_port: Port::new(8000).unwrap(),
            publicly_reachable: true,
        };
        let handle =
            compose_service(&mut template, &service_id(), &cluster(), &task, &spec(exposure, 2))
                .unwrap();

        let front_end = handle.front_end().unwrap();
        assert_eq!(front_end.scheme(), "internet-facing");
        assert_eq!(template.count_of(ResourceType::LoadBalancer), 1);

        let lb = template.get(&front_end.id).unwrap();
        assert_eq!(lb.property("Scheme"), Some(&json!("internet-facing")));
        assert_eq!(lb.property("Subnets"), Some(&json!(["subnet-public"])));

        let service = template.get(handle.id()).unwrap();
        assert_eq!(
            service.property("LoadBalancers"),
            Some(&json!([{
                "ContainerName": "app",
                "ContainerPort": 8000,
                "TargetGroupArn": { "Ref": "service-webapp/load-balancer/target-group" },
            }]))
        );
        assert_eq!(service.depends_on, vec![front_end.listener.clone()]);
        assert_eq!(template.outputs()[0].id, "service-webapp-endpoint");
    }

    #[test]
    fn test_load_balanced_internal() {
        let mut template = Template::new();
        let task = task(&mut template, &[8000]);
        let exposure = ExposurePolicy::LoadBalanced {
            listener_port: Port::new(80).unwrap(),
            publicly_reachable: false,
        };
        let handle =
            compose_service(&mut template, &service_id(), &cluster(), &task, &spec(exposure, 1))
                .unwrap();

        let front_end = handle.front_end().unwrap();
        assert_eq!(
            template.get(&front_end.id).unwrap().property("Scheme"),
            Some(&json!("internal"))
        );

        // Listener on 80, targets on the container port.
        let listener = template.get(&front_end.listener).unwrap();
        assert_eq!(listener.property("Port"), Some(&json!(80)));
        let target_group = template.get(&front_end.target_group).unwrap();
        assert_eq!(target_group.property("Port"), Some(&json!(8000)));
    }

    #[test]
    fn test_load_balanced_requires_container_port() {
        let mut template = Template::new();
        let task = task(&mut template, &[]);
        let exposure = ExposurePolicy::LoadBalanced {
            listener_port: Port::new(80).unwrap(),
            publicly_reachable: true,
        };
        let err =
            compose_service(&mut template, &service_id(), &cluster(), &task, &spec(exposure, 1))
                .unwrap_err();
        assert!(matches!(
            err,
            CompositionError::InvalidField {
                config: "ContainerConfig",
                field: "tcp_ports",
                ..
            }
        ));
    }

    #[test]
    fn test_public_exposure_requires_public_subnets() {
        let exposures = [
            ExposurePolicy::Direct {
                port: Port::new(80).unwrap(),
                publicly_reachable: true,
            },
            ExposurePolicy::LoadBalanced {
                listener_port: Port::new(80).unwrap(),
                publicly_reachable: true,
            },
        ];
        for exposure in exposures {
            let mut template = Template::new();
            let task = task(&mut template, &[80]);
            let err = compose_service(
                &mut template,
                &service_id(),
                &private_only_cluster(),
                &task,
                &spec(exposure, 1),
            )
            .unwrap_err();
            assert!(matches!(
                err,
                CompositionError::InvalidField {
                    config: "ServiceConfig",
                    field: "exposure",
                    ..
                }
            ));
            assert_eq!(template.count_of(ResourceType::Service), 0);
        }
    }

    #[test]
    fn test_private_exposure_on_private_only_network() {
        let mut template = Template::new();
        let task = task(&mut template, &[80]);
        let exposure = ExposurePolicy::LoadBalanced {
            listener_port: Port::new(80).unwrap(),
            publicly_reachable: false,
        };
        let handle = compose_service(
            &mut template,
            &service_id(),
            &private_only_cluster(),
            &task,
            &spec(exposure, 1),
        )
        .unwrap();
        let balancer = template.get(&handle.front_end().unwrap().id).unwrap();
        assert_eq!(balancer.property("Subnets"), Some(&json!(["subnet-private"])));
    }
}
