// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Provider
//!
//! Yields a [`NetworkHandle`] by reading an existing network through the
//! lookup collaborator or by declaring a new one.
//!
//! A provisioned network is laid out as:
//!
//! ```text
//! <id>                              VPC
//! <id>/public-subnet-<n>            one per AZ, /20 blocks 0..max_azs
//! <id>/private-subnet-<n>           one per AZ, /20 blocks max_azs..2*max_azs
//! <id>/internet-gateway             + <id>/internet-gateway-attachment
//! <id>/public-subnet-<n>/eip        for n in 1..=nat_gateways
//! <id>/public-subnet-<n>/nat-gateway
//! <id>/public-route-table           shared by every public subnet
//!     /default-route                0.0.0.0/0 -> internet gateway
//! <id>/private-subnet-<n>/route-table
//!     /default-route                0.0.0.0/0 -> NAT min(n, nat_gateways)
//! <subnet>/route-table-association  one per subnet
//! ```
//!
//! With no NAT gateways the private route tables carry no default route.

use serde_json::{json, Value};
use tracing::info;

use crate::config::NetworkRequest;
use crate::domain::reference::pseudo;
use crate::domain::{
    Ipv4Cidr, LogicalId, NetworkHandle, NetworkOrigin, NetworkTopology, ResourceRef,
    ResourceType,
};
use crate::errors::{CompositionError, CompositionResult};
use crate::ports::NetworkLookup;
use crate::template::{Declaration, Template};

/// Look up or provision the network described by `request`
pub fn provide_network(
    template: &mut Template,
    id: &LogicalId,
    request: &NetworkRequest,
    lookup: &dyn NetworkLookup,
) -> CompositionResult<NetworkHandle> {
    match request {
        NetworkRequest::Lookup { name } => {
            let existing = lookup.lookup(name)?;
            info!(
                "Using existing network `{}` ({}) with {} public and {} private subnets",
                name,
                existing.vpc_id,
                existing.public_subnet_ids.len(),
                existing.private_subnet_ids.len()
            );
            Ok(NetworkHandle::new(
                id.clone(),
                name.clone(),
                NetworkOrigin::Imported,
                ResourceRef::Existing(existing.vpc_id),
                existing
                    .public_subnet_ids
                    .into_iter()
                    .map(ResourceRef::Existing)
                    .collect(),
                existing
                    .private_subnet_ids
                    .into_iter()
                    .map(ResourceRef::Existing)
                    .collect(),
            ))
        }
        NetworkRequest::Provision(topology) => provision_network(template, id, topology),
    }
}

fn name_tag(name: String) -> Value {
    json!([{ "Key": "Name", "Value": name }])
}

fn availability_zone(index: u8) -> Value {
    json!({ "Fn::Select": [index, { "Fn::GetAZs": pseudo("Region") }] })
}

fn declare_route_table(
    template: &mut Template,
    id: LogicalId,
    vpc: &ResourceRef,
    name: String,
) -> CompositionResult<LogicalId> {
    template.declare(Declaration::new(
        ResourceType::RouteTable,
        id,
        json!({ "VpcId": vpc.to_value(), "Tags": name_tag(name) }),
    ))
}

/// `0.0.0.0/0` through `target_key` (`GatewayId` or `NatGatewayId`)
fn declare_default_route(
    template: &mut Template,
    route_table: &LogicalId,
    target_key: &str,
    target: &LogicalId,
    after: Option<&LogicalId>,
) -> CompositionResult<LogicalId> {
    let mut properties = serde_json::Map::new();
    properties.insert(
        "RouteTableId".into(),
        ResourceRef::Ref(route_table.clone()).to_value(),
    );
    properties.insert(
        "DestinationCidrBlock".into(),
        Value::String(Ipv4Cidr::ANY.to_string()),
    );
    properties.insert(target_key.into(), ResourceRef::Ref(target.clone()).to_value());
    let mut declaration = Declaration::new(
        ResourceType::Route,
        route_table.child("default-route")?,
        Value::Object(properties),
    );
    if let Some(dependency) = after {
        declaration = declaration.depends_on(dependency);
    }
    template.declare(declaration)
}

fn associate(
    template: &mut Template,
    subnet: &LogicalId,
    route_table: &LogicalId,
) -> CompositionResult<LogicalId> {
    template.declare(Declaration::new(
        ResourceType::SubnetRouteTableAssociation,
        subnet.child("route-table-association")?,
        json!({
            "SubnetId": ResourceRef::Ref(subnet.clone()).to_value(),
            "RouteTableId": ResourceRef::Ref(route_table.clone()).to_value(),
        }),
    ))
}

fn provision_network(
    template: &mut Template,
    id: &LogicalId,
    topology: &NetworkTopology,
) -> CompositionResult<NetworkHandle> {
    let carve = |index: u8| {
        topology
            .cidr
            .subnet(NetworkTopology::SUBNET_PREFIX, u32::from(index))
            .map_err(|e| CompositionError::invalid("NetworkConfig", "cidr", e.to_string()))
    };

    template.declare(Declaration::new(
        ResourceType::Vpc,
        id.clone(),
        json!({
            "CidrBlock": topology.cidr.to_string(),
            "EnableDnsHostnames": true,
            "EnableDnsSupport": true,
            "Tags": name_tag(topology.name.clone()),
        }),
    ))?;
    let vpc = ResourceRef::Ref(id.clone());

    let gateway = id.child("internet-gateway")?;
    template.declare(Declaration::new(
        ResourceType::InternetGateway,
        gateway.clone(),
        json!({ "Tags": name_tag(topology.name.clone()) }),
    ))?;
    let attachment = template.declare(Declaration::new(
        ResourceType::GatewayAttachment,
        id.child("internet-gateway-attachment")?,
        json!({
            "VpcId": vpc.to_value(),
            "InternetGatewayId": ResourceRef::Ref(gateway.clone()).to_value(),
        }),
    ))?;

    let public_route_table = declare_route_table(
        template,
        id.child("public-route-table")?,
        &vpc,
        format!("{}/public", topology.name),
    )?;
    declare_default_route(
        template,
        &public_route_table,
        "GatewayId",
        &gateway,
        Some(&attachment),
    )?;

    let mut public_subnets = Vec::with_capacity(usize::from(topology.max_azs));
    let mut private_subnets = Vec::with_capacity(usize::from(topology.max_azs));
    let mut nat_gateways: Vec<LogicalId> = Vec::with_capacity(usize::from(topology.nat_gateways));

    for az in 0..topology.max_azs {
        let n = az + 1;
        let public_cidr = carve(az)?;
        let private_cidr = carve(topology.max_azs + az)?;

        let public = template.declare(Declaration::new(
            ResourceType::Subnet,
            id.child(format!("public-subnet-{n}"))?,
            json!({
                "VpcId": vpc.to_value(),
                "CidrBlock": public_cidr.to_string(),
                "AvailabilityZone": availability_zone(az),
                "MapPublicIpOnLaunch": true,
                "Tags": name_tag(format!("{}/public-subnet-{n}", topology.name)),
            }),
        ))?;

        let private = template.declare(Declaration::new(
            ResourceType::Subnet,
            id.child(format!("private-subnet-{n}"))?,
            json!({
                "VpcId": vpc.to_value(),
                "CidrBlock": private_cidr.to_string(),
                "AvailabilityZone": availability_zone(az),
                "MapPublicIpOnLaunch": false,
                "Tags": name_tag(format!("{}/private-subnet-{n}", topology.name)),
            }),
        ))?;

        associate(template, &public, &public_route_table)?;

        if az < topology.nat_gateways {
            let eip = template.declare(
                Declaration::new(
                    ResourceType::ElasticIp,
                    public.child("eip")?,
                    json!({ "Domain": "vpc" }),
                )
                .depends_on(&attachment),
            )?;
            let nat = template.declare(Declaration::new(
                ResourceType::NatGateway,
                public.child("nat-gateway")?,
                json!({
                    "SubnetId": ResourceRef::Ref(public.clone()).to_value(),
                    "AllocationId": ResourceRef::attribute(&eip, "AllocationId").to_value(),
                }),
            ))?;
            nat_gateways.push(nat);
        }

        let private_route_table = declare_route_table(
            template,
            private.child("route-table")?,
            &vpc,
            format!("{}/private-subnet-{n}", topology.name),
        )?;
        let nat = nat_gateways
            .get(usize::from(az))
            .or_else(|| nat_gateways.last());
        if let Some(nat) = nat {
            declare_default_route(template, &private_route_table, "NatGatewayId", nat, None)?;
        }
        associate(template, &private, &private_route_table)?;

        public_subnets.push(ResourceRef::Ref(public));
        private_subnets.push(ResourceRef::Ref(private));
    }

    info!(
        "Provisioned network `{}` ({}) across {} AZs with {} NAT gateways",
        topology.name, topology.cidr, topology.max_azs, topology.nat_gateways
    );

    Ok(NetworkHandle::new(
        id.clone(),
        topology.name.clone(),
        NetworkOrigin::Provisioned,
        vpc,
        public_subnets,
        private_subnets,
    ))
}
