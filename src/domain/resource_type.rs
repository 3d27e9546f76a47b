// Copyright (c) 2025 - Cowboy AI, Inc.
//! Declared Resource Type Taxonomy
//!
//! The closed vocabulary of resources a topology may declare. Each maps to
//! the type name the provisioning collaborator understands.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource type taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    // Network
    /// Virtual private network
    Vpc,
    /// Subnet inside a network
    Subnet,
    /// Internet gateway
    InternetGateway,
    /// Gateway attachment to a network
    GatewayAttachment,
    /// Elastic IP for a NAT gateway
    ElasticIp,
    /// NAT gateway
    NatGateway,
    /// Route table
    RouteTable,
    /// Route inside a route table
    Route,
    /// Subnet to route table binding
    SubnetRouteTableAssociation,
    /// Ingress/egress boundary
    SecurityGroup,

    // Compute
    /// Container cluster
    Cluster,
    /// Task definition
    TaskDefinition,
    /// IAM role assumed by tasks
    Role,
    /// Log group backing a container log sink
    LogGroup,
    /// Long-running service
    Service,

    // Load balancing
    /// Application load balancer
    LoadBalancer,
    /// Load balancer listener
    Listener,
    /// Load balancer target group
    TargetGroup,

    // Scaling
    /// Scalable target
    ScalableTarget,
    /// Scaling policy
    ScalingPolicy,

    // Monitoring and notification
    /// Dashboard
    Dashboard,
    /// Metric alarm
    Alarm,
    /// Notification topic
    Topic,
    /// Notification subscription
    Subscription,
}

impl ResourceType {
    /// Type name understood by the provisioning collaborator
    pub fn declaration_type(&self) -> &'static str {
        match self {
            ResourceType::Vpc => "AWS::EC2::VPC",
            ResourceType::Subnet => "AWS::EC2::Subnet",
            ResourceType::InternetGateway => "AWS::EC2::InternetGateway",
            ResourceType::GatewayAttachment => "AWS::EC2::VPCGatewayAttachment",
            ResourceType::ElasticIp => "AWS::EC2::EIP",
            ResourceType::NatGateway => "AWS::EC2::NatGateway",
            ResourceType::RouteTable => "AWS::EC2::RouteTable",
            ResourceType::Route => "AWS::EC2::Route",
            ResourceType::SubnetRouteTableAssociation => "AWS::EC2::SubnetRouteTableAssociation",
            ResourceType::SecurityGroup => "AWS::EC2::SecurityGroup",
            ResourceType::Cluster => "AWS::ECS::Cluster",
            ResourceType::TaskDefinition => "AWS::ECS::TaskDefinition",
            ResourceType::Role => "AWS::IAM::Role",
            ResourceType::LogGroup => "AWS::Logs::LogGroup",
            ResourceType::Service => "AWS::ECS::Service",
            ResourceType::LoadBalancer => "AWS::ElasticLoadBalancingV2::LoadBalancer",
            ResourceType::Listener => "AWS::ElasticLoadBalancingV2::Listener",
            ResourceType::TargetGroup => "AWS::ElasticLoadBalancingV2::TargetGroup",
            ResourceType::ScalableTarget => "AWS::ApplicationAutoScaling::ScalableTarget",
            ResourceType::ScalingPolicy => "AWS::ApplicationAutoScaling::ScalingPolicy",
            ResourceType::Dashboard => "AWS::CloudWatch::Dashboard",
            ResourceType::Alarm => "AWS::CloudWatch::Alarm",
            ResourceType::Topic => "AWS::SNS::Topic",
            ResourceType::Subscription => "AWS::SNS::Subscription",
        }
    }

    /// Get the category of this resource type
    pub fn category(&self) -> ResourceCategory {
        match self {
            ResourceType::Vpc
            | ResourceType::Subnet
            | ResourceType::InternetGateway
            | ResourceType::GatewayAttachment
            | ResourceType::ElasticIp
            | ResourceType::NatGateway
            | ResourceType::RouteTable
            | ResourceType::Route
            | ResourceType::SubnetRouteTableAssociation
            | ResourceType::SecurityGroup => ResourceCategory::Network,

            ResourceType::Cluster
            | ResourceType::TaskDefinition
            | ResourceType::Role
            | ResourceType::LogGroup
            | ResourceType::Service => ResourceCategory::Compute,

            ResourceType::LoadBalancer | ResourceType::Listener | ResourceType::TargetGroup => {
                ResourceCategory::LoadBalancing
            }

            ResourceType::ScalableTarget | ResourceType::ScalingPolicy => {
                ResourceCategory::Scaling
            }

            ResourceType::Dashboard
            | ResourceType::Alarm
            | ResourceType::Topic
            | ResourceType::Subscription => ResourceCategory::Monitoring,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.declaration_type())
    }
}

/// High-level resource category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    Network,
    Compute,
    LoadBalancing,
    Scaling,
    Monitoring,
}
