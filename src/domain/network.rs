// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Value Objects with Validation Invariants

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use thiserror::Error;

use super::{LogicalId, ResourceRef};

/// Network validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Invalid IPv4 address format: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid CIDR notation: {0}")]
    InvalidCidr(String),

    #[error("Invalid prefix length: {0} (must be 0-32)")]
    InvalidPrefixLength(u8),

    #[error("Cannot carve block {index} of /{prefix} from {parent}")]
    SubnetOutOfRange {
        parent: String,
        prefix: u8,
        index: u32,
    },

    #[error("Invalid port: {0} (must be 1-65535)")]
    InvalidPort(u32),
}

/// IPv4 block in CIDR notation
///
/// Invariants:
/// - Prefix length 0-32
/// - Address is the network address (host bits cleared)
///
/// # Examples
///
/// ```rust
/// use cim_container_infra::domain::Ipv4Cidr;
///
/// let vpc = Ipv4Cidr::new("10.0.0.0/16").unwrap();
/// assert_eq!(vpc.subnet(20, 1).unwrap().to_string(), "10.0.16.0/20");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ipv4Cidr {
    address: Ipv4Addr,
    prefix_length: u8,
}

impl Ipv4Cidr {
    /// Every IPv4 source
    pub const ANY: Ipv4Cidr = Ipv4Cidr {
        address: Ipv4Addr::UNSPECIFIED,
        prefix_length: 0,
    };

    /// Parse `a.b.c.d/n`, normalising host bits away
    pub fn new(cidr: impl AsRef<str>) -> Result<Self, NetworkError> {
        let cidr = cidr.as_ref();
        let (addr_str, prefix_str) = cidr
            .split_once('/')
            .ok_or_else(|| NetworkError::InvalidCidr(cidr.to_string()))?;

        let address = Ipv4Addr::from_str(addr_str)
            .map_err(|_| NetworkError::InvalidIpAddress(addr_str.to_string()))?;

        let prefix_length = prefix_str
            .parse::<u8>()
            .map_err(|_| NetworkError::InvalidCidr(cidr.to_string()))?;

        Self::from_parts(address, prefix_length)
    }

    pub fn from_parts(address: Ipv4Addr, prefix_length: u8) -> Result<Self, NetworkError> {
        if prefix_length > 32 {
            return Err(NetworkError::InvalidPrefixLength(prefix_length));
        }

        Ok(Self {
            address: Ipv4Addr::from(u32::from(address) & Self::mask(prefix_length)),
            prefix_length,
        })
    }

    fn mask(prefix_length: u8) -> u32 {
        if prefix_length == 0 {
            0
        } else {
            u32::MAX << (32 - u32::from(prefix_length))
        }
    }

    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    pub fn prefix_length(&self) -> u8 {
        self.prefix_length
    }

    /// The `index`-th block of length `prefix_length` inside this block
    pub fn subnet(&self, prefix_length: u8, index: u32) -> Result<Self, NetworkError> {
        let out_of_range = || NetworkError::SubnetOutOfRange {
            parent: self.to_string(),
            prefix: prefix_length,
            index,
        };

        if prefix_length > 32 {
            return Err(NetworkError::InvalidPrefixLength(prefix_length));
        }
        if prefix_length < self.prefix_length {
            return Err(out_of_range());
        }

        let extra_bits = u32::from(prefix_length - self.prefix_length);
        if extra_bits < 32 && u64::from(index) >= 1u64 << extra_bits {
            return Err(out_of_range());
        }

        let block_size = if prefix_length == 0 {
            0
        } else {
            1u32 << (32 - u32::from(prefix_length))
        };
        let offset = index.checked_mul(block_size).ok_or_else(out_of_range)?;

        Self::from_parts(Ipv4Addr::from(u32::from(self.address) + offset), prefix_length)
    }
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_length)
    }
}

impl FromStr for Ipv4Cidr {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Ipv4Cidr {
    type Error = NetworkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Ipv4Cidr> for String {
    fn from(value: Ipv4Cidr) -> Self {
        value.to_string()
    }
}

/// TCP port value object (1-65535)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u16")]
pub struct Port(u16);

impl Port {
    pub fn new(port: u32) -> Result<Self, NetworkError> {
        match u16::try_from(port) {
            Ok(value) if value > 0 => Ok(Self(value)),
            _ => Err(NetworkError::InvalidPort(port)),
        }
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Port {
    type Error = NetworkError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Port> for u16 {
    fn from(value: Port) -> Self {
        value.0
    }
}

/// Parameters for provisioning a new network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkTopology {
    pub name: String,
    pub cidr: Ipv4Cidr,
    pub nat_gateways: u8,
    pub max_azs: u8,
}

impl NetworkTopology {
    /// Prefix length of every carved subnet
    pub const SUBNET_PREFIX: u8 = 20;

    /// Upper bound on availability zones
    pub const MAX_AZS: u8 = 8;
}

/// Network that already exists, as reported by the lookup collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingNetwork {
    pub vpc_id: String,
    #[serde(default)]
    pub public_subnet_ids: Vec<String>,
    #[serde(default)]
    pub private_subnet_ids: Vec<String>,
}

/// Where a network handle came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkOrigin {
    /// Declared in this template
    Provisioned,
    /// Resolved through lookup by name
    Imported,
}

/// Opaque network handle consumed by the cluster composer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkHandle {
    id: LogicalId,
    name: String,
    origin: NetworkOrigin,
    vpc: ResourceRef,
    public_subnets: Vec<ResourceRef>,
    private_subnets: Vec<ResourceRef>,
}

impl NetworkHandle {
    pub(crate) fn new(
        id: LogicalId,
        name: impl Into<String>,
        origin: NetworkOrigin,
        vpc: ResourceRef,
        public_subnets: Vec<ResourceRef>,
        private_subnets: Vec<ResourceRef>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            origin,
            vpc,
            public_subnets,
            private_subnets,
        }
    }

    pub fn id(&self) -> &LogicalId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> &NetworkOrigin {
        &self.origin
    }

    pub fn vpc(&self) -> &ResourceRef {
        &self.vpc
    }

    pub fn public_subnets(&self) -> &[ResourceRef] {
        &self.public_subnets
    }

    pub fn private_subnets(&self) -> &[ResourceRef] {
        &self.private_subnets
    }

    /// Subnets a workload lands in
    ///
    /// Public placement only ever uses public subnets. Private placement
    /// prefers private subnets and falls back to public ones.
    pub fn subnets_for(&self, public: bool) -> &[ResourceRef] {
        if public || self.private_subnets.is_empty() {
            &self.public_subnets
        } else {
            &self.private_subnets
        }
    }
}
