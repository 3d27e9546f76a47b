// Copyright (c) 2025 - Cowboy AI, Inc.
//! Task Sizing Value Objects
//!
//! Fargate tasks are sized from a fixed table of cpu units, each of which
//! admits a specific range of memory values.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{CompositionError, CompositionResult};

/// Fargate cpu units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Cpu {
    /// 0.25 vCPU
    Quarter,
    /// 0.5 vCPU
    Half,
    /// 1 vCPU
    One,
    /// 2 vCPU
    Two,
    /// 4 vCPU
    Four,
}

impl Cpu {
    /// Every supported value, smallest first
    pub const ALL: [Cpu; 5] = [Cpu::Quarter, Cpu::Half, Cpu::One, Cpu::Two, Cpu::Four];

    /// Cpu units (1024 per vCPU)
    pub fn units(&self) -> u32 {
        match self {
            Cpu::Quarter => 256,
            Cpu::Half => 512,
            Cpu::One => 1024,
            Cpu::Two => 2048,
            Cpu::Four => 4096,
        }
    }

    /// Memory values (MiB) this cpu size accepts
    pub fn memory_options(&self) -> Vec<u32> {
        match self {
            Cpu::Quarter => vec![512, 1024, 2048],
            Cpu::Half => (1..=4).map(|gb| gb * 1024).collect(),
            Cpu::One => (2..=8).map(|gb| gb * 1024).collect(),
            Cpu::Two => (4..=16).map(|gb| gb * 1024).collect(),
            Cpu::Four => (8..=30).map(|gb| gb * 1024).collect(),
        }
    }

    /// Check whether a memory value pairs with this cpu size
    pub fn supports_memory(&self, memory_mib: u32) -> bool {
        self.memory_options().contains(&memory_mib)
    }
}

impl TryFrom<u32> for Cpu {
    type Error = CompositionError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Cpu::ALL
            .into_iter()
            .find(|cpu| cpu.units() == value)
            .ok_or_else(|| {
                CompositionError::invalid(
                    "TaskConfig",
                    "cpu",
                    format!("{value} is not one of 256, 512, 1024, 2048, 4096"),
                )
            })
    }
}

impl From<Cpu> for u32 {
    fn from(value: Cpu) -> Self {
        value.units()
    }
}

impl fmt::Display for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.units())
    }
}

/// Resolved task sizing
///
/// # Invariants
/// - `family` is non-empty; it is the stable grouping key of the task
/// - `memory_limit_mib` is one of the values admitted by `cpu`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceSizing {
    cpu: Cpu,
    memory_limit_mib: u32,
    family: String,
}

impl ResourceSizing {
    /// Create a validated sizing
    pub fn new(cpu: Cpu, memory_limit_mib: u32, family: impl Into<String>) -> CompositionResult<Self> {
        let family = family.into();

        if family.trim().is_empty() {
            return Err(CompositionError::missing("TaskConfig", "family"));
        }

        if memory_limit_mib == 0 {
            return Err(CompositionError::invalid(
                "TaskConfig",
                "memory_limit_mib",
                "must be positive",
            ));
        }

        if !cpu.supports_memory(memory_limit_mib) {
            return Err(CompositionError::UnsupportedSizing {
                cpu: cpu.units(),
                memory_mib: memory_limit_mib,
            });
        }

        Ok(Self {
            cpu,
            memory_limit_mib,
            family,
        })
    }

    pub fn cpu(&self) -> Cpu {
        self.cpu
    }

    pub fn memory_limit_mib(&self) -> u32 {
        self.memory_limit_mib
    }

    pub fn family(&self) -> &str {
        &self.family
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(256, 512 ; "quarter smallest")]
    #[test_case(256, 2048 ; "quarter largest")]
    #[test_case(512, 1024 ; "half one gb")]
    #[test_case(1024, 8192 ; "one vcpu largest")]
    #[test_case(2048, 4096 ; "two vcpu smallest")]
    #[test_case(4096, 30720 ; "four vcpu largest")]
    fn test_supported_pairings(cpu: u32, memory: u32) {
        let cpu = Cpu::try_from(cpu).unwrap();
        assert!(ResourceSizing::new(cpu, memory, "test").is_ok());
    }

    #[test_case(256, 4096 ; "quarter too much memory")]
    #[test_case(512, 512 ; "half too little memory")]
    #[test_case(4096, 4096 ; "four vcpu too little memory")]
    #[test_case(1024, 3000 ; "not a gigabyte step")]
    fn test_unsupported_pairings(cpu: u32, memory: u32) {
        let cpu = Cpu::try_from(cpu).unwrap();
        assert_eq!(
            ResourceSizing::new(cpu, memory, "test"),
            Err(CompositionError::UnsupportedSizing {
                cpu: cpu.units(),
                memory_mib: memory
            })
        );
    }

    #[test]
    fn test_cpu_outside_table() {
        assert!(matches!(
            Cpu::try_from(300),
            Err(CompositionError::InvalidField { field: "cpu", .. })
        ));
    }

    #[test]
    fn test_family_required() {
        assert_eq!(
            ResourceSizing::new(Cpu::Half, 1024, "  "),
            Err(CompositionError::MissingRequiredField {
                config: "TaskConfig",
                field: "family"
            })
        );
    }

    #[test]
    fn test_cpu_serde_as_number() {
        let cpu: Cpu = serde_json::from_str("512").unwrap();
        assert_eq!(cpu, Cpu::Half);
        assert_eq!(serde_json::to_string(&Cpu::Four).unwrap(), "4096");
        assert!(serde_json::from_str::<Cpu>("100").is_err());
    }
}
