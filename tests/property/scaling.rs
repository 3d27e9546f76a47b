// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Scaling Attachment

use cim_container_infra::domain::ScalingPolicy;
use cim_container_infra::{synthesize, CompositionError};
use proptest::prelude::*;

use crate::fixtures::*;

fn target() -> impl Strategy<Value = f64> {
    (1u32..=100u32).prop_map(f64::from)
}

proptest! {
    /// Property: An ordered range always yields one policy per utilization metric
    #[test]
    fn prop_ordered_range_yields_two_policies(min in 0u32..20, span in 0u32..20) {
        let mut request = webapp_request(load_balanced(8000, true), 1);
        request.scaling = Some(scaling(min, min + span));

        let topology = synthesize(&request, &env(), &shared_catalog()).unwrap();
        let attachment = topology.scaling().unwrap();
        prop_assert_eq!(attachment.policies.len(), 2);

        let state = topology.declared_state();
        let targets = &state["AWS::ApplicationAutoScaling::ScalableTarget"];
        prop_assert_eq!(targets.len(), 1);
        prop_assert_eq!(targets[0].properties["MinCapacity"].as_u64(), Some(u64::from(min)));
        prop_assert_eq!(targets[0].properties["MaxCapacity"].as_u64(), Some(u64::from(min + span)));
    }

    /// Property: An inverted range always fails before anything is attached
    #[test]
    fn prop_inverted_range_rejected(max in 0u32..20, gap in 1u32..20) {
        let mut request = webapp_request(load_balanced(8000, true), 1);
        request.scaling = Some(scaling(max + gap, max));

        prop_assert_eq!(
            synthesize(&request, &env(), &shared_catalog()).unwrap_err(),
            CompositionError::InvalidScalingRange { min: max + gap, max }
        );
    }

    /// Property: Validation accepts exactly the ordered ranges with targets in (0, 100]
    #[test]
    fn prop_policy_validation(
        min in 0u32..50,
        max in 0u32..50,
        cpu in target(),
        memory in target(),
    ) {
        let policy = ScalingPolicy {
            min_count: min,
            max_count: max,
            cpu_target_percent: cpu,
            memory_target_percent: memory,
        };
        prop_assert_eq!(policy.validate().is_ok(), min <= max);
    }
}
