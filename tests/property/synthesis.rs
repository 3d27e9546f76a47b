// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Whole-Pass Synthesis

use std::collections::HashSet;

use cim_container_infra::domain::{AlarmThreshold, ExposurePolicy};
use cim_container_infra::synthesize;
use proptest::prelude::*;

use crate::fixtures::*;

fn exposure() -> impl Strategy<Value = ExposurePolicy> {
    prop_oneof![
        (1u32..=65535, any::<bool>()).prop_map(|(value, public)| direct(value, public)),
        (1u32..=65535, any::<bool>()).prop_map(|(value, public)| load_balanced(value, public)),
    ]
}

proptest! {
    /// Property: Synthesis is deterministic
    ///
    /// Two passes over one request produce the same document.
    #[test]
    fn prop_synthesis_is_idempotent(
        exposure in exposure(),
        desired in 0u32..10,
        with_lookup in any::<bool>(),
    ) {
        let mut request = webapp_request(exposure, desired);
        if with_lookup {
            request.network.lookup_name = Some(SHARED_NETWORK.into());
        }

        let first = synthesize(&request, &env(), &shared_catalog()).unwrap();
        let second = synthesize(&request, &env(), &shared_catalog()).unwrap();

        prop_assert_eq!(first.template().to_document(), second.template().to_document());
        prop_assert_eq!(first.service(), second.service());
    }

    /// Property: Every declared identifier is unique within a pass
    #[test]
    fn prop_declared_ids_unique(exposure in exposure(), max_tasks in 1u32..10) {
        let mut request = webapp_request(exposure, 1);
        request.scaling = Some(scaling(1, max_tasks));
        request.alarm_topic = Some(alarm_topic());
        request.monitoring = Some(monitoring(vec![monitor(
            "webapp",
            &[("MaxRunningTasks", AlarmThreshold::max_running_tasks(max_tasks))],
        )]));

        let topology = synthesize(&request, &env(), &shared_catalog()).unwrap();
        let declarations = topology.template().declarations();
        let ids: HashSet<_> = declarations.iter().map(|d| d.id.as_str()).collect();
        prop_assert_eq!(ids.len(), declarations.len());
    }

    /// Property: The service always references the cluster and task definition of its pass
    #[test]
    fn prop_service_wired_to_its_pass(exposure in exposure(), desired in 0u32..10) {
        let topology = synthesize(&webapp_request(exposure, desired), &env(), &shared_catalog())
            .unwrap();
        prop_assert_eq!(topology.service().cluster(), topology.cluster().id());
        prop_assert_eq!(topology.service().task_definition(), topology.task_definition().id());
        prop_assert_eq!(topology.service().desired_count(), desired);
    }
}
