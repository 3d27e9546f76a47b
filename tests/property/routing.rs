// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Alarm Routing Selection

use cim_container_infra::compose::declare_topic;
use cim_container_infra::config::resolve::resolve_monitoring;
use cim_container_infra::config::MonitoringConfig;
use cim_container_infra::domain::{AlarmRoutingStrategy, LogicalId};
use cim_container_infra::Template;
use proptest::prelude::*;

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,12}"
}

proptest! {
    /// Property: Notify exactly when a topic is present, naming that topic
    #[test]
    fn prop_strategy_follows_topic(
        dashboard in name(),
        topic_id in prop::option::of(name()),
        prefix in prop::option::of(name()),
    ) {
        let mut template = Template::new();
        let mut config = MonitoringConfig::new(dashboard.clone());
        if let Some(prefix) = &prefix {
            config = config.with_alarm_name_prefix(prefix.clone());
        }
        let topic = match &topic_id {
            Some(raw) => {
                let topic = declare_topic(&mut template, &LogicalId::new(raw.clone()).unwrap(), None)
                    .unwrap();
                config = config.with_alarm_topic(topic.clone());
                Some(topic)
            }
            None => None,
        };

        let resolved = resolve_monitoring(&config).unwrap();

        let expected = match topic {
            Some(topic) => AlarmRoutingStrategy::Notify { topic },
            None => AlarmRoutingStrategy::NoOp,
        };
        prop_assert_eq!(resolved.strategy, expected);
        prop_assert_eq!(resolved.alarm_name_prefix, prefix.unwrap_or(dashboard.clone()));
        prop_assert_eq!(resolved.dashboard_name, dashboard);
    }
}
