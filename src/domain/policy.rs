// Copyright (c) 2025 - Cowboy AI, Inc.
//! Exposure, Scaling and Alarm Policies

use serde::{Deserialize, Serialize};

use super::{Port, TopicHandle};
use crate::errors::{CompositionError, CompositionResult};

/// How a service is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExposurePolicy {
    /// Security-group-gated service, reachable on `port` from anywhere
    Direct { port: Port, publicly_reachable: bool },
    /// Service behind a load-balancing front end listening on `listener_port`
    LoadBalanced {
        listener_port: Port,
        publicly_reachable: bool,
    },
}

impl ExposurePolicy {
    pub fn publicly_reachable(&self) -> bool {
        match self {
            ExposurePolicy::Direct {
                publicly_reachable, ..
            }
            | ExposurePolicy::LoadBalanced {
                publicly_reachable, ..
            } => *publicly_reachable,
        }
    }
}

/// Bounded autoscaling policy
///
/// `min_count <= max_count` is checked when the policy is attached, not on
/// construction, so an inverted range surfaces as
/// [`CompositionError::InvalidScalingRange`] from the scaling composer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingPolicy {
    pub min_count: u32,
    pub max_count: u32,
    pub cpu_target_percent: f64,
    pub memory_target_percent: f64,
}

impl ScalingPolicy {
    /// Check range and utilization targets
    pub fn validate(&self) -> CompositionResult<()> {
        if self.min_count > self.max_count {
            return Err(CompositionError::InvalidScalingRange {
                min: self.min_count,
                max: self.max_count,
            });
        }
        validate_percent("cpu_target_percent", self.cpu_target_percent)?;
        validate_percent("memory_target_percent", self.memory_target_percent)?;
        Ok(())
    }
}

fn validate_percent(field: &'static str, value: f64) -> CompositionResult<()> {
    if value.is_finite() && value > 0.0 && value <= 100.0 {
        Ok(())
    } else {
        Err(CompositionError::invalid(
            "ScalingPolicy",
            field,
            format!("{value} is outside (0, 100]"),
        ))
    }
}

/// Where alarm notifications go
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum AlarmRoutingStrategy {
    /// Alarms are declared but notify nobody
    NoOp,
    /// Every alarm notifies the topic
    Notify { topic: TopicHandle },
}

impl AlarmRoutingStrategy {
    /// Select `Notify` iff a topic is present
    pub fn select(topic: Option<&TopicHandle>) -> Self {
        match topic {
            Some(topic) => AlarmRoutingStrategy::Notify {
                topic: topic.clone(),
            },
            None => AlarmRoutingStrategy::NoOp,
        }
    }

    pub fn topic(&self) -> Option<&TopicHandle> {
        match self {
            AlarmRoutingStrategy::NoOp => None,
            AlarmRoutingStrategy::Notify { topic } => Some(topic),
        }
    }
}

/// Comparison applied between a metric and its threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    GreaterThanThreshold,
    GreaterThanOrEqualToThreshold,
    LessThanThreshold,
    LessThanOrEqualToThreshold,
}

impl ComparisonOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::GreaterThanThreshold => "GreaterThanThreshold",
            ComparisonOperator::GreaterThanOrEqualToThreshold => "GreaterThanOrEqualToThreshold",
            ComparisonOperator::LessThanThreshold => "LessThanThreshold",
            ComparisonOperator::LessThanOrEqualToThreshold => "LessThanOrEqualToThreshold",
        }
    }
}

/// Service metric an alarm watches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceMetric {
    RunningTaskCount,
    CpuUtilization,
    MemoryUtilization,
}

impl ServiceMetric {
    pub fn metric_name(&self) -> &'static str {
        match self {
            ServiceMetric::RunningTaskCount => "RunningTaskCount",
            ServiceMetric::CpuUtilization => "CPUUtilization",
            ServiceMetric::MemoryUtilization => "MemoryUtilization",
        }
    }

    pub fn namespace(&self) -> &'static str {
        match self {
            ServiceMetric::RunningTaskCount => "ECS/ContainerInsights",
            ServiceMetric::CpuUtilization | ServiceMetric::MemoryUtilization => "AWS/ECS",
        }
    }

    pub fn statistic(&self) -> &'static str {
        match self {
            ServiceMetric::RunningTaskCount => "Maximum",
            ServiceMetric::CpuUtilization | ServiceMetric::MemoryUtilization => "Average",
        }
    }
}

/// Alarm threshold on one service metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlarmThreshold {
    pub metric: ServiceMetric,
    pub threshold: f64,
    pub comparison: ComparisonOperator,
    #[serde(default = "AlarmThreshold::default_periods")]
    pub evaluation_periods: u32,
    #[serde(default = "AlarmThreshold::default_periods")]
    pub datapoints_to_alarm: u32,
    #[serde(default = "AlarmThreshold::default_period_minutes")]
    pub period_minutes: u32,
}

impl AlarmThreshold {
    /// Longest alarm period accepted, one day
    pub const MAX_PERIOD_MINUTES: u32 = 24 * 60;

    fn default_periods() -> u32 {
        1
    }

    fn default_period_minutes() -> u32 {
        5
    }

    /// Alarm when more than `max_running_tasks` tasks are running
    pub fn max_running_tasks(max_running_tasks: u32) -> Self {
        Self {
            metric: ServiceMetric::RunningTaskCount,
            threshold: f64::from(max_running_tasks),
            comparison: ComparisonOperator::GreaterThanThreshold,
            evaluation_periods: Self::default_periods(),
            datapoints_to_alarm: Self::default_periods(),
            period_minutes: Self::default_period_minutes(),
        }
    }

    /// Alarm when average cpu usage exceeds `percent`
    pub fn max_cpu_usage(percent: f64) -> Self {
        Self {
            metric: ServiceMetric::CpuUtilization,
            ..Self::max_running_tasks(0)
        }
        .with_threshold(percent)
    }

    /// Alarm when average memory usage exceeds `percent`
    pub fn max_memory_usage(percent: f64) -> Self {
        Self {
            metric: ServiceMetric::MemoryUtilization,
            ..Self::max_running_tasks(0)
        }
        .with_threshold(percent)
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_comparison(mut self, comparison: ComparisonOperator) -> Self {
        self.comparison = comparison;
        self
    }

    pub fn with_periods(mut self, evaluation_periods: u32, datapoints_to_alarm: u32) -> Self {
        self.evaluation_periods = evaluation_periods;
        self.datapoints_to_alarm = datapoints_to_alarm;
        self
    }

    pub fn with_period_minutes(mut self, period_minutes: u32) -> Self {
        self.period_minutes = period_minutes;
        self
    }

    /// Alarm period in seconds
    pub fn period_seconds(&self) -> u32 {
        self.period_minutes.saturating_mul(60)
    }

    /// Check evaluation window consistency
    pub fn validate(&self) -> CompositionResult<()> {
        if !self.threshold.is_finite() {
            return Err(CompositionError::invalid(
                "AlarmThreshold",
                "threshold",
                "must be a finite number",
            ));
        }
        if self.evaluation_periods == 0 {
            return Err(CompositionError::invalid(
                "AlarmThreshold",
                "evaluation_periods",
                "must be at least 1",
            ));
        }
        if self.datapoints_to_alarm == 0 || self.datapoints_to_alarm > self.evaluation_periods {
            return Err(CompositionError::invalid(
                "AlarmThreshold",
                "datapoints_to_alarm",
                format!(
                    "{} must be between 1 and evaluation_periods ({})",
                    self.datapoints_to_alarm, self.evaluation_periods
                ),
            ));
        }
        if self.period_minutes == 0 || self.period_minutes > Self::MAX_PERIOD_MINUTES {
            return Err(CompositionError::invalid(
                "AlarmThreshold",
                "period_minutes",
                format!(
                    "{} must be between 1 and {}",
                    self.period_minutes,
                    Self::MAX_PERIOD_MINUTES
                ),
            ));
        }
        Ok(())
    }
}
