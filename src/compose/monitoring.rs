// Copyright (c) 2025 - Cowboy AI, Inc.
//! Monitoring Composer
//!
//! A dashboard-and-alarm facade bound to one [`AlarmRoutingStrategy`].
//!
//! # Lifecycle
//!
//! ```text
//! init_monitoring(config) ──▶ MonitoringHandle
//!     │  declares <id> (dashboard, empty body)
//!     ├── add_header(text)                      appends a text widget
//!     └── monitor_service(service, name, map?)  section once per name,
//!                                               one alarm per map entry
//! ```
//!
//! The dashboard body is re-rendered after every change, so the declared
//! body always reflects every header and section added so far.
//!
//! # Repeated calls
//!
//! `monitor_service` never replaces earlier alarms. A second call for the
//! same display name reuses the existing section and adds the alarms of
//! its own threshold map, so the declared alarms are the union of every
//! call. Re-adding an alarm key with an identical threshold is a no-op;
//! re-adding it with a different threshold is a
//! [`CompositionError::DuplicateIdentifier`].

use std::collections::BTreeMap;

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::ResolvedMonitoringConfig;
use crate::domain::{
    escape_segment, AlarmRoutingStrategy, AlarmThreshold, LogicalId, ResourceRef, ResourceType,
    ServiceHandle, ServiceMetric,
};
use crate::errors::{CompositionError, CompositionResult};
use crate::template::{Declaration, Template};

/// Alarm declared by the facade
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmHandle {
    pub id: LogicalId,
    pub name: String,
    pub service: LogicalId,
    pub threshold: AlarmThreshold,
}

#[derive(Debug, Clone, PartialEq)]
enum DashboardBlock {
    Header(String),
    Service {
        display_name: String,
        cluster: LogicalId,
        service: LogicalId,
    },
}

/// Dashboard facade returned by [`init_monitoring`]
#[derive(Debug, Clone, PartialEq)]
pub struct MonitoringHandle {
    dashboard: LogicalId,
    dashboard_name: String,
    strategy: AlarmRoutingStrategy,
    alarm_name_prefix: String,
    blocks: Vec<DashboardBlock>,
    alarms: Vec<AlarmHandle>,
}

/// Declare the dashboard and bind the resolved routing strategy
pub fn init_monitoring(
    template: &mut Template,
    id: &LogicalId,
    config: &ResolvedMonitoringConfig,
) -> CompositionResult<MonitoringHandle> {
    let handle = MonitoringHandle {
        dashboard: id.clone(),
        dashboard_name: config.dashboard_name.clone(),
        strategy: config.strategy.clone(),
        alarm_name_prefix: config.alarm_name_prefix.clone(),
        blocks: Vec::new(),
        alarms: Vec::new(),
    };

    template.declare(Declaration::new(
        ResourceType::Dashboard,
        id.clone(),
        json!({
            "DashboardName": config.dashboard_name,
            "DashboardBody": handle.render_body()?,
        }),
    ))?;

    match handle.strategy.topic() {
        Some(topic) => info!(
            "Initialised dashboard `{}`; alarms notify `{}`",
            config.dashboard_name,
            topic.id()
        ),
        None => info!(
            "Initialised dashboard `{}`; alarms notify nobody",
            config.dashboard_name
        ),
    }
    Ok(handle)
}

impl MonitoringHandle {
    pub fn dashboard(&self) -> &LogicalId {
        &self.dashboard
    }

    pub fn dashboard_name(&self) -> &str {
        &self.dashboard_name
    }

    pub fn strategy(&self) -> &AlarmRoutingStrategy {
        &self.strategy
    }

    pub fn alarm_name_prefix(&self) -> &str {
        &self.alarm_name_prefix
    }

    pub fn alarms(&self) -> &[AlarmHandle] {
        &self.alarms
    }

    pub fn alarm(&self, name: &str) -> Option<&AlarmHandle> {
        self.alarms.iter().find(|a| a.name == name)
    }

    /// Display names with a dashboard section, in the order they were added
    pub fn monitored_services(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                DashboardBlock::Service { display_name, .. } => Some(display_name.as_str()),
                DashboardBlock::Header(_) => None,
            })
            .collect()
    }

    /// Append a text header to the dashboard
    pub fn add_header(&mut self, template: &mut Template, text: &str) -> CompositionResult<()> {
        self.blocks.push(DashboardBlock::Header(text.to_string()));
        self.refresh(template)
    }

    /// Add a dashboard section for `service` and one alarm per threshold
    ///
    /// The section is added once per `display_name`; alarms accumulate
    /// across calls.
    pub fn monitor_service(
        &mut self,
        template: &mut Template,
        service: &ServiceHandle,
        display_name: &str,
        thresholds: Option<&BTreeMap<String, AlarmThreshold>>,
    ) -> CompositionResult<()> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(CompositionError::missing("ServiceMonitorRequest", "display_name"));
        }

        self.ensure_section(service, display_name)?;

        let section = self
            .dashboard
            .child(format!("alarm-{}", escape_segment(display_name)))?;
        for (key, threshold) in thresholds.into_iter().flatten() {
            self.add_alarm(template, service, &section, display_name, key, threshold)?;
        }

        self.refresh(template)
    }

    fn ensure_section(&mut self, service: &ServiceHandle, display_name: &str) -> CompositionResult<()> {
        let existing = self.blocks.iter().find_map(|block| match block {
            DashboardBlock::Service {
                display_name: name,
                service: bound,
                ..
            } if name == display_name => Some(bound.clone()),
            _ => None,
        });

        match existing {
            Some(bound) if &bound == service.id() => Ok(()),
            Some(bound) => Err(CompositionError::invalid(
                "ServiceMonitorRequest",
                "display_name",
                format!("`{display_name}` already monitors `{bound}`"),
            )),
            None => {
                debug!("Adding dashboard section `{}`", display_name);
                self.blocks.push(DashboardBlock::Service {
                    display_name: display_name.to_string(),
                    cluster: service.cluster().clone(),
                    service: service.id().clone(),
                });
                Ok(())
            }
        }
    }

    fn add_alarm(
        &mut self,
        template: &mut Template,
        service: &ServiceHandle,
        section: &LogicalId,
        display_name: &str,
        key: &str,
        threshold: &AlarmThreshold,
    ) -> CompositionResult<()> {
        threshold.validate()?;
        if key.is_empty() {
            return Err(CompositionError::invalid(
                "ServiceMonitorRequest",
                "thresholds",
                "alarm key is empty",
            ));
        }

        let id = section.child(escape_segment(key))?;
        if let Some(existing) = self.alarms.iter().find(|a| a.id == id) {
            if existing.threshold == *threshold && existing.service == *service.id() {
                debug!("Alarm `{}` already declared", existing.name);
                return Ok(());
            }
            return Err(CompositionError::DuplicateIdentifier { id: id.to_string() });
        }

        let name = format!("{}-{}-{}", self.alarm_name_prefix, display_name, key);
        let actions: Vec<Value> = self
            .strategy
            .topic()
            .map(|topic| topic.reference().to_value())
            .into_iter()
            .collect();

        let description = format!(
            "{} {} {}",
            threshold.metric.metric_name(),
            threshold.comparison.as_str(),
            threshold.threshold
        );
        let dimensions = json!([
            {
                "Name": "ClusterName",
                "Value": ResourceRef::Ref(service.cluster().clone()).to_value(),
            },
            {
                "Name": "ServiceName",
                "Value": ResourceRef::attribute(service.id(), "Name").to_value(),
            },
        ]);

        template.declare(Declaration::new(
            ResourceType::Alarm,
            id.clone(),
            json!({
                "AlarmName": name,
                "AlarmDescription": description,
                "Namespace": threshold.metric.namespace(),
                "MetricName": threshold.metric.metric_name(),
                "Dimensions": dimensions,
                "Statistic": threshold.metric.statistic(),
                "Period": threshold.period_seconds(),
                "EvaluationPeriods": threshold.evaluation_periods,
                "DatapointsToAlarm": threshold.datapoints_to_alarm,
                "Threshold": threshold.threshold,
                "ComparisonOperator": threshold.comparison.as_str(),
                "ActionsEnabled": true,
                "AlarmActions": actions,
            }),
        ))?;

        info!("Declared alarm `{}`", name);
        self.alarms.push(AlarmHandle {
            id,
            name,
            service: service.id().clone(),
            threshold: *threshold,
        });
        Ok(())
    }

    fn refresh(&self, template: &mut Template) -> CompositionResult<()> {
        let body = self.render_body()?;
        template.amend(&self.dashboard, |properties| {
            properties.insert("DashboardBody".into(), body);
        })
    }

    /// `Fn::Sub` over the widget JSON; dimensions resolve at deploy time
    fn render_body(&self) -> CompositionResult<Value> {
        let mut widgets = Vec::new();
        for block in &self.blocks {
            match block {
                DashboardBlock::Header(text) => {
                    widgets.push(text_widget(&format!("# {}", sub_literal(text))))
                }
                DashboardBlock::Service {
                    display_name,
                    cluster,
                    service,
                } => {
                    let display_name = sub_literal(display_name);
                    widgets.push(text_widget(&format!("## {display_name}")));
                    for metric in [
                        ServiceMetric::CpuUtilization,
                        ServiceMetric::MemoryUtilization,
                        ServiceMetric::RunningTaskCount,
                    ] {
                        widgets.push(metric_widget(&display_name, cluster, service, metric));
                    }

                    let alarms: Vec<String> = self
                        .alarms
                        .iter()
                        .filter(|a| &a.service == service)
                        .map(|a| format!("${{{}.Arn}}", a.id))
                        .collect();
                    if !alarms.is_empty() {
                        widgets.push(json!({
                            "type": "alarm",
                            "width": 24,
                            "height": 2,
                            "properties": {
                                "title": format!("{display_name} alarms"),
                                "alarms": alarms,
                            },
                        }));
                    }
                }
            }
        }

        let body = serde_json::to_string(&json!({ "widgets": widgets }))?;
        Ok(json!({ "Fn::Sub": body }))
    }
}

/// Keep caller text literal inside `Fn::Sub`
fn sub_literal(text: &str) -> String {
    text.replace("${", "${!")
}

fn text_widget(markdown: &str) -> Value {
    json!({
        "type": "text",
        "width": 24,
        "height": 1,
        "properties": { "markdown": markdown },
    })
}

fn metric_widget(
    display_name: &str,
    cluster: &LogicalId,
    service: &LogicalId,
    metric: ServiceMetric,
) -> Value {
    json!({
        "type": "metric",
        "width": 8,
        "height": 6,
        "properties": {
            "title": format!("{display_name} {}", metric.metric_name()),
            "region": "${AWS::Region}",
            "stat": metric.statistic(),
            "period": 300,
            "metrics": [[
                metric.namespace(),
                metric.metric_name(),
                "ClusterName",
                format!("${{{cluster}}}"),
                "ServiceName",
                format!("${{{service}.Name}}"),
            ]],
        },
    })
}
