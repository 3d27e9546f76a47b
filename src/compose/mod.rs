// Copyright (c) 2025 - Cowboy AI, Inc.
//! Composers
//!
//! Each composer is a function of `(template, parent handle, resolved
//! config)` that registers its declarations and returns the child handle.
//! Nothing here holds state between calls except the monitoring facade,
//! which owns only the dashboard it declared.
//!
//! ```text
//! provide_network ──▶ compose_cluster ──┐
//!                                       ├──▶ compose_service ──┬──▶ attach_scaling
//! compose_task_definition ──────────────┘                      └──▶ MonitoringHandle::monitor_service
//! ```

pub mod cluster;
pub mod monitoring;
pub mod network;
pub mod notification;
pub mod scaling;
pub mod service;
pub mod task;

pub use cluster::compose_cluster;
pub use monitoring::{init_monitoring, AlarmHandle, MonitoringHandle};
pub use network::provide_network;
pub use notification::{declare_topic, subscribe_email};
pub use scaling::attach_scaling;
pub use service::compose_service;
pub use task::compose_task_definition;
