// Copyright (c) 2025 - Cowboy AI, Inc.
//! Notification topics for alarm delivery

use serde_json::{json, Map, Value};
use tracing::info;

use crate::domain::{escape_segment, LogicalId, ResourceType, TopicHandle};
use crate::errors::{CompositionError, CompositionResult};
use crate::template::{Declaration, Template};

/// Declare a notification topic
pub fn declare_topic(
    template: &mut Template,
    id: &LogicalId,
    display_name: Option<&str>,
) -> CompositionResult<TopicHandle> {
    let mut properties = Map::new();
    if let Some(name) = display_name {
        properties.insert("DisplayName".into(), Value::String(name.to_string()));
    }
    template.declare(Declaration::new(
        ResourceType::Topic,
        id.clone(),
        Value::Object(properties),
    ))?;

    info!("Declared notification topic `{}`", id);
    Ok(TopicHandle::new(id.clone()))
}

fn validate_email(address: &str) -> CompositionResult<()> {
    let invalid = |reason: &str| {
        CompositionError::invalid(
            "TopicRequest",
            "email_subscriptions",
            format!("`{address}` {reason}"),
        )
    };

    let (local, domain) = address
        .split_once('@')
        .ok_or_else(|| invalid("has no `@`"))?;
    if local.is_empty() || domain.contains('@') || address.chars().any(char::is_whitespace) {
        return Err(invalid("is not an email address"));
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid("has no valid domain"));
    }
    Ok(())
}

/// Subscribe an email address to `topic`
pub fn subscribe_email(
    template: &mut Template,
    topic: &TopicHandle,
    address: &str,
) -> CompositionResult<LogicalId> {
    validate_email(address)?;

    let id = template.declare(Declaration::new(
        ResourceType::Subscription,
        topic.id().child(format!("email-{}", escape_segment(address)))?,
        json!({
            "Protocol": "email",
            "Endpoint": address,
            "TopicArn": topic.reference().to_value(),
        }),
    ))?;

    info!("Subscribed {} to `{}`", address, topic.id());
    Ok(id)
}
