// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource References
//!
//! Handles never carry live resources, only references the provisioning
//! collaborator resolves at deploy time: a reference to a declaration in the
//! same template, one of its attributes, or a literal id of something that
//! already exists.

use serde::Serialize;
use serde_json::{json, Value};

use super::LogicalId;

/// Opaque reference to a declared or pre-existing resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceRef {
    /// Primary identifier of a declaration in this template
    Ref(LogicalId),
    /// Named attribute of a declaration in this template
    Attribute { id: LogicalId, attribute: String },
    /// Identifier of a resource that exists outside the template
    Existing(String),
}

impl ResourceRef {
    pub fn attribute(id: &LogicalId, attribute: &str) -> Self {
        ResourceRef::Attribute {
            id: id.clone(),
            attribute: attribute.to_string(),
        }
    }

    /// Declaration this reference depends on, if any
    pub fn logical_id(&self) -> Option<&LogicalId> {
        match self {
            ResourceRef::Ref(id) | ResourceRef::Attribute { id, .. } => Some(id),
            ResourceRef::Existing(_) => None,
        }
    }

    /// Render as a template intrinsic
    pub fn to_value(&self) -> Value {
        match self {
            ResourceRef::Ref(id) => json!({ "Ref": id.as_str() }),
            ResourceRef::Attribute { id, attribute } => {
                json!({ "Fn::GetAtt": [id.as_str(), attribute] })
            }
            ResourceRef::Existing(literal) => Value::String(literal.clone()),
        }
    }
}

/// `Fn::Join` over literal strings and references
pub fn join(delimiter: &str, parts: Vec<Value>) -> Value {
    json!({ "Fn::Join": [delimiter, parts] })
}

/// Pseudo parameter resolved by the provisioning collaborator
pub fn pseudo(name: &str) -> Value {
    json!({ "Ref": format!("AWS::{name}") })
}
