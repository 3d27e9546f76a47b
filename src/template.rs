// Copyright (c) 2025 - Cowboy AI, Inc.
//! Declaration Template
//!
//! The template is the only thing a synthesis pass accumulates. Composers
//! register declarations into it; nothing is handed to the provisioning
//! collaborator until the pass has composed every resource.
//!
//! # Shape
//!
//! ```text
//! Template
//!  ├── declarations: [Declaration { type, id, properties, depends_on }]
//!  └── outputs:      [Output { id, value, description }]
//!
//! declared_state():  { "AWS::ECS::Service": [ { id, properties } ], ... }
//! to_document():     { "Resources": { id: { Type, Properties, DependsOn } },
//!                      "Outputs":   { id: { Value, Description } } }
//! ```

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::domain::{LogicalId, ResourceType};
use crate::errors::{CompositionError, CompositionResult};

/// One resource declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    pub resource_type: ResourceType,
    pub id: LogicalId,
    pub properties: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<LogicalId>,
}

impl Declaration {
    /// Start a declaration from a JSON object literal
    ///
    /// Non-object values yield an empty property map.
    pub fn new(resource_type: ResourceType, id: LogicalId, properties: Value) -> Self {
        let properties = match properties {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            resource_type,
            id,
            properties,
            depends_on: Vec::new(),
        }
    }

    pub fn depends_on(mut self, id: &LogicalId) -> Self {
        if !self.depends_on.contains(id) {
            self.depends_on.push(id.clone());
        }
        self
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// Named template output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Output {
    pub id: String,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Declaration as it appears in the declared-state mapping
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclaredResource {
    pub id: String,
    pub properties: Map<String, Value>,
}

/// `{ resource type -> [ {id, properties} ] }`
pub type DeclaredState = BTreeMap<String, Vec<DeclaredResource>>;

/// Pass-owned, insertion-ordered set of declarations
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Template {
    declarations: Vec<Declaration>,
    outputs: Vec<Output>,
    #[serde(skip)]
    ids: HashSet<LogicalId>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declaration, rejecting an identifier seen earlier in the pass
    pub fn declare(&mut self, declaration: Declaration) -> CompositionResult<LogicalId> {
        if !self.ids.insert(declaration.id.clone()) {
            return Err(CompositionError::DuplicateIdentifier {
                id: declaration.id.to_string(),
            });
        }

        debug!(
            "Declared {} `{}`",
            declaration.resource_type, declaration.id
        );
        let id = declaration.id.clone();
        self.declarations.push(declaration);
        Ok(id)
    }

    /// Replace properties of an existing declaration
    pub fn amend<F>(&mut self, id: &LogicalId, amend: F) -> CompositionResult<()>
    where
        F: FnOnce(&mut Map<String, Value>),
    {
        let declaration = self
            .declarations
            .iter_mut()
            .find(|d| &d.id == id)
            .ok_or_else(|| CompositionError::invalid("Template", "id", format!("`{id}` is not declared")))?;
        amend(&mut declaration.properties);
        Ok(())
    }

    /// Register a named output
    pub fn output(
        &mut self,
        id: impl Into<String>,
        value: Value,
        description: Option<String>,
    ) -> CompositionResult<()> {
        let id = id.into();
        if self.outputs.iter().any(|o| o.id == id) {
            return Err(CompositionError::DuplicateIdentifier { id });
        }
        self.outputs.push(Output {
            id,
            value,
            description,
        });
        Ok(())
    }

    pub fn contains(&self, id: &LogicalId) -> bool {
        self.ids.contains(id)
    }

    pub fn get(&self, id: &LogicalId) -> Option<&Declaration> {
        self.declarations.iter().find(|d| &d.id == id)
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// All declarations of one type, in declaration order
    pub fn of_type(&self, resource_type: ResourceType) -> impl Iterator<Item = &Declaration> {
        self.declarations
            .iter()
            .filter(move |d| d.resource_type == resource_type)
    }

    pub fn count_of(&self, resource_type: ResourceType) -> usize {
        self.of_type(resource_type).count()
    }

    /// Nested mapping used for snapshot-style assertions
    pub fn declared_state(&self) -> DeclaredState {
        let mut state = DeclaredState::new();
        for declaration in &self.declarations {
            state
                .entry(declaration.resource_type.declaration_type().to_string())
                .or_default()
                .push(DeclaredResource {
                    id: declaration.id.to_string(),
                    properties: declaration.properties.clone(),
                });
        }
        state
    }

    /// Render the document the provisioning collaborator consumes
    pub fn to_document(&self) -> Value {
        let mut resources = Map::new();
        for declaration in &self.declarations {
            let mut entry = Map::new();
            entry.insert(
                "Type".to_string(),
                Value::String(declaration.resource_type.declaration_type().to_string()),
            );
            entry.insert(
                "Properties".to_string(),
                Value::Object(declaration.properties.clone()),
            );
            if !declaration.depends_on.is_empty() {
                entry.insert(
                    "DependsOn".to_string(),
                    Value::Array(
                        declaration
                            .depends_on
                            .iter()
                            .map(|id| Value::String(id.to_string()))
                            .collect(),
                    ),
                );
            }
            resources.insert(declaration.id.to_string(), Value::Object(entry));
        }

        let mut outputs = Map::new();
        for output in &self.outputs {
            let mut entry = Map::new();
            entry.insert("Value".to_string(), output.value.clone());
            if let Some(description) = &output.description {
                entry.insert("Description".to_string(), Value::String(description.clone()));
            }
            outputs.insert(output.id.clone(), Value::Object(entry));
        }

        let mut document = Map::new();
        document.insert("Resources".to_string(), Value::Object(resources));
        if !outputs.is_empty() {
            document.insert("Outputs".to_string(), Value::Object(outputs));
        }
        Value::Object(document)
    }

    /// Render the document as pretty JSON
    pub fn to_json_pretty(&self) -> CompositionResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }
}
