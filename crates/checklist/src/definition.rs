//! Checklist definitions
//!
//! Definitions are immutable once loaded for a run. Per-run field values live
//! in [`crate::resolution::ResolutionResults`], never in the definition.

use nautilus_vehicle::ServiceParameters;
use serde::{Deserialize, Serialize};

/// Identifier entry returned when listing checklists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistSummary {
    /// Checklist id
    pub id: String,
}

/// Ordered list of items for one checklist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistDefinition {
    /// Checklist id
    pub id: String,
    /// Items in review order
    pub items: Vec<ChecklistItem>,
}

impl ChecklistDefinition {
    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there is nothing to review
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item by id
    pub fn item(&self, item_id: &str) -> Option<&ChecklistItem> {
        self.items.iter().find(|item| item.id == item_id)
    }
}

/// One unit of operator review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Stable item id, unique within the checklist
    pub id: String,
    /// What the operator should check
    pub description: String,
    /// Telemetry topics sampled when the item is shown
    pub topics: Vec<TopicSpec>,
    /// Remote actions the operator may trigger
    pub actions: Vec<ActionSpec>,
}

/// Telemetry topic and the fields to show from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSpec {
    /// Telemetry key
    pub topic_name: String,
    /// Fields to resolve, by `/`-separated path
    pub fields: Vec<FieldSpec>,
}

/// A field within a topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Path within the topic snapshot
    pub name: String,
    /// Label shown to the operator
    pub description: String,
}

/// Remote action offered by an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    /// Service name, relative to the vehicle namespace
    pub action_id: String,
    /// Parameters passed with the call
    pub parameters: ServiceParameters,
}
