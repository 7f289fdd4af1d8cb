//! Per-run field resolution results, keyed by item id.

use crate::definition::ChecklistItem;
use nautilus_telemetry::{resolve_fields, FieldValue, TelemetrySource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One resolved (or unreadable) field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldReading {
    /// Topic the field belongs to
    pub topic: String,
    /// Field path
    pub field: String,
    /// Operator-facing label
    pub description: String,
    /// Value or unreadable marker
    pub value: FieldValue,
}

/// Field values for one visit of an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResolution {
    /// Item id
    pub item_id: String,
    /// Readings in topic, then field order
    pub readings: Vec<FieldReading>,
}

impl ItemResolution {
    /// Whether every field resolved
    pub fn is_complete(&self) -> bool {
        self.readings.iter().all(|r| r.value.is_resolved())
    }

    /// Readings that failed
    pub fn failures(&self) -> impl Iterator<Item = &FieldReading> {
        self.readings.iter().filter(|r| !r.value.is_resolved())
    }

    /// Number of unreadable fields
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Mark every reading unreadable (resolution worker lost).
    pub(crate) fn all_unreadable(item: &ChecklistItem, reason: &str) -> Self {
        let readings = item
            .topics
            .iter()
            .flat_map(|topic| {
                topic.fields.iter().map(move |field| FieldReading {
                    topic: topic.topic_name.clone(),
                    field: field.name.clone(),
                    description: field.description.clone(),
                    value: FieldValue::Unreadable {
                        reason: reason.to_string(),
                    },
                })
            })
            .collect();
        Self {
            item_id: item.id.clone(),
            readings,
        }
    }
}

/// Resolve every field of `item`, blocking on each topic's subscribe-and-wait.
///
/// Topics are fetched one at a time; a failed topic or field never stops the
/// rest of the item from being resolved.
pub fn resolve_item(source: &dyn TelemetrySource, item: &ChecklistItem) -> ItemResolution {
    let mut readings = Vec::new();

    for topic in &item.topics {
        if topic.fields.is_empty() {
            continue;
        }
        let snapshot = source.wait_for(&topic.topic_name);
        let paths: Vec<&str> = topic.fields.iter().map(|f| f.name.as_str()).collect();
        let values = resolve_fields(&topic.topic_name, &snapshot, &paths);

        readings.extend(topic.fields.iter().zip(values).map(|(field, value)| FieldReading {
            topic: topic.topic_name.clone(),
            field: field.name.clone(),
            description: field.description.clone(),
            value,
        }));
    }

    ItemResolution {
        item_id: item.id.clone(),
        readings,
    }
}

/// Latest resolution per item for one run; replaced on every revisit.
#[derive(Debug, Clone, Default)]
pub struct ResolutionResults {
    by_item: HashMap<String, ItemResolution>,
}

impl ResolutionResults {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a resolution, replacing any earlier one for the same item
    pub fn record(&mut self, resolution: ItemResolution) {
        self.by_item.insert(resolution.item_id.clone(), resolution);
    }

    /// Latest resolution for an item
    pub fn get(&self, item_id: &str) -> Option<&ItemResolution> {
        self.by_item.get(item_id)
    }

    /// Number of items resolved at least once
    pub fn len(&self) -> usize {
        self.by_item.len()
    }

    /// Whether nothing was resolved yet
    pub fn is_empty(&self) -> bool {
        self.by_item.is_empty()
    }
}
