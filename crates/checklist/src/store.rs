//! Checklist definition stores
//!
//! The checklist document keeps the element names of the vehicle's config
//! schema: `check_lists / check_list[id] / check_item / {description,
//! check_topic, check_action}`. It may be written as TOML or JSON.
//!
//! ```toml
//! [[check_lists.check_list]]
//! id = "pre-dive"
//!
//! [[check_lists.check_list.check_item]]
//! description = "Battery above 80%"
//!
//! [[check_lists.check_list.check_item.check_topic]]
//! topic_name = "batteries/status"
//! field = [{ name = "charge", description = "Charge (%)" }]
//! ```

use crate::definition::{
    ActionSpec, ChecklistDefinition, ChecklistItem, ChecklistSummary, FieldSpec, TopicSpec,
};
use crate::error::{ChecklistError, ChecklistResult};
use nautilus_core::ChecklistConfig;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Read-only source of checklist definitions.
pub trait ChecklistDefinitionStore: Send + Sync {
    /// Checklists in document order
    fn list_checklists(&self) -> Vec<ChecklistSummary>;

    /// Items of one checklist in review order
    fn items_for(&self, checklist_id: &str) -> ChecklistResult<Vec<ChecklistItem>>;

    /// Full definition of one checklist
    fn definition(&self, checklist_id: &str) -> ChecklistResult<ChecklistDefinition> {
        Ok(ChecklistDefinition {
            id: checklist_id.to_string(),
            items: self.items_for(checklist_id)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChecklistDocument {
    check_lists: CheckLists,
}

#[derive(Debug, Default, Deserialize)]
struct CheckLists {
    #[serde(default)]
    check_list: Vec<CheckListElement>,
}

#[derive(Debug, Deserialize)]
struct CheckListElement {
    id: String,
    #[serde(default)]
    check_item: Vec<CheckItemElement>,
}

#[derive(Debug, Deserialize)]
struct CheckItemElement {
    id: Option<String>,
    description: String,
    #[serde(default)]
    check_topic: Vec<CheckTopicElement>,
    #[serde(default)]
    check_action: Vec<CheckActionElement>,
}

#[derive(Debug, Deserialize)]
struct CheckTopicElement {
    topic_name: String,
    #[serde(default)]
    field: Vec<FieldElement>,
}

#[derive(Debug, Deserialize)]
struct FieldElement {
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct CheckActionElement {
    action_id: String,
    #[serde(default)]
    param: Vec<ParamElement>,
}

#[derive(Debug, Deserialize)]
struct ParamElement {
    name: String,
    value: String,
}

/// Store backed by a parsed checklist document
#[derive(Debug, Clone, Default)]
pub struct DocumentChecklistStore {
    checklists: Vec<ChecklistDefinition>,
}

impl DocumentChecklistStore {
    /// Load a document, picking the format from the file extension
    /// (`.json` is JSON, anything else is TOML).
    pub fn from_file<P: AsRef<Path>>(path: P) -> ChecklistResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let store = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        debug!(path = %path.display(), checklists = store.checklists.len(), "loaded checklist document");
        Ok(store)
    }

    /// Load the document named by the `[checklists]` config section.
    ///
    /// No configured path yields an empty store.
    pub fn from_config(config: &ChecklistConfig) -> ChecklistResult<Self> {
        match &config.path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> ChecklistResult<Self> {
        let document: ChecklistDocument = toml::from_str(content)?;
        Self::from_document(document)
    }

    /// Parse a JSON document
    pub fn from_json_str(content: &str) -> ChecklistResult<Self> {
        let document: ChecklistDocument = serde_json::from_str(content)?;
        Self::from_document(document)
    }

    /// Store over already-built definitions
    pub fn from_definitions(checklists: Vec<ChecklistDefinition>) -> ChecklistResult<Self> {
        let mut ids = HashSet::new();
        for checklist in &checklists {
            if !ids.insert(checklist.id.as_str()) {
                return Err(ChecklistError::DuplicateChecklist(checklist.id.clone()));
            }
            let mut item_ids = HashSet::new();
            for item in &checklist.items {
                if !item_ids.insert(item.id.as_str()) {
                    return Err(ChecklistError::DuplicateItem {
                        checklist_id: checklist.id.clone(),
                        item_id: item.id.clone(),
                    });
                }
            }
        }
        Ok(Self { checklists })
    }

    fn from_document(document: ChecklistDocument) -> ChecklistResult<Self> {
        let checklists = document
            .check_lists
            .check_list
            .into_iter()
            .map(convert_checklist)
            .collect::<ChecklistResult<Vec<_>>>()?;
        Self::from_definitions(checklists)
    }
}

fn convert_checklist(element: CheckListElement) -> ChecklistResult<ChecklistDefinition> {
    if element.id.trim().is_empty() {
        return Err(ChecklistError::InvalidDocument("check_list without id".into()));
    }

    let checklist_id = element.id;
    let items = element
        .check_item
        .into_iter()
        .enumerate()
        .map(|(index, item)| ChecklistItem {
            id: item
                .id
                .unwrap_or_else(|| format!("{}/{}", checklist_id, index)),
            description: item.description,
            topics: item
                .check_topic
                .into_iter()
                .map(|topic| TopicSpec {
                    topic_name: topic.topic_name,
                    fields: topic
                        .field
                        .into_iter()
                        .map(|f| FieldSpec {
                            name: f.name,
                            description: f.description,
                        })
                        .collect(),
                })
                .collect(),
            actions: item
                .check_action
                .into_iter()
                .map(|action| ActionSpec {
                    action_id: action.action_id,
                    parameters: action.param.into_iter().map(|p| (p.name, p.value)).collect(),
                })
                .collect(),
        })
        .collect();

    Ok(ChecklistDefinition {
        id: checklist_id,
        items,
    })
}

impl ChecklistDefinitionStore for DocumentChecklistStore {
    fn list_checklists(&self) -> Vec<ChecklistSummary> {
        self.checklists
            .iter()
            .map(|c| ChecklistSummary { id: c.id.clone() })
            .collect()
    }

    fn items_for(&self, checklist_id: &str) -> ChecklistResult<Vec<ChecklistItem>> {
        self.checklists
            .iter()
            .find(|c| c.id == checklist_id)
            .map(|c| c.items.clone())
            .ok_or_else(|| ChecklistError::UnknownChecklist(checklist_id.to_string()))
    }
}
