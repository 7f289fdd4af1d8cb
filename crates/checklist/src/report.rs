//! Summary of a finished or cancelled checklist run.

use crate::definition::ChecklistDefinition;
use crate::run::{ChecklistRunState, Verdict};
use serde::{Deserialize, Serialize};

/// Verdict column of the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemVerdict {
    /// Operator passed the item
    Pass,
    /// Operator failed the item
    Fail,
    /// Never decided
    Unreviewed,
}

impl From<Option<Verdict>> for ItemVerdict {
    fn from(verdict: Option<Verdict>) -> Self {
        match verdict {
            Some(Verdict::Pass) => ItemVerdict::Pass,
            Some(Verdict::Fail) => ItemVerdict::Fail,
            None => ItemVerdict::Unreviewed,
        }
    }
}

/// One report row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReport {
    /// Item id
    pub item_id: String,
    /// Item description
    pub description: String,
    /// Verdict
    pub verdict: ItemVerdict,
}

/// Outcome of one checklist run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Checklist id
    pub checklist_id: String,
    /// Whether the run reached `Complete` (false when cancelled)
    pub completed: bool,
    /// Rows in review order
    pub items: Vec<ItemReport>,
    /// Number of passed items
    pub passed: usize,
    /// Number of failed items
    pub failed: usize,
    /// Number of items never decided
    pub unreviewed: usize,
}

impl RunReport {
    /// Build the report for a run over `definition`
    pub fn new(definition: &ChecklistDefinition, run: &ChecklistRunState) -> Self {
        let items: Vec<ItemReport> = definition
            .items
            .iter()
            .map(|item| ItemReport {
                item_id: item.id.clone(),
                description: item.description.clone(),
                verdict: run.verdict(&item.id).into(),
            })
            .collect();

        let count = |v: ItemVerdict| items.iter().filter(|i| i.verdict == v).count();
        let (passed, failed, unreviewed) = (
            count(ItemVerdict::Pass),
            count(ItemVerdict::Fail),
            count(ItemVerdict::Unreviewed),
        );

        Self {
            checklist_id: definition.id.clone(),
            completed: run.status().is_terminal(),
            items,
            passed,
            failed,
            unreviewed,
        }
    }

    /// Check if every item passed
    pub fn all_passed(&self) -> bool {
        self.completed && self.passed == self.items.len()
    }

    /// JSON rendering for operator records
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
