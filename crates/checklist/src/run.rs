//! Checklist run state machine
//!
//! `AwaitingReview(cursor)` moves +1 on `Pass`/`Fail` (recording a verdict
//! for the current item) and -1 on `Back`. Passing the last item reaches
//! `Complete`. `Back` at cursor 0 is a no-op. Verdicts survive navigation
//! and are only replaced by a new verdict on the same item.

use crate::error::{ChecklistError, ChecklistResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Operator verdict for one item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Item checked and fine
    Pass,
    /// Item checked and not fine
    Fail,
}

/// Operator decision on the item under review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Record pass and advance
    Pass,
    /// Record fail and advance
    Fail,
    /// Return to the previous item
    Back,
}

/// Where the run stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// The item at `cursor` is being reviewed
    AwaitingReview {
        /// 0-based item index
        cursor: usize,
    },
    /// Every item has been decided past the end
    Complete,
}

impl RunStatus {
    /// Check if status is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Complete)
    }
}

/// Cursor and verdicts for one open checklist
#[derive(Debug, Clone)]
pub struct ChecklistRunState {
    item_ids: Vec<String>,
    status: RunStatus,
    outcomes: BTreeMap<String, Verdict>,
}

impl ChecklistRunState {
    /// Start a run over the given item ids, reviewing the first one.
    ///
    /// Item ids key the verdicts, so they must be unique.
    pub fn new(checklist_id: &str, item_ids: Vec<String>) -> ChecklistResult<Self> {
        if item_ids.is_empty() {
            return Err(ChecklistError::NoItems(checklist_id.to_string()));
        }
        let mut seen = HashSet::new();
        if let Some(duplicate) = item_ids.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(ChecklistError::DuplicateItem {
                checklist_id: checklist_id.to_string(),
                item_id: duplicate.clone(),
            });
        }
        Ok(Self {
            item_ids,
            status: RunStatus::AwaitingReview { cursor: 0 },
            outcomes: BTreeMap::new(),
        })
    }

    /// Current status
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Cursor of the item under review, `None` once complete
    pub fn cursor(&self) -> Option<usize> {
        match self.status {
            RunStatus::AwaitingReview { cursor } => Some(cursor),
            RunStatus::Complete => None,
        }
    }

    /// Id of the item under review
    pub fn current_item_id(&self) -> Option<&str> {
        self.cursor().map(|c| self.item_ids[c].as_str())
    }

    /// Number of items
    pub fn item_count(&self) -> usize {
        self.item_ids.len()
    }

    /// Item ids in review order
    pub fn item_ids(&self) -> &[String] {
        &self.item_ids
    }

    /// Whether `Back` would move
    pub fn can_go_back(&self) -> bool {
        matches!(self.status, RunStatus::AwaitingReview { cursor } if cursor > 0)
    }

    /// Recorded verdicts by item id
    pub fn outcomes(&self) -> &BTreeMap<String, Verdict> {
        &self.outcomes
    }

    /// Verdict recorded for an item
    pub fn verdict(&self, item_id: &str) -> Option<Verdict> {
        self.outcomes.get(item_id).copied()
    }

    /// Apply an operator decision and return the new status.
    ///
    /// Decisions after completion leave the run unchanged.
    pub fn apply(&mut self, decision: Decision) -> RunStatus {
        let RunStatus::AwaitingReview { cursor } = self.status else {
            return self.status;
        };

        self.status = match decision {
            Decision::Pass | Decision::Fail => {
                let verdict = if decision == Decision::Pass {
                    Verdict::Pass
                } else {
                    Verdict::Fail
                };
                self.outcomes.insert(self.item_ids[cursor].clone(), verdict);

                if cursor + 1 >= self.item_ids.len() {
                    RunStatus::Complete
                } else {
                    RunStatus::AwaitingReview { cursor: cursor + 1 }
                }
            }
            Decision::Back => RunStatus::AwaitingReview {
                cursor: cursor.saturating_sub(1),
            },
        };

        self.status
    }
}
