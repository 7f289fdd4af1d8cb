//! Checklist execution engine
//!
//! Drives one run over a [`ChecklistDefinition`]:
//! - Entering an item resolves all of its topic fields on the blocking pool
//!   (subscribe-and-wait; only the source's own timeout applies)
//! - Actions run only when the operator triggers them and never gate
//!   navigation
//! - The operator's `Pass`/`Fail`/`Back` moves the cursor
//!
//! Every async method takes `&mut self`, so at most one resolution is in
//! flight per run.

use crate::definition::{ChecklistDefinition, ChecklistItem};
use crate::error::{ChecklistError, ChecklistResult};
use crate::report::RunReport;
use crate::resolution::{resolve_item, ItemResolution, ResolutionResults};
use crate::run::{ChecklistRunState, Decision, RunStatus, Verdict};
use nautilus_telemetry::TelemetrySource;
use nautilus_vehicle::{InvocationOutcome, RemoteActionInvoker};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// State presented to the interaction surface
#[derive(Debug, Clone, PartialEq)]
pub enum EngineState {
    /// Waiting for the operator's decision on an item
    AwaitingReview {
        /// 0-based item index
        cursor: usize,
        /// Item id
        item_id: String,
    },
    /// Run finished
    Complete {
        /// Verdict per item id
        outcomes: BTreeMap<String, Verdict>,
    },
}

/// One open checklist run
pub struct ChecklistExecutionEngine {
    definition: Arc<ChecklistDefinition>,
    run: ChecklistRunState,
    source: Arc<dyn TelemetrySource>,
    invoker: RemoteActionInvoker,
    results: ResolutionResults,
    action_results: HashMap<String, Vec<(usize, InvocationOutcome)>>,
}

impl ChecklistExecutionEngine {
    /// Open a run over `definition`. Fails for a checklist without items.
    pub fn open(
        definition: ChecklistDefinition,
        source: Arc<dyn TelemetrySource>,
        invoker: RemoteActionInvoker,
    ) -> ChecklistResult<Self> {
        let item_ids = definition.items.iter().map(|item| item.id.clone()).collect();
        let run = ChecklistRunState::new(&definition.id, item_ids)?;

        info!(checklist = %definition.id, items = definition.len(), "checklist opened");
        Ok(Self {
            definition: Arc::new(definition),
            run,
            source,
            invoker,
            results: ResolutionResults::new(),
            action_results: HashMap::new(),
        })
    }

    /// Enter the first item, resolving its fields.
    pub async fn begin(&mut self) -> EngineState {
        self.resolve_current().await;
        self.state()
    }

    /// Current state
    pub fn state(&self) -> EngineState {
        match self.run.status() {
            RunStatus::AwaitingReview { cursor } => EngineState::AwaitingReview {
                cursor,
                item_id: self.definition.items[cursor].id.clone(),
            },
            RunStatus::Complete => EngineState::Complete {
                outcomes: self.run.outcomes().clone(),
            },
        }
    }

    /// Definition being run
    pub fn definition(&self) -> &ChecklistDefinition {
        &self.definition
    }

    /// Run state (cursor and verdicts)
    pub fn run_state(&self) -> &ChecklistRunState {
        &self.run
    }

    /// Item under review
    pub fn current_item(&self) -> Option<&ChecklistItem> {
        self.run.cursor().map(|c| &self.definition.items[c])
    }

    /// Latest field resolution for an item
    pub fn resolution(&self, item_id: &str) -> Option<&ItemResolution> {
        self.results.get(item_id)
    }

    /// Action outcomes recorded for an item, as `(action index, outcome)`
    pub fn action_results(&self, item_id: &str) -> &[(usize, InvocationOutcome)] {
        self.action_results
            .get(item_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether `Back` would move
    pub fn can_go_back(&self) -> bool {
        self.run.can_go_back()
    }

    /// Invoke action `index` of the current item at the operator's request.
    ///
    /// The outcome is recorded for display only.
    pub async fn trigger_action(&mut self, index: usize) -> ChecklistResult<InvocationOutcome> {
        let item = self.current_item().ok_or(ChecklistError::RunComplete)?;
        let item_id = item.id.clone();
        let action = item
            .actions
            .get(index)
            .cloned()
            .ok_or_else(|| ChecklistError::ActionOutOfRange {
                item_id: item_id.clone(),
                index,
            })?;

        info!(item = %item_id, action = %action.action_id, "checklist action triggered");
        let parameters = (!action.parameters.is_empty()).then_some(action.parameters);
        let outcome = self.invoker.invoke(&action.action_id, parameters).await;

        self.action_results
            .entry(item_id)
            .or_default()
            .push((index, outcome.clone()));
        Ok(outcome)
    }

    /// Apply the operator's decision.
    ///
    /// When the cursor lands on an item, that item's fields are resolved
    /// afresh before returning. `Back` at the first item changes nothing.
    pub async fn decide(&mut self, decision: Decision) -> EngineState {
        let before = self.run.status();
        let after = self.run.apply(decision);
        debug!(decision = ?decision, before = ?before, after = ?after, "checklist decision");

        match after {
            RunStatus::AwaitingReview { .. } if after != before => self.resolve_current().await,
            RunStatus::Complete if !before.is_terminal() => {
                info!(checklist = %self.definition.id, "checklist complete");
            }
            _ => {}
        }
        self.state()
    }

    /// Close the run without finishing it.
    pub fn cancel(self) -> RunReport {
        info!(checklist = %self.definition.id, "checklist cancelled");
        self.into_report()
    }

    /// Close the run and summarize it.
    pub fn into_report(self) -> RunReport {
        RunReport::new(&self.definition, &self.run)
    }

    async fn resolve_current(&mut self) {
        let Some(cursor) = self.run.cursor() else {
            return;
        };

        let definition = Arc::clone(&self.definition);
        let source = Arc::clone(&self.source);
        let resolution = tokio::task::spawn_blocking(move || {
            resolve_item(source.as_ref(), &definition.items[cursor])
        })
        .await;

        let resolution = match resolution {
            Ok(resolution) => resolution,
            Err(e) => {
                warn!(error = %e, "field resolution worker failed");
                ItemResolution::all_unreadable(&self.definition.items[cursor], &e.to_string())
            }
        };

        if resolution.failure_count() > 0 {
            warn!(
                item = %resolution.item_id,
                unreadable = resolution.failure_count(),
                "checklist item has unreadable fields"
            );
        }
        self.results.record(resolution);
    }
}
