//! Nautilus Checklist - structured pre-operation checklists
//!
//! This crate provides:
//! - Immutable checklist definitions and the [`ChecklistDefinitionStore`]
//!   boundary, with a TOML/JSON document-backed store
//! - The run state machine (`Pass` / `Fail` / `Back` over an item cursor)
//! - Per-item field resolution against live telemetry, recorded separately
//!   from the definition
//! - [`ChecklistExecutionEngine`], tying resolution, operator-triggered
//!   actions and navigation together
//!
//! # Examples
//!
//! ```no_run
//! use nautilus_checklist::{ChecklistDefinitionStore, DocumentChecklistStore};
//!
//! let store = DocumentChecklistStore::from_file("checklists.toml")?;
//! for checklist in store.list_checklists() {
//!     println!("{}", checklist.id);
//! }
//! # Ok::<(), nautilus_checklist::ChecklistError>(())
//! ```

#![warn(missing_docs)]

pub mod definition;
pub mod engine;
pub mod error;
pub mod report;
pub mod resolution;
pub mod run;
pub mod store;

pub use definition::{
    ActionSpec, ChecklistDefinition, ChecklistItem, ChecklistSummary, FieldSpec, TopicSpec,
};
pub use engine::{ChecklistExecutionEngine, EngineState};
pub use error::{ChecklistError, ChecklistResult};
pub use report::{ItemReport, ItemVerdict, RunReport};
pub use resolution::{resolve_item, FieldReading, ItemResolution, ResolutionResults};
pub use run::{ChecklistRunState, Decision, RunStatus, Verdict};
pub use store::{ChecklistDefinitionStore, DocumentChecklistStore};
