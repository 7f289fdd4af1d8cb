//! Error types for checklist loading and execution.

use thiserror::Error;

/// Errors that can occur while loading or running a checklist.
#[derive(Debug, Error)]
pub enum ChecklistError {
    /// No checklist with this id
    #[error("Unknown checklist: {0}")]
    UnknownChecklist(String),

    /// The checklist has no items to review
    #[error("Checklist {0} has no items")]
    NoItems(String),

    /// Two checklists share an id
    #[error("Duplicate checklist id: {0}")]
    DuplicateChecklist(String),

    /// Two items in one checklist share an id
    #[error("Duplicate item id {item_id} in checklist {checklist_id}")]
    DuplicateItem {
        /// Checklist id
        checklist_id: String,
        /// Item id
        item_id: String,
    },

    /// Document structure is invalid
    #[error("Invalid checklist document: {0}")]
    InvalidDocument(String),

    /// TOML document errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON document errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No action at this index on the current item
    #[error("Item {item_id} has no action at index {index}")]
    ActionOutOfRange {
        /// Item id
        item_id: String,
        /// Requested index
        index: usize,
    },

    /// The run already reached `Complete`
    #[error("Checklist run is complete")]
    RunComplete,
}

/// Result type for checklist operations.
pub type ChecklistResult<T> = Result<T, ChecklistError>;
