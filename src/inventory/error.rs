//! Error types for inventory operations.

use thiserror::Error;

use crate::part::PartId;

/// A draft failed validation. Names the first offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value for {field}: {reason}")]
pub struct ValidationError {
    /// Field name as it appears in the stored record
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn missing(field: &'static str) -> Self {
        Self::new(field, "required field is missing")
    }
}

/// Error type for inventory mutations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Draft rejected; nothing was changed
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// No part has this id
    #[error("Part not found: {0}")]
    NotFound(PartId),
    /// The snapshot could not be written; carries the storage error message
    #[error("Inventory storage error: {0}")]
    Persistence(String),
    /// The writer thread behind an `InventoryHandle` has stopped
    #[error("Inventory writer is no longer running")]
    WriterStopped,
}
