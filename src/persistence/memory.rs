use std::sync::{Arc, Mutex};

use super::{PersistenceError, PersistenceGateway};
use crate::part::Part;

/// In-process snapshot. Clones share the same blob.
#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    blob: Arc<Mutex<Option<Vec<Part>>>>,
}

impl MemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_parts(parts: Vec<Part>) -> Self {
        Self {
            blob: Arc::new(Mutex::new(Some(parts))),
        }
    }

    /// Current blob contents.
    #[must_use]
    pub fn snapshot(&self) -> Option<Vec<Part>> {
        self.blob.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl PersistenceGateway for MemoryGateway {
    fn load(&self) -> Result<Option<Vec<Part>>, PersistenceError> {
        Ok(self.snapshot())
    }

    fn save(&self, parts: &[Part]) -> Result<(), PersistenceError> {
        *self.blob.lock().unwrap_or_else(|e| e.into_inner()) = Some(parts.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
