//! Test helpers for partlife
//!
//! Fixed instants, ready-made drafts and a persistence gateway whose
//! failures can be switched on and off.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::part::{Part, PartDraft};
use crate::persistence::{PersistenceError, PersistenceGateway};

/// Midnight UTC on the given date.
///
/// # Panics
///
/// Panics if the date does not exist.
#[must_use]
pub fn instant(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid calendar date")
}

/// A complete draft.
#[must_use]
pub fn draft(machine_id: &str, name: &str, lifespan_days: i64, installed: DateTime<Utc>) -> PartDraft {
    PartDraft {
        machine_id: machine_id.to_string(),
        name: name.to_string(),
        category: "General".to_string(),
        install_date: Some(installed),
        lifespan_days,
        notes: None,
    }
}

/// Gateway that records every save and fails on demand. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct FlakyGateway {
    failing: Arc<AtomicBool>,
    saves: Arc<Mutex<Vec<Vec<Part>>>>,
}

impl FlakyGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway whose loads and saves fail until told otherwise.
    #[must_use]
    pub fn failing() -> Self {
        let gateway = Self::default();
        gateway.set_failing(true);
        gateway
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Last successfully saved snapshot, empty if none.
    #[must_use]
    pub fn saved(&self) -> Vec<Part> {
        self.saves
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
            .unwrap_or_default()
    }

    fn check(&self) -> Result<(), PersistenceError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(PersistenceError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "storage offline",
            )))
        } else {
            Ok(())
        }
    }
}

impl PersistenceGateway for FlakyGateway {
    fn load(&self) -> Result<Option<Vec<Part>>, PersistenceError> {
        self.check()?;
        let saves = self.saves.lock().unwrap_or_else(|e| e.into_inner());
        Ok(saves.last().cloned())
    }

    fn save(&self, parts: &[Part]) -> Result<(), PersistenceError> {
        self.check()?;
        self.saves
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(parts.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "flaky test gateway".to_string()
    }
}
