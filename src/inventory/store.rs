//! Inventory store: the single owner of the part list.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;

use super::InventoryError;
use crate::clock::Clock;
use crate::filter::FilterView;
use crate::health::{self, HealthMap};
use crate::part::{start_of_day, Part, PartDraft, PartId};
use crate::persistence::{PersistenceError, PersistenceGateway};

#[cfg(feature = "metrics")]
use crate::metrics::METRICS;
#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;

/// Owns the canonical part sequence and writes a full snapshot through the
/// gateway after every successful mutation.
///
/// A failed save does not undo the mutation. The error is kept (see
/// [`InventoryStore::last_persistence_error`]) until a later save succeeds,
/// and [`InventoryStore::flush`] retries the write.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use partlife::{InventoryStore, PartDraft, SystemClock};
/// use partlife::persistence::JsonFileGateway;
/// use partlife::seed;
///
/// # fn main() -> Result<(), partlife::InventoryError> {
/// let gateway = Box::new(JsonFileGateway::new("partlife_data.json"));
/// let mut store = InventoryStore::bootstrap(gateway, Arc::new(SystemClock), seed::default_parts);
///
/// let draft = PartDraft {
///     machine_id: "M-09".to_string(),
///     name: "Hose".to_string(),
///     category: "Hydraulics".to_string(),
///     install_date: Some(store.now()),
///     lifespan_days: 180,
///     notes: None,
/// };
/// let hose = store.add(draft)?;
/// store.replace(&hose.id)?;
/// # Ok(())
/// # }
/// ```
pub struct InventoryStore {
    parts: Vec<Part>,
    gateway: Box<dyn PersistenceGateway>,
    clock: Arc<dyn Clock>,
    last_persistence_error: Option<PersistenceError>,
}

impl InventoryStore {
    /// Wrap an existing part list. Nothing is written until the first mutation.
    pub fn new(parts: Vec<Part>, gateway: Box<dyn PersistenceGateway>, clock: Arc<dyn Clock>) -> Self {
        Self {
            parts,
            gateway,
            clock,
            last_persistence_error: None,
        }
    }

    /// Load the inventory from `gateway`, falling back to `seed` when nothing
    /// was saved or the stored data cannot be read.
    ///
    /// A stored part whose id repeats an earlier one gets a fresh id.
    pub fn bootstrap(
        gateway: Box<dyn PersistenceGateway>,
        clock: Arc<dyn Clock>,
        seed: impl FnOnce(DateTime<Utc>) -> Vec<Part>,
    ) -> Self {
        let parts = match gateway.load() {
            Ok(Some(parts)) => {
                log::info!("Loaded {} part(s) from {}", parts.len(), gateway.describe());
                reassign_duplicate_ids(parts)
            }
            Ok(None) => {
                log::info!("No saved inventory in {}, using seed data", gateway.describe());
                seed(clock.now())
            }
            Err(e) => {
                log::warn!(
                    "Failed to load inventory from {}, using seed data. Error: {}",
                    gateway.describe(),
                    e
                );
                #[cfg(feature = "metrics")]
                METRICS.record_persistence_failure("load");
                seed(clock.now())
            }
        };
        Self::new(parts, gateway, clock)
    }

    /// Current instant according to the store's clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Parts in insertion order.
    #[must_use]
    pub fn list(&self) -> &[Part] {
        &self.parts
    }

    #[must_use]
    pub fn get(&self, id: &PartId) -> Option<&Part> {
        self.parts.iter().find(|p| &p.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Health of every part at `now`.
    #[must_use]
    pub fn health_at(&self, now: DateTime<Utc>) -> HealthMap {
        health::evaluate_all(&self.parts, now)
    }

    /// Health of every part at the clock's current instant.
    #[must_use]
    pub fn health(&self) -> HealthMap {
        self.health_at(self.now())
    }

    #[must_use]
    pub fn view(&self) -> FilterView<'_> {
        FilterView::new(&self.parts)
    }

    /// Append a new part built from `draft` under a freshly minted id.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::Validation` if the draft is incomplete or its
    /// lifespan is not positive.
    pub fn add(&mut self, draft: PartDraft) -> Result<Part, InventoryError> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::mutation_span("add").entered();

        let part = draft.into_part(self.mint_id())?;
        log::info!(
            "Added part {} '{}' on machine {}",
            part.id,
            part.name,
            part.machine_id
        );
        self.parts.push(part.clone());
        self.commit("add");
        Ok(part)
    }

    /// Overwrite every field of part `id` except the id itself.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::NotFound` if no part has `id`, or
    /// `InventoryError::Validation` under the same rules as [`add`](Self::add).
    pub fn edit(&mut self, id: &PartId, draft: PartDraft) -> Result<Part, InventoryError> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::mutation_span("edit").entered();

        let index = self.position(id)?;
        let part = draft.into_part(id.clone())?;
        self.parts[index] = part.clone();
        log::info!("Edited part {}", id);
        self.commit("edit");
        Ok(part)
    }

    /// Prefill a draft for deploying the same kind of part elsewhere.
    ///
    /// Copies name, category, lifespan and notes from the source. The machine
    /// is left blank for the operator to choose and the install date is the
    /// start of today.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::NotFound` if no part has `source`.
    pub fn clone_draft(&self, source: &PartId) -> Result<PartDraft, InventoryError> {
        let part = self
            .get(source)
            .ok_or_else(|| InventoryError::NotFound(source.clone()))?;
        Ok(PartDraft {
            machine_id: String::new(),
            install_date: Some(start_of_day(self.now())),
            ..PartDraft::from_part(part)
        })
    }

    /// Create a new part from a draft that was prefilled from `source`.
    ///
    /// Behaves exactly like [`add`](Self::add); the new part never shares the
    /// source's id.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::NotFound` if `source` does not exist, or
    /// `InventoryError::Validation` if the draft is invalid.
    pub fn clone_part(&mut self, source: &PartId, draft: PartDraft) -> Result<Part, InventoryError> {
        self.position(source)?;
        let part = self.add(draft)?;
        log::debug!("Part {} cloned from {}", part.id, source);
        Ok(part)
    }

    /// Reset the install date of part `id` to now, leaving every other field.
    ///
    /// Repeated calls keep moving the install date forward.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::NotFound` if no part has `id`.
    pub fn replace(&mut self, id: &PartId) -> Result<Part, InventoryError> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::mutation_span("replace").entered();

        let index = self.position(id)?;
        let now = self.now();
        self.parts[index].install_date = now;
        let part = self.parts[index].clone();
        log::info!("Replaced part {} '{}', installed {}", part.id, part.name, now);
        self.commit("replace");
        Ok(part)
    }

    /// The error from the most recent failed save, cleared by the next
    /// successful one.
    #[must_use]
    pub fn last_persistence_error(&self) -> Option<&PersistenceError> {
        self.last_persistence_error.as_ref()
    }

    /// `true` while in-memory state may differ from what was last stored.
    #[must_use]
    pub fn is_diverged(&self) -> bool {
        self.last_persistence_error.is_some()
    }

    /// Write the current snapshot again.
    ///
    /// # Errors
    ///
    /// Returns the save error if the write fails again.
    pub fn flush(&mut self) -> Result<(), &PersistenceError> {
        self.persist("flush");
        match &self.last_persistence_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn position(&self, id: &PartId) -> Result<usize, InventoryError> {
        self.parts
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| InventoryError::NotFound(id.clone()))
    }

    fn mint_id(&self) -> PartId {
        loop {
            let id = PartId::mint();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn commit(&mut self, operation: &'static str) {
        #[cfg(feature = "metrics")]
        METRICS.record_mutation(operation);
        self.persist(operation);
    }

    fn persist(&mut self, operation: &'static str) {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::save_span(self.parts.len()).entered();

        match self.gateway.save(&self.parts) {
            Ok(()) => {
                if self.last_persistence_error.take().is_some() {
                    log::info!("Inventory storage back in sync after {}", operation);
                }
            }
            Err(e) => {
                log::warn!(
                    "Failed to save inventory to {} after {}; change kept in memory. Error: {}",
                    self.gateway.describe(),
                    operation,
                    e
                );
                #[cfg(feature = "metrics")]
                METRICS.record_persistence_failure("save");
                self.last_persistence_error = Some(e);
            }
        }
    }
}

/// Later parts repeating an id get a freshly minted one.
fn reassign_duplicate_ids(mut parts: Vec<Part>) -> Vec<Part> {
    let mut seen: HashSet<PartId> = HashSet::with_capacity(parts.len());
    let stored: HashSet<PartId> = parts.iter().map(|p| p.id.clone()).collect();
    for part in &mut parts {
        if seen.insert(part.id.clone()) {
            continue;
        }
        let fresh = loop {
            let id = PartId::mint();
            if !stored.contains(&id) && !seen.contains(&id) {
                break id;
            }
        };
        log::warn!(
            "Stored inventory repeats part id {} ('{}'), reassigned to {}",
            part.id,
            part.name,
            fresh
        );
        seen.insert(fresh.clone());
        part.id = fresh;
    }
    parts
}
