//! # Partlife
//!
//! Wear tracking for replaceable machine parts.
//!
//! Each [`Part`] has an install date and an expected lifespan. [`health`]
//! turns those into days used, days remaining and a `GOOD` / `WARNING` /
//! `CRITICAL` status. [`InventoryStore`] owns the part list, validates
//! edits and writes every change through a
//! [`PersistenceGateway`](persistence::PersistenceGateway). [`FilterView`]
//! narrows the list by machine and part name, and [`advisory`] asks an
//! external model for maintenance advice without ever failing the caller.

pub mod advisory;
pub mod clock;
pub mod config;
pub mod filter;
pub mod health;
pub mod inventory;
pub mod json_helpers;
pub mod metrics;
pub mod part;
pub mod persistence;
pub mod report;
pub mod seed;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::PartlifeConfig;
pub use filter::{Facet, FilterSelection, FilterView};
pub use health::{HealthMap, PartHealth, PartStatus};
pub use inventory::{InventoryError, InventoryHandle, InventoryStore, SharedInventory, ValidationError};
pub use part::{Part, PartDraft, PartId};
