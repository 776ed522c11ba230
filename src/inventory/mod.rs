//! Inventory state
//!
//! - [`InventoryStore`] owns the part list and is the only place it changes
//! - [`SharedInventory`] serializes access to one store from many threads
//! - [`InventoryError`] / [`ValidationError`] are the errors callers act on

pub mod error;
pub mod shared;
pub mod store;

pub use error::{InventoryError, ValidationError};
pub use shared::{InventoryHandle, SharedInventory};
pub use store::InventoryStore;
