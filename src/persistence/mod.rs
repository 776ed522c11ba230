//! Persistence gateways for the inventory snapshot
//!
//! The store owns the only in-memory copy of the inventory. A gateway just
//! reads and writes full snapshots:
//! - [`MemoryGateway`] keeps the blob in process
//! - [`JsonFileGateway`] writes a checksummed JSON file
//! - [`RedisGateway`] stores the JSON array under one key
//!
//! # Example
//!
//! ```rust,no_run
//! use partlife::persistence::{JsonFileGateway, PersistenceGateway};
//!
//! let gateway = JsonFileGateway::new("partlife_data.json");
//! match gateway.load() {
//!     Ok(Some(parts)) => println!("{} parts on disk", parts.len()),
//!     Ok(None) => println!("no saved inventory"),
//!     Err(e) => eprintln!("unreadable inventory: {e}"),
//! }
//! ```

pub mod error;
pub mod file;
pub mod memory;
pub mod redis_gateway;

pub use error::PersistenceError;
pub use file::JsonFileGateway;
pub use memory::MemoryGateway;
pub use redis_gateway::RedisGateway;

use crate::config::{StorageBackend, StorageConfig};
use crate::part::Part;

/// Full-snapshot storage for the part list.
pub trait PersistenceGateway: Send {
    /// Read the last saved snapshot.
    ///
    /// Returns `Ok(None)` when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if stored data exists but cannot be read.
    fn load(&self) -> Result<Option<Vec<Part>>, PersistenceError>;

    /// Replace the stored snapshot with `parts`.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the write fails.
    fn save(&self, parts: &[Part]) -> Result<(), PersistenceError>;

    /// Short label for logs.
    fn describe(&self) -> String;
}

/// Build the gateway selected by `config`.
///
/// # Errors
///
/// Returns `PersistenceError::Redis` if the Redis URL is invalid.
pub fn open_gateway(config: &StorageConfig) -> Result<Box<dyn PersistenceGateway>, PersistenceError> {
    let gateway: Box<dyn PersistenceGateway> = match config.backend {
        StorageBackend::File => Box::new(JsonFileGateway::new(&config.path)),
        StorageBackend::Redis => Box::new(RedisGateway::open(&config.redis_url, &config.key)?),
        StorageBackend::Memory => Box::new(MemoryGateway::new()),
    };
    log::debug!("Using {} for inventory storage", gateway.describe());
    Ok(gateway)
}
