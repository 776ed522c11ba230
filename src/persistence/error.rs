//! Persistence error types

use thiserror::Error;

/// Storage could not be read or written.
///
/// On load the store falls back to its seed; on save the in-memory
/// mutation stands and the store records the error until a later save
/// succeeds.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem failure
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Snapshot could not be encoded or decoded
    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Redis command or connection failure
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
    /// Stored snapshot failed its integrity check
    #[error(
        "Stored snapshot is corrupt: {0}\n\
         The file was modified outside partlife or only partially written."
    )]
    Corrupt(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_error_display() {
        let err = PersistenceError::Corrupt("checksum mismatch".to_string());
        assert!(err.to_string().contains("Stored snapshot is corrupt"));
        assert!(err.to_string().contains("checksum mismatch"));

        let err = PersistenceError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert!(err.to_string().starts_with("Storage I/O error"));
    }
}
