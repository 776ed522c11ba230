//! Redis gateway: the whole part list as one JSON string under one key.

use redis::Commands;

use super::{PersistenceError, PersistenceGateway};
use crate::part::Part;

pub struct RedisGateway {
    client: redis::Client,
    key: String,
}

impl RedisGateway {
    /// Prepare a gateway for `url`. No connection is made until first use.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Redis` if `url` is not a valid Redis URL.
    pub fn open(url: &str, key: &str) -> Result<Self, PersistenceError> {
        let client = redis::Client::open(url)?;
        Ok(Self {
            client,
            key: key.to_string(),
        })
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PersistenceGateway for RedisGateway {
    fn load(&self) -> Result<Option<Vec<Part>>, PersistenceError> {
        let mut con = self.client.get_connection()?;
        let raw: Option<String> = con.get(&self.key)?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, parts: &[Part]) -> Result<(), PersistenceError> {
        let encoded = serde_json::to_string(parts)?;
        let mut con = self.client.get_connection()?;
        let _: () = con.set(&self.key, encoded)?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("redis key {}", self.key)
    }
}
