//! Token store port - durable storage for the bearer token

use crate::domain::result::Result;

/// Persists the one piece of state that outlives a process
///
/// An absent token means logged out.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;

    fn save(&self, token: &str) -> Result<()>;

    /// Removing a token that is not there is not an error
    fn clear(&self) -> Result<()>;
}
