//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. Services depend
//! only on these traits, not on concrete implementations.

mod backend;
mod token_store;
mod view;

pub use backend::{ActivityBackend, Credentials, LoginGrant};
pub use token_store::TokenStore;
pub use view::View;
