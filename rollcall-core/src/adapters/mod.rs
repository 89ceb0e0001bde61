//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - reqwest HTTP client for the ActivityBackend port
//! - Plain file (and in-memory) storage for the TokenStore port
//! - A recording View that keeps what it was shown

pub mod http;
pub mod recording;
pub mod token_store;

#[cfg(test)]
pub mod mock_server;
