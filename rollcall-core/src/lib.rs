//! Rollcall Core - Session, roster and registration logic for the activity
//! sign-up client
//!
//! This crate follows hexagonal architecture:
//!
//! - **domain**: Core entities (Activity, Roster, Session, User)
//! - **ports**: Trait definitions for external dependencies (ActivityBackend, TokenStore, View)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (HTTP, token file, recording view)
//! - **app**: The controller that turns UI events into service calls

pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::http::HttpBackend;
use adapters::token_store::FileTokenStore;
use config::Config;

// Re-export commonly used types at crate root
pub use app::{App, AppSettings, UiEvent};
pub use domain::result::{Error, OperationResult};
pub use domain::{
    Activity, ActivityCard, ParticipantRow, Roster, Session, SessionState, StatusKind,
    StatusMessage, UiMode, User,
};
pub use ports::View;
pub use services::{EntryPoint, LogEntry, LogEvent, LoggingService};

/// Main context for Rollcall operations
///
/// Wires the configured server, the token file in the data directory and
/// the caller's view into an `App`.
pub struct RollcallContext {
    pub config: Config,
    pub data_dir: PathBuf,
    pub backend: Arc<HttpBackend>,
    pub tokens: Arc<FileTokenStore>,
    pub app: App,
}

impl RollcallContext {
    /// Create a new Rollcall context
    pub fn new(
        data_dir: &Path,
        view: Arc<dyn View>,
        logger: Option<Arc<LoggingService>>,
    ) -> Result<Self> {
        let config = Config::load(data_dir)?;

        let backend = Arc::new(
            HttpBackend::new(&config.base_url, config.timeout)
                .context("Failed to configure the activity server")?,
        );
        let tokens = Arc::new(FileTokenStore::in_dir(data_dir));

        let settings = AppSettings {
            status_dismiss_after: config.status_dismiss_after,
        };
        let app = App::new(
            backend.clone(),
            tokens.clone(),
            view,
            settings,
            logger,
        );

        Ok(Self {
            config,
            data_dir: data_dir.to_path_buf(),
            backend,
            tokens,
            app,
        })
    }
}
