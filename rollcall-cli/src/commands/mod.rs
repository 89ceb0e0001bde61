//! CLI command implementations

pub mod activities;
pub mod config;
pub mod login;
pub mod logout;
pub mod logs;
pub mod registration;
pub mod shell;
pub mod whoami;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use rollcall_core::config::DIR_ENV;
use rollcall_core::services::logging::record;
use rollcall_core::{EntryPoint, LogEvent, LoggingService, RollcallContext};

use crate::view::TerminalView;

/// Returned when the failure was already shown to the user; `main` only
/// sets the exit code.
#[derive(Debug)]
pub struct AlreadyReported;

impl fmt::Display for AlreadyReported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "command failed")
    }
}

impl std::error::Error for AlreadyReported {}

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger(entry_point: EntryPoint) -> Option<Arc<LoggingService>> {
    let rollcall_dir = get_rollcall_dir();
    // Ensure directory exists
    std::fs::create_dir_all(&rollcall_dir).ok()?;
    LoggingService::new(&rollcall_dir, entry_point, env!("CARGO_PKG_VERSION"))
        .ok()
        .map(Arc::new)
}

/// Get the rollcall directory from environment or default
pub fn get_rollcall_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DIR_ENV) {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rollcall")
    }
}

/// Build the context for a command run from the CLI
pub fn get_context(view: Arc<TerminalView>, entry_point: EntryPoint, command: &str) -> Result<RollcallContext> {
    let rollcall_dir = get_rollcall_dir();

    // Create directory if it doesn't exist
    std::fs::create_dir_all(&rollcall_dir)
        .with_context(|| format!("Failed to create rollcall directory: {:?}", rollcall_dir))?;

    let logger = get_logger(entry_point);
    record(logger.as_deref(), LogEvent::new("command_executed").with_command(command));

    RollcallContext::new(&rollcall_dir, view, logger).context("Failed to initialize rollcall context")
}

/// Single-threaded runtime for one-shot commands
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}
