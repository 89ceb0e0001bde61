//! Roster service - fetches and renders the activity list

use std::sync::Arc;

use crate::domain::result::Result;
use crate::domain::Roster;
use crate::ports::{ActivityBackend, View};
use crate::services::logging::{record, LogEvent, LoggingService};

/// Rendered in place of the list when the fetch fails
pub const ROSTER_LOAD_FAILED: &str = "Failed to load activities. Please try again later.";

pub struct RosterService {
    backend: Arc<dyn ActivityBackend>,
    view: Arc<dyn View>,
    logger: Option<Arc<LoggingService>>,
}

impl RosterService {
    pub fn new(
        backend: Arc<dyn ActivityBackend>,
        view: Arc<dyn View>,
        logger: Option<Arc<LoggingService>>,
    ) -> Self {
        Self {
            backend,
            view,
            logger,
        }
    }

    /// Fetch without rendering
    pub async fn fetch(&self) -> Result<Roster> {
        self.backend.list_activities().await
    }

    /// Fetch and rebuild the whole list and the activity options.
    ///
    /// Failures are rendered and logged, never returned. The activity
    /// options keep their previous contents on failure.
    pub async fn refresh(&self) -> Option<Roster> {
        match self.fetch().await {
            Ok(roster) => {
                self.view.render_roster(&roster.cards());
                self.view.set_activity_options(&roster.names());
                Some(roster)
            }
            Err(e) => {
                self.view.render_roster_failure(ROSTER_LOAD_FAILED);

                let mut event = LogEvent::new("roster_fetch_failed").with_error(e.to_string());
                if let Some(status) = e.status() {
                    event = event.with_error_details(format!("HTTP {}", status));
                }
                record(self.logger.as_deref(), event);
                None
            }
        }
    }
}
