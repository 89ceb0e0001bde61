//! Status area - the shared message line for registration results

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::domain::StatusMessage;
use crate::ports::View;

/// How long a status message stays visible
pub const STATUS_DISMISS_AFTER: Duration = Duration::from_millis(5000);

/// Shows messages and hides them again after `dismiss_after`.
///
/// Timers are never cancelled. A timer started for an older message can
/// hide a newer one early; it never shows anything.
#[derive(Clone)]
pub struct StatusArea {
    view: Arc<dyn View>,
    dismiss_after: Duration,
}

impl StatusArea {
    pub fn new(view: Arc<dyn View>, dismiss_after: Duration) -> Self {
        Self { view, dismiss_after }
    }

    /// Display `message` and schedule its dismissal. Returns the message.
    pub fn show(&self, message: StatusMessage) -> StatusMessage {
        self.view.show_status(&message);

        // Outside a runtime there is nothing to run the timer on; the
        // message then stays until the next one replaces it.
        if let Ok(handle) = Handle::try_current() {
            let view = Arc::clone(&self.view);
            let delay = self.dismiss_after;
            handle.spawn(async move {
                tokio::time::sleep(delay).await;
                view.hide_status();
            });
        }

        message
    }
}
