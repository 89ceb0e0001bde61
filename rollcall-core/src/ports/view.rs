//! View port - the rendering side of the controller
//!
//! Services push state into a `View`; they never read anything back. All
//! methods take `&self` so a view can be shared with detached tasks such as
//! the status dismissal timer.

use crate::domain::{ActivityCard, StatusMessage, UiMode, User};

pub trait View: Send + Sync {
    /// Switch between staff and student presentation.
    /// `user` is `Some` exactly when `mode` is `UiMode::Staff`.
    fn set_mode(&self, mode: UiMode, user: Option<&User>);

    /// Show the login prompt with its error line hidden
    fn open_login_prompt(&self);

    /// Hide the login prompt and clear its fields
    fn close_login_prompt(&self);

    fn show_login_error(&self, message: &str);

    fn hide_login_error(&self);

    /// Replace the whole activity list
    fn render_roster(&self, cards: &[ActivityCard]);

    /// Replace the whole activity list with a failure message
    fn render_roster_failure(&self, message: &str);

    /// Replace the options of the activity-selection control
    fn set_activity_options(&self, names: &[String]);

    fn reset_signup_form(&self);

    fn show_status(&self, message: &StatusMessage);

    fn hide_status(&self);
}
