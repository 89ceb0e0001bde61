//! Recording view
//!
//! A `View` that keeps whatever was last pushed into it. Used by tests and
//! by callers that want the controller's state without drawing anything.

use std::sync::{Mutex, MutexGuard};

use crate::domain::{ActivityCard, ParticipantRow, StatusMessage, UiMode, User};
use crate::ports::View;

/// Everything the controller has shown so far
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub mode: UiMode,
    pub greeting: Option<String>,
    pub login_prompt_open: bool,
    pub login_error: Option<String>,
    pub cards: Vec<ActivityCard>,
    pub roster_failure: Option<String>,
    pub activity_options: Vec<String>,
    /// The message currently visible in the status area
    pub status: Option<StatusMessage>,
    /// The last message ever shown, visible or not
    pub last_status: Option<StatusMessage>,
    pub roster_renders: usize,
    pub signup_form_resets: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            mode: UiMode::Student,
            greeting: None,
            login_prompt_open: false,
            login_error: None,
            cards: Vec::new(),
            roster_failure: None,
            activity_options: Vec::new(),
            status: None,
            last_status: None,
            roster_renders: 0,
            signup_form_resets: 0,
        }
    }
}

impl ViewState {
    pub fn card(&self, name: &str) -> Option<&ActivityCard> {
        self.cards.iter().find(|c| c.name == name)
    }

    /// Every removal affordance currently on screen
    pub fn removal_targets(&self) -> Vec<ParticipantRow> {
        self.cards
            .iter()
            .flat_map(|c| c.participants.iter().cloned())
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct RecordingView {
    state: Mutex<ViewState>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> ViewState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        // A panic while holding the lock can only come from a test assertion;
        // the state itself is always consistent.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl View for RecordingView {
    fn set_mode(&self, mode: UiMode, user: Option<&User>) {
        let mut state = self.lock();
        state.mode = mode;
        state.greeting = user.map(User::greeting);
    }

    fn open_login_prompt(&self) {
        let mut state = self.lock();
        state.login_prompt_open = true;
        state.login_error = None;
    }

    fn close_login_prompt(&self) {
        self.lock().login_prompt_open = false;
    }

    fn show_login_error(&self, message: &str) {
        self.lock().login_error = Some(message.to_string());
    }

    fn hide_login_error(&self) {
        self.lock().login_error = None;
    }

    fn render_roster(&self, cards: &[ActivityCard]) {
        let mut state = self.lock();
        state.cards = cards.to_vec();
        state.roster_failure = None;
        state.roster_renders += 1;
    }

    fn render_roster_failure(&self, message: &str) {
        let mut state = self.lock();
        state.cards.clear();
        state.roster_failure = Some(message.to_string());
        state.roster_renders += 1;
    }

    fn set_activity_options(&self, names: &[String]) {
        self.lock().activity_options = names.to_vec();
    }

    fn reset_signup_form(&self) {
        self.lock().signup_form_resets += 1;
    }

    fn show_status(&self, message: &StatusMessage) {
        let mut state = self.lock();
        state.status = Some(message.clone());
        state.last_status = Some(message.clone());
    }

    fn hide_status(&self) {
        self.lock().status = None;
    }
}
