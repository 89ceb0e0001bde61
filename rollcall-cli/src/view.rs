//! Terminal view - prints what the controller shows
//!
//! Keeps the last roster and status so the interactive shell can build its
//! menus from what is on screen. In quiet mode (`--json`) nothing is
//! printed but state is still kept.

use std::sync::{Mutex, MutexGuard};

use indicatif::{ProgressBar, ProgressStyle};

use rollcall_core::{ActivityCard, ParticipantRow, StatusMessage, UiMode, User, View};

use crate::output;

#[derive(Debug, Default)]
struct TerminalState {
    mode: Option<UiMode>,
    cards: Vec<ActivityCard>,
    activity_options: Vec<String>,
    status: Option<StatusMessage>,
    /// Sign-up form contents kept across a failed submit
    signup_draft: Option<(String, String)>,
}

#[derive(Default)]
pub struct TerminalView {
    quiet: bool,
    state: Mutex<TerminalState>,
    spinner: Mutex<Option<ProgressBar>>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Self::default()
        }
    }

    fn lock(&self) -> MutexGuard<'_, TerminalState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Print without tearing an active spinner
    fn emit(&self, print: impl FnOnce()) {
        if self.quiet {
            return;
        }
        let spinner = self.spinner.lock().unwrap_or_else(|p| p.into_inner());
        match spinner.as_ref() {
            Some(pb) => pb.suspend(print),
            None => print(),
        }
    }

    pub fn start_spinner(&self, message: &str) {
        if self.quiet || atty::isnt(atty::Stream::Stdout) {
            return;
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        *self.spinner.lock().unwrap_or_else(|p| p.into_inner()) = Some(pb);
    }

    pub fn finish_spinner(&self) {
        if let Some(pb) = self.spinner.lock().unwrap_or_else(|p| p.into_inner()).take() {
            pb.finish_and_clear();
        }
    }

    pub fn mode(&self) -> UiMode {
        self.lock().mode.unwrap_or(UiMode::Student)
    }

    pub fn removal_targets(&self) -> Vec<ParticipantRow> {
        self.lock()
            .cards
            .iter()
            .flat_map(|c| c.participants.iter().cloned())
            .collect()
    }

    pub fn activity_options(&self) -> Vec<String> {
        self.lock().activity_options.clone()
    }

    /// The status message, if it has not been dismissed yet
    pub fn visible_status(&self) -> Option<StatusMessage> {
        self.lock().status.clone()
    }

    pub fn remember_signup(&self, email: &str, activity: &str) {
        self.lock().signup_draft = Some((email.to_string(), activity.to_string()));
    }

    pub fn signup_draft(&self) -> Option<(String, String)> {
        self.lock().signup_draft.clone()
    }
}

impl View for TerminalView {
    fn set_mode(&self, mode: UiMode, user: Option<&User>) {
        let previous = self.lock().mode.replace(mode);
        if previous == Some(mode) {
            return;
        }
        match (mode, user) {
            (UiMode::Staff, Some(user)) => {
                let greeting = user.greeting();
                self.emit(|| output::success(&greeting));
            }
            (UiMode::Student, _) if previous == Some(UiMode::Staff) => {
                self.emit(|| output::warning("Logged out"));
            }
            _ => {}
        }
    }

    fn open_login_prompt(&self) {
        self.emit(|| output::info("Teacher login (leave the username blank to cancel)"));
    }

    fn close_login_prompt(&self) {}

    fn show_login_error(&self, message: &str) {
        self.emit(|| output::error(message));
    }

    fn hide_login_error(&self) {}

    fn render_roster(&self, cards: &[ActivityCard]) {
        self.lock().cards = cards.to_vec();
        if cards.is_empty() {
            self.emit(|| output::info("No activities"));
        } else {
            let table = output::roster_table(cards);
            self.emit(|| println!("{}", table));
        }
    }

    fn render_roster_failure(&self, message: &str) {
        self.lock().cards.clear();
        self.emit(|| output::error(message));
    }

    fn set_activity_options(&self, names: &[String]) {
        self.lock().activity_options = names.to_vec();
    }

    fn reset_signup_form(&self) {
        self.lock().signup_draft = None;
    }

    fn show_status(&self, message: &StatusMessage) {
        self.lock().status = Some(message.clone());
        self.emit(|| output::status(message));
    }

    fn hide_status(&self) {
        self.lock().status = None;
    }
}
