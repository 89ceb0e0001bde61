//! Shell command - interactive session over the same controller
//!
//! Menu choices become `UiEvent`s. The runtime has one worker thread so
//! status dismissal timers keep running while the menu waits for input.

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::{Input, Select};
use rollcall_core::{EntryPoint, Error, UiEvent, UiMode};

use super::login::{get_password_or_prompt, get_username_or_prompt};
use super::get_context;
use crate::output;
use crate::view::TerminalView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Refresh,
    Login,
    Logout,
    SignUp,
    Remove,
    Quit,
}

impl MenuItem {
    fn label(&self) -> &'static str {
        match self {
            MenuItem::Refresh => "Refresh activities",
            MenuItem::Login => "Login",
            MenuItem::Logout => "Logout",
            MenuItem::SignUp => "Sign up a student",
            MenuItem::Remove => "Remove a participant",
            MenuItem::Quit => "Quit",
        }
    }
}

/// Exactly one of Login / Logout is offered, matching the mode
fn menu_for(mode: UiMode) -> Vec<MenuItem> {
    let session_item = if mode.login_control_visible() {
        MenuItem::Login
    } else {
        MenuItem::Logout
    };
    vec![
        MenuItem::Refresh,
        MenuItem::SignUp,
        MenuItem::Remove,
        session_item,
        MenuItem::Quit,
    ]
}

fn print_header(view: &TerminalView) {
    println!();
    match view.mode() {
        UiMode::Staff => println!("{}", "[staff mode]".green().bold()),
        UiMode::Student => println!("{}", "[student mode]".yellow().bold()),
    }
    if let Some(status) = view.visible_status() {
        output::status(&status);
    }
}

/// Ask for the next event; `None` means quit
fn next_event(view: &TerminalView) -> Result<Option<UiEvent>> {
    let items = menu_for(view.mode());
    let labels: Vec<&str> = items.iter().map(MenuItem::label).collect();
    let choice = Select::new()
        .with_prompt("What next?")
        .items(&labels)
        .default(0)
        .interact()?;

    let event = match items[choice] {
        MenuItem::Quit => return Ok(None),
        MenuItem::Refresh => UiEvent::Refresh,
        MenuItem::Logout => UiEvent::Logout,
        MenuItem::Login => {
            // Prompt is shown by the caller before credentials are read
            return Ok(Some(UiEvent::OpenLoginPrompt));
        }
        MenuItem::SignUp => {
            let options = view.activity_options();
            if options.is_empty() {
                output::warning("No activities loaded. Try refreshing.");
                return Ok(Some(UiEvent::Refresh));
            }
            let (draft_email, draft_activity) = view.signup_draft().unwrap_or_default();
            let default = options.iter().position(|o| *o == draft_activity).unwrap_or(0);

            let activity_index = Select::new()
                .with_prompt("Activity")
                .items(&options)
                .default(default)
                .interact()?;
            let email: String = Input::new()
                .with_prompt("Student email")
                .with_initial_text(draft_email)
                .allow_empty(true)
                .interact_text()?;

            let activity = options[activity_index].clone();
            view.remember_signup(&email, &activity);
            UiEvent::SubmitSignup { email, activity }
        }
        MenuItem::Remove => {
            let targets = view.removal_targets();
            if targets.is_empty() {
                output::info("Nobody to remove.");
                return Ok(Some(UiEvent::Refresh));
            }
            let labels: Vec<String> = targets
                .iter()
                .map(|t| format!("{} ({})", t.email, t.activity))
                .collect();
            let index = Select::new()
                .with_prompt("Remove which participant?")
                .items(&labels)
                .interact()?;

            let target = targets[index].clone();
            UiEvent::RemoveParticipant {
                activity: target.activity,
                email: target.email,
            }
        }
    };

    Ok(Some(event))
}

/// Read credentials for an open login prompt. Blank username cancels.
fn login_event() -> Result<UiEvent> {
    let username = get_username_or_prompt(None)?;
    if username.is_empty() {
        return Ok(UiEvent::CloseLoginPrompt);
    }
    let password = get_password_or_prompt(None)?;
    Ok(UiEvent::SubmitLogin { username, password })
}

pub fn run() -> Result<()> {
    let view = Arc::new(TerminalView::new());
    let ctx = get_context(view.clone(), EntryPoint::Shell, "shell")?;
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    output::info(&format!("Connected to {}", ctx.config.base_url));
    rt.block_on(ctx.app.initialize());

    loop {
        print_header(&view);

        let mut event = match next_event(&view)? {
            Some(event) => event,
            None => break,
        };

        if event == UiEvent::OpenLoginPrompt {
            ctx.app.open_login_prompt();
            event = login_event()?;
        }

        match rt.block_on(ctx.app.dispatch(event)) {
            Ok(()) => {}
            Err(Error::Validation(msg)) => output::error(&msg),
            // Server and transport failures were already shown by the view
            Err(_) => {}
        }
    }

    Ok(())
}
