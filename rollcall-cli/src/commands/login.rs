//! Login command - exchange staff credentials for a session token

use std::env;
use std::sync::Arc;

use anyhow::Result;
use dialoguer::{Input, Password};
use rollcall_core::{EntryPoint, Error};

use super::{get_context, runtime, AlreadyReported};
use crate::output;
use crate::view::TerminalView;

/// Environment variable read when `--password` is not given
pub const PASSWORD_ENV: &str = "ROLLCALL_PASSWORD";

/// Get the username from the flag or prompt
pub fn get_username_or_prompt(username_flag: Option<String>) -> Result<String> {
    if let Some(u) = username_flag {
        return Ok(u);
    }
    let u = Input::<String>::new()
        .with_prompt("Username")
        .allow_empty(true)
        .interact_text()?;
    Ok(u)
}

/// Get password from --password flag, ROLLCALL_PASSWORD env var, or prompt
pub fn get_password_or_prompt(password_flag: Option<String>) -> Result<String> {
    // 1. Check --password flag first
    if let Some(p) = password_flag {
        return Ok(p);
    }

    // 2. Check ROLLCALL_PASSWORD environment variable
    if let Ok(p) = env::var(PASSWORD_ENV) {
        return Ok(p);
    }

    // 3. Prompt interactively
    let p = Password::new()
        .with_prompt("Password")
        .allow_empty_password(true)
        .interact()?;
    Ok(p)
}

pub fn run(username: Option<String>, password: Option<String>) -> Result<()> {
    let view = Arc::new(TerminalView::new());
    let ctx = get_context(view.clone(), EntryPoint::Cli, "login")?;
    let rt = runtime()?;

    ctx.app.open_login_prompt();
    let username = get_username_or_prompt(username)?;
    let password = get_password_or_prompt(password)?;

    view.start_spinner("Logging in...");
    let result = rt.block_on(ctx.app.submit_login(&username, &password));
    view.finish_spinner();

    match result {
        Ok(_) => Ok(()),
        Err(Error::Validation(msg)) => {
            ctx.app.close_login_prompt();
            output::error(&msg);
            Err(AlreadyReported.into())
        }
        // The login error line was already printed by the view
        Err(_) => Err(AlreadyReported.into()),
    }
}
