//! Signup and unregister commands

use std::sync::Arc;

use anyhow::Result;
use rollcall_core::{EntryPoint, Error, StatusMessage};

use super::{get_context, runtime, AlreadyReported};
use crate::output;
use crate::view::TerminalView;

fn finish(status: StatusMessage) -> Result<()> {
    if status.is_error() {
        Err(AlreadyReported.into())
    } else {
        Ok(())
    }
}

/// `rollcall signup <activity> <email>`
pub fn run_signup(activity: &str, email: &str) -> Result<()> {
    let view = Arc::new(TerminalView::new());
    let ctx = get_context(view.clone(), EntryPoint::Cli, "signup")?;
    let rt = runtime()?;

    view.start_spinner("Signing up...");
    let result = rt.block_on(async {
        ctx.app.session().restore_session().await;
        ctx.app.submit_signup(email, activity).await
    });
    view.finish_spinner();

    match result {
        Ok(status) => finish(status),
        Err(Error::Validation(msg)) => {
            output::error(&msg);
            Err(AlreadyReported.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// `rollcall unregister <activity> <email>`
pub fn run_unregister(activity: &str, email: &str) -> Result<()> {
    let view = Arc::new(TerminalView::new());
    let ctx = get_context(view.clone(), EntryPoint::Cli, "unregister")?;
    let rt = runtime()?;

    view.start_spinner("Unregistering...");
    let status = rt.block_on(async {
        ctx.app.session().restore_session().await;
        ctx.app.click_remove_participant(activity, email).await
    });
    view.finish_spinner();

    finish(status)
}
