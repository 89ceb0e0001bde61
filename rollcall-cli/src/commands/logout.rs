//! Logout command - end the session and forget the token

use std::sync::Arc;

use anyhow::Result;
use rollcall_core::EntryPoint;

use super::{get_context, runtime};
use crate::output;
use crate::view::TerminalView;

pub fn run() -> Result<()> {
    let view = Arc::new(TerminalView::quiet());
    let ctx = get_context(view, EntryPoint::Cli, "logout")?;
    let rt = runtime()?;

    let was_logged_in = rt.block_on(async {
        ctx.app.session().restore_session().await;
        let was_logged_in = ctx.app.is_authenticated();
        ctx.app.click_logout().await;
        was_logged_in
    });

    if was_logged_in {
        output::success("Logged out");
    } else {
        output::info("Not logged in");
    }
    Ok(())
}
