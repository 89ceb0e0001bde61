//! Whoami command - show the restored session

use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rollcall_core::{EntryPoint, SessionState};

use super::{get_context, runtime};
use crate::view::TerminalView;

pub fn run(json: bool) -> Result<()> {
    let view = Arc::new(TerminalView::quiet());
    let ctx = get_context(view, EntryPoint::Cli, "whoami")?;
    let rt = runtime()?;

    let state = rt.block_on(ctx.app.session().restore_session());
    let user = ctx.app.session().current_user();

    if json {
        println!(
            "{}",
            serde_json::json!({
                "state": state,
                "mode": ctx.app.session().session().mode(),
                "user": user,
                "server": &ctx.config.base_url,
            })
        );
        return Ok(());
    }

    match (state, user) {
        (SessionState::Authenticated, Some(user)) => {
            println!("{}", user.greeting().green());
            if let Some(username) = &user.username {
                println!("  Username: {}", username);
            }
            println!("  Mode: staff");
        }
        _ => {
            println!("{}", "Not logged in".yellow());
            println!("  Mode: student");
        }
    }
    println!("  Server: {}", ctx.config.base_url);
    Ok(())
}
