//! Activities command - list activities and their participants

use std::sync::Arc;

use anyhow::Result;
use rollcall_core::{EntryPoint, OperationResult, Roster};

use super::{get_context, runtime, AlreadyReported};
use crate::view::TerminalView;

pub fn run(json: bool) -> Result<()> {
    let view = Arc::new(if json { TerminalView::quiet() } else { TerminalView::new() });
    let ctx = get_context(view.clone(), EntryPoint::Cli, "activities")?;
    let rt = runtime()?;

    if json {
        let result: OperationResult<Roster> = rt.block_on(ctx.app.roster().fetch()).into();
        println!("{}", serde_json::to_string_pretty(&result)?);
        return if result.success { Ok(()) } else { Err(AlreadyReported.into()) };
    }

    view.start_spinner("Loading activities...");
    let roster = rt.block_on(async {
        ctx.app.session().restore_session().await;
        ctx.app.refresh().await
    });
    view.finish_spinner();

    match roster {
        Some(_) => Ok(()),
        None => Err(AlreadyReported.into()),
    }
}
