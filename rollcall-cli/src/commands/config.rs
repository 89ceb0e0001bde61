//! Config command - show and change client settings

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use rollcall_core::config::{Config, Source, BASE_URL_ENV};

use super::get_rollcall_dir;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the resolved configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Point the client at another activity server
    SetServer {
        /// Base URL, e.g. http://127.0.0.1:8000
        url: String,
    },
}

fn source_label(source: Source) -> &'static str {
    match source {
        Source::Default => "default",
        Source::Settings => "settings.json",
        Source::Environment => BASE_URL_ENV,
    }
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let rollcall_dir = get_rollcall_dir();

    match command {
        ConfigCommands::Show { json } => {
            let config = Config::load(&rollcall_dir)?;

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "dataDir": rollcall_dir.to_string_lossy(),
                        "baseUrl": config.base_url,
                        "baseUrlSource": config.base_url_source,
                        "timeoutSecs": config.timeout.map(|t| t.as_secs()),
                        "dismissAfterMs": config.status_dismiss_after.as_millis() as u64,
                    }))?
                );
                return Ok(());
            }

            println!("{}", "Configuration".bold());
            println!("  Data directory: {}", rollcall_dir.display());
            println!(
                "  Server: {} {}",
                config.base_url,
                format!("({})", source_label(config.base_url_source)).dimmed()
            );
            match config.timeout {
                Some(t) => println!("  Timeout: {}s", t.as_secs()),
                None => println!("  Timeout: none"),
            }
            println!(
                "  Status dismissed after: {} ms",
                config.status_dismiss_after.as_millis()
            );
        }
        ConfigCommands::SetServer { url } => {
            std::fs::create_dir_all(&rollcall_dir)?;
            let mut config = Config::load(&rollcall_dir)?;
            config.set_base_url(&url)?;
            config.save(&rollcall_dir)?;

            output::success(&format!("Server set to {}", config.base_url));
            if std::env::var(BASE_URL_ENV).is_ok() {
                output::warning(&format!("{} is set and takes precedence", BASE_URL_ENV));
            }
        }
    }

    Ok(())
}
