//! Rollcall CLI - activity sign-ups in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;
mod view;

use commands::{activities, config, login, logout, logs, registration, shell, whoami, AlreadyReported};

/// Rollcall - manage extracurricular activity sign-ups
#[derive(Parser)]
#[command(name = "rollcall", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List activities with their participants
    Activities {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in as a staff member
    Login {
        /// Username (prompted if omitted)
        #[arg(short, long)]
        username: Option<String>,
        /// Password (falls back to ROLLCALL_PASSWORD, then a prompt)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Log out and forget the saved token
    Logout,

    /// Show who is logged in
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign a student up for an activity
    Signup {
        /// Activity name
        activity: String,
        /// Student email
        email: String,
    },

    /// Remove a student from an activity
    Unregister {
        /// Activity name
        activity: String,
        /// Student email
        email: String,
    },

    /// Interactive session
    Shell,

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !e.is::<AlreadyReported>() {
                output::error(&format!("{:#}", e));
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Activities { json } => activities::run(json),
        Commands::Login { username, password } => login::run(username, password),
        Commands::Logout => logout::run(),
        Commands::Whoami { json } => whoami::run(json),
        Commands::Signup { activity, email } => registration::run_signup(&activity, &email),
        Commands::Unregister { activity, email } => registration::run_unregister(&activity, &email),
        Commands::Shell => shell::run(),
        Commands::Config { command } => config::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
