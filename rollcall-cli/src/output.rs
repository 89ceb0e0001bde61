//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};

use rollcall_core::{ActivityCard, StatusMessage};
use rollcall_core::domain::NO_PARTICIPANTS;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Print a status-area message in its style
pub fn status(message: &StatusMessage) {
    if message.is_error() {
        error(&message.text);
    } else {
        success(&message.text);
    }
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// One row per activity, participants stacked in the last column
pub fn roster_table(cards: &[ActivityCard]) -> Table {
    let mut table = create_table();
    table.set_header(vec!["Activity", "Schedule", "Availability", "Participants"]);

    for card in cards {
        let name = if card.description.is_empty() {
            card.name.clone()
        } else {
            format!("{}\n{}", card.name, card.description)
        };

        let availability = if card.spots_left > 0 {
            Cell::new(card.availability()).fg(Color::Green)
        } else {
            Cell::new(card.availability()).fg(Color::Red)
        };

        let participants = if card.participants.is_empty() {
            NO_PARTICIPANTS.to_string()
        } else {
            card.participants
                .iter()
                .map(|row| format!("✗ {}", row.email))
                .collect::<Vec<_>>()
                .join("\n")
        };

        table.add_row(vec![
            Cell::new(name),
            Cell::new(&card.schedule),
            availability,
            Cell::new(participants),
        ]);
    }

    table
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
