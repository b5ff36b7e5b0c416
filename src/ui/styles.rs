// UI Styles
// Color schemes and styling for the progress view

use ratatui::style::{Color, Modifier, Style};

use crate::core::RunStatus;

/// Application color scheme and styles
pub struct Styles;

impl Styles {
    // === Header / Footer ===

    pub fn header() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn footer() -> Style {
        Style::default().fg(Color::Yellow)
    }

    // === Progress ===

    pub fn gauge() -> Style {
        Style::default().fg(Color::Green).bg(Color::Black)
    }

    /// Footer status colored by run state
    pub fn status(status: &RunStatus) -> Style {
        match status {
            RunStatus::Running => Style::default().fg(Color::Yellow),
            RunStatus::Cancelling | RunStatus::Cancelled => Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            RunStatus::Completed => Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            RunStatus::Failed(_) => Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        }
    }

    // === Move List ===

    pub fn move_source() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn move_destination() -> Style {
        Style::default()
    }

    /// Destination that got a `_N` name
    pub fn move_renamed() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn arrow() -> Style {
        Style::default().fg(Color::Rgb(68, 68, 68))
    }

    // === Border Styles ===

    pub fn border() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }
}
