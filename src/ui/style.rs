use ratatui::style::{Color, Modifier, Style};

use crate::app::StatusKind;

/// Border and label style for the field that currently has input focus.
pub fn focus_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

/// Highlight for the selected row of a list.
pub fn selection_style(is_selected: bool) -> Style {
    if is_selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

pub fn selection_marker(is_selected: bool) -> &'static str {
    if is_selected {
        "► "
    } else {
        "  "
    }
}

pub fn status_color(kind: StatusKind) -> Color {
    match kind {
        StatusKind::Info => Color::White,
        StatusKind::Success => Color::Green,
        StatusKind::Error => Color::Red,
    }
}
