use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Paragraph, Widget},
};

use crate::app::App;
use crate::ui::style;

pub fn render_conversations(app: &App, area: Rect, buf: &mut Buffer) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(1),    // Conversation list
            Constraint::Length(3), // Help
        ])
        .split(area);

    let title = Paragraph::new("💬 Conversation History")
        .block(
            Block::bordered()
                .title("History")
                .title_alignment(Alignment::Center)
                .border_type(BorderType::Rounded),
        )
        .fg(Color::Green)
        .alignment(Alignment::Center);
    title.render(main_layout[0], buf);

    let content = if app.conversations.is_empty() {
        Text::from("No history yet.")
    } else {
        let lines: Vec<Line> = app
            .conversations
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let selected = i == app.conversation_cursor;
                Line::from(Span::styled(
                    format!("{}🗂 {}", style::selection_marker(selected), entry.title),
                    style::selection_style(selected),
                ))
            })
            .collect();
        Text::from(lines)
    };

    let list = Paragraph::new(content).block(
        Block::bordered()
            .title("Previous conversations")
            .border_type(BorderType::Rounded),
    );
    list.render(main_layout[1], buf);

    let help = Paragraph::new("↑/↓: Select • Enter: Open • Esc: Back")
        .block(
            Block::bordered()
                .title("Controls")
                .border_type(BorderType::Rounded),
        )
        .fg(Color::Yellow)
        .alignment(Alignment::Center);
    help.render(main_layout[2], buf);
}
