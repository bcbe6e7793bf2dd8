use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Paragraph, Widget, Wrap},
};

use crate::app::App;
use crate::database::Role;
use crate::ui::render_status;

pub fn render_chat(app: &App, area: Rect, buf: &mut Buffer) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(1),    // Transcript
            Constraint::Length(3), // Input box
            Constraint::Length(3), // Status
            Constraint::Length(3), // Help
        ])
        .split(area);

    let role = app.session.role.unwrap_or(Role::Civilian);
    let panel_title = match role {
        Role::Lawyer => "👨‍⚖ Lawyer Panel",
        Role::Civilian => "👩‍💼 Civilian Legal Assistant",
    };
    let username = app.session.username.as_deref().unwrap_or("");

    let title = Paragraph::new(format!("👋 Welcome, {} ({})", username, role.as_str()))
        .block(
            Block::bordered()
                .title(panel_title)
                .title_alignment(Alignment::Center)
                .border_type(BorderType::Rounded),
        )
        .fg(Color::Green)
        .alignment(Alignment::Center);
    title.render(main_layout[0], buf);

    render_transcript(app, main_layout[1], buf);

    let placeholder = match role {
        Role::Lawyer => "Ask about legal summons or notices...",
        Role::Civilian => "Ask your legal question...",
    };
    let input_widget = Paragraph::new(format!("> {}", app.chat_input))
        .block(
            Block::bordered()
                .title(placeholder)
                .border_type(BorderType::Rounded),
        )
        .fg(Color::Yellow);
    input_widget.render(main_layout[2], buf);

    render_status(app, main_layout[3], buf);

    let help_text = match role {
        Role::Lawyer => {
            "Enter: Send • Ctrl+n: New chat • Ctrl+h: History • Ctrl+d: Review PDF \
             • Ctrl+r: Set reminder • Ctrl+l: Reminders • Esc: Logout"
        }
        Role::Civilian => "Enter: Send • Ctrl+n: New chat • Ctrl+h: History • Esc: Logout",
    };
    let help = Paragraph::new(help_text)
        .block(
            Block::bordered()
                .title("Controls")
                .border_type(BorderType::Rounded),
        )
        .fg(Color::Yellow)
        .alignment(Alignment::Center);
    help.render(main_layout[4], buf);
}

/// Styled transcript of the current conversation, "You:" in cyan and
/// "Assistant:" in green, continuation lines indented.
fn render_transcript(app: &App, area: Rect, buf: &mut Buffer) {
    let content = if app.session.messages.is_empty() {
        let hint = match app.session.role {
            Some(Role::Lawyer) => "Try asking about a summons, notice, or case deadline.",
            _ => "Try asking about FIR, bail, contracts, or property disputes.",
        };
        Text::from(vec![
            Line::from("Welcome to the AI Legal Assistant."),
            Line::from(""),
            Line::from("I can help you with:"),
            Line::from("• Legal summons and court notices"),
            Line::from("• FIR, bail, and case procedures"),
            Line::from("• Contracts, property, and family law questions"),
            Line::from(""),
            Line::from(hint),
        ])
    } else {
        let mut lines = Vec::new();
        for turn in &app.session.messages {
            let prefix = if turn.is_user { "You: " } else { "Assistant: " };
            let style = if turn.is_user {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::Green)
            };

            let content_lines: Vec<String> = turn.content.lines().map(|s| s.to_string()).collect();
            let first_line = content_lines.first().cloned().unwrap_or_default();

            lines.push(Line::from(vec![
                Span::styled(prefix, style.add_modifier(Modifier::BOLD)),
                Span::styled(first_line, Style::default().fg(Color::White)),
            ]));

            for line in content_lines.into_iter().skip(1) {
                lines.push(Line::from(vec![
                    Span::styled("    ", Style::default()),
                    Span::styled(line, Style::default().fg(Color::White)),
                ]));
            }
            lines.push(Line::from(""));
        }
        Text::from(lines)
    };

    let chat_widget = Paragraph::new(content)
        .block(
            Block::bordered()
                .title("💬 Chat with AI (↑/↓ to scroll)")
                .border_type(BorderType::Rounded),
        )
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));
    chat_widget.render(area, buf);
}
