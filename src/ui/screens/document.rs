use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Stylize},
    widgets::{Block, BorderType, Paragraph, Widget, Wrap},
};

use crate::app::{App, DocumentPhase};
use crate::ui::render_status;
use crate::ui::screens::auth::render_field;

pub fn render_document(app: &App, area: Rect, buf: &mut Buffer) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(1),    // Phase content
            Constraint::Length(3), // Status
            Constraint::Length(3), // Help
        ])
        .split(area);

    let title = Paragraph::new("📂 Upload Summon/Notice PDF")
        .block(
            Block::bordered()
                .title("Document Review")
                .title_alignment(Alignment::Center)
                .border_type(BorderType::Rounded),
        )
        .fg(Color::Green)
        .alignment(Alignment::Center);
    title.render(main_layout[0], buf);

    match app.document.phase() {
        DocumentPhase::EnterPath => render_path_prompt(app, main_layout[1], buf),
        DocumentPhase::Extracted => {
            let text = app.document.extracted_text.as_deref().unwrap_or_default();
            render_scrolled_text("Extracted Text (↑/↓ to scroll)", text, app, main_layout[1], buf);
        }
        DocumentPhase::Analyzed => {
            let text = app.document.analysis.as_deref().unwrap_or_default();
            render_scrolled_text("📑 AI Analysis (↑/↓ to scroll)", text, app, main_layout[1], buf);
        }
    }

    render_status(app, main_layout[2], buf);

    let help_text = match app.document.phase() {
        DocumentPhase::EnterPath => "Enter: Extract text • Esc: Back",
        DocumentPhase::Extracted => "'a': Analyze Document • ↑/↓: Scroll • Esc: Back",
        DocumentPhase::Analyzed => "'s': Save report as PDF • ↑/↓: Scroll • Esc: Back",
    };
    let help = Paragraph::new(help_text)
        .block(
            Block::bordered()
                .title("Controls")
                .border_type(BorderType::Rounded),
        )
        .fg(Color::Yellow)
        .alignment(Alignment::Center);
    help.render(main_layout[3], buf);
}

fn render_path_prompt(app: &App, area: Rect, buf: &mut Buffer) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_field("Path to PDF file", &app.document.path_input, true, layout[0], buf);
}

fn render_scrolled_text(title: &str, text: &str, app: &App, area: Rect, buf: &mut Buffer) {
    let body = Paragraph::new(text)
        .block(
            Block::bordered()
                .title(title)
                .border_type(BorderType::Rounded),
        )
        .wrap(Wrap { trim: true })
        .scroll((app.document.scroll, 0));
    body.render(area, buf);
}
