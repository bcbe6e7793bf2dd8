use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Paragraph, Widget},
};

use crate::app::App;
use crate::database::Role;
use crate::ui::{centered_rect, style};

pub fn render_role_select(app: &App, area: Rect, buf: &mut Buffer) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Welcome
            Constraint::Length(3), // Help
        ])
        .split(area);

    let popup = centered_rect(60, 60, main_layout[0]);

    let lawyer_selected = app.role_cursor == Role::Lawyer;
    let civilian_selected = app.role_cursor == Role::Civilian;

    let content = Text::from(vec![
        Line::from(Span::styled(
            "⚖ Welcome to AI Legal Assistant",
            Style::default().fg(Color::Green).bold(),
        )),
        Line::from(""),
        Line::from("Select your role to continue:"),
        Line::from(""),
        Line::from(Span::styled(
            format!("{}👨‍⚖ Lawyer", style::selection_marker(lawyer_selected)),
            style::selection_style(lawyer_selected),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{}👩‍💼 Civilian", style::selection_marker(civilian_selected)),
            style::selection_style(civilian_selected),
        )),
    ]);

    let welcome = Paragraph::new(content)
        .block(
            Block::bordered()
                .title("AI Legal Assistant")
                .title_alignment(Alignment::Center)
                .border_type(BorderType::Rounded),
        )
        .alignment(Alignment::Center);
    welcome.render(popup, buf);

    let help = Paragraph::new("↑/↓: Choose role • Enter: Continue • 'q': Quit")
        .block(
            Block::bordered()
                .title("Controls")
                .border_type(BorderType::Rounded),
        )
        .fg(Color::Yellow)
        .alignment(Alignment::Center);
    help.render(main_layout[1], buf);
}
