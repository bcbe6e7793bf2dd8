use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Paragraph, Widget},
};

use crate::app::{App, ReminderField};
use crate::ui::screens::auth::render_field;
use crate::ui::{render_status, style};

pub fn render_reminder_form(app: &App, area: Rect, buf: &mut Buffer) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Case number
            Constraint::Length(3), // Client email
            Constraint::Length(3), // Lawyer email
            Constraint::Length(3), // Deadline date
            Constraint::Length(3), // Message
            Constraint::Length(3), // Status
            Constraint::Min(0),
            Constraint::Length(3), // Help
        ])
        .split(area);

    let title = Paragraph::new("📝 Create Case Reminder")
        .block(
            Block::bordered()
                .title("Reminders")
                .title_alignment(Alignment::Center)
                .border_type(BorderType::Rounded),
        )
        .fg(Color::Green)
        .alignment(Alignment::Center);
    title.render(main_layout[0], buf);

    let form = &app.reminder_form;
    render_field(
        "Case Number *",
        &form.case_number,
        form.focus == ReminderField::CaseNumber,
        main_layout[1],
        buf,
    );
    render_field(
        "Client Email *",
        &form.client_email,
        form.focus == ReminderField::ClientEmail,
        main_layout[2],
        buf,
    );
    render_field(
        "Lawyer Email *",
        &form.lawyer_email,
        form.focus == ReminderField::LawyerEmail,
        main_layout[3],
        buf,
    );
    render_field(
        "Deadline Date * (YYYY-MM-DD)",
        &form.deadline_date,
        form.focus == ReminderField::DeadlineDate,
        main_layout[4],
        buf,
    );
    render_field(
        "Reminder Message (optional)",
        &form.message,
        form.focus == ReminderField::Message,
        main_layout[5],
        buf,
    );

    render_status(app, main_layout[6], buf);

    let help = Paragraph::new("↑/↓/Tab: Field • Enter: Save & Send • Esc: Cancel")
        .block(
            Block::bordered()
                .title("Controls")
                .border_type(BorderType::Rounded),
        )
        .fg(Color::Yellow)
        .alignment(Alignment::Center);
    help.render(main_layout[8], buf);
}

pub fn render_reminder_list(app: &App, area: Rect, buf: &mut Buffer) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(1),    // Reminder list
            Constraint::Length(3), // Status
            Constraint::Length(3), // Help
        ])
        .split(area);

    let title = Paragraph::new("🔔 Case Reminders")
        .block(
            Block::bordered()
                .title("Reminders")
                .title_alignment(Alignment::Center)
                .border_type(BorderType::Rounded),
        )
        .fg(Color::Green)
        .alignment(Alignment::Center);
    title.render(main_layout[0], buf);

    let content = if app.reminders.is_empty() {
        Text::from("No reminders saved.")
    } else {
        let mut lines = Vec::new();
        for (i, reminder) in app.reminders.iter().enumerate() {
            let selected = i == app.reminder_cursor;
            lines.push(Line::from(Span::styled(
                format!(
                    "{}📋 Case {}  due {}  client: {}",
                    style::selection_marker(selected),
                    reminder.case_number,
                    reminder.deadline_date,
                    reminder.client_email
                ),
                style::selection_style(selected),
            )));
            if !reminder.message.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("      {}", reminder.message),
                    Style::default().fg(Color::White),
                )));
            }
        }
        Text::from(lines)
    };

    let list = Paragraph::new(content).block(
        Block::bordered()
            .title("All reminders, soonest deadline first")
            .border_type(BorderType::Rounded),
    );
    list.render(main_layout[1], buf);

    render_status(app, main_layout[2], buf);

    let help = Paragraph::new("↑/↓: Select • 'd': Delete • 'n': New reminder • Esc: Back")
        .block(
            Block::bordered()
                .title("Controls")
                .border_type(BorderType::Rounded),
        )
        .fg(Color::Yellow)
        .alignment(Alignment::Center);
    help.render(main_layout[3], buf);
}
