pub mod screens;
pub mod style;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Stylize,
    widgets::{Block, BorderType, Paragraph, Widget},
};

use crate::app::{App, AppMode};
use crate::ui::screens::auth::render_auth;
use crate::ui::screens::chat::render_chat;
use crate::ui::screens::conversations::render_conversations;
use crate::ui::screens::document::render_document;
use crate::ui::screens::reminders::{render_reminder_form, render_reminder_list};
use crate::ui::screens::role_select::render_role_select;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.mode {
            AppMode::RoleSelect => render_role_select(self, area, buf),
            AppMode::Auth => render_auth(self, area, buf),
            AppMode::Chat => render_chat(self, area, buf),
            AppMode::Conversations => render_conversations(self, area, buf),
            AppMode::DocumentReview => render_document(self, area, buf),
            AppMode::ReminderForm => render_reminder_form(self, area, buf),
            AppMode::ReminderList => render_reminder_list(self, area, buf),
        }
    }
}

/// Renders the one-line status feedback, or nothing when there is none.
pub(crate) fn render_status(app: &App, area: Rect, buf: &mut Buffer) {
    if let Some(status) = &app.status {
        let status_widget = Paragraph::new(status.text.as_str())
            .block(
                Block::bordered()
                    .title("Status")
                    .border_type(BorderType::Rounded),
            )
            .fg(style::status_color(status.kind));
        status_widget.render(area, buf);
    }
}

pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
