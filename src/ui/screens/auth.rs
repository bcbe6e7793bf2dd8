use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Widget},
};

use crate::app::{App, AuthChoice, AuthField};
use crate::ui::{render_status, style};

pub fn render_auth(app: &App, area: Rect, buf: &mut Buffer) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Login / Register switch
            Constraint::Length(3), // Username
            Constraint::Length(3), // Password
            Constraint::Length(3), // Email (register only)
            Constraint::Length(3), // Status
            Constraint::Min(0),
            Constraint::Length(3), // Help
        ])
        .split(area);

    let role_title = app.session.role.map(|role| role.title()).unwrap_or("User");
    let title = Paragraph::new(format!("🔐 {} Login / Register", role_title))
        .block(
            Block::bordered()
                .title("Sign In")
                .title_alignment(Alignment::Center)
                .border_type(BorderType::Rounded),
        )
        .fg(Color::Green)
        .alignment(Alignment::Center);
    title.render(main_layout[0], buf);

    let login_style = choice_style(app.auth.choice == AuthChoice::Login);
    let register_style = choice_style(app.auth.choice == AuthChoice::Register);
    let choice_line = Line::from(vec![
        Span::styled(" Login ", login_style),
        Span::raw("  |  "),
        Span::styled(" Register ", register_style),
    ]);
    let choice = Paragraph::new(choice_line)
        .block(
            Block::bordered()
                .title("Choose an option (Tab to switch)")
                .border_type(BorderType::Rounded),
        )
        .alignment(Alignment::Center);
    choice.render(main_layout[1], buf);

    render_field(
        "Username",
        &app.auth.username,
        app.auth.focus == AuthField::Username,
        main_layout[2],
        buf,
    );

    let masked: String = "*".repeat(app.auth.password.chars().count());
    render_field(
        "Password",
        &masked,
        app.auth.focus == AuthField::Password,
        main_layout[3],
        buf,
    );

    if app.auth.choice == AuthChoice::Register {
        render_field(
            "Email",
            &app.auth.email,
            app.auth.focus == AuthField::Email,
            main_layout[4],
            buf,
        );
    }

    render_status(app, main_layout[5], buf);

    let help = Paragraph::new("↑/↓: Field • Tab: Login/Register • Enter: Submit • Esc: Back")
        .block(
            Block::bordered()
                .title("Controls")
                .border_type(BorderType::Rounded),
        )
        .fg(Color::Yellow)
        .alignment(Alignment::Center);
    help.render(main_layout[7], buf);
}

fn choice_style(is_active: bool) -> Style {
    if is_active {
        Style::default().fg(Color::Yellow).bold().underlined()
    } else {
        Style::default().fg(Color::White)
    }
}

/// One-line input box with a focus-highlighted border.
pub(crate) fn render_field(label: &str, value: &str, focused: bool, area: Rect, buf: &mut Buffer) {
    let field = Paragraph::new(value).block(
        Block::bordered()
            .title(label)
            .border_type(BorderType::Rounded)
            .border_style(style::focus_style(focused)),
    );
    field.render(area, buf);
}
