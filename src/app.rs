use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use color_eyre::Result;
use ratatui::{
    crossterm::event::{KeyCode, KeyEvent, KeyModifiers},
    DefaultTerminal,
};
use tracing::{info, warn};

use crate::config::Config;
use crate::database::{ConversationTitle, Database, RegisterOutcome, Reminder, Role};
use crate::event::{AppEvent, Event, EventHandler};
use crate::extract::DocumentExtractor;
use crate::llm::{AnswerEngine, AnswerStrategy};
use crate::notify::Mailer;
use crate::report;
use crate::session::SessionState;

/// Current screen. Role selection and login precede every session;
/// the rest are reachable only while logged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    RoleSelect,
    Auth,
    Chat,
    Conversations,
    DocumentReview,
    ReminderForm,
    ReminderList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthChoice {
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Username,
    Password,
    Email,
}

/// Login / register form state.
#[derive(Debug, Clone)]
pub struct AuthForm {
    pub choice: AuthChoice,
    pub username: String,
    pub password: String,
    pub email: String,
    pub focus: AuthField,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self {
            choice: AuthChoice::Login,
            username: String::new(),
            password: String::new(),
            email: String::new(),
            focus: AuthField::Username,
        }
    }
}

impl AuthForm {
    fn toggle_choice(&mut self) {
        self.choice = match self.choice {
            AuthChoice::Login => AuthChoice::Register,
            AuthChoice::Register => AuthChoice::Login,
        };
        // The email field only exists while registering.
        if self.choice == AuthChoice::Login && self.focus == AuthField::Email {
            self.focus = AuthField::Password;
        }
    }

    fn focus_next(&mut self) {
        self.focus = match (self.focus, self.choice) {
            (AuthField::Username, _) => AuthField::Password,
            (AuthField::Password, AuthChoice::Register) => AuthField::Email,
            (AuthField::Password, AuthChoice::Login) => AuthField::Username,
            (AuthField::Email, _) => AuthField::Username,
        };
    }

    fn focus_prev(&mut self) {
        self.focus = match (self.focus, self.choice) {
            (AuthField::Username, AuthChoice::Register) => AuthField::Email,
            (AuthField::Username, AuthChoice::Login) => AuthField::Password,
            (AuthField::Password, _) => AuthField::Username,
            (AuthField::Email, _) => AuthField::Password,
        };
    }

    fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            AuthField::Username => &mut self.username,
            AuthField::Password => &mut self.password,
            AuthField::Email => &mut self.email,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderField {
    CaseNumber,
    ClientEmail,
    LawyerEmail,
    DeadlineDate,
    Message,
}

/// Case reminder form state. The deadline is edited as YYYY-MM-DD text
/// and validated on submit.
#[derive(Debug, Clone)]
pub struct ReminderForm {
    pub case_number: String,
    pub client_email: String,
    pub lawyer_email: String,
    pub deadline_date: String,
    pub message: String,
    pub focus: ReminderField,
}

impl Default for ReminderForm {
    fn default() -> Self {
        Self {
            case_number: String::new(),
            client_email: String::new(),
            lawyer_email: String::new(),
            deadline_date: String::new(),
            message: String::new(),
            focus: ReminderField::CaseNumber,
        }
    }
}

impl ReminderForm {
    fn focus_next(&mut self) {
        self.focus = match self.focus {
            ReminderField::CaseNumber => ReminderField::ClientEmail,
            ReminderField::ClientEmail => ReminderField::LawyerEmail,
            ReminderField::LawyerEmail => ReminderField::DeadlineDate,
            ReminderField::DeadlineDate => ReminderField::Message,
            ReminderField::Message => ReminderField::CaseNumber,
        };
    }

    fn focus_prev(&mut self) {
        self.focus = match self.focus {
            ReminderField::CaseNumber => ReminderField::Message,
            ReminderField::ClientEmail => ReminderField::CaseNumber,
            ReminderField::LawyerEmail => ReminderField::ClientEmail,
            ReminderField::DeadlineDate => ReminderField::LawyerEmail,
            ReminderField::Message => ReminderField::DeadlineDate,
        };
    }

    fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            ReminderField::CaseNumber => &mut self.case_number,
            ReminderField::ClientEmail => &mut self.client_email,
            ReminderField::LawyerEmail => &mut self.lawyer_email,
            ReminderField::DeadlineDate => &mut self.deadline_date,
            ReminderField::Message => &mut self.message,
        }
    }
}

/// Document review progresses from a path prompt through extracted
/// text to the model's analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentPhase {
    EnterPath,
    Extracted,
    Analyzed,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentReview {
    pub path_input: String,
    pub extracted_text: Option<String>,
    pub analysis: Option<String>,
    pub scroll: u16,
}

impl DocumentReview {
    pub fn phase(&self) -> DocumentPhase {
        if self.analysis.is_some() {
            DocumentPhase::Analyzed
        } else if self.extracted_text.is_some() {
            DocumentPhase::Extracted
        } else {
            DocumentPhase::EnterPath
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// One-line feedback shown at the bottom of the active screen.
#[derive(Debug, Clone)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

/// Application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    pub running: bool,
    /// Current app mode/screen
    pub mode: AppMode,
    /// Per-login session state
    pub session: SessionState,
    /// Account, history, and reminder storage
    pub database: Database,
    /// Gated chat answers and document analysis
    pub answer_engine: AnswerEngine,
    /// PDF text extraction with OCR fallback
    pub extractor: DocumentExtractor,
    /// Reminder email delivery
    pub mailer: Mailer,
    /// Event handler.
    pub events: EventHandler,

    pub role_cursor: Role,
    pub auth: AuthForm,
    pub chat_input: String,
    pub chat_scroll: u16,
    pub conversations: Vec<ConversationTitle>,
    pub conversation_cursor: usize,
    pub reminder_form: ReminderForm,
    pub reminders: Vec<Reminder>,
    pub reminder_cursor: usize,
    pub document: DocumentReview,
    pub status: Option<StatusLine>,
}

impl App {
    /// Constructs a new instance of [`App`] from the environment.
    pub async fn new() -> Result<Self> {
        Self::with_config(Config::from_env())
    }

    /// Constructs an [`App`] against an explicit configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        let database = Database::open(&config.database_path)?;
        let strategy = AnswerStrategy::from_config(&config);
        let answer_engine = AnswerEngine::new(strategy, database.clone());
        let extractor = DocumentExtractor::new(config.ocr_api_key.clone());
        let mailer = Mailer::from_config(&config);

        info!(
            model = answer_engine.model_info(),
            simulated_mail = mailer.is_simulated(),
            "assistant initialized"
        );

        Ok(Self {
            running: true,
            mode: AppMode::RoleSelect,
            session: SessionState::default(),
            database,
            answer_engine,
            extractor,
            mailer,
            events: EventHandler::new(),
            role_cursor: Role::Lawyer,
            auth: AuthForm::default(),
            chat_input: String::new(),
            chat_scroll: 0,
            conversations: Vec::new(),
            conversation_cursor: 0,
            reminder_form: ReminderForm::default(),
            reminders: Vec::new(),
            reminder_cursor: 0,
            document: DocumentReview::default(),
            status: None,
        })
    }

    /// Run the application's main loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        let mut needs_redraw = true;

        while self.running {
            if needs_redraw {
                terminal.draw(|frame| frame.render_widget(&self, frame.area()))?;
                needs_redraw = false;
            }

            match self.events.next().await {
                Ok(Event::Tick) => self.tick(),
                Ok(Event::Crossterm(event)) => {
                    if let crossterm::event::Event::Key(key_event) = event {
                        self.handle_key_events(key_event)?;
                        needs_redraw = true;
                    }
                }
                Ok(Event::App(app_event)) => {
                    self.handle_app_event(app_event).await;
                    needs_redraw = true;
                }
                Err(e) => warn!(error = %e, "event channel error"),
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    pub fn handle_key_events(&mut self, key_event: KeyEvent) -> Result<()> {
        // Ctrl-C quits from anywhere, even mid-typing.
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key_event.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            self.events.send(AppEvent::Quit);
            return Ok(());
        }

        match self.mode {
            AppMode::RoleSelect => match key_event.code {
                KeyCode::Esc | KeyCode::Char('q') => self.events.send(AppEvent::Quit),
                KeyCode::Up | KeyCode::Left => self.events.send(AppEvent::MoveUp),
                KeyCode::Down | KeyCode::Right | KeyCode::Tab => {
                    self.events.send(AppEvent::MoveDown)
                }
                KeyCode::Enter => self.events.send(AppEvent::Select),
                _ => {}
            },
            AppMode::Auth => match key_event.code {
                KeyCode::Esc => self.events.send(AppEvent::Back),
                KeyCode::Tab => self.events.send(AppEvent::ToggleAuthChoice),
                KeyCode::Up => self.events.send(AppEvent::MoveUp),
                KeyCode::Down => self.events.send(AppEvent::MoveDown),
                KeyCode::Enter => self.events.send(AppEvent::Submit),
                KeyCode::Backspace => self.events.send(AppEvent::Backspace),
                KeyCode::Char(ch) => self.events.send(AppEvent::Input(ch)),
                _ => {}
            },
            AppMode::Chat => {
                if key_event.modifiers.contains(KeyModifiers::CONTROL) {
                    match key_event.code {
                        KeyCode::Char('n') => self.events.send(AppEvent::NewChat),
                        KeyCode::Char('h') => self.events.send(AppEvent::OpenConversations),
                        KeyCode::Char('d') => self.events.send(AppEvent::OpenDocumentReview),
                        KeyCode::Char('r') => self.events.send(AppEvent::OpenReminderForm),
                        KeyCode::Char('l') => self.events.send(AppEvent::OpenReminderList),
                        _ => {}
                    }
                    return Ok(());
                }
                match key_event.code {
                    KeyCode::Esc => self.events.send(AppEvent::Logout),
                    KeyCode::Enter => self.events.send(AppEvent::Submit),
                    KeyCode::Backspace => self.events.send(AppEvent::Backspace),
                    KeyCode::Up | KeyCode::PageUp => self.events.send(AppEvent::ScrollUp),
                    KeyCode::Down | KeyCode::PageDown => self.events.send(AppEvent::ScrollDown),
                    KeyCode::Char(ch) => self.events.send(AppEvent::Input(ch)),
                    _ => {}
                }
            }
            AppMode::Conversations => match key_event.code {
                KeyCode::Esc => self.events.send(AppEvent::Back),
                KeyCode::Up => self.events.send(AppEvent::MoveUp),
                KeyCode::Down => self.events.send(AppEvent::MoveDown),
                KeyCode::Enter => self.events.send(AppEvent::Select),
                _ => {}
            },
            AppMode::DocumentReview => match self.document.phase() {
                DocumentPhase::EnterPath => match key_event.code {
                    KeyCode::Esc => self.events.send(AppEvent::Back),
                    KeyCode::Enter => self.events.send(AppEvent::Submit),
                    KeyCode::Backspace => self.events.send(AppEvent::Backspace),
                    KeyCode::Char(ch) => self.events.send(AppEvent::Input(ch)),
                    _ => {}
                },
                DocumentPhase::Extracted => match key_event.code {
                    KeyCode::Esc => self.events.send(AppEvent::Back),
                    KeyCode::Char('a') => self.events.send(AppEvent::Analyze),
                    KeyCode::Up | KeyCode::PageUp => self.events.send(AppEvent::ScrollUp),
                    KeyCode::Down | KeyCode::PageDown => self.events.send(AppEvent::ScrollDown),
                    _ => {}
                },
                DocumentPhase::Analyzed => match key_event.code {
                    KeyCode::Esc => self.events.send(AppEvent::Back),
                    KeyCode::Char('s') => self.events.send(AppEvent::SaveReport),
                    KeyCode::Up | KeyCode::PageUp => self.events.send(AppEvent::ScrollUp),
                    KeyCode::Down | KeyCode::PageDown => self.events.send(AppEvent::ScrollDown),
                    _ => {}
                },
            },
            AppMode::ReminderForm => match key_event.code {
                KeyCode::Esc => self.events.send(AppEvent::Back),
                KeyCode::Up => self.events.send(AppEvent::MoveUp),
                KeyCode::Down | KeyCode::Tab => self.events.send(AppEvent::MoveDown),
                KeyCode::Enter => self.events.send(AppEvent::Submit),
                KeyCode::Backspace => self.events.send(AppEvent::Backspace),
                KeyCode::Char(ch) => self.events.send(AppEvent::Input(ch)),
                _ => {}
            },
            AppMode::ReminderList => match key_event.code {
                KeyCode::Esc => self.events.send(AppEvent::Back),
                KeyCode::Up => self.events.send(AppEvent::MoveUp),
                KeyCode::Down => self.events.send(AppEvent::MoveDown),
                KeyCode::Char('d') | KeyCode::Delete => {
                    self.events.send(AppEvent::DeleteReminder)
                }
                KeyCode::Char('n') => self.events.send(AppEvent::OpenReminderForm),
                _ => {}
            },
        }
        Ok(())
    }

    async fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::MoveUp => self.move_up(),
            AppEvent::MoveDown => self.move_down(),
            AppEvent::Select => self.select(),
            AppEvent::Back => self.back(),
            AppEvent::ScrollUp => self.scroll_up(),
            AppEvent::ScrollDown => self.scroll_down(),
            AppEvent::Input(ch) => self.input_char(ch),
            AppEvent::Backspace => self.input_backspace(),
            AppEvent::ToggleAuthChoice => self.auth.toggle_choice(),
            AppEvent::Submit => self.submit().await,
            AppEvent::NewChat => self.start_new_chat(),
            AppEvent::OpenConversations => self.open_conversations(),
            AppEvent::Logout => self.logout(),
            AppEvent::OpenDocumentReview => self.open_document_review(),
            AppEvent::OpenReminderForm => self.open_reminder_form(),
            AppEvent::OpenReminderList => self.open_reminder_list(),
            AppEvent::DeleteReminder => self.delete_selected_reminder(),
            AppEvent::Analyze => self.analyze_document().await,
            AppEvent::SaveReport => self.save_report(),
            AppEvent::Quit => self.quit(),
        }
    }

    /// Handles the tick event of the terminal.
    pub fn tick(&self) {}

    /// Set running to false to quit the application.
    pub fn quit(&mut self) {
        self.running = false;
    }

    fn move_up(&mut self) {
        match self.mode {
            AppMode::RoleSelect => self.toggle_role_cursor(),
            AppMode::Auth => self.auth.focus_prev(),
            AppMode::Conversations => {
                self.conversation_cursor = self.conversation_cursor.saturating_sub(1);
            }
            AppMode::ReminderForm => self.reminder_form.focus_prev(),
            AppMode::ReminderList => {
                self.reminder_cursor = self.reminder_cursor.saturating_sub(1);
            }
            _ => {}
        }
    }

    fn move_down(&mut self) {
        match self.mode {
            AppMode::RoleSelect => self.toggle_role_cursor(),
            AppMode::Auth => self.auth.focus_next(),
            AppMode::Conversations => {
                if self.conversation_cursor + 1 < self.conversations.len() {
                    self.conversation_cursor += 1;
                }
            }
            AppMode::ReminderForm => self.reminder_form.focus_next(),
            AppMode::ReminderList => {
                if self.reminder_cursor + 1 < self.reminders.len() {
                    self.reminder_cursor += 1;
                }
            }
            _ => {}
        }
    }

    fn toggle_role_cursor(&mut self) {
        self.role_cursor = match self.role_cursor {
            Role::Lawyer => Role::Civilian,
            Role::Civilian => Role::Lawyer,
        };
    }

    fn select(&mut self) {
        match self.mode {
            AppMode::RoleSelect => {
                self.session.role = Some(self.role_cursor);
                self.auth = AuthForm::default();
                self.status = None;
                self.mode = AppMode::Auth;
            }
            AppMode::Conversations => self.resume_selected_conversation(),
            _ => {}
        }
    }

    fn back(&mut self) {
        match self.mode {
            AppMode::Auth => {
                self.session.role = None;
                self.auth = AuthForm::default();
                self.status = None;
                self.mode = AppMode::RoleSelect;
            }
            AppMode::Conversations
            | AppMode::DocumentReview
            | AppMode::ReminderForm
            | AppMode::ReminderList => {
                self.document = DocumentReview::default();
                self.reminder_form = ReminderForm::default();
                self.status = None;
                self.mode = AppMode::Chat;
            }
            _ => {}
        }
    }

    fn scroll_up(&mut self) {
        match self.mode {
            AppMode::Chat => self.chat_scroll = self.chat_scroll.saturating_sub(1),
            AppMode::DocumentReview => {
                self.document.scroll = self.document.scroll.saturating_sub(1);
            }
            _ => {}
        }
    }

    fn scroll_down(&mut self) {
        match self.mode {
            AppMode::Chat => {
                if (self.chat_scroll as usize) < self.chat_line_count() {
                    self.chat_scroll = self.chat_scroll.saturating_add(1);
                }
            }
            AppMode::DocumentReview => {
                self.document.scroll = self.document.scroll.saturating_add(1);
            }
            _ => {}
        }
    }

    /// Unwrapped transcript line count, used to bound scrolling and to
    /// anchor the view near the newest exchange.
    fn chat_line_count(&self) -> usize {
        self.session
            .messages
            .iter()
            .map(|turn| turn.content.lines().count().max(1) + 1)
            .sum()
    }

    fn input_char(&mut self, ch: char) {
        match self.mode {
            AppMode::Auth => self.auth.focused_value_mut().push(ch),
            AppMode::Chat => self.chat_input.push(ch),
            AppMode::DocumentReview => self.document.path_input.push(ch),
            AppMode::ReminderForm => self.reminder_form.focused_value_mut().push(ch),
            _ => {}
        }
    }

    fn input_backspace(&mut self) {
        match self.mode {
            AppMode::Auth => {
                self.auth.focused_value_mut().pop();
            }
            AppMode::Chat => {
                self.chat_input.pop();
            }
            AppMode::DocumentReview => {
                self.document.path_input.pop();
            }
            AppMode::ReminderForm => {
                self.reminder_form.focused_value_mut().pop();
            }
            _ => {}
        }
    }

    async fn submit(&mut self) {
        match self.mode {
            AppMode::Auth => self.submit_auth(),
            AppMode::Chat => self.submit_chat_message().await,
            AppMode::DocumentReview => {
                if self.document.phase() == DocumentPhase::EnterPath {
                    self.extract_document().await;
                }
            }
            AppMode::ReminderForm => self.submit_reminder(),
            _ => {}
        }
    }

    fn submit_auth(&mut self) {
        let role = match self.session.role {
            Some(role) => role,
            None => {
                self.mode = AppMode::RoleSelect;
                return;
            }
        };

        let username = self.auth.username.trim().to_string();
        let password = self.auth.password.clone();
        if username.is_empty() || password.is_empty() {
            self.status = Some(StatusLine::error("Please fill in username and password."));
            return;
        }

        match self.auth.choice {
            AuthChoice::Register => {
                let email = self.auth.email.trim().to_string();
                let email = if email.is_empty() {
                    None
                } else {
                    Some(email)
                };
                match self
                    .database
                    .register_user(&username, &password, role, email.as_deref())
                {
                    Ok(RegisterOutcome::Created) => {
                        info!(username, role = role.as_str(), "registered new account");
                        self.status = Some(StatusLine::success(
                            "✅ Registration successful! Please login.",
                        ));
                        self.auth.choice = AuthChoice::Login;
                        self.auth.password.clear();
                        self.auth.focus = AuthField::Password;
                    }
                    Ok(RegisterOutcome::UsernameTaken) => {
                        self.status = Some(StatusLine::error("⚠ Username already exists"));
                    }
                    Err(e) => {
                        warn!(error = %e, "registration failed");
                        self.status = Some(StatusLine::error(format!("Registration failed: {}", e)));
                    }
                }
            }
            AuthChoice::Login => match self.database.login_user(&username, &password) {
                Ok(Some(record)) if Role::parse(&record.role) == Some(role) => {
                    info!(username, role = role.as_str(), "login");
                    self.session.begin(username, record.email);
                    self.chat_input.clear();
                    self.chat_scroll = 0;
                    self.status = None;
                    self.mode = AppMode::Chat;
                }
                Ok(_) => {
                    self.status =
                        Some(StatusLine::error("❌ Invalid username/password or role"));
                }
                Err(e) => {
                    warn!(error = %e, "login failed");
                    self.status = Some(StatusLine::error(format!("Login failed: {}", e)));
                }
            },
        }
    }

    async fn submit_chat_message(&mut self) {
        if self.chat_input.trim().is_empty() {
            return;
        }
        let (username, role) = match (self.session.username.clone(), self.session.role) {
            (Some(username), Some(role)) => (username, role),
            _ => return,
        };

        let question = self.chat_input.clone();
        self.chat_input.clear();
        let conversation_id = self.session.ensure_conversation_id().to_string();

        // Anchor the view where the new exchange starts.
        self.chat_scroll = self.chat_line_count().min(u16::MAX as usize) as u16;
        self.session.push_turn(true, question.clone());

        match self
            .answer_engine
            .answer_chat(&username, role, &conversation_id, &question)
            .await
        {
            Ok(answer) => {
                self.session.push_turn(false, answer);
                self.status = None;
            }
            Err(e) => {
                warn!(error = %e, "chat exchange failed");
                self.status = Some(StatusLine::error(format!("Could not save message: {}", e)));
            }
        }
    }

    fn start_new_chat(&mut self) {
        self.session.start_new_conversation();
        self.chat_input.clear();
        self.chat_scroll = 0;
        self.status = None;
        self.mode = AppMode::Chat;
    }

    fn open_conversations(&mut self) {
        let username = match self.session.username.clone() {
            Some(username) => username,
            None => return,
        };
        match self.database.conversation_titles(&username) {
            Ok(titles) => {
                self.conversations = titles;
                self.conversation_cursor = 0;
                self.status = None;
                self.mode = AppMode::Conversations;
            }
            Err(e) => {
                warn!(error = %e, "failed to load conversation titles");
                self.status = Some(StatusLine::error(format!("Could not load history: {}", e)));
            }
        }
    }

    fn resume_selected_conversation(&mut self) {
        let conversation_id = match self.conversations.get(self.conversation_cursor) {
            Some(entry) => entry.conversation_id.clone(),
            None => return,
        };
        match self.database.messages_by_conversation(&conversation_id) {
            Ok(messages) => {
                self.session.resume_conversation(conversation_id, messages);
                self.chat_scroll = 0;
                self.status = None;
                self.mode = AppMode::Chat;
            }
            Err(e) => {
                warn!(error = %e, "failed to load conversation");
                self.status = Some(StatusLine::error(format!(
                    "Could not load conversation: {}",
                    e
                )));
            }
        }
    }

    fn logout(&mut self) {
        info!("logout");
        self.session.reset();
        self.chat_input.clear();
        self.chat_scroll = 0;
        self.conversations.clear();
        self.conversation_cursor = 0;
        self.reminders.clear();
        self.reminder_cursor = 0;
        self.reminder_form = ReminderForm::default();
        self.document = DocumentReview::default();
        self.auth = AuthForm::default();
        self.status = None;
        self.mode = AppMode::RoleSelect;
    }

    fn require_lawyer(&mut self) -> bool {
        if self.session.role == Some(Role::Lawyer) {
            true
        } else {
            self.status = Some(StatusLine::error("Lawyer access only."));
            false
        }
    }

    fn open_document_review(&mut self) {
        if !self.require_lawyer() {
            return;
        }
        self.document = DocumentReview::default();
        self.status = None;
        self.mode = AppMode::DocumentReview;
    }

    fn open_reminder_form(&mut self) {
        if !self.require_lawyer() {
            return;
        }
        self.reminder_form = ReminderForm {
            lawyer_email: self.session.user_email.clone(),
            ..ReminderForm::default()
        };
        self.status = None;
        self.mode = AppMode::ReminderForm;
    }

    fn open_reminder_list(&mut self) {
        if !self.require_lawyer() {
            return;
        }
        match self.database.all_reminders() {
            Ok(reminders) => {
                self.reminders = reminders;
                self.reminder_cursor = 0;
                self.status = None;
                self.mode = AppMode::ReminderList;
            }
            Err(e) => {
                warn!(error = %e, "failed to load reminders");
                self.status = Some(StatusLine::error(format!("Could not load reminders: {}", e)));
            }
        }
    }

    fn delete_selected_reminder(&mut self) {
        let reminder_id = match self.reminders.get(self.reminder_cursor) {
            Some(reminder) => reminder.id,
            None => return,
        };
        match self.database.delete_reminder(reminder_id) {
            Ok(true) => {
                self.status = Some(StatusLine::success("Reminder deleted."));
            }
            Ok(false) => {
                self.status = Some(StatusLine::error("Reminder was already gone."));
            }
            Err(e) => {
                warn!(error = %e, "failed to delete reminder");
                self.status = Some(StatusLine::error(format!("Delete failed: {}", e)));
                return;
            }
        }
        if let Ok(reminders) = self.database.all_reminders() {
            self.reminders = reminders;
            self.reminder_cursor = self
                .reminder_cursor
                .min(self.reminders.len().saturating_sub(1));
        }
    }

    async fn extract_document(&mut self) {
        let path_text = self.document.path_input.trim().to_string();
        if path_text.is_empty() {
            self.status = Some(StatusLine::error("Enter the path to a PDF file."));
            return;
        }

        match self.extractor.extract_path(Path::new(&path_text)).await {
            Ok(text) => {
                if text.trim().is_empty() {
                    self.status = Some(StatusLine::info(
                        "No text could be extracted from this PDF.",
                    ));
                } else {
                    self.document.extracted_text = Some(text);
                    self.document.scroll = 0;
                    self.status = Some(StatusLine::success("✅ Text extracted successfully!"));
                }
            }
            Err(e) => {
                warn!(path = %path_text, error = %e, "extraction failed");
                self.status = Some(StatusLine::error(format!("Error reading PDF: {}", e)));
            }
        }
    }

    async fn analyze_document(&mut self) {
        let text = match self.document.extracted_text.clone() {
            Some(text) => text,
            None => return,
        };

        match self.answer_engine.analyze_document(&text).await {
            Ok(analysis) => {
                self.document.analysis = Some(analysis);
                self.document.scroll = 0;
                self.status = Some(StatusLine::success(
                    "Analysis ready. Press 's' to save the report.",
                ));
            }
            Err(e) => {
                warn!(error = %e, "document analysis failed");
                self.status = Some(StatusLine::error("❌ Could not analyze document."));
            }
        }
    }

    fn save_report(&mut self) {
        let analysis = match &self.document.analysis {
            Some(analysis) => analysis.clone(),
            None => return,
        };
        // The report lands next to the reviewed document.
        let target = Path::new(self.document.path_input.trim())
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(|parent| parent.join(report::REPORT_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(report::REPORT_FILE_NAME));
        match report::save_report(&analysis, &target) {
            Ok(()) => {
                self.status = Some(StatusLine::success(format!(
                    "⬇ Report saved to {}",
                    target.display()
                )));
            }
            Err(e) => {
                warn!(error = %e, "failed to save report");
                self.status = Some(StatusLine::error(format!("Could not save report: {}", e)));
            }
        }
    }

    fn submit_reminder(&mut self) {
        let form = self.reminder_form.clone();
        let case_number = form.case_number.trim();
        let client_email = form.client_email.trim();
        let lawyer_email = form.lawyer_email.trim();
        let deadline_text = form.deadline_date.trim();

        if case_number.is_empty()
            || client_email.is_empty()
            || lawyer_email.is_empty()
            || deadline_text.is_empty()
        {
            self.status = Some(StatusLine::error("⚠ Please fill in all required fields."));
            return;
        }

        let deadline = match NaiveDate::parse_from_str(deadline_text, "%Y-%m-%d") {
            Ok(deadline) => deadline,
            Err(_) => {
                self.status = Some(StatusLine::error(
                    "⚠ Deadline must be a valid date (YYYY-MM-DD).",
                ));
                return;
            }
        };
        if deadline < Local::now().date_naive() {
            self.status = Some(StatusLine::error("⚠ Deadline date cannot be in the past."));
            return;
        }

        let saved = self.database.save_reminder(
            case_number,
            client_email,
            lawyer_email,
            &deadline.format("%Y-%m-%d").to_string(),
            form.message.trim(),
        );
        if let Err(e) = saved {
            warn!(error = %e, "failed to save reminder");
            self.status = Some(StatusLine::error("❌ Failed to save reminder."));
            return;
        }

        let emails_sent = self.mailer.send_reminder_emails(
            case_number,
            client_email,
            lawyer_email,
            deadline,
            form.message.trim(),
        );
        if emails_sent {
            self.status = Some(StatusLine::success(
                "📧 Reminder saved & emails sent (or simulated).",
            ));
            self.reminder_form = ReminderForm::default();
            self.mode = AppMode::Chat;
        } else {
            self.status = Some(StatusLine::error(
                "❌ Failed to send reminder emails (check SMTP settings).",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_app(dir: &tempfile::TempDir) -> App {
        let config = Config {
            database_path: dir.path().join("users.db").display().to_string(),
            ..Config::default()
        };
        App::with_config(config).unwrap()
    }

    #[test]
    fn login_form_skips_the_email_field() {
        let mut form = AuthForm::default();
        assert_eq!(form.choice, AuthChoice::Login);
        assert_eq!(form.focus, AuthField::Username);

        form.focus_next();
        assert_eq!(form.focus, AuthField::Password);
        form.focus_next();
        assert_eq!(form.focus, AuthField::Username);
        form.focus_prev();
        assert_eq!(form.focus, AuthField::Password);
    }

    #[test]
    fn register_form_cycles_through_email() {
        let mut form = AuthForm::default();
        form.toggle_choice();
        assert_eq!(form.choice, AuthChoice::Register);

        form.focus_next();
        form.focus_next();
        assert_eq!(form.focus, AuthField::Email);
        form.focus_next();
        assert_eq!(form.focus, AuthField::Username);
    }

    #[test]
    fn switching_back_to_login_leaves_the_email_field() {
        let mut form = AuthForm::default();
        form.toggle_choice();
        form.focus = AuthField::Email;

        form.toggle_choice();
        assert_eq!(form.choice, AuthChoice::Login);
        assert_eq!(form.focus, AuthField::Password);
    }

    #[test]
    fn typed_characters_land_in_the_focused_field() {
        let mut form = AuthForm::default();
        form.focused_value_mut().push('a');
        form.focus_next();
        form.focused_value_mut().push('b');
        assert_eq!(form.username, "a");
        assert_eq!(form.password, "b");
    }

    #[test]
    fn reminder_form_cycles_all_fields() {
        let mut form = ReminderForm::default();
        let order = [
            ReminderField::CaseNumber,
            ReminderField::ClientEmail,
            ReminderField::LawyerEmail,
            ReminderField::DeadlineDate,
            ReminderField::Message,
            ReminderField::CaseNumber,
        ];
        for expected in order {
            assert_eq!(form.focus, expected);
            form.focus_next();
        }
        form.focus_prev();
        assert_eq!(form.focus, ReminderField::CaseNumber);
        form.focus_prev();
        assert_eq!(form.focus, ReminderField::Message);
    }

    #[test]
    fn document_review_phase_follows_its_contents() {
        let mut document = DocumentReview::default();
        assert_eq!(document.phase(), DocumentPhase::EnterPath);

        document.extracted_text = Some("SUMMONS".to_string());
        assert_eq!(document.phase(), DocumentPhase::Extracted);

        document.analysis = Some("This is a court summons.".to_string());
        assert_eq!(document.phase(), DocumentPhase::Analyzed);
    }

    #[test]
    fn status_line_constructors_tag_the_kind() {
        assert_eq!(StatusLine::info("a").kind, StatusKind::Info);
        assert_eq!(StatusLine::success("b").kind, StatusKind::Success);
        assert_eq!(StatusLine::error("c").kind, StatusKind::Error);
    }

    #[tokio::test]
    async fn login_with_the_wrong_role_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = temp_app(&dir);
        app.database
            .register_user("ravi", "pw", Role::Civilian, None)
            .unwrap();

        app.mode = AppMode::Auth;
        app.session.role = Some(Role::Lawyer);
        app.auth.username = "ravi".to_string();
        app.auth.password = "pw".to_string();
        app.submit_auth();

        assert_eq!(app.mode, AppMode::Auth);
        assert!(!app.session.logged_in());
        assert_eq!(
            app.status.as_ref().map(|status| status.text.as_str()),
            Some("❌ Invalid username/password or role")
        );

        // The same credentials succeed under the registered role.
        app.session.role = Some(Role::Civilian);
        app.submit_auth();
        assert_eq!(app.mode, AppMode::Chat);
        assert!(app.session.logged_in());
    }

    #[tokio::test]
    async fn chat_scroll_saturates_on_very_long_transcripts() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = temp_app(&dir);
        app.mode = AppMode::Chat;
        app.session.role = Some(Role::Civilian);
        app.session.username = Some("ravi".to_string());
        app.session.push_turn(false, "line\n".repeat(70_000));
        assert!(app.chat_line_count() > u16::MAX as usize);

        app.chat_scroll = u16::MAX;
        app.scroll_down();
        assert_eq!(app.chat_scroll, u16::MAX);

        // The anchor for a new exchange clamps instead of truncating.
        app.chat_input = "What is bail?".to_string();
        app.submit_chat_message().await;
        assert_eq!(app.chat_scroll, u16::MAX);
        assert_eq!(app.session.messages.len(), 3);
    }
}
