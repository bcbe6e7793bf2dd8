// src/session.rs
// Explicit per-login session state.

use uuid::Uuid;

use crate::database::{ChatTurn, Role};

/// Everything scoped to one login: the chosen role, who is signed in,
/// and the transcript of the active conversation. Logout replaces the
/// whole value with the default.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub role: Option<Role>,
    pub username: Option<String>,
    pub user_email: String,
    pub conversation_id: Option<String>,
    pub messages: Vec<ChatTurn>,
}

impl SessionState {
    pub fn logged_in(&self) -> bool {
        self.username.is_some()
    }

    /// Marks the session signed in under the already-chosen role and
    /// opens a fresh conversation.
    pub fn begin(&mut self, username: String, user_email: String) {
        self.username = Some(username);
        self.user_email = user_email;
        self.start_new_conversation();
    }

    /// Clears the transcript and mints a new conversation id.
    pub fn start_new_conversation(&mut self) {
        self.messages.clear();
        self.conversation_id = Some(Uuid::new_v4().to_string());
    }

    /// Switches to a stored conversation and its transcript.
    pub fn resume_conversation(&mut self, conversation_id: String, messages: Vec<ChatTurn>) {
        self.conversation_id = Some(conversation_id);
        self.messages = messages;
    }

    pub fn push_turn(&mut self, is_user: bool, content: String) {
        self.messages.push(ChatTurn { is_user, content });
    }

    /// Conversation id for the next message, minting one first if the
    /// session does not have one yet.
    pub fn ensure_conversation_id(&mut self) -> &str {
        self.conversation_id
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .as_str()
    }

    /// Logout. Drops the login, the chosen role, and the transcript.
    pub fn reset(&mut self) {
        *self = SessionState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_opens_a_fresh_conversation() {
        let mut session = SessionState::default();
        session.role = Some(Role::Lawyer);
        session.begin("asha".to_string(), "asha@example.com".to_string());

        assert!(session.logged_in());
        assert!(session.conversation_id.is_some());
        assert!(session.messages.is_empty());
    }

    #[test]
    fn new_conversation_changes_the_id_and_clears_turns() {
        let mut session = SessionState::default();
        session.role = Some(Role::Civilian);
        session.begin("ravi".to_string(), String::new());
        session.push_turn(true, "What is bail?".to_string());
        let first_id = session.conversation_id.clone();

        session.start_new_conversation();
        assert_ne!(session.conversation_id, first_id);
        assert!(session.messages.is_empty());
    }

    #[test]
    fn ensure_conversation_id_mints_once() {
        let mut session = SessionState::default();
        assert!(session.conversation_id.is_none());
        let minted = session.ensure_conversation_id().to_string();
        assert_eq!(session.ensure_conversation_id(), minted);
    }

    #[test]
    fn reset_clears_role_and_login() {
        let mut session = SessionState::default();
        session.role = Some(Role::Lawyer);
        session.begin("asha".to_string(), "asha@example.com".to_string());
        session.push_turn(true, "hello".to_string());

        session.reset();
        assert!(!session.logged_in());
        assert!(session.role.is_none());
        assert!(session.messages.is_empty());
        assert!(session.conversation_id.is_none());
    }
}
