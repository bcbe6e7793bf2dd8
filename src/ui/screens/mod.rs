pub mod auth;
pub mod chat;
pub mod conversations;
pub mod document;
pub mod reminders;
pub mod role_select;
