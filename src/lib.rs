pub mod app;
pub mod classifier;
pub mod config;
pub mod database;
pub mod error;
pub mod event;
pub mod extract;
pub mod llm;
pub mod logging;
pub mod notify;
pub mod report;
pub mod session;
pub mod statutes;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use error::{Result, VakilError};
