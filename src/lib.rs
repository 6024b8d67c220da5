//! AsanaBuddy Telegram Bot
//!
//! A Telegram bot for learning the postures of the Ashtanga yoga series.
//! This library provides the catalog and interaction clients, the per-user
//! session store with its browse and quiz engines, and the Telegram
//! presentation layer on top of them.

#![allow(non_snake_case)]

pub mod config;
pub mod handlers;
pub mod services;
pub mod models;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{AsanaBuddyError, Result};

// Re-export main components for easy access
pub use services::ServiceFactory;
pub use state::{SessionStore, BrowseFlow, QuizFlow};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
