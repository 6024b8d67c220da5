//! Bot handlers module
//!
//! This module contains the presentation adapter organized by update type:
//! - Command handlers for bot commands
//! - Callback handlers for inline keyboard interactions
//! - Message handlers for free-text input
//!
//! Screens are built by [`views`] and sent through [`render`]; button codes
//! live in [`actions`].

pub mod actions;
pub mod views;
pub mod render;
pub mod commands;
pub mod callbacks;
pub mod messages;

// Re-export commonly used handler functions
pub use actions::CallbackAction;
pub use commands::{Command, handle_command};
pub use callbacks::handle_callback_query;
pub use messages::handle_message;
