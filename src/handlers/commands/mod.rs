//! Command handlers module
//!
//! This module contains handlers for the bot commands /start and /help

pub mod start;
pub mod help;

use std::sync::Arc;
use teloxide::{Bot, types::Message, utils::command::BotCommands};
use crate::utils::errors::Result;
use crate::services::ServiceFactory;
use crate::state::SessionStore;

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "AsanaBuddy commands:")]
pub enum Command {
    #[command(description = "Open the main menu")]
    Start,
    #[command(description = "Show help information")]
    Help,
}

/// Main command dispatcher
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: Arc<ServiceFactory>,
    store: SessionStore,
) -> Result<()> {
    match cmd {
        Command::Start => start::handle_start(bot, msg, services, store).await,
        Command::Help => help::handle_help(bot, msg).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/start", "AsanaBuddyBot").unwrap(), Command::Start);
        assert_eq!(Command::parse("/help@AsanaBuddyBot", "AsanaBuddyBot").unwrap(), Command::Help);
        assert!(Command::parse("/events", "AsanaBuddyBot").is_err());
    }
}
