//! Help command handler

use teloxide::{Bot, types::Message};
use crate::utils::errors::Result;
use crate::handlers::{render, views};

/// Handle /help command
pub async fn handle_help(bot: Bot, msg: Message) -> Result<()> {
    render::send_screen(&bot, msg.chat.id, views::help()).await?;
    Ok(())
}
