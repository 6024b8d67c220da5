//! Start command handler
//!
//! Handles the /start command: drops whatever the user was doing and shows
//! the main menu

use std::sync::Arc;
use teloxide::{Bot, types::Message};
use tracing::debug;
use crate::utils::errors::{AsanaBuddyError, Result};
use crate::utils::logging::log_user_action;
use crate::services::ServiceFactory;
use crate::state::SessionStore;
use crate::handlers::{render, views};

/// Handle /start command - main entry point
pub async fn handle_start(
    bot: Bot,
    msg: Message,
    services: Arc<ServiceFactory>,
    store: SessionStore,
) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        AsanaBuddyError::InvalidInput("No user in message".to_string())
    })?;

    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;

    debug!(user_id = user_id, chat_id = ?chat_id, "Processing /start command");

    store.clear(user_id);
    services.interaction_service.touch_user(chat_id.0);
    log_user_action(user_id, "start", None);

    render::send_screen(&bot, chat_id, views::main_menu()).await?;
    Ok(())
}
