//! Sending screens
//!
//! The only place that turns a [`Screen`] into Bot API calls. Cosmetic side
//! effects (deleting or re-captioning an old message) are best effort: a
//! failure is logged and never reaches the flow engines.

use teloxide::{Bot, prelude::*, types::{ChatId, InlineKeyboardMarkup, InputFile, Message, MessageId}};
use tracing::{debug, warn};
use crate::utils::errors::{AsanaBuddyError, Result};
use crate::utils::logging::log_api_error;
use super::views::{self, Media, Screen};

/// Send one screen as a photo, video or text message
pub async fn send_screen(bot: &Bot, chat_id: ChatId, screen: Screen) -> Result<Message> {
    let Screen { text, media, keyboard, parse_mode } = screen;

    let message = match media {
        Some(Media::Photo(url)) => {
            let mut request = bot.send_photo(chat_id, InputFile::url(url)).caption(text);
            if let Some(mode) = parse_mode {
                request = request.parse_mode(mode);
            }
            if let Some(keyboard) = keyboard {
                request = request.reply_markup(keyboard);
            }
            request.await?
        }
        Some(Media::Video(url)) => {
            let mut request = bot.send_video(chat_id, InputFile::url(url)).caption(text);
            if let Some(mode) = parse_mode {
                request = request.parse_mode(mode);
            }
            if let Some(keyboard) = keyboard {
                request = request.reply_markup(keyboard);
            }
            request.await?
        }
        None => {
            let mut request = bot.send_message(chat_id, text);
            if let Some(mode) = parse_mode {
                request = request.parse_mode(mode);
            }
            if let Some(keyboard) = keyboard {
                request = request.reply_markup(keyboard);
            }
            request.await?
        }
    };

    debug!(chat_id = ?chat_id, message_id = ?message.id, "Screen sent");
    Ok(message)
}

/// Send screens in order
pub async fn send_screens(bot: &Bot, chat_id: ChatId, screens: Vec<Screen>) -> Result<()> {
    for screen in screens {
        send_screen(bot, chat_id, screen).await?;
    }
    Ok(())
}

/// Delete a message, ignoring failures (too old, already gone)
pub async fn delete_best_effort(bot: &Bot, chat_id: ChatId, message_id: MessageId) {
    if let Err(e) = bot.delete_message(chat_id, message_id).await {
        warn!(chat_id = ?chat_id, message_id = ?message_id, error = %e, "Failed to delete message");
    }
}

/// Replace a media caption, optionally keeping the buttons under it
pub async fn edit_caption_best_effort(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    caption: String,
    keyboard: Option<InlineKeyboardMarkup>,
) {
    let mut request = bot.edit_message_caption(chat_id, message_id).caption(caption);
    if let Some(keyboard) = keyboard {
        request = request.reply_markup(keyboard);
    }
    if let Err(e) = request.await {
        warn!(chat_id = ?chat_id, message_id = ?message_id, error = %e, "Failed to edit caption");
    }
}

/// Turn a recoverable catalog failure into a retry hint; pass anything else on
pub async fn report_failure(bot: &Bot, chat_id: ChatId, error: AsanaBuddyError) -> Result<()> {
    match error {
        AsanaBuddyError::Catalog(ref e) if error.is_recoverable() => {
            log_api_error("catalog", &e.to_string(), Some("user asked to retry"));
            send_screen(bot, chat_id, views::retry_later()).await?;
            Ok(())
        }
        other => Err(other),
    }
}
