//! Message handlers module
//!
//! Handles free-text input. The only text the bot expects is the pair of
//! order numbers bounding a learn range; anything else gets a /start hint.

use std::sync::Arc;
use teloxide::{Bot, types::{ChatId, Message}};
use tracing::{debug, info};
use crate::utils::errors::{AsanaBuddyError, Result};
use crate::utils::helpers::parse_order_number;
use crate::services::ServiceFactory;
use crate::state::{BrowseStep, RangeOutcome, RangePrompt, RangeStep, SessionStore};
use crate::handlers::{render, views};

/// Handle incoming text messages
pub async fn handle_message(
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
    let input = msg.text().and_then(parse_order_number);

    match store.apply_range_input(user_id, input) {
        RangeOutcome::NoPrompt => {
            debug!(user_id = user_id, "Text without a pending prompt");
            render::send_screen(&bot, chat_id, views::use_start_hint()).await?;
            Ok(())
        }
        RangeOutcome::Reprompt(prompt) => {
            debug!(user_id = user_id, "Non-numeric range input, asking again");
            render::send_screen(&bot, chat_id, reprompt_screen(prompt)).await?;
            Ok(())
        }
        RangeOutcome::AskEnd { start } => {
            render::send_screen(&bot, chat_id, views::range_end_prompt(start)).await?;
            Ok(())
        }
        RangeOutcome::Commit { series, start, end } => {
            info!(user_id = user_id, series = %series, start = start, end = end, "Range committed");
            match services.browse_flow.start(user_id, series, start, end).await {
                Ok(step) => show_first_card(&bot, chat_id, step).await,
                Err(e) => render::report_failure(&bot, chat_id, e).await,
            }
        }
    }
}

fn reprompt_screen(prompt: RangePrompt) -> views::Screen {
    match prompt.step {
        RangeStep::AwaitingStart => views::range_start_prompt(prompt.series),
        RangeStep::AwaitingEnd { start } => views::range_end_prompt(start),
    }
}

async fn show_first_card(bot: &Bot, chat_id: ChatId, step: BrowseStep) -> Result<()> {
    let screen = match step {
        BrowseStep::Posture { posture, index, total } => views::posture_card(&posture, index, total)?,
        BrowseStep::Completed => views::browse_completed(),
        BrowseStep::NoSession => return Ok(()),
    };
    render::send_screen(bot, chat_id, screen).await?;
    Ok(())
}
