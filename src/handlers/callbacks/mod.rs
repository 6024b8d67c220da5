//! Callback query handlers module
//!
//! This module contains handlers for all inline keyboard button callbacks

pub mod menu;
pub mod learn;
pub mod quiz;

use std::sync::Arc;
use teloxide::{Bot, prelude::*, types::{CallbackQuery, ChatId, Message}};
use tracing::{debug, info, warn};
use crate::utils::errors::Result;
use crate::services::ServiceFactory;
use crate::state::{Direction, SessionStore};
use crate::handlers::actions::CallbackAction;
use crate::handlers::render;
use crate::handlers::views::Screen;

/// Everything a callback handler needs about the tap it is answering
pub struct CallbackContext {
    pub bot: Bot,
    pub chat_id: ChatId,
    pub user_id: i64,
    /// The message carrying the tapped button, when still accessible
    pub message: Option<Message>,
    pub services: Arc<ServiceFactory>,
    pub store: SessionStore,
}

impl CallbackContext {
    /// Remove the message the button belonged to
    pub async fn discard_message(&self) {
        if let Some(message) = &self.message {
            render::delete_best_effort(&self.bot, self.chat_id, message.id).await;
        }
    }

    pub async fn show(&self, screen: Screen) -> Result<()> {
        render::send_screen(&self.bot, self.chat_id, screen).await?;
        Ok(())
    }

    pub async fn show_all(&self, screens: Vec<Screen>) -> Result<()> {
        render::send_screens(&self.bot, self.chat_id, screens).await
    }
}

/// Main callback query dispatcher
pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    services: Arc<ServiceFactory>,
    store: SessionStore,
) -> Result<()> {
    let user_id = query.from.id.0 as i64;

    // Answer the callback query first to remove loading state
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(user_id = user_id, error = %e, "Failed to answer callback query");
    }

    let Some(data) = query.data.as_deref() else {
        debug!(user_id = user_id, "Callback query without data");
        return Ok(());
    };

    let action = match data.parse::<CallbackAction>() {
        Ok(action) => action,
        Err(e) => {
            warn!(user_id = user_id, callback_data = %data, error = %e, "Ignoring malformed callback data");
            return Ok(());
        }
    };

    let chat_id = query
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or(ChatId(user_id));

    info!(user_id = user_id, chat_id = ?chat_id, action = %action, "Routing callback");

    let ctx = CallbackContext {
        bot,
        chat_id,
        user_id,
        message: query.regular_message().cloned(),
        services,
        store,
    };

    let result = route(&ctx, action).await;
    match result {
        Ok(()) => Ok(()),
        Err(e) => render::report_failure(&ctx.bot, ctx.chat_id, e).await,
    }
}

async fn route(ctx: &CallbackContext, action: CallbackAction) -> Result<()> {
    match action {
        CallbackAction::Menu => menu::handle_menu(ctx).await,
        CallbackAction::Donate => menu::handle_donate(ctx).await,
        CallbackAction::Relax => menu::handle_relax(ctx).await,
        CallbackAction::Noop => Ok(()),
        CallbackAction::Learn => learn::handle_learn_menu(ctx).await,
        CallbackAction::SelectSeries(series) => learn::handle_series(ctx, series).await,
        CallbackAction::LearnInOrder(series) => learn::handle_learn_in_order(ctx, series).await,
        CallbackAction::NavNext => learn::handle_navigation(ctx, Direction::Next).await,
        CallbackAction::NavPrev => learn::handle_navigation(ctx, Direction::Previous).await,
        CallbackAction::ViewList { series, offset } => learn::handle_list(ctx, series, offset).await,
        CallbackAction::Info(posture_id) => learn::handle_info(ctx, posture_id).await,
        CallbackAction::Test => quiz::handle_test_menu(ctx).await,
        CallbackAction::PreTest(scope) => quiz::handle_pre_test(ctx, scope).await,
        CallbackAction::StartTest(scope) => quiz::handle_start_test(ctx, scope).await,
        CallbackAction::Answer { correct, chosen } => quiz::handle_answer(ctx, correct, chosen).await,
        CallbackAction::Growth => quiz::handle_growth(ctx).await,
    }
}
