//! Learn mode callbacks
//!
//! Series picker, range setup, card navigation and the paged posture list.

use tracing::{debug, warn};
use crate::models::Series;
use crate::state::{BrowseStep, Direction};
use crate::utils::errors::Result;
use crate::handlers::views;
use super::CallbackContext;

pub async fn handle_learn_menu(ctx: &CallbackContext) -> Result<()> {
    ctx.discard_message().await;
    ctx.show(views::learn_series_picker()).await
}

pub async fn handle_series(ctx: &CallbackContext, series: Series) -> Result<()> {
    ctx.discard_message().await;
    ctx.show(views::series_overview(&ctx.services.settings.media, series)?).await
}

/// Ask for the first order number; the answer arrives as a text message
pub async fn handle_learn_in_order(ctx: &CallbackContext, series: Series) -> Result<()> {
    ctx.services.interaction_service.touch_user(ctx.chat_id.0);
    ctx.store.begin_range_prompt(ctx.user_id, series);
    ctx.discard_message().await;
    ctx.show(views::range_start_prompt(series)).await
}

pub async fn handle_navigation(ctx: &CallbackContext, direction: Direction) -> Result<()> {
    let step = ctx.services.browse_flow.advance(ctx.user_id, direction);
    if step == BrowseStep::NoSession {
        debug!(user_id = ctx.user_id, "Navigation without a browse session");
        return Ok(());
    }

    // The last card stays visible under the completion note
    if step != BrowseStep::Completed {
        ctx.discard_message().await;
    }
    show_browse_step(ctx, step).await
}

/// Render what the browse engine says is next
pub async fn show_browse_step(ctx: &CallbackContext, step: BrowseStep) -> Result<()> {
    match step {
        BrowseStep::Posture { posture, index, total } => {
            ctx.show(views::posture_card(&posture, index, total)?).await
        }
        BrowseStep::Completed => ctx.show(views::browse_completed()).await,
        BrowseStep::NoSession => Ok(()),
    }
}

pub async fn handle_list(ctx: &CallbackContext, series: Series, offset: usize) -> Result<()> {
    let postures = ctx.services.catalog_service.list_postures(Some(series)).await?;
    let offset = if offset < postures.len() { offset } else { 0 };

    ctx.discard_message().await;
    ctx.show(views::posture_list(series, &postures, offset)).await
}

pub async fn handle_info(ctx: &CallbackContext, posture_id: i64) -> Result<()> {
    match ctx.services.catalog_service.get_posture(posture_id).await? {
        Some(posture) => {
            ctx.discard_message().await;
            ctx.show(views::posture_detail(&posture)?).await
        }
        None => {
            warn!(user_id = ctx.user_id, posture_id = posture_id, "Posture not found");
            Ok(())
        }
    }
}
