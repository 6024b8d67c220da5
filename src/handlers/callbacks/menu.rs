//! Main menu, donate and shavasana callbacks

use tracing::info;
use crate::utils::errors::Result;
use crate::handlers::views;
use super::CallbackContext;

/// Back to the main menu; ends any flow in progress
pub async fn handle_menu(ctx: &CallbackContext) -> Result<()> {
    ctx.store.clear(ctx.user_id);
    ctx.services.interaction_service.touch_user(ctx.chat_id.0);
    ctx.discard_message().await;
    ctx.show(views::main_menu()).await
}

pub async fn handle_donate(ctx: &CallbackContext) -> Result<()> {
    ctx.discard_message().await;
    ctx.show(views::donate(&ctx.services.settings.media)?).await
}

/// Closing screen: a wish card, then a fresh menu
pub async fn handle_relax(ctx: &CallbackContext) -> Result<()> {
    let wish = views::relax(&ctx.services.settings.media, &mut rand::thread_rng())?;

    ctx.store.clear(ctx.user_id);
    info!(user_id = ctx.user_id, "Shavasana");

    ctx.discard_message().await;
    ctx.show(wish).await?;
    ctx.show(views::main_menu()).await
}
