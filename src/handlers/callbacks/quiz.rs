//! Test mode callbacks

use tracing::debug;
use crate::models::Series;
use crate::state::{AnswerResult, QuizStep};
use crate::utils::errors::Result;
use crate::handlers::{render, views};
use super::CallbackContext;

pub async fn handle_test_menu(ctx: &CallbackContext) -> Result<()> {
    ctx.discard_message().await;
    ctx.show(views::test_series_picker()).await
}

pub async fn handle_pre_test(ctx: &CallbackContext, scope: Option<Series>) -> Result<()> {
    ctx.discard_message().await;
    ctx.show(views::pre_test(&ctx.services.settings.media, scope)?).await
}

pub async fn handle_start_test(ctx: &CallbackContext, scope: Option<Series>) -> Result<()> {
    ctx.services.interaction_service.touch_user(ctx.chat_id.0);
    let step = ctx.services.quiz_flow.start(ctx.user_id, scope).await?;

    ctx.discard_message().await;
    show_quiz_step(ctx, step).await
}

pub async fn handle_answer(ctx: &CallbackContext, correct_id: i64, chosen_id: i64) -> Result<()> {
    match ctx.services.quiz_flow.submit_answer(ctx.user_id, correct_id, chosen_id) {
        AnswerResult::Correct { posture, next } => {
            if let Some(message) = &ctx.message {
                render::edit_caption_best_effort(
                    &ctx.bot,
                    ctx.chat_id,
                    message.id,
                    views::correct_caption(&posture),
                    None,
                )
                .await;
            }
            show_quiz_step(ctx, next).await
        }
        AnswerResult::Incorrect => {
            let Some(message) = &ctx.message else {
                return Ok(());
            };
            let current = message.caption().unwrap_or_default();
            if let Some(caption) = views::incorrect_caption(current) {
                render::edit_caption_best_effort(
                    &ctx.bot,
                    ctx.chat_id,
                    message.id,
                    caption,
                    message.reply_markup().cloned(),
                )
                .await;
            }
            Ok(())
        }
        AnswerResult::Ignored => {
            debug!(user_id = ctx.user_id, correct_id = correct_id, "Answer ignored");
            Ok(())
        }
    }
}

/// Replay the postures missed in the finished round
pub async fn handle_growth(ctx: &CallbackContext) -> Result<()> {
    let step = ctx.services.quiz_flow.enter_remediation(ctx.user_id).await?;
    if step == QuizStep::NoSession {
        debug!(user_id = ctx.user_id, "Growth requested without a finished round");
        return Ok(());
    }

    ctx.discard_message().await;
    ctx.show(views::growth_intro()).await?;
    show_quiz_step(ctx, step).await
}

/// Render the next question or the round summary
pub async fn show_quiz_step(ctx: &CallbackContext, step: QuizStep) -> Result<()> {
    match step {
        QuizStep::Question(question) => ctx.show(views::question(&question)?).await,
        QuizStep::Finished(summary) => {
            let media = &ctx.services.settings.media;
            let celebration = views::pick_celebration(media, &mut rand::thread_rng()).map(str::to_string);
            ctx.show_all(views::quiz_finished(&summary, celebration.as_deref())?).await
        }
        QuizStep::NoSession => Ok(()),
    }
}
