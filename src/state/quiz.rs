//! Quiz flow engine
//!
//! `Inactive -> InProgress -> Remediation -> Inactive`. A round draws up to
//! ten postures, every question offers the correct name among shuffled
//! distractors, and the postures missed in a round can be replayed as a
//! growth round.

use futures::future::join_all;
use tracing::{info, warn};
use crate::models::{InteractionKind, Posture, Series};
use crate::services::{CatalogService, InteractionService};
use crate::utils::errors::Result;
use crate::utils::logging::log_flow_event;
use super::session::{AnswerOutcome, QuizSession, QuizStep, QUESTIONS_PER_ROUND};
use super::storage::SessionStore;

/// Result of an answer tap, with what to show next
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerResult {
    Correct { posture: Posture, next: QuizStep },
    Incorrect,
    /// No quiz running or the tap belongs to an earlier question
    Ignored,
}

#[derive(Clone, Debug)]
pub struct QuizFlow {
    catalog: CatalogService,
    interactions: InteractionService,
    store: SessionStore,
}

impl QuizFlow {
    pub fn new(catalog: CatalogService, interactions: InteractionService, store: SessionStore) -> Self {
        Self {
            catalog,
            interactions,
            store,
        }
    }

    /// Start a round over one series, or every series when `series` is `None`
    pub async fn start(&self, user_id: i64, series: Option<Series>) -> Result<QuizStep> {
        self.interactions.record(user_id, InteractionKind::Test, QUESTIONS_PER_ROUND as u32);

        let pool = self.catalog.list_postures(series).await?;
        let session = QuizSession::new(pool, &mut rand::thread_rng());

        info!(
            user_id = user_id,
            series = ?series,
            pool = session.pool().len(),
            questions = session.questions().len(),
            "Starting quiz"
        );
        self.store.set_quiz_session(user_id, session);

        Ok(self.current_question(user_id))
    }

    /// The current question with fresh options, or the round summary
    pub fn current_question(&self, user_id: i64) -> QuizStep {
        self.store
            .with_quiz(user_id, |quiz| quiz.current(&mut rand::thread_rng()))
            .unwrap_or(QuizStep::NoSession)
    }

    pub fn submit_answer(&self, user_id: i64, correct_id: i64, chosen_id: i64) -> AnswerResult {
        let outcome = self.store.with_quiz(user_id, |quiz| {
            let outcome = quiz.submit(correct_id, chosen_id);
            let next = match outcome {
                AnswerOutcome::Correct { .. } => Some(quiz.current(&mut rand::thread_rng())),
                _ => None,
            };
            (outcome, next)
        });

        match outcome {
            Some((AnswerOutcome::Correct { posture, scored }, Some(next))) => {
                log_flow_event(user_id, "quiz", if scored { "correct" } else { "correct_after_miss" });
                AnswerResult::Correct { posture, next }
            }
            Some((AnswerOutcome::Incorrect { recorded }, _)) => {
                log_flow_event(user_id, "quiz", if recorded { "missed" } else { "missed_again" });
                AnswerResult::Incorrect
            }
            Some(_) => {
                log_flow_event(user_id, "quiz", "stale_answer");
                AnswerResult::Ignored
            }
            None => AnswerResult::Ignored,
        }
    }

    /// Replay the postures missed in the finished round.
    ///
    /// Only valid once a round is over and had mistakes; otherwise nothing changes.
    pub async fn enter_remediation(&self, user_id: i64) -> Result<QuizStep> {
        let snapshot = self.store.with_quiz(user_id, |quiz| {
            (quiz.is_finished() && !quiz.errors().is_empty())
                .then(|| (quiz.errors().to_vec(), quiz.questions().to_vec()))
        });
        let Some(Some((missed_ids, asked))) = snapshot else {
            return Ok(QuizStep::NoSession);
        };

        let fetched = join_all(missed_ids.iter().map(|id| self.catalog.get_posture(*id))).await;
        let mut missed = Vec::with_capacity(missed_ids.len());
        for (id, result) in missed_ids.iter().zip(fetched) {
            match result? {
                Some(posture) => missed.push(posture),
                None => {
                    warn!(user_id = user_id, posture_id = id, "Missed posture not in catalog, reusing quiz copy");
                    if let Some(posture) = asked.iter().find(|p| p.id == *id) {
                        missed.push(posture.clone());
                    }
                }
            }
        }

        info!(user_id = user_id, count = missed.len(), "Entering growth round");
        // The user may have moved on while the catalog was queried.
        let replaced = self.store.with_quiz(user_id, |quiz| {
            let unchanged = quiz.is_finished() && quiz.errors() == missed_ids.as_slice();
            if unchanged {
                quiz.begin_remediation(missed);
            }
            unchanged
        });
        if replaced != Some(true) {
            return Ok(QuizStep::NoSession);
        }

        Ok(self.current_question(user_id))
    }
}
