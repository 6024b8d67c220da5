//! Session storage implementation
//!
//! In-memory, process-local mapping from user id to that user's live session
//! and pending range prompt. Every read-modify-write runs under the map lock
//! inside a closure, so two events of the same user can never interleave a
//! half-applied transition. Sessions do not survive a restart.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use crate::models::{Posture, Series};
use super::session::{BrowseSession, QuizSession, Session};

/// Which number the learn setup is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeStep {
    AwaitingStart,
    AwaitingEnd { start: u32 },
}

/// A learn setup in progress: series chosen, range being typed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangePrompt {
    pub series: Series,
    pub step: RangeStep,
}

/// What a typed range message leads to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// No learn setup is waiting for text
    NoPrompt,
    /// Input was not a number; ask the same question again
    Reprompt(RangePrompt),
    /// Start recorded, the end is next
    AskEnd { start: u32 },
    /// Both bounds known; the prompt stays until the browse session replaces it
    Commit { series: Series, start: u32, end: u32 },
}

#[derive(Debug, Default)]
struct UserState {
    session: Option<Session>,
    prompt: Option<RangePrompt>,
}

impl UserState {
    fn is_empty(&self) -> bool {
        self.session.is_none() && self.prompt.is_none()
    }
}

/// Concurrent-safe per-user session store
#[derive(Clone, Default)]
pub struct SessionStore {
    users: Arc<Mutex<HashMap<i64, UserState>>>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<i64, UserState>> {
        // A panic elsewhere must not wedge every user's flow.
        self.users.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of the user's live session
    pub fn get_session(&self, user_id: i64) -> Option<Session> {
        self.lock().get(&user_id).and_then(|state| state.session.clone())
    }

    /// Start browsing; replaces any quiz and finishes the range prompt
    pub fn set_browse_session(&self, user_id: i64, postures: Vec<Posture>, start_index: usize) {
        let total = postures.len();
        let mut users = self.lock();
        let state = users.entry(user_id).or_default();
        state.session = Some(Session::Browse(BrowseSession::with_index(postures, start_index)));
        state.prompt = None;
        debug!(user_id = user_id, total = total, "Browse session stored");
    }

    /// Start (or replace) a quiz; discards any browse session
    pub fn set_quiz_session(&self, user_id: i64, session: QuizSession) {
        let questions = session.questions().len();
        let mut users = self.lock();
        let state = users.entry(user_id).or_default();
        state.session = Some(Session::Quiz(session));
        state.prompt = None;
        debug!(user_id = user_id, questions = questions, "Quiz session stored");
    }

    /// Drop everything held for the user
    pub fn clear(&self, user_id: i64) {
        if self.lock().remove(&user_id).is_some() {
            debug!(user_id = user_id, "Session cleared");
        }
    }

    /// Mutate the browse session in place; `None` when the user is not browsing
    pub fn with_browse<R>(&self, user_id: i64, f: impl FnOnce(&mut BrowseSession) -> R) -> Option<R> {
        match self.lock().get_mut(&user_id)?.session.as_mut()? {
            Session::Browse(browse) => Some(f(browse)),
            Session::Quiz(_) => None,
        }
    }

    /// Mutate the quiz session in place; `None` when no quiz is running
    pub fn with_quiz<R>(&self, user_id: i64, f: impl FnOnce(&mut QuizSession) -> R) -> Option<R> {
        match self.lock().get_mut(&user_id)?.session.as_mut()? {
            Session::Quiz(quiz) => Some(f(quiz)),
            Session::Browse(_) => None,
        }
    }

    /// Begin the learn setup for a series, discarding any live session
    pub fn begin_range_prompt(&self, user_id: i64, series: Series) {
        let mut users = self.lock();
        let state = users.entry(user_id).or_default();
        state.session = None;
        state.prompt = Some(RangePrompt {
            series,
            step: RangeStep::AwaitingStart,
        });
        debug!(user_id = user_id, series = %series, "Range prompt started");
    }

    /// The pending range prompt, if any
    pub fn range_prompt(&self, user_id: i64) -> Option<RangePrompt> {
        self.lock().get(&user_id).and_then(|state| state.prompt)
    }

    /// Feed one parsed text message into the range prompt.
    ///
    /// `None` means the text was not an order number. On `Commit` the prompt
    /// is left in place, so a failed catalog read can be retried by typing
    /// the end number again.
    pub fn apply_range_input(&self, user_id: i64, input: Option<u32>) -> RangeOutcome {
        let mut users = self.lock();
        let Some(prompt) = users.get_mut(&user_id).and_then(|state| state.prompt.as_mut()) else {
            return RangeOutcome::NoPrompt;
        };
        let Some(number) = input else {
            return RangeOutcome::Reprompt(*prompt);
        };

        match prompt.step {
            RangeStep::AwaitingStart => {
                prompt.step = RangeStep::AwaitingEnd { start: number };
                RangeOutcome::AskEnd { start: number }
            }
            RangeStep::AwaitingEnd { start } => RangeOutcome::Commit {
                series: prompt.series,
                start,
                end: number,
            },
        }
    }

    /// Number of users holding any state
    pub fn active_users(&self) -> usize {
        self.lock().values().filter(|state| !state.is_empty()).count()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("active_users", &self.active_users())
            .finish()
    }
}
