//! Per-user session state
//!
//! A user is either browsing a range of postures or taking a quiz, never both.
//! The transitions here are pure; randomness is injected so the sampling
//! rules can be checked with a seeded generator.

use rand::Rng;
use rand::seq::SliceRandom;
use crate::models::Posture;

/// Questions drawn for a regular quiz round
pub const QUESTIONS_PER_ROUND: usize = 10;

/// Answer options shown per question (the correct one included)
pub const OPTIONS_PER_QUESTION: usize = 3;

/// The live session of one user
#[derive(Debug, Clone)]
pub enum Session {
    Browse(BrowseSession),
    Quiz(QuizSession),
}

/// Navigation direction in a browse session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// What a browse session currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseStep {
    Posture {
        posture: Posture,
        /// 0-based position
        index: usize,
        total: usize,
    },
    Completed,
    NoSession,
}

/// Sequential paging through a range of postures
#[derive(Debug, Clone)]
pub struct BrowseSession {
    postures: Vec<Posture>,
    index: usize,
}

impl BrowseSession {
    pub fn new(postures: Vec<Posture>) -> Self {
        Self::with_index(postures, 0)
    }

    pub fn with_index(postures: Vec<Posture>, index: usize) -> Self {
        let index = index.min(postures.len());
        Self { postures, index }
    }

    pub fn postures(&self) -> &[Posture] {
        &self.postures
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.postures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postures.is_empty()
    }

    /// `index == len` marks the range as fully studied
    pub fn is_completed(&self) -> bool {
        self.index >= self.postures.len()
    }

    /// Move one step. Next stops at the completion marker, previous at 0.
    pub fn advance(&mut self, direction: Direction) {
        match direction {
            Direction::Next => {
                if self.index < self.postures.len() {
                    self.index += 1;
                }
            }
            Direction::Previous => {
                self.index = self.index.saturating_sub(1);
            }
        }
    }

    pub fn current(&self) -> BrowseStep {
        match self.postures.get(self.index) {
            Some(posture) => BrowseStep::Posture {
                posture: posture.clone(),
                index: self.index,
                total: self.postures.len(),
            },
            None => BrowseStep::Completed,
        }
    }
}

/// Which pass of the quiz is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizRound {
    Main,
    /// Remediation pass over the postures missed in the previous round
    Growth,
}

/// A rendered question: the posture to name and the shuffled options
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub posture: Posture,
    pub options: Vec<Posture>,
    /// 1-based question number
    pub number: usize,
    pub total: usize,
    pub round: QuizRound,
}

/// Final tally of a round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    pub score: u32,
    pub total: usize,
    pub mistakes: usize,
}

impl QuizSummary {
    pub fn is_perfect(&self) -> bool {
        self.mistakes == 0
    }
}

/// What the quiz shows next
#[derive(Debug, Clone, PartialEq)]
pub enum QuizStep {
    Question(Question),
    Finished(QuizSummary),
    NoSession,
}

/// Result of submitting an answer
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerOutcome {
    Correct {
        posture: Posture,
        /// Whether this answer counted towards the score
        scored: bool,
    },
    Incorrect {
        /// Whether the posture was newly added to the mistakes
        recorded: bool,
    },
    /// The answer does not belong to the current question
    Stale,
}

/// Quiz state for one user
#[derive(Debug, Clone)]
pub struct QuizSession {
    pool: Vec<Posture>,
    questions: Vec<Posture>,
    index: usize,
    /// Missed posture ids in first-miss order, each at most once
    errors: Vec<i64>,
    score: u32,
    round: QuizRound,
}

impl QuizSession {
    /// Start a main round: up to ten questions drawn without replacement
    pub fn new<R: Rng + ?Sized>(pool: Vec<Posture>, rng: &mut R) -> Self {
        let count = QUESTIONS_PER_ROUND.min(pool.len());
        let questions: Vec<Posture> = pool.choose_multiple(rng, count).cloned().collect();
        Self::with_questions(pool, questions, QuizRound::Main)
    }

    pub fn with_questions(pool: Vec<Posture>, questions: Vec<Posture>, round: QuizRound) -> Self {
        Self {
            pool,
            questions,
            index: 0,
            errors: Vec::new(),
            score: 0,
            round,
        }
    }

    /// Replace this round with a growth round over `missed`
    pub fn begin_remediation(&mut self, missed: Vec<Posture>) {
        self.questions = missed;
        self.index = 0;
        self.errors.clear();
        self.score = 0;
        self.round = QuizRound::Growth;
    }

    pub fn pool(&self) -> &[Posture] {
        &self.pool
    }

    pub fn questions(&self) -> &[Posture] {
        &self.questions
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn errors(&self) -> &[i64] {
        &self.errors
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn round(&self) -> QuizRound {
        self.round
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.questions.len()
    }

    pub fn summary(&self) -> QuizSummary {
        QuizSummary {
            score: self.score,
            total: self.questions.len(),
            mistakes: self.errors.len(),
        }
    }

    /// The current question with freshly drawn options, or the summary.
    ///
    /// Distractors are re-drawn on every call; the correct posture is always
    /// among the options.
    pub fn current<R: Rng + ?Sized>(&self, rng: &mut R) -> QuizStep {
        let Some(posture) = self.questions.get(self.index) else {
            return QuizStep::Finished(self.summary());
        };

        let others: Vec<&Posture> = self.pool.iter().filter(|p| p.id != posture.id).collect();
        let wanted = (OPTIONS_PER_QUESTION - 1).min(others.len());
        let mut options: Vec<Posture> = others
            .choose_multiple(rng, wanted)
            .map(|p| (*p).clone())
            .collect();
        options.push(posture.clone());
        options.shuffle(rng);

        QuizStep::Question(Question {
            posture: posture.clone(),
            options,
            number: self.index + 1,
            total: self.questions.len(),
            round: self.round,
        })
    }

    /// Apply an answer to the current question.
    ///
    /// Wrong answers keep the question in play; a question already missed
    /// never adds to the score when eventually answered correctly.
    pub fn submit(&mut self, correct_id: i64, chosen_id: i64) -> AnswerOutcome {
        let Some(current) = self.questions.get(self.index) else {
            return AnswerOutcome::Stale;
        };
        if current.id != correct_id {
            return AnswerOutcome::Stale;
        }

        let already_missed = self.errors.contains(&correct_id);
        if chosen_id == correct_id {
            let posture = current.clone();
            if !already_missed {
                self.score += 1;
            }
            self.index += 1;
            AnswerOutcome::Correct {
                posture,
                scored: !already_missed,
            }
        } else {
            if !already_missed {
                self.errors.push(correct_id);
            }
            AnswerOutcome::Incorrect {
                recorded: !already_missed,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Series;
    use assert_matches::assert_matches;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    fn posture(id: i64, order_num: u32) -> Posture {
        Posture {
            id,
            name: format!("Asana {}", id),
            series: Series::Primary,
            order_num,
            image_url: format!("https://example.com/{}.png", id),
            transcription: None,
            meaning: None,
        }
    }

    fn pool(size: usize) -> Vec<Posture> {
        (1..=size as i64).map(|id| posture(id, id as u32)).collect()
    }

    fn current_question(session: &QuizSession, rng: &mut StdRng) -> Question {
        match session.current(rng) {
            QuizStep::Question(q) => q,
            other => panic!("expected a question, got {:?}", other),
        }
    }

    #[test]
    fn test_browse_next_reaches_completion_once() {
        let mut session = BrowseSession::new(pool(3));
        for expected in 1..=3 {
            session.advance(Direction::Next);
            assert_eq!(session.index(), expected);
        }
        assert!(session.is_completed());
        assert_eq!(session.current(), BrowseStep::Completed);

        session.advance(Direction::Next);
        assert_eq!(session.index(), 3);
    }

    #[test]
    fn test_browse_previous_floors_at_zero() {
        let mut session = BrowseSession::new(pool(2));
        session.advance(Direction::Previous);
        assert_eq!(session.index(), 0);
        session.advance(Direction::Next);
        session.advance(Direction::Previous);
        session.advance(Direction::Previous);
        assert_eq!(session.index(), 0);
    }

    #[test]
    fn test_empty_browse_session_is_completed() {
        let session = BrowseSession::new(Vec::new());
        assert!(session.is_empty());
        assert_eq!(session.current(), BrowseStep::Completed);
    }

    #[test]
    fn test_browse_position_is_reported() {
        let session = BrowseSession::with_index(pool(4), 2);
        assert_matches!(session.current(), BrowseStep::Posture { index: 2, total: 4, ref posture } if posture.id == 3);
    }

    #[test]
    fn test_repeated_wrong_answer_records_once() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut session = QuizSession::new(pool(5), &mut rng);
        let correct = current_question(&session, &mut rng).posture.id;
        let wrong = if correct == 1 { 2 } else { 1 };

        assert_eq!(session.submit(correct, wrong), AnswerOutcome::Incorrect { recorded: true });
        assert_eq!(session.submit(correct, wrong), AnswerOutcome::Incorrect { recorded: false });
        assert_eq!(session.errors(), &[correct]);
        assert_eq!(session.score(), 0);
        assert_eq!(session.index(), 0);

        assert_matches!(session.submit(correct, correct), AnswerOutcome::Correct { scored: false, .. });
        assert_eq!(session.score(), 0);
        assert_eq!(session.index(), 1);
    }

    #[test]
    fn test_stale_answers_are_ignored() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut session = QuizSession::new(pool(4), &mut rng);
        let correct = current_question(&session, &mut rng).posture.id;
        let other = session.questions().iter().find(|p| p.id != correct).unwrap().id;

        assert_eq!(session.submit(other, other), AnswerOutcome::Stale);
        assert_eq!(session.index(), 0);
        assert!(session.errors().is_empty());
    }

    #[test]
    fn test_finished_session_reports_summary() {
        let mut session = QuizSession::with_questions(pool(2), pool(2), QuizRound::Main);
        session.submit(1, 2);
        session.submit(1, 1);
        session.submit(2, 2);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            session.current(&mut rng),
            QuizStep::Finished(QuizSummary { score: 1, total: 2, mistakes: 1 })
        );
        assert_eq!(session.submit(2, 2), AnswerOutcome::Stale);
    }

    #[test]
    fn test_remediation_resets_progress() {
        let mut session = QuizSession::with_questions(pool(3), pool(3), QuizRound::Main);
        session.submit(1, 1);
        session.submit(2, 3);
        session.submit(2, 2);
        session.submit(3, 1);
        session.submit(3, 3);
        assert_eq!(session.errors(), &[2, 3]);

        let missed: Vec<Posture> = session
            .errors()
            .iter()
            .filter_map(|id| session.questions().iter().find(|p| p.id == *id).cloned())
            .collect();
        let mut growth = session;
        growth.begin_remediation(missed);

        assert_eq!(growth.round(), QuizRound::Growth);
        assert_eq!(growth.index(), 0);
        assert_eq!(growth.score(), 0);
        assert!(growth.errors().is_empty());
        assert_eq!(growth.questions().iter().map(|p| p.id).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(growth.pool().len(), 3);
    }

    #[test]
    fn test_tiny_pool_clamps_distractors() {
        let mut rng = StdRng::seed_from_u64(1);
        let single = QuizSession::new(pool(1), &mut rng);
        assert_eq!(current_question(&single, &mut rng).options.len(), 1);

        let pair = QuizSession::new(pool(2), &mut rng);
        assert_eq!(current_question(&pair, &mut rng).options.len(), 2);

        let empty = QuizSession::new(Vec::new(), &mut rng);
        assert!(empty.questions().is_empty());
        assert_matches!(empty.current(&mut rng), QuizStep::Finished(ref s) if s.total == 0 && s.is_perfect());
    }

    proptest! {
        #[test]
        fn prop_question_count_and_uniqueness(size in 0usize..40, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let session = QuizSession::new(pool(size), &mut rng);
            prop_assert_eq!(session.questions().len(), QUESTIONS_PER_ROUND.min(size));
            let ids: HashSet<i64> = session.questions().iter().map(|p| p.id).collect();
            prop_assert_eq!(ids.len(), session.questions().len());
        }

        #[test]
        fn prop_options_contain_correct_posture(size in 1usize..20, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let session = QuizSession::new(pool(size), &mut rng);
            let question = current_question(&session, &mut rng);
            prop_assert_eq!(question.options.len(), OPTIONS_PER_QUESTION.min(size));
            prop_assert!(question.options.iter().any(|p| p.id == question.posture.id));
            let ids: HashSet<i64> = question.options.iter().map(|p| p.id).collect();
            prop_assert_eq!(ids.len(), question.options.len());
        }

        #[test]
        fn prop_score_accounts_for_every_passed_question(
            size in 1usize..15,
            seed in any::<u64>(),
            misses in proptest::collection::vec(0u8..3, 0..60),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut session = QuizSession::new(pool(size), &mut rng);
            let mut attempts = misses.into_iter();

            while !session.is_finished() {
                let correct = session.questions()[session.index()].id;
                let wrong = session.pool().iter().find(|p| p.id != correct).map(|p| p.id);
                match (attempts.next(), wrong) {
                    (Some(n), Some(wrong)) if n > 0 => {
                        for _ in 0..n {
                            session.submit(correct, wrong);
                        }
                    }
                    _ => {}
                }
                session.submit(correct, correct);

                let passed_missed = session.questions()[..session.index()]
                    .iter()
                    .filter(|p| session.errors().contains(&p.id))
                    .count();
                prop_assert_eq!(session.score() as usize + passed_missed, session.index());
            }
        }
    }
}
