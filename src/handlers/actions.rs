//! Callback data codes
//!
//! Inline buttons carry short `:`-separated codes. This module is the only
//! place that knows their wire shape.

use std::fmt;
use std::str::FromStr;
use crate::models::Series;
use crate::utils::errors::AsanaBuddyError;

/// Everything a button tap can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    /// Back to the main menu
    Menu,
    /// Learn mode series picker
    Learn,
    /// Test mode series picker
    Test,
    Donate,
    /// Shavasana closing screen
    Relax,
    /// Inert button (position indicator)
    Noop,
    /// Start the remediation round
    Growth,
    NavNext,
    NavPrev,
    SelectSeries(Series),
    /// Learn a series in order (asks for the range)
    LearnInOrder(Series),
    ViewList { series: Series, offset: usize },
    Info(i64),
    /// Quiz confirmation screen; `None` means mixed
    PreTest(Option<Series>),
    StartTest(Option<Series>),
    Answer { correct: i64, chosen: i64 },
}

fn parse_series(raw: &str) -> Option<Series> {
    raw.parse::<u8>().ok().and_then(Series::from_number)
}

fn parse_scope(raw: &str) -> Option<Option<Series>> {
    if raw == "mix" {
        Some(None)
    } else {
        parse_series(raw).map(Some)
    }
}

fn scope_code(scope: Option<Series>) -> String {
    match scope {
        Some(series) => series.number().to_string(),
        None => "mix".to_string(),
    }
}

impl FromStr for CallbackAction {
    type Err = AsanaBuddyError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = data.split(':').collect();
        let action = match parts.as_slice() {
            ["menu"] => Some(CallbackAction::Menu),
            ["learn"] => Some(CallbackAction::Learn),
            ["test"] => Some(CallbackAction::Test),
            ["donate"] => Some(CallbackAction::Donate),
            ["relax"] => Some(CallbackAction::Relax),
            ["noop"] => Some(CallbackAction::Noop),
            ["growth"] => Some(CallbackAction::Growth),
            ["nav", "next"] => Some(CallbackAction::NavNext),
            ["nav", "prev"] => Some(CallbackAction::NavPrev),
            ["series", s] => parse_series(s).map(CallbackAction::SelectSeries),
            ["order", s] => parse_series(s).map(CallbackAction::LearnInOrder),
            ["list", s, offset] => parse_series(s).zip(offset.parse().ok()).map(|(series, offset)| {
                CallbackAction::ViewList { series, offset }
            }),
            ["info", id] => id.parse().ok().map(CallbackAction::Info),
            ["pretest", scope] => parse_scope(scope).map(CallbackAction::PreTest),
            ["quiz", scope] => parse_scope(scope).map(CallbackAction::StartTest),
            ["ans", correct, chosen] => correct.parse().ok().zip(chosen.parse().ok()).map(|(correct, chosen)| {
                CallbackAction::Answer { correct, chosen }
            }),
            _ => None,
        };

        action.ok_or_else(|| AsanaBuddyError::InvalidInput(format!("Unknown callback data: {}", data)))
    }
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackAction::Menu => write!(f, "menu"),
            CallbackAction::Learn => write!(f, "learn"),
            CallbackAction::Test => write!(f, "test"),
            CallbackAction::Donate => write!(f, "donate"),
            CallbackAction::Relax => write!(f, "relax"),
            CallbackAction::Noop => write!(f, "noop"),
            CallbackAction::Growth => write!(f, "growth"),
            CallbackAction::NavNext => write!(f, "nav:next"),
            CallbackAction::NavPrev => write!(f, "nav:prev"),
            CallbackAction::SelectSeries(series) => write!(f, "series:{}", series),
            CallbackAction::LearnInOrder(series) => write!(f, "order:{}", series),
            CallbackAction::ViewList { series, offset } => write!(f, "list:{}:{}", series, offset),
            CallbackAction::Info(id) => write!(f, "info:{}", id),
            CallbackAction::PreTest(scope) => write!(f, "pretest:{}", scope_code(*scope)),
            CallbackAction::StartTest(scope) => write!(f, "quiz:{}", scope_code(*scope)),
            CallbackAction::Answer { correct, chosen } => write!(f, "ans:{}:{}", correct, chosen),
        }
    }
}
