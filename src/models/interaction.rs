//! Interaction and user bookkeeping models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of completed action recorded for usage tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Learn,
    Test,
}

impl InteractionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InteractionKind::Learn => "learn",
            InteractionKind::Test => "test",
        }
    }
}

/// Body of `POST /interactions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInteractionRequest {
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    pub number_of_asanas: u32,
}

/// Body of `PATCH /users?chat_id=eq.ID`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub latest_interaction: DateTime<Utc>,
}

/// Body of `POST /users`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub chat_id: i64,
    pub latest_interaction: DateTime<Utc>,
}
