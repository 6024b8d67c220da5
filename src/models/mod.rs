//! Data models module
//!
//! This module contains all data structures exchanged with the catalog store

pub mod asana;
pub mod interaction;

// Re-export commonly used models
pub use asana::{Posture, Series};
pub use interaction::{InteractionKind, CreateInteractionRequest, CreateUserRequest, UpdateUserRequest};
