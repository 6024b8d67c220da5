//! Test helpers module
//!
//! This module provides utilities for testing the AsanaBuddy flows against a
//! mocked REST store.

pub mod catalog_mock;
pub mod fixtures;

pub use catalog_mock::*;
pub use fixtures::*;
