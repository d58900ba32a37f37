//! Core use-case services.
//!
//! # Responsibility
//! - Own the authoritative task/category state and its mutations.
//! - Keep filtering, search and statistics as pure helpers over that state.

pub mod helpers;
pub mod task_store;
