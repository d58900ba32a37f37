//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the task record and its request shapes used by the store.
//! - Define the fixed category set and the filter selections.
//!
//! # Invariants
//! - Every task is identified by an immutable, unique `TaskId`.
//! - A task title is never blank and `updated_at >= created_at`.

pub mod category;
pub mod filter;
pub mod task;
