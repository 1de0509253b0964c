//! Application layer - Use cases and orchestration.
//!
//! Services here orchestrate domain logic through ports (traits) rather
//! than concrete provider clients, so every collaborator can be swapped
//! for a fake in tests.

pub mod prompts;
pub mod services;

pub use services::{IngestionService, QaService, SearchService, HISTORY_WINDOW};
