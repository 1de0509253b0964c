//! PDF tutor backend: ingest PDF textbooks into a vector store and answer
//! questions about them in a tutoring conversation loop.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
