//! Core domain types for Lector.
//!
//! This crate contains pure domain types with no IO, no async, and minimal
//! dependencies. Everything here can be used from any layer of the
//! application.

mod article;
mod ids;
mod timer;

pub use article::{Article, PARAGRAPHS_PER_ARTICLE};
pub use ids::{ArticleId, ElementId, ParagraphKey};
pub use timer::{TimerRecord, TimerTable, TimerTransition, VisibilityEdge};
