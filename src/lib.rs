//! Structured patch engine for model-maintained knowledge-base documents.
//!
//! Model output carries `<save>` directives; [`contexts::parse`] extracts them,
//! and [`contexts::PatchEngine`] locates each target or insertion point with
//! punctuation-insensitive matching and breadcrumb context, then applies,
//! validates or previews the edit through a [`data::DocumentStore`].

pub mod apply_journal;
pub mod contexts;
pub mod data;
pub mod registries;

pub use contexts::{parse, PatchEngine};
pub use data::{EditDirective, MatchOutcome};
