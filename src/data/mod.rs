mod batch_report;
mod document_store;
mod edit_directive;
mod engine_config;
mod match_outcome;

pub use batch_report::{BatchReport, DirectiveFailure, FileReport, FileStatus};
pub use document_store::{DocumentStore, StoreError};
pub use edit_directive::EditDirective;
pub use engine_config::{EngineConfig, DEFAULT_NARRATIVE_FILE};
pub use match_outcome::{FailReason, MatchOutcome};
