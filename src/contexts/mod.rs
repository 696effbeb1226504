mod breadcrumb;
mod directive_parser;
mod file_document_store;
mod insertion_locator;
mod last_scene;
mod memory_document_store;
mod normalizer;
mod patch_applier;
mod patch_engine;
mod range_matcher;
mod validator;

pub use breadcrumb::{heading_level, Breadcrumb, BreadcrumbMode, CrumbWalk};
pub use directive_parser::parse;
pub use file_document_store::FileDocumentStore;
pub use insertion_locator::find_insertion_line;
pub use last_scene::{find_marker, preprocess as preprocess_last_scene, MARKER_HEADING};
pub use memory_document_store::MemoryDocumentStore;
pub use normalizer::{map_index, normalize, NormalizedText};
pub use patch_applier::{apply, apply_directive, join_lines, split_lines};
pub use patch_engine::PatchEngine;
pub use range_matcher::{find_range, line_of_offset};
pub use validator::{validate_content, DEFAULT_PREVIEW_LINES};
