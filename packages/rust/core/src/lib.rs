//! Query heuristics and pipeline orchestration for searchweb.
//!
//! This crate ties together the changelog short-circuit, mode resolution,
//! and the research strategies into one end-to-end workflow
//! ([`pipeline::run_search`]).

pub mod classify;
pub mod pipeline;

pub use classify::QueryClassifier;
pub use pipeline::{
    MODE_MENU, Outcome, ProgressReporter, Resolution, SearchRequest, SilentProgress,
    resolve_strategy, run_search,
};
pub use searchweb_research::SearchParams;
