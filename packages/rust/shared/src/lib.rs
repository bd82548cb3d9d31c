//! Shared types, error model, and configuration for searchweb.
//!
//! This crate is the foundation depended on by all other searchweb crates.
//! It provides:
//! - [`SearchWebError`] — the unified error type
//! - Domain types ([`SearchMode`], [`Strategy`], [`QueryClass`])
//! - Configuration ([`AppConfig`], [`Lexicon`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ChangelogConfig, DefaultsConfig, Lexicon, MAX_RESULTS_RANGE, OpenRouterConfig,
    config_dir, config_file_path, load_config, load_config_from, validate_max_results,
};
pub use error::{Result, SearchWebError};
pub use types::{QueryClass, SearchMode, Strategy};
