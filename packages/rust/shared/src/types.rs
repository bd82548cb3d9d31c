//! Core domain types shared across searchweb crates.

use serde::{Deserialize, Serialize};

use crate::error::SearchWebError;

// ---------------------------------------------------------------------------
// SearchMode
// ---------------------------------------------------------------------------

/// Search mode as requested on the command line or in config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Infer from the query, or ask the user.
    #[default]
    Auto,
    /// One web-search pass.
    Simple,
    /// Three research passes plus a synthesis pass.
    Deep,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Simple => "simple",
            Self::Deep => "deep",
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SearchMode {
    type Err = SearchWebError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "simple" => Ok(Self::Simple),
            "deep" => Ok(Self::Deep),
            other => Err(SearchWebError::validation(format!(
                "invalid mode '{other}': expected 'auto', 'simple', or 'deep'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// A resolved search strategy. `auto` never survives resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Simple,
    Deep,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple => f.write_str("simple"),
            Self::Deep => f.write_str("deep"),
        }
    }
}

impl TryFrom<SearchMode> for Strategy {
    type Error = SearchMode;

    /// Explicit modes map directly; `auto` is handed back to the caller.
    fn try_from(mode: SearchMode) -> std::result::Result<Self, Self::Error> {
        match mode {
            SearchMode::Simple => Ok(Self::Simple),
            SearchMode::Deep => Ok(Self::Deep),
            SearchMode::Auto => Err(mode),
        }
    }
}

// ---------------------------------------------------------------------------
// QueryClass
// ---------------------------------------------------------------------------

/// Heuristic difficulty label for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryClass {
    Banal,
    Complex,
}

impl std::fmt::Display for QueryClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Banal => f.write_str("banal"),
            Self::Complex => f.write_str("complex"),
        }
    }
}
