//! Query heuristics: difficulty classification and explicit depth intent.
//!
//! Both are pure functions of the query text over a [`Lexicon`]; the keyword
//! tables are data, so the rules below hold for any language.

use searchweb_shared::{Lexicon, QueryClass, Strategy};

/// Keyword-driven query heuristics.
#[derive(Debug, Clone)]
pub struct QueryClassifier {
    lexicon: Lexicon,
}

impl QueryClassifier {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Label a query banal or complex.
    ///
    /// Rules, first match wins:
    /// 1. at most `banal_max_words` words → banal
    /// 2. any complexity marker present → complex
    /// 3. at least `complex_min_words` words → complex
    /// 4. otherwise → banal
    pub fn classify(&self, query: &str) -> QueryClass {
        let q = query.trim().to_lowercase();
        let words = q.split_whitespace().count();

        if words <= self.lexicon.banal_max_words {
            return QueryClass::Banal;
        }
        if contains_any(&q, &self.lexicon.complexity_markers) {
            return QueryClass::Complex;
        }
        if words >= self.lexicon.complex_min_words {
            return QueryClass::Complex;
        }
        QueryClass::Banal
    }

    /// Detect an explicit request for deep or quick research.
    ///
    /// Deep markers are checked first, so a query carrying both kinds
    /// resolves to [`Strategy::Deep`].
    pub fn depth_intent(&self, query: &str) -> Option<Strategy> {
        let q = query.to_lowercase();

        if contains_any(&q, &self.lexicon.deep_markers) {
            Some(Strategy::Deep)
        } else if contains_any(&q, &self.lexicon.simple_markers) {
            Some(Strategy::Simple)
        } else {
            None
        }
    }
}

impl Default for QueryClassifier {
    fn default() -> Self {
        Self::new(Lexicon::default())
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .any(|n| !n.is_empty() && haystack.contains(n.as_str()))
}
