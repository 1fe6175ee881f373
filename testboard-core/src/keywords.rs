//! Keyword predicates shared by header detection, column mapping, banner
//! filtering and status classification.

/// A conjunction of substring tests against lower-cased text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordClause {
    /// Terms that must all appear.
    pub all: &'static [&'static str],
    /// Terms that must not appear.
    pub none: &'static [&'static str],
}

impl KeywordClause {
    /// Clause satisfied when every term appears anywhere in the text.
    pub const fn contains(terms: &'static [&'static str]) -> Self {
        Self {
            all: terms,
            none: &[],
        }
    }

    /// Clause satisfied when every term appears and no excluded term does.
    pub const fn all_except(
        all: &'static [&'static str],
        none: &'static [&'static str],
    ) -> Self {
        Self { all, none }
    }

    /// Test the clause against text that is already lower-cased.
    pub fn matches(&self, lowered: &str) -> bool {
        self.all.iter().all(|term| lowered.contains(term))
            && !self.none.iter().any(|term| lowered.contains(term))
    }
}

/// True when any clause matches. An empty clause list never matches.
pub fn matches_any(clauses: &[KeywordClause], lowered: &str) -> bool {
    clauses.iter().any(|clause| clause.matches(lowered))
}
