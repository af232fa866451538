use serde::Serialize;

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// A single product search attempt: manufacturer scope plus free-text filter.
///
/// An empty `term` means "match all products of the manufacturer". Both parts
/// are kept verbatim; only an empty manufacturer is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    manufacturer: String,
    term: String,
}

impl SearchQuery {
    pub fn new(manufacturer: impl Into<String>, term: impl Into<String>) -> DomainResult<Self> {
        let manufacturer = manufacturer.into();
        if manufacturer.is_empty() {
            return Err(DomainError::validation("manufacturer is required"));
        }
        Ok(Self {
            manufacturer,
            term: term.into(),
        })
    }

    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_match_all(&self) -> bool {
        self.term.is_empty()
    }
}

impl ValueObject for SearchQuery {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_manufacturer_is_rejected() {
        assert!(matches!(
            SearchQuery::new("", "bolt"),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn values_are_kept_verbatim() {
        let q = SearchQuery::new("  ", " bolt ").unwrap();
        assert_eq!(q.manufacturer(), "  ");
        assert_eq!(q.term(), " bolt ");
        assert!(!q.is_match_all());
    }

    #[test]
    fn empty_term_matches_all() {
        let q = SearchQuery::new("Acme", "").unwrap();
        assert!(q.is_match_all());
        assert_eq!(q.manufacturer(), "Acme");
    }
}
