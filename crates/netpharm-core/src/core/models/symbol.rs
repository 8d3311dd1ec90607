use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;

/// A protein or gene symbol in its canonical, upper-case form.
///
/// Two symbols that differ only in case or surrounding whitespace are the same entity,
/// so every set operation in the pipeline goes through this type rather than raw strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Normalizes a raw identifier.
    ///
    /// # Return
    ///
    /// Returns `None` when the identifier is empty after trimming.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_uppercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn normalizes_case_and_whitespace() {
        let a = Symbol::new("  tp53 ").unwrap();
        let b = Symbol::new("TP53").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "TP53");
    }

    #[test]
    fn blank_identifiers_are_rejected() {
        assert!(Symbol::new("").is_none());
        assert!(Symbol::new("   \t").is_none());
    }

    #[test]
    fn set_lookup_by_str_uses_canonical_form() {
        let set: HashSet<Symbol> = ["egfr", "Akt1"].iter().filter_map(|s| Symbol::new(s)).collect();
        assert!(set.contains("EGFR"));
        assert!(set.contains("AKT1"));
        assert!(!set.contains("akt1"));
    }
}
