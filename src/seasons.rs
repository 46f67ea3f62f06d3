//! Seasons
//!
//! Free-text season labels ("verano", "navidad") used by season-scoped
//! promotions. Matching is case-insensitive, so the label is trimmed and
//! case-folded on construction and compared with plain equality afterwards.

use std::fmt;

/// A normalised season label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Season(String);

impl Season {
    /// Create a season label, trimming surrounding whitespace and folding case.
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(label.as_ref().trim().to_lowercase())
    }

    /// Return the normalised label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Season {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(Season::new("Verano"), Season::new("verano"));
        assert_eq!(Season::new("VERANO"), Season::new("verano"));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(Season::new("  invierno "), Season::new("invierno"));
    }

    #[test]
    fn different_labels_are_unequal() {
        assert_ne!(Season::new("verano"), Season::new("invierno"));
    }
}
