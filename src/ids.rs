//! Identifiers
//!
//! Opaque textual identifiers issued by the remote catalogue service.
//!
//! The catalogue emits ids as JSON numbers or strings interchangeably, so the
//! boundary adapter normalises both forms to text once; everything past the
//! boundary compares ids with plain equality.

use std::fmt;

macro_rules! text_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier from its textual form.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Return the identifier as text.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value.to_string())
            }
        }
    };
}

text_id! {
    /// Product identifier.
    ProductId
}

text_id! {
    /// Category identifier.
    CategoryId
}

text_id! {
    /// Promotion identifier.
    PromotionId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_text_forms_compare_equal() {
        assert_eq!(ProductId::from(42), ProductId::from("42"));
    }

    #[test]
    fn display_matches_textual_form() {
        let id = CategoryId::new("electronics");

        assert_eq!(id.to_string(), "electronics");
        assert_eq!(id.as_str(), "electronics");
    }

    #[test]
    fn distinct_values_are_unequal() {
        assert_ne!(PromotionId::from(1), PromotionId::from(2));
    }
}
