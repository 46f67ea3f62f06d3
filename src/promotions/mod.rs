//! Promotions
//!
//! Strict internal promotion records. Raw catalogue JSON is normalised into
//! these types once, at the boundary (see [`records`]); everything here
//! operates on validated data only.

use decimal_percentage::Percentage;
use jiff::Timestamp;

use crate::{
    ids::{CategoryId, ProductId, PromotionId},
    products::Product,
    seasons::Season,
};

pub mod classify;
pub mod records;

/// A percentage discount rule scoped to a product, category, or season.
#[derive(Debug, Clone, PartialEq)]
pub struct Promotion {
    /// Promotion identifier.
    pub id: PromotionId,

    /// Display label.
    pub name: String,

    /// What this promotion matches against.
    pub scope: Scope,

    /// Fractional discount, in `(0, 1]`.
    pub percent: Percentage,

    /// Administrative enablement flag.
    pub enabled: bool,

    /// Inclusive validity window.
    pub window: ValidityWindow,
}

impl Promotion {
    /// Return whether this promotion's scope matches the given product.
    ///
    /// Applicability is independent of validity; see
    /// [`classify::classify`] for the enabled/date checks.
    pub fn applies_to(&self, product: &Product<'_>) -> bool {
        self.scope.matches(product)
    }
}

/// Matching strategy for a promotion, from most to least specific.
#[derive(Debug, Clone, PartialEq)]
pub enum Scope {
    /// Matches a single product by id.
    Product(ProductId),

    /// Matches every product in a category.
    Category(CategoryId),

    /// Matches every product carrying a season label.
    Season(Season),
}

impl Scope {
    /// Return whether the scope matches the given product.
    pub fn matches(&self, product: &Product<'_>) -> bool {
        match self {
            Scope::Product(id) => *id == product.id,
            Scope::Category(id) => product.category.as_ref() == Some(id),
            Scope::Season(season) => product.season.as_ref() == Some(season),
        }
    }

    /// Rank used to break ties between equal percentages: a product-scoped
    /// promotion beats a category-scoped one, which beats a season-scoped one.
    pub fn specificity(&self) -> u8 {
        match self {
            Scope::Product(_) => 2,
            Scope::Category(_) => 1,
            Scope::Season(_) => 0,
        }
    }
}

/// An inclusive `[starts, ends]` validity window.
///
/// An inverted window (`starts > ends`) is representable and simply never
/// contains any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityWindow {
    starts: Timestamp,
    ends: Timestamp,
}

impl ValidityWindow {
    /// Create a window from its inclusive bounds.
    pub fn new(starts: Timestamp, ends: Timestamp) -> Self {
        Self { starts, ends }
    }

    /// Return the inclusive start bound.
    pub fn starts(&self) -> Timestamp {
        self.starts
    }

    /// Return the inclusive end bound.
    pub fn ends(&self) -> Timestamp {
        self.ends
    }

    /// Return whether the instant falls within the window, bounds included.
    pub fn contains(&self, at: Timestamp) -> bool {
        at >= self.starts && at <= self.ends
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso};
    use testresult::TestResult;

    use super::*;

    fn window(starts: &str, ends: &str) -> TestResult<ValidityWindow> {
        Ok(ValidityWindow::new(starts.parse()?, ends.parse()?))
    }

    #[test]
    fn window_bounds_are_inclusive() -> TestResult {
        let window = window("2024-06-01T00:00:00Z", "2024-06-30T23:59:59Z")?;

        assert!(window.contains("2024-06-01T00:00:00Z".parse()?));
        assert!(window.contains("2024-06-30T23:59:59Z".parse()?));
        assert!(window.contains("2024-06-15T12:00:00Z".parse()?));
        assert!(!window.contains("2024-05-31T23:59:59Z".parse()?));
        assert!(!window.contains("2024-07-01T00:00:00Z".parse()?));

        Ok(())
    }

    #[test]
    fn inverted_window_contains_nothing() -> TestResult {
        let window = window("2024-06-30T00:00:00Z", "2024-06-01T00:00:00Z")?;

        assert!(!window.contains("2024-06-15T12:00:00Z".parse()?));

        Ok(())
    }

    #[test]
    fn product_scope_matches_by_id_only() {
        let product = Product::new(1u64, Money::from_minor(1000, iso::EUR)).with_category(5u64);

        assert!(Scope::Product(1.into()).matches(&product));
        assert!(!Scope::Product(2.into()).matches(&product));
    }

    #[test]
    fn category_scope_requires_matching_category() {
        let with_category = Product::new(1u64, Money::from_minor(1000, iso::EUR)).with_category(5u64);
        let without_category = Product::new(2u64, Money::from_minor(1000, iso::EUR));

        assert!(Scope::Category(5.into()).matches(&with_category));
        assert!(!Scope::Category(6.into()).matches(&with_category));
        assert!(!Scope::Category(5.into()).matches(&without_category));
    }

    #[test]
    fn season_scope_matches_case_insensitively() {
        let product = Product::new(1u64, Money::from_minor(1000, iso::EUR)).with_season("verano");

        assert!(Scope::Season(Season::new("Verano")).matches(&product));
        assert!(!Scope::Season(Season::new("invierno")).matches(&product));
    }

    #[test]
    fn specificity_prefers_narrower_scopes() {
        assert!(Scope::Product(1.into()).specificity() > Scope::Category(1.into()).specificity());
        assert!(
            Scope::Category(1.into()).specificity()
                > Scope::Season(Season::new("verano")).specificity()
        );
    }
}
