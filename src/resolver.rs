//! Promotion resolution
//!
//! The pure decision function at the heart of storefront pricing: given one
//! product and the current promotion snapshot, pick the single best
//! applicable discount and compute the resulting price breakdown.

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};
use tracing::warn;

use crate::{
    products::Product,
    promotions::{Promotion, classify::classify},
};

/// The computed price of a product under its best promotion.
///
/// Breakdowns are transient view-model values, recomputed on demand; they are
/// never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBreakdown<'a> {
    original: Money<'a, Currency>,
    final_price: Money<'a, Currency>,
    savings: Money<'a, Currency>,
    percent: Percentage,
    applied: Option<Promotion>,
}

impl<'a> PriceBreakdown<'a> {
    /// Breakdown for a product with no known price.
    fn unknown_price(currency: &'a Currency) -> Self {
        Self::undiscounted(Money::from_minor(0, currency))
    }

    /// Breakdown with no promotion applied.
    fn undiscounted(price: Money<'a, Currency>) -> Self {
        Self {
            original: price,
            final_price: price,
            savings: Money::from_minor(0, price.currency()),
            percent: Percentage::from(0.0),
            applied: None,
        }
    }

    /// The product's base price.
    pub fn original(&self) -> Money<'a, Currency> {
        self.original
    }

    /// The price after the best discount.
    pub fn final_price(&self) -> Money<'a, Currency> {
        self.final_price
    }

    /// The absolute amount saved.
    pub fn savings(&self) -> Money<'a, Currency> {
        self.savings
    }

    /// The winning fractional discount; zero when no promotion applied.
    pub fn percent(&self) -> Percentage {
        self.percent
    }

    /// The winning discount in percent points, for display.
    pub fn percent_points(&self) -> Decimal {
        ((self.percent * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2)
    }

    /// The winning promotion, if any.
    pub fn applied(&self) -> Option<&Promotion> {
        self.applied.as_ref()
    }

    /// Whether any discount applied.
    pub fn is_discounted(&self) -> bool {
        self.applied.is_some()
    }
}

/// Resolve the best applicable discount for a product at an instant.
///
/// The winner is the valid, applicable promotion with the strictly highest
/// percentage. Equal percentages are broken by scope specificity (product
/// beats category beats season); remaining ties keep the earliest promotion
/// in input order.
///
/// This never fails: a product with no known price yields an all-zero
/// breakdown, an empty or entirely inapplicable promotion list yields the
/// undiscounted price, and an internal arithmetic conversion failure
/// degrades to the undiscounted price with a warning.
pub fn resolve_price<'a>(
    product: &Product<'a>,
    promotions: &[Promotion],
    at: Timestamp,
) -> PriceBreakdown<'a> {
    let original_minor = product.price.to_minor_units();

    if original_minor <= 0 {
        return PriceBreakdown::unknown_price(product.price.currency());
    }

    let mut best: Option<&Promotion> = None;

    for promotion in promotions {
        if !classify(promotion, at).is_valid() {
            continue;
        }

        if !promotion.applies_to(product) {
            continue;
        }

        if best.is_none_or(|incumbent| wins_over(promotion, incumbent)) {
            best = Some(promotion);
        }
    }

    let Some(winner) = best else {
        return PriceBreakdown::undiscounted(product.price);
    };

    let Some(savings_minor) = percent_of_minor(winner.percent, original_minor) else {
        warn!(
            promotion = %winner.id,
            "discount arithmetic failed; falling back to undiscounted price"
        );
        return PriceBreakdown::undiscounted(product.price);
    };

    let currency = product.price.currency();
    let final_minor = original_minor.saturating_sub(savings_minor).max(0);

    PriceBreakdown {
        original: product.price,
        final_price: Money::from_minor(final_minor, currency),
        savings: Money::from_minor(savings_minor, currency),
        percent: winner.percent,
        applied: Some(winner.clone()),
    }
}

/// Resolve at the current instant.
pub fn resolve_price_now<'a>(
    product: &Product<'a>,
    promotions: &[Promotion],
) -> PriceBreakdown<'a> {
    resolve_price(product, promotions, Timestamp::now())
}

/// Whether `challenger` replaces `incumbent` as the running best. Strict
/// comparisons keep the earliest promotion on full ties.
fn wins_over(challenger: &Promotion, incumbent: &Promotion) -> bool {
    let challenger_percent = challenger.percent * Decimal::ONE;
    let incumbent_percent = incumbent.percent * Decimal::ONE;

    challenger_percent > incumbent_percent
        || (challenger_percent == incumbent_percent
            && challenger.scope.specificity() > incumbent.scope.specificity())
}

/// Apply a fractional percentage to an amount in minor units, rounding
/// midpoints away from zero.
fn percent_of_minor(percent: Percentage, minor: i64) -> Option<i64> {
    let minor = Decimal::from_i64(minor)?;

    (percent * minor)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}
