//! Promotion validity classification
//!
//! A promotion participates in pricing only while it is enabled and inside
//! its validity window. Rather than silently dropping everything else, the
//! classifier names the reason a promotion is out of play, so callers and
//! tests can observe exactly why a discount did not apply.

use jiff::Timestamp;
use thiserror::Error;

use super::Promotion;

/// Outcome of classifying a promotion at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    /// Enabled and inside its validity window.
    Valid,

    /// Out of play, with the reason.
    Invalid(RejectReason),
}

impl Validity {
    /// Return whether the promotion participates in pricing.
    pub fn is_valid(&self) -> bool {
        matches!(self, Validity::Valid)
    }
}

/// Why a promotion is out of play at the evaluation instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// Administratively disabled.
    #[error("promotion is disabled")]
    Disabled,

    /// The validity window has not opened yet.
    #[error("promotion has not started yet")]
    NotYetStarted,

    /// The validity window has closed.
    #[error("promotion has expired")]
    Expired,
}

/// Classify a promotion at the given instant.
///
/// Both window bounds are inclusive: a promotion whose start or end equals
/// `at` is valid. The disabled check runs first, so a disabled promotion is
/// reported as [`RejectReason::Disabled`] regardless of its dates.
pub fn classify(promotion: &Promotion, at: Timestamp) -> Validity {
    if !promotion.enabled {
        return Validity::Invalid(RejectReason::Disabled);
    }

    if at < promotion.window.starts() {
        return Validity::Invalid(RejectReason::NotYetStarted);
    }

    if at > promotion.window.ends() {
        return Validity::Invalid(RejectReason::Expired);
    }

    Validity::Valid
}

/// Iterate over the promotions valid at the given instant, preserving input
/// order.
pub fn valid_at(promotions: &[Promotion], at: Timestamp) -> impl Iterator<Item = &Promotion> {
    promotions
        .iter()
        .filter(move |promotion| classify(promotion, at).is_valid())
}
