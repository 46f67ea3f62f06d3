//! Promotion catalogue
//!
//! One shared, explicitly invalidated promotion cache, injected into
//! consumers instead of each view fetching and holding its own copy of the
//! promotion list.
//!
//! The cache is transport-agnostic: anything that can produce a batch of
//! [`PromotionRecord`]s implements [`PromotionSource`], and HTTP plumbing
//! stays outside this crate. Snapshots are immutable once taken, so a
//! resolve call always sees a consistent promotion set.

use std::sync::{Arc, PoisonError, RwLock};

use jiff::Timestamp;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    products::Product,
    promotions::records::{NormalizedPromotions, PromotionRecord, normalize_all},
    resolver::{PriceBreakdown, resolve_price},
};

/// Errors from fetching or decoding the promotion feed.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source could not be reached or refused the request.
    #[error("promotion source unavailable: {0}")]
    Unavailable(String),

    /// The feed was not a valid JSON array of promotion records.
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}

/// Anything that can produce the current batch of promotion records.
pub trait PromotionSource {
    /// Fetch the full promotion feed.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the feed cannot be obtained or
    /// decoded.
    fn fetch(&self) -> Result<Vec<PromotionRecord>, SourceError>;
}

/// A source backed by a JSON array already in memory.
///
/// The transport layer hands over the response body; this parses it.
#[derive(Debug, Clone)]
pub struct JsonSource {
    json: String,
}

impl JsonSource {
    /// Create a source from a JSON array of promotion records.
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

impl PromotionSource for JsonSource {
    fn fetch(&self) -> Result<Vec<PromotionRecord>, SourceError> {
        Ok(serde_json::from_str(&self.json)?)
    }
}

/// An immutable view of the promotion set at a fetch instant.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Normalised promotions and the rejected-record ledger.
    pub normalized: NormalizedPromotions,

    /// When the feed was fetched; `None` for the empty fallback snapshot.
    pub fetched_at: Option<Timestamp>,
}

impl Snapshot {
    /// Resolve a product's price against this snapshot.
    pub fn resolve<'a>(&self, product: &Product<'a>, at: Timestamp) -> PriceBreakdown<'a> {
        resolve_price(product, &self.normalized.promotions, at)
    }
}

/// A shared promotion cache with explicit invalidation.
///
/// The first [`snapshot`](Self::snapshot) call fetches and normalises the
/// feed; later calls reuse the cached snapshot until
/// [`invalidate`](Self::invalidate) or [`refresh`](Self::refresh).
#[derive(Debug)]
pub struct PromotionCache<S> {
    source: S,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
}

impl<S: PromotionSource> PromotionCache<S> {
    /// Create an empty cache over a source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            snapshot: RwLock::new(None),
        }
    }

    /// Return the cached snapshot, fetching it on first use.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the cache is cold and the source
    /// fails; an already-cached snapshot is returned without touching the
    /// source.
    pub fn snapshot(&self) -> Result<Arc<Snapshot>, SourceError> {
        let cached = self
            .snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        if let Some(snapshot) = cached {
            return Ok(snapshot);
        }

        self.refresh()
    }

    /// Drop the cached snapshot; the next read fetches again.
    pub fn invalidate(&self) {
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = None;

        debug!("promotion cache invalidated");
    }

    /// Fetch the feed now and replace the cached snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the source fails; the previous
    /// snapshot, if any, is left in place.
    pub fn refresh(&self) -> Result<Arc<Snapshot>, SourceError> {
        let records = self.source.fetch()?;

        let snapshot = Arc::new(Snapshot {
            normalized: normalize_all(records),
            fetched_at: Some(Timestamp::now()),
        });

        debug!(
            promotions = snapshot.normalized.promotions.len(),
            rejected = snapshot.normalized.rejected.len(),
            "promotion cache refreshed"
        );

        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) =
            Some(Arc::clone(&snapshot));

        Ok(snapshot)
    }

    /// Return the cached snapshot, degrading to an empty one if the source
    /// fails.
    ///
    /// This is the storefront's failure mode: when the feed cannot be
    /// fetched, every product renders at its full, undiscounted price.
    pub fn snapshot_or_empty(&self) -> Arc<Snapshot> {
        match self.snapshot() {
            Ok(snapshot) => snapshot,
            Err(error) => {
                warn!(%error, "promotion feed unavailable; pricing without discounts");
                Arc::new(Snapshot::default())
            }
        }
    }
}
