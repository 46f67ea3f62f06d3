//! Integration tests for the shared promotion cache and the fixture feed.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use rust_decimal::Decimal;
use rusty_money::{Money, iso};
use testresult::TestResult;

use rebaja::{
    catalog::{JsonSource, PromotionCache, PromotionSource, SourceError},
    fixtures::{FIXTURE_INSTANT, PROMOTION_FEED, sample_catalog},
    promotions::records::PromotionRecord,
};

/// The fixture feed, priced through the cache at the fixture instant:
/// product 101 gets the 35% flash deal (beating the 20% category promotion),
/// product 102 gets the 20% category promotion, product 201 only matches the
/// 10% season promotion, and product 301 matches nothing.
#[test]
fn fixture_catalog_prices_through_the_cache() -> TestResult {
    let cache = PromotionCache::new(JsonSource::new(PROMOTION_FEED));
    let snapshot = cache.snapshot()?;
    let at = FIXTURE_INSTANT.parse()?;

    let expectations = [
        (Money::from_minor(2_925, iso::EUR), Decimal::from(35)),
        (Money::from_minor(9_600, iso::EUR), Decimal::from(20)),
        (Money::from_minor(8_010, iso::EUR), Decimal::from(10)),
        (Money::from_minor(2_500, iso::EUR), Decimal::ZERO),
    ];

    let catalog = sample_catalog();
    assert_eq!(catalog.len(), expectations.len(), "fixture drift");

    for (product, (final_price, points)) in catalog.iter().zip(expectations) {
        let breakdown = snapshot.resolve(product, at);

        assert_eq!(
            breakdown.final_price(),
            final_price,
            "unexpected price for product {}",
            product.id
        );
        assert_eq!(
            breakdown.percent_points(),
            points,
            "unexpected discount for product {}",
            product.id
        );
    }

    Ok(())
}

/// The corrupt fixture record lands in the rejected ledger without
/// affecting its neighbours.
#[test]
fn fixture_feed_rejects_only_the_corrupt_record() -> TestResult {
    let cache = PromotionCache::new(JsonSource::new(PROMOTION_FEED));
    let snapshot = cache.snapshot()?;

    assert_eq!(snapshot.normalized.promotions.len(), 5);

    let rejected_ids: Vec<_> = snapshot
        .normalized
        .rejected
        .iter()
        .map(|rejected| rejected.id.clone())
        .collect();

    assert_eq!(rejected_ids, vec![Some("6".to_owned())]);

    Ok(())
}

/// A source that counts fetches and optionally fails.
struct FlakySource {
    fetches: Arc<AtomicUsize>,
    fail: bool,
}

impl PromotionSource for FlakySource {
    fn fetch(&self) -> Result<Vec<PromotionRecord>, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(SourceError::Unavailable("timeout".to_owned()));
        }

        Ok(serde_json::from_str(PROMOTION_FEED)?)
    }
}

#[test]
fn cache_is_shared_across_consumers_and_fetches_once() -> TestResult {
    let fetches = Arc::new(AtomicUsize::new(0));
    let cache = Arc::new(PromotionCache::new(FlakySource {
        fetches: Arc::clone(&fetches),
        fail: false,
    }));

    // Several consumers sharing one cache, as opposed to per-view copies.
    for _ in 0..4 {
        let consumer = Arc::clone(&cache);
        let _snapshot = consumer.snapshot()?;
    }

    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    Ok(())
}

#[test]
fn refresh_replaces_the_snapshot() -> TestResult {
    let fetches = Arc::new(AtomicUsize::new(0));
    let cache = PromotionCache::new(FlakySource {
        fetches: Arc::clone(&fetches),
        fail: false,
    });

    let before = cache.snapshot()?;
    let after = cache.refresh()?;

    assert_eq!(fetches.load(Ordering::SeqCst), 2);
    assert!(
        !Arc::ptr_eq(&before, &after),
        "refresh should produce a new snapshot"
    );

    Ok(())
}

/// When the feed cannot be fetched at all, consumers degrade to an empty
/// snapshot and every product prices at its full, undiscounted value.
#[test]
fn unavailable_feed_degrades_to_full_prices() -> TestResult {
    let cache = PromotionCache::new(FlakySource {
        fetches: Arc::new(AtomicUsize::new(0)),
        fail: true,
    });

    let snapshot = cache.snapshot_or_empty();
    let at = FIXTURE_INSTANT.parse()?;

    for product in sample_catalog() {
        let breakdown = snapshot.resolve(&product, at);

        assert_eq!(breakdown.final_price(), breakdown.original());
        assert!(breakdown.applied().is_none());
    }

    Ok(())
}
