//! Storefront Pricing Demo
//!
//! Loads the fixture promotion feed through the shared cache and prints the
//! price breakdown for every product in the sample catalogue at a point in
//! time. Pass `--at` to reprice the catalogue at a different instant and
//! watch promotions drop in and out of their validity windows.
//!
//! Run with: `cargo run --example storefront`

use anyhow::Result;
use clap::Parser;
use jiff::Timestamp;

use rebaja::{
    catalog::{JsonSource, PromotionCache},
    fixtures::{FIXTURE_INSTANT, PROMOTION_FEED, sample_catalog},
};

/// Arguments for the storefront demo
#[derive(Debug, Parser)]
struct StorefrontArgs {
    /// Instant to price the catalogue at (RFC 3339)
    #[clap(short, long, default_value = FIXTURE_INSTANT)]
    at: String,

    /// Path to a JSON promotion feed to use instead of the fixture feed
    #[clap(short, long)]
    feed: Option<String>,
}

/// Storefront Pricing Demo
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = StorefrontArgs::parse();
    let at: Timestamp = args.at.parse()?;

    let feed = match &args.feed {
        Some(path) => std::fs::read_to_string(path)?,
        None => PROMOTION_FEED.to_owned(),
    };

    let cache = PromotionCache::new(JsonSource::new(feed));
    let snapshot = cache.snapshot_or_empty();

    println!("Pricing at {at}");
    println!(
        "{} promotions live in feed, {} records rejected",
        snapshot.normalized.promotions.len(),
        snapshot.normalized.rejected.len()
    );

    for rejected in &snapshot.normalized.rejected {
        println!(
            "  rejected {}: {}",
            rejected.id.as_deref().unwrap_or("<sin id>"),
            rejected.issue
        );
    }

    println!();

    for product in sample_catalog() {
        let breakdown = snapshot.resolve(&product, at);

        match breakdown.applied() {
            Some(promotion) => println!(
                "product {:>4}  {}  ->  {}  (-{}%, \"{}\", saves {})",
                product.id,
                breakdown.original(),
                breakdown.final_price(),
                breakdown.percent_points(),
                promotion.name,
                breakdown.savings(),
            ),
            None => println!(
                "product {:>4}  {}  (sin descuento)",
                product.id,
                breakdown.original()
            ),
        }
    }

    Ok(())
}
