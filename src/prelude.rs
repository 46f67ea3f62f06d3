//! Rebaja prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    catalog::{JsonSource, PromotionCache, PromotionSource, Snapshot, SourceError},
    ids::{CategoryId, ProductId, PromotionId},
    products::Product,
    promotions::{
        Promotion, Scope, ValidityWindow,
        classify::{RejectReason, Validity, classify, valid_at},
        records::{
            NormalizedPromotions, ProductRecord, PromotionRecord, RecordIssue, RejectedRecord,
            normalize_all,
        },
    },
    resolver::{PriceBreakdown, resolve_price, resolve_price_now},
    seasons::Season,
};
