//! Rebaja
//!
//! Rebaja is a storefront promotion-pricing engine. It normalises the loosely
//! typed promotion feed of a catalogue service into strict records, keeps
//! them in one shared, explicitly invalidated cache, and resolves the single
//! best applicable discount for a product at a point in time.

pub mod catalog;
pub mod fixtures;
pub mod ids;
pub mod prelude;
pub mod products;
pub mod promotions;
pub mod resolver;
pub mod seasons;
