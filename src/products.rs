//! Products
//!
//! The entity being priced. Prices are held in minor units via [`Money`];
//! category and season are optional and simply reduce the promotions that can
//! match.

use rusty_money::{Money, iso::Currency};

use crate::{
    ids::{CategoryId, ProductId},
    seasons::Season,
};

/// A product from the storefront catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Product identifier.
    pub id: ProductId,

    /// Base price before any promotion.
    pub price: Money<'a, Currency>,

    /// Owning category, if any.
    pub category: Option<CategoryId>,

    /// Season label, if any.
    pub season: Option<Season>,
}

impl<'a> Product<'a> {
    /// Create a product with no category or season.
    pub fn new(id: impl Into<ProductId>, price: Money<'a, Currency>) -> Self {
        Self {
            id: id.into(),
            price,
            category: None,
            season: None,
        }
    }

    /// Attach a category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<CategoryId>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Attach a season label.
    #[must_use]
    pub fn with_season(mut self, season: impl Into<Season>) -> Self {
        self.season = Some(season.into());
        self
    }
}
