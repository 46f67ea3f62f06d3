//! Fixtures
//!
//! A small sample catalogue and promotion feed shared by the demo and the
//! integration tests. The feed deliberately exercises the wire tolerances:
//! mixed id forms, both flag spellings, bare dates, and one broken record.

use rusty_money::{Money, iso};

use crate::products::Product;

/// A sample promotion feed, as the catalogue service would emit it.
///
/// Evaluated at [`FIXTURE_INSTANT`]: the summer category promotion, the
/// flash product deal, and the season promotion are live; the spring
/// promotion has expired, one record is disabled, and the last record has a
/// malformed end date and lands in the rejected ledger.
pub const PROMOTION_FEED: &str = r#"[
    {
        "id": 1,
        "nombre": "Rebajas de verano",
        "tipo": "categoria",
        "porcentaje": 20,
        "activo": 1,
        "fecha_inicio": "2024-06-01",
        "fecha_fin": "2024-08-31",
        "categoria_id": 5
    },
    {
        "id": "2",
        "nombre": "Oferta flash: sandalias",
        "tipo": "producto",
        "porcentaje": "35",
        "activa": "true",
        "fecha_inicio": "2024-06-10T00:00:00Z",
        "fecha_fin": "2024-06-20T23:59:59Z",
        "producto_id": "101"
    },
    {
        "id": 3,
        "nombre": "Temporada de verano",
        "tipo": "temporada",
        "porcentaje": 10,
        "activo": true,
        "fecha_inicio": "2024-06-01",
        "fecha_fin": "2024-08-31",
        "valor": "Verano"
    },
    {
        "id": 4,
        "nombre": "Rebajas de primavera",
        "tipo": "categoria",
        "porcentaje": 25,
        "activo": 1,
        "fecha_inicio": "2024-03-01",
        "fecha_fin": "2024-05-31",
        "categoria_id": 5
    },
    {
        "id": 5,
        "nombre": "Liquidación (pausada)",
        "tipo": "categoria",
        "porcentaje": 50,
        "activo": 0,
        "fecha_inicio": "2024-01-01",
        "fecha_fin": "2024-12-31",
        "categoria_id": 5
    },
    {
        "id": 6,
        "nombre": "Registro corrupto",
        "tipo": "categoria",
        "porcentaje": 15,
        "activo": 1,
        "fecha_inicio": "2024-06-01",
        "fecha_fin": "cuando se acabe",
        "categoria_id": 5
    }
]"#;

/// An instant at which the fixture feed has three live promotions.
pub const FIXTURE_INSTANT: &str = "2024-06-15T12:00:00Z";

/// A small catalogue of products in euros.
pub fn sample_catalog() -> Vec<Product<'static>> {
    vec![
        Product::new(101u64, Money::from_minor(4_500, iso::EUR))
            .with_category(5u64)
            .with_season("Verano"),
        Product::new(102u64, Money::from_minor(12_000, iso::EUR)).with_category(5u64),
        Product::new(201u64, Money::from_minor(8_900, iso::EUR))
            .with_category(7u64)
            .with_season("verano"),
        Product::new(301u64, Money::from_minor(2_500, iso::EUR)),
    ]
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::promotions::records::{PromotionRecord, normalize_all};

    use super::*;

    #[test]
    fn feed_normalises_to_five_promotions_and_one_reject() -> TestResult {
        let records: Vec<PromotionRecord> = serde_json::from_str(PROMOTION_FEED)?;
        let normalized = normalize_all(records);

        assert_eq!(normalized.promotions.len(), 5);
        assert_eq!(normalized.rejected.len(), 1);

        Ok(())
    }

    #[test]
    fn catalog_covers_every_match_dimension() {
        let catalog = sample_catalog();

        assert!(catalog.iter().any(|p| p.category.is_some() && p.season.is_some()));
        assert!(catalog.iter().any(|p| p.category.is_some() && p.season.is_none()));
        assert!(catalog.iter().any(|p| p.category.is_none() && p.season.is_none()));
    }
}
