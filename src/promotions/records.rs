//! Wire records
//!
//! Deserialisation shapes for the catalogue service JSON, plus the
//! normalisation step that turns them into strict [`Promotion`] and
//! [`Product`] values.
//!
//! The feed is loosely typed: ids arrive as numbers or strings, the enabled
//! flag arrives as `1`, `true`, or text (under either the `activo` or
//! `activa` key), and dates arrive with or without a time component. All of
//! that tolerance lives here, applied exactly once. A record that cannot be
//! normalised is rejected with a named [`RecordIssue`] instead of being
//! silently dropped, and never aborts normalisation of its neighbours.

use decimal_percentage::Percentage;
use jiff::{
    Timestamp,
    civil::{Date, DateTime},
    tz::TimeZone,
};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    products::Product,
    promotions::{Promotion, Scope, ValidityWindow},
    seasons::Season,
};

/// A promotion as emitted by the catalogue service.
#[derive(Debug, Clone, Deserialize)]
pub struct PromotionRecord {
    /// Promotion identifier.
    pub id: Option<RawId>,

    /// Display label.
    pub nombre: Option<String>,

    /// Matching strategy: `producto`, `categoria`, or `temporada`.
    pub tipo: Option<String>,

    /// Discount in percent points, expected in `(0, 100]`.
    pub porcentaje: Option<RawNumber>,

    /// Enablement flag; the feed uses both spellings.
    #[serde(alias = "activa")]
    pub activo: Option<RawFlag>,

    /// Inclusive start of the validity window.
    pub fecha_inicio: Option<String>,

    /// Inclusive end of the validity window.
    pub fecha_fin: Option<String>,

    /// Target product when `tipo` is `producto`.
    pub producto_id: Option<RawId>,

    /// Target category when `tipo` is `categoria`.
    pub categoria_id: Option<RawId>,

    /// Season label when `tipo` is `temporada`.
    pub valor: Option<String>,
}

/// A product as emitted by the catalogue service.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    /// Product identifier.
    pub id: RawId,

    /// Base price in major units; number or numeric string.
    pub precio: Option<RawNumber>,

    /// Owning category, if any.
    pub categoria_id: Option<RawId>,

    /// Season label, if any.
    pub temporada: Option<String>,
}

/// An id that arrives as a JSON number or string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    /// Numeric wire form.
    Number(i64),

    /// Textual wire form.
    Text(String),
}

impl RawId {
    /// Normalise to the textual form.
    pub fn into_text(self) -> String {
        match self {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s.trim().to_owned(),
        }
    }
}

/// A number that arrives as a JSON number or numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    /// Numeric wire form.
    Number(f64),

    /// Textual wire form.
    Text(String),
}

impl RawNumber {
    /// Convert to a decimal, if the wire value is a finite number.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            RawNumber::Number(n) => Decimal::from_f64_retain(*n),
            RawNumber::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// A boolean-ish flag: `true`, `1`, `"1"`, `"true"`, and friends.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawFlag {
    /// Proper boolean.
    Bool(bool),

    /// Numeric flag; non-zero is truthy.
    Number(i64),

    /// Textual flag.
    Text(String),
}

impl RawFlag {
    /// Interpret the flag, or `None` when the text form is unrecognised.
    pub fn truthiness(&self) -> Option<bool> {
        match self {
            RawFlag::Bool(b) => Some(*b),
            RawFlag::Number(n) => Some(*n != 0),
            RawFlag::Text(s) => match s.trim().to_lowercase().as_str() {
                "1" | "true" | "t" | "yes" | "si" | "sí" => Some(true),
                "" | "0" | "false" | "f" | "no" => Some(false),
                _ => None,
            },
        }
    }
}

/// Why a wire record could not be normalised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordIssue {
    /// A field required for this record's kind is absent.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// The `tipo` field names no known matching strategy.
    #[error("unknown promotion kind `{0}`")]
    UnknownKind(String),

    /// The enabled flag text is neither truthy nor falsy.
    #[error("unrecognised enabled flag `{0}`")]
    AmbiguousFlag(String),

    /// A numeric field could not be parsed.
    #[error("could not parse `{value}` in field `{field}` as a number")]
    BadNumber {
        /// Field the value came from.
        field: &'static str,
        /// Offending wire value.
        value: String,
    },

    /// The percentage lies outside `(0, 100]`.
    #[error("percentage {0} is outside (0, 100]")]
    PercentOutOfRange(Decimal),

    /// A date field could not be parsed.
    #[error("could not parse `{value}` in field `{field}` as a date")]
    BadDate {
        /// Field the value came from.
        field: &'static str,
        /// Offending wire value.
        value: String,
    },
}

/// A wire record that failed normalisation, kept for observability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    /// The record's id, when one was present.
    pub id: Option<String>,

    /// Why it was rejected.
    pub issue: RecordIssue,
}

/// Result of normalising a batch of promotion records.
#[derive(Debug, Clone, Default)]
pub struct NormalizedPromotions {
    /// Strict promotions, in wire order.
    pub promotions: Vec<Promotion>,

    /// Records that failed normalisation, in wire order.
    pub rejected: SmallVec<[RejectedRecord; 4]>,
}

/// Normalise a batch of promotion records.
///
/// Good records come out as strict [`Promotion`]s in their original order;
/// bad records land in the rejected ledger with the reason, and are logged
/// at `warn`. A bad record never affects its neighbours.
pub fn normalize_all(records: Vec<PromotionRecord>) -> NormalizedPromotions {
    let mut normalized = NormalizedPromotions::default();

    for record in records {
        let id = record.id.clone().map(RawId::into_text);

        match record.normalize() {
            Ok(promotion) => normalized.promotions.push(promotion),
            Err(issue) => {
                warn!(id = id.as_deref(), %issue, "rejected promotion record");
                normalized.rejected.push(RejectedRecord { id, issue });
            }
        }
    }

    debug!(
        accepted = normalized.promotions.len(),
        rejected = normalized.rejected.len(),
        "normalised promotion records"
    );

    normalized
}

impl PromotionRecord {
    /// Normalise this record into a strict [`Promotion`].
    ///
    /// # Errors
    ///
    /// Returns a [`RecordIssue`] naming the first defect found: a missing
    /// required field, an unknown `tipo`, an unrecognised flag, a percentage
    /// outside `(0, 100]`, or an unparseable number or date.
    pub fn normalize(self) -> Result<Promotion, RecordIssue> {
        let id = self
            .id
            .ok_or(RecordIssue::MissingField("id"))?
            .into_text()
            .into();

        let scope = scope_from_parts(self.tipo, self.producto_id, self.categoria_id, self.valor)?;

        let percent = percent_from_points(self.porcentaje)?;

        let enabled = match self.activo {
            None => false,
            Some(flag) => match flag.truthiness() {
                Some(enabled) => enabled,
                None => {
                    let RawFlag::Text(text) = flag else {
                        unreachable!("only text flags can be unrecognised")
                    };
                    return Err(RecordIssue::AmbiguousFlag(text));
                }
            },
        };

        let starts = parse_bound(self.fecha_inicio, "fecha_inicio", DayBound::Start)?;
        let ends = parse_bound(self.fecha_fin, "fecha_fin", DayBound::End)?;

        Ok(Promotion {
            id,
            name: self.nombre.unwrap_or_default(),
            scope,
            percent,
            enabled,
            window: ValidityWindow::new(starts, ends),
        })
    }
}

impl ProductRecord {
    /// Normalise this record into a [`Product`] priced in `currency`.
    ///
    /// A missing, unparseable, or negative price becomes a zero price, which
    /// the resolver treats as "no price known". This mirrors how the
    /// storefront degrades rather than erroring on bad catalogue data.
    pub fn into_product(self, currency: &Currency) -> Product<'_> {
        let price = self
            .precio
            .as_ref()
            .and_then(RawNumber::to_decimal)
            .filter(Decimal::is_sign_positive)
            .map_or_else(
                || Money::from_minor(0, currency),
                |amount| money_from_decimal(amount, currency),
            );

        let mut product = Product::new(self.id.into_text(), price);
        product.category = self.categoria_id.map(|id| id.into_text().into());
        product.season = self.temporada.map(Season::new);

        product
    }
}

/// Which end of a validity window a bare date stands for.
#[derive(Debug, Clone, Copy)]
enum DayBound {
    Start,
    End,
}

fn scope_from_parts(
    tipo: Option<String>,
    producto_id: Option<RawId>,
    categoria_id: Option<RawId>,
    valor: Option<String>,
) -> Result<Scope, RecordIssue> {
    let tipo = tipo.ok_or(RecordIssue::MissingField("tipo"))?;

    match tipo.trim().to_lowercase().as_str() {
        "producto" => {
            let id = producto_id.ok_or(RecordIssue::MissingField("producto_id"))?;
            Ok(Scope::Product(id.into_text().into()))
        }
        "categoria" | "categoría" => {
            let id = categoria_id.ok_or(RecordIssue::MissingField("categoria_id"))?;
            Ok(Scope::Category(id.into_text().into()))
        }
        "temporada" => {
            let valor = valor.ok_or(RecordIssue::MissingField("valor"))?;
            Ok(Scope::Season(Season::new(valor)))
        }
        _ => Err(RecordIssue::UnknownKind(tipo)),
    }
}

fn percent_from_points(points: Option<RawNumber>) -> Result<Percentage, RecordIssue> {
    let raw = points.ok_or(RecordIssue::MissingField("porcentaje"))?;

    let points = raw.to_decimal().ok_or_else(|| RecordIssue::BadNumber {
        field: "porcentaje",
        value: raw_number_text(&raw),
    })?;

    if points <= Decimal::ZERO || points > Decimal::ONE_HUNDRED {
        return Err(RecordIssue::PercentOutOfRange(points));
    }

    Ok(Percentage::from(points / Decimal::ONE_HUNDRED))
}

fn raw_number_text(raw: &RawNumber) -> String {
    match raw {
        RawNumber::Number(n) => n.to_string(),
        RawNumber::Text(s) => s.clone(),
    }
}

fn parse_bound(
    value: Option<String>,
    field: &'static str,
    bound: DayBound,
) -> Result<Timestamp, RecordIssue> {
    let value = value.ok_or(RecordIssue::MissingField(field))?;

    parse_stamp(&value, bound).ok_or(RecordIssue::BadDate { field, value })
}

/// Parse a wire date: RFC 3339 timestamp, civil date-time (taken as UTC),
/// or bare date. A bare start date means the start of that day; a bare end
/// date means the end of it, keeping the window inclusive.
fn parse_stamp(value: &str, bound: DayBound) -> Option<Timestamp> {
    let value = value.trim();

    // A time component always carries a colon; a bare date never does.
    if !value.contains(':') {
        let date = value.parse::<Date>().ok()?;

        let datetime = match bound {
            DayBound::Start => date.at(0, 0, 0, 0),
            DayBound::End => date.at(23, 59, 59, 999_999_999),
        };

        return to_utc_stamp(datetime);
    }

    if let Ok(stamp) = value.parse::<Timestamp>() {
        return Some(stamp);
    }

    let datetime = value.parse::<DateTime>().ok()?;

    to_utc_stamp(datetime)
}

fn to_utc_stamp(datetime: DateTime) -> Option<Timestamp> {
    let zoned = datetime.to_zoned(TimeZone::UTC).ok()?;

    Some(zoned.timestamp())
}

fn money_from_decimal(amount: Decimal, currency: &Currency) -> Money<'_, Currency> {
    let scale = Decimal::from(10u64.pow(currency.exponent));
    let minor = (amount * scale)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0);

    Money::from_minor(minor.max(0), currency)
}
