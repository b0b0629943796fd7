use chrono::{DateTime, TimeZone, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// First amount in a price text, with an optional leading minus and currency symbol
static PRICE_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(-)?\s*[£$€]?\s*(\d[\d.,]*)").expect("valid regex")
});

/// Accepted amount shapes: `450`, `450.5`, `1,250`, `1,250.00`
static PRICE_AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d{1,2})?$").expect("valid regex")
});

/// Marketplace listing as produced by the listing source
///
/// Every field is tolerant of dirty input. A price that cannot be parsed, or
/// is negative, becomes `None`. Text fields of the wrong JSON type become
/// `None` (or an empty string for `url` and `title`) instead of failing the
/// record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default, deserialize_with = "lenient_text")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub scraped_at: Option<DateTime<Utc>>,
}

impl Listing {
    pub fn new(url: impl Into<String>, title: impl Into<String>, price: Option<Decimal>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            price,
            image_url: None,
            location: None,
            scraped_at: None,
        }
    }

    /// Price if present and strictly positive
    pub fn usable_price(&self) -> Option<Decimal> {
        self.price.filter(|p| *p > Decimal::ZERO)
    }

    pub fn has_price(&self) -> bool {
        self.usable_price().is_some()
    }

    /// Title as every matcher sees it, see [`normalize_text`]
    pub fn title_normalized(&self) -> String {
        normalize_text(&self.title)
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.usable_price() {
            Some(price) => write!(f, "{} - £{}", self.title, price.round()),
            None => write!(f, "{} - No price", self.title),
        }
    }
}

/// Lower-case, trim and collapse internal whitespace
///
/// Titles, candidate names and avoid keywords all go through this, so a
/// double space in a title never hides a keyword.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Parse a raw price value from the listing source.
///
/// Accepts JSON numbers and strings such as `"£1,250"` or `"450.00"`. For
/// strings only the first amount counts: `"£45 (was £60)"` is 45 and
/// `"2 for £30"` is 2. Returns `None` for anything non-numeric, negative, or
/// in an unrecognised format such as `"1.250,00"`.
pub fn parse_price(value: &Value) -> Option<Decimal> {
    let price = match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()?
        }
        Value::String(s) => parse_price_text(s)?,
        _ => return None,
    };

    Some(price).filter(|p| !p.is_sign_negative())
}

fn parse_price_text(text: &str) -> Option<Decimal> {
    let caps = PRICE_TOKEN_RE.captures(text)?;
    if caps.get(1).is_some() {
        return None;
    }

    let amount = caps.get(2)?.as_str().trim_end_matches(['.', ',']);
    if !PRICE_AMOUNT_RE.is_match(amount) {
        return None;
    }

    Decimal::from_str(&amount.replace(',', "")).ok()
}

fn lenient_price<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(parse_price))
}

/// Strings pass through, numbers are rendered, anything else is empty
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// Non-string values become `None`
fn lenient_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Accepts RFC 3339 strings or unix epoch seconds; anything else becomes `None`
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Some(Value::Number(n)) => n.as_f64().and_then(|secs| {
            let whole = secs.trunc() as i64;
            let nanos = (secs.fract() * 1e9) as u32;
            Utc.timestamp_opt(whole, nanos).single()
        }),
        _ => None,
    })
}

/// Catalog entry the operator wants to buy and resell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub full_name: String,
    #[serde(default)]
    pub category: String,
    pub buy_price_min: Decimal,
    pub buy_price_max: Decimal,
    pub sell_target: Decimal,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub fuzzy_patterns: Vec<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

fn default_true() -> bool { true }

impl Product {
    /// Inclusive check against the buy-price band
    pub fn is_price_in_range(&self, price: Decimal) -> bool {
        self.buy_price_min <= price && price <= self.buy_price_max
    }

    /// `sell_target - price`, only when the price is inside the buy band
    pub fn potential_profit(&self, price: Decimal) -> Option<Decimal> {
        if !self.is_price_in_range(price) {
            return None;
        }
        Some(self.sell_target - price)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.brand, self.model)
    }
}

/// Weights applied to the title, price and keyword signals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub title: f64,
    pub price: f64,
    pub keyword: f64,
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.title + self.price + self.keyword
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            title: 0.6,
            price: 0.3,
            keyword: 0.1,
        }
    }
}

/// One accepted (listing, product) pairing
///
/// Only the matching engine builds these, always with a fully computed
/// confidence. The value is read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult<'a> {
    listing: &'a Listing,
    product: &'a Product,
    confidence: f64,
    reasons: Vec<String>,
    potential_profit: Option<Decimal>,
}

impl<'a> MatchResult<'a> {
    pub(crate) fn new(
        listing: &'a Listing,
        product: &'a Product,
        confidence: f64,
        reasons: Vec<String>,
    ) -> Self {
        let potential_profit = listing
            .usable_price()
            .and_then(|price| product.potential_profit(price));

        Self {
            listing,
            product,
            confidence: confidence.clamp(0.0, 100.0),
            reasons,
            potential_profit,
        }
    }

    pub fn listing(&self) -> &'a Listing {
        self.listing
    }

    pub fn product(&self) -> &'a Product {
        self.product
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    pub fn potential_profit(&self) -> Option<Decimal> {
        self.potential_profit
    }

    /// Owned, serializable summary of this match
    pub fn to_record(&self) -> MatchRecord {
        MatchRecord {
            listing: ListingSummary {
                url: self.listing.url.clone(),
                title: self.listing.title.clone(),
                price: self.listing.price,
                location: self.listing.location.clone(),
            },
            product: ProductSummary {
                id: self.product.id,
                brand: self.product.brand.clone(),
                model: self.product.model.clone(),
                full_name: self.product.full_name.clone(),
            },
            confidence: (self.confidence * 100.0).round() / 100.0,
            reasons: self.reasons.clone(),
            potential_profit: self.potential_profit,
        }
    }
}

impl fmt::Display for MatchResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Match: {} - {:.0}% confidence", self.product, self.confidence)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingSummary {
    pub url: String,
    pub title: String,
    pub price: Option<Decimal>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub full_name: String,
}

/// Plain structured record of a match, as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub listing: ListingSummary,
    pub product: ProductSummary,
    pub confidence: f64,
    pub reasons: Vec<String>,
    pub potential_profit: Option<Decimal>,
}
