use std::collections::HashSet;
use crate::core::signal::{SignalMatcher, SignalScore};
use crate::models::{normalize_text, Listing, Product};

/// Binary gate on the product's buy-price band
///
/// A listing without a usable price, or priced outside
/// `[buy_price_min, buy_price_max]`, scores 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceMatcher;

impl PriceMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl SignalMatcher for PriceMatcher {
    #[inline]
    fn score(&self, listing: &Listing, product: &Product) -> SignalScore {
        match listing.usable_price() {
            None => SignalScore::reject("no price available"),
            Some(price) if product.is_price_in_range(price) => SignalScore::pass(format!(
                "price in range (£{} within £{}-£{})",
                price, product.buy_price_min, product.buy_price_max
            )),
            Some(price) => SignalScore::reject(format!(
                "price outside acceptable range (£{} not within £{}-£{})",
                price, product.buy_price_min, product.buy_price_max
            )),
        }
    }
}

/// Global filter rejecting titles that mention any avoid keyword
///
/// Independent of the product being evaluated.
#[derive(Debug, Clone, Default)]
pub struct KeywordFilter {
    keywords: Vec<String>,
}

impl KeywordFilter {
    /// Keywords are normalized like titles; empty entries are dropped
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| normalize_text(k.as_ref()))
            .filter(|k| !k.is_empty())
            .collect();

        Self { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// First configured keyword contained in the title
    pub fn find_in(&self, title: &str) -> Option<&str> {
        let title = normalize_text(title);
        self.keywords
            .iter()
            .find(|k| title.contains(k.as_str()))
            .map(String::as_str)
    }
}

impl SignalMatcher for KeywordFilter {
    #[inline]
    fn score(&self, listing: &Listing, _product: &Product) -> SignalScore {
        match self.find_in(&listing.title) {
            Some(keyword) => SignalScore::reject(format!("contains avoid keyword '{}'", keyword)),
            None => SignalScore::pass("no avoid keywords"),
        }
    }
}

/// Keep the first listing per URL, preserving input order
///
/// Listings with an empty URL have no identity and are dropped.
pub fn dedupe_listings(listings: Vec<Listing>) -> Vec<Listing> {
    let mut seen = HashSet::new();
    listings
        .into_iter()
        .filter(|l| {
            let url = l.url.trim();
            !url.is_empty() && seen.insert(url.to_string())
        })
        .collect()
}
