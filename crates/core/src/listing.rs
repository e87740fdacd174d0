//! Marketplace listings and the per-cycle candidate set.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A single scraped marketplace item.
///
/// `url` is the natural key. `price` keeps the marketplace's own formatting
/// (e.g. `"1.200 €"`); it is compared verbatim for cache hits and parsed with
/// [`parse_price`] only for ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Listing {
    pub name: String,
    pub price: String,
    pub url: String,
}

impl Listing {
    pub fn new(name: impl Into<String>, price: impl Into<String>, url: impl Into<String>) -> Self {
        Self { name: name.into(), price: price.into(), url: url.into() }
    }

    /// Numeric price, if the formatted price can be read.
    pub fn parsed_price(&self) -> Option<f64> {
        parse_price(&self.price)
    }
}

/// Parse a formatted marketplace price into a number.
///
/// Only the first whitespace-separated token is read, so currency suffixes are
/// ignored. `,` is the decimal separator. A `.` followed by exactly three
/// digits is a thousands separator, otherwise it is treated as a decimal point.
///
/// ```
/// use dealwatch_core::listing::parse_price;
///
/// assert_eq!(parse_price("50 €"), Some(50.0));
/// assert_eq!(parse_price("1.200 €"), Some(1200.0));
/// assert_eq!(parse_price("12,50 €"), Some(12.5));
/// assert_eq!(parse_price("Gratis"), None);
/// ```
pub fn parse_price(formatted: &str) -> Option<f64> {
    let token = formatted.split_whitespace().next()?;
    let digits: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    if !digits.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let normalized = if digits.contains(',') {
        digits.replace('.', "").replace(',', ".")
    } else if digits
        .rsplit_once('.')
        .is_some_and(|(_, tail)| tail.len() == 3 && tail.chars().all(|c| c.is_ascii_digit()))
    {
        digits.replace('.', "")
    } else {
        digits
    };

    normalized.parse::<f64>().ok().filter(|price| price.is_finite())
}

/// Compare two listings by parsed price; unparseable prices sort last.
pub fn compare_by_price(a: &Listing, b: &Listing) -> Ordering {
    match (a.parsed_price(), b.parsed_price()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable ascending sort by parsed price.
pub fn sort_by_price(listings: &mut [Listing]) {
    listings.sort_by(compare_by_price);
}

/// Everything a candidate source produces for one cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateSet {
    /// Listings in page order (newest first).
    pub items: Vec<Listing>,
    /// The most recently posted listing, if any.
    pub primary: Option<Listing>,
    /// `items` in ascending price order.
    pub sorted_by_price: Vec<Listing>,
}

impl CandidateSet {
    /// Build the set from listings in page order.
    pub fn from_items(items: Vec<Listing>) -> Self {
        let primary = items.first().cloned();
        let mut sorted_by_price = items.clone();
        sort_by_price(&mut sorted_by_price);
        Self { items, primary, sorted_by_price }
    }

    pub fn total_items(&self) -> usize {
        self.items.len()
    }
}
