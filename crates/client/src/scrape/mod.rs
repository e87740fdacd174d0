//! Listing and description extraction from rendered marketplace HTML.
//!
//! ### Search results
//! - Only the first `.SearchUnified__section` is read; later sections hold
//!   suggestions outside the search.
//! - Cards carrying an `.ItemCard__badge` are promoted listings and skipped.
//! - Relative card links are resolved against the page URL.
//!
//! ### Item page
//! - The description is the first `div` inside the element whose class starts
//!   with `item-detail_ItemDetail__description__`, lowercased.

use std::sync::LazyLock;

use dealwatch_core::Listing;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Cards on the search page; the browser waits for this before scraping.
pub const CARD_SELECTOR: &str = "a.ItemCardList__item";

/// Results section; a second one means the lazy-loaded list is exhausted.
pub const SECTION_SELECTOR: &str = ".SearchUnified__section";

static SECTION: LazyLock<Selector> = LazyLock::new(|| Selector::parse(SECTION_SELECTOR).expect("invalid selector"));
static CARD: LazyLock<Selector> = LazyLock::new(|| Selector::parse(CARD_SELECTOR).expect("invalid selector"));
static BADGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".ItemCard__badge").expect("invalid selector"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".ItemCard__title").expect("invalid selector"));
static PRICE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".ItemCard__price").expect("invalid selector"));
static DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[class^="item-detail_ItemDetail__description__"]"#).expect("invalid selector")
});
static DIV: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div").expect("invalid selector"));

/// Extract listings from a rendered search page, in page order.
///
/// Returns an empty list when the results section is missing.
pub fn parse_listings(html: &str, base_url: &Url) -> Vec<Listing> {
    let document = Html::parse_document(html);

    let Some(section) = document.select(&SECTION).next() else {
        tracing::debug!("results section not found");
        return Vec::new();
    };

    let mut listings = Vec::new();
    for card in section.select(&CARD) {
        if card.select(&BADGE).next().is_some() {
            continue;
        }

        let href = match card.value().attr("href") {
            Some(h) => h,
            None => continue,
        };
        let url = match base_url.join(href) {
            Ok(u) => u.to_string(),
            Err(_) => continue,
        };

        let name = first_text(card, &TITLE);
        let price = first_text(card, &PRICE);
        listings.push(Listing { name, price, url });
    }

    listings
}

/// Extract the lowercased description text from a rendered item page.
///
/// Returns an empty string when the page has no description block.
pub fn parse_description(html: &str) -> String {
    let document = Html::parse_document(html);

    document
        .select(&DESCRIPTION)
        .next()
        .and_then(|block| block.select(&DIV).next())
        .map(|div| div.text().collect::<String>().trim().to_lowercase())
        .unwrap_or_default()
}

fn first_text(element: ElementRef<'_>, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|el| el.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}
