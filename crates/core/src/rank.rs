//! Cheapest-valid-listings ranking.

use crate::cache::ValidityCache;
use crate::classify::Classifier;
use crate::{DescriptionFetcher, Error, Listing};

/// Number of listings kept in the top list.
pub const TOP_N: usize = 3;

/// Collect the first `limit` valid listings from `sorted` (ascending price).
///
/// Verdicts come from the cache when the listing's price is unchanged;
/// otherwise the listing is classified and the verdict is persisted before the
/// next candidate is looked at. The result is the cheapest valid listings in
/// ascending price order.
pub async fn rank_top(
    sorted: &[Listing], classifier: &Classifier, cache: &mut ValidityCache, fetcher: &dyn DescriptionFetcher,
    limit: usize,
) -> Result<Vec<Listing>, Error> {
    let mut top = Vec::with_capacity(limit);
    if limit == 0 {
        return Ok(top);
    }

    for (i, listing) in sorted.iter().enumerate() {
        tracing::debug!(index = i + 1, total = sorted.len(), url = %listing.url, "ranking candidate");

        let valid = match cache.lookup(&listing.url, &listing.price) {
            Some(entry) => {
                tracing::debug!(url = %listing.url, valid = entry.valid, "cache hit");
                entry.valid
            }
            None => {
                let valid = classifier.classify(listing, fetcher).await?;
                cache.store(&listing.url, &listing.price, valid)?;
                valid
            }
        };

        if valid {
            tracing::info!(
                rank = top.len() + 1,
                name = %listing.name,
                price = %listing.price,
                url = %listing.url,
                "top listing"
            );
            top.push(listing.clone());
            if top.len() == limit {
                break;
            }
        }
    }

    Ok(top)
}
