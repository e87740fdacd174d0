//! Results file written at the end of every cycle.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Listing};

/// Snapshot of the last cycle, for inspection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReport {
    pub total_items: usize,
    /// Cheapest valid listings, ascending by price.
    pub top_lowest_prices: Vec<Listing>,
    /// Every listing scraped this cycle, in page order.
    pub items: Vec<Listing>,
}

/// Overwrite the results file with `report`.
pub fn write_results(path: &Path, report: &CycleReport) -> Result<(), Error> {
    let json = serde_json::to_string_pretty(report).map_err(|e| Error::Results(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| Error::Results(format!("{}: {e}", path.display())))
}
