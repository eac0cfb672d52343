//! Flight listing for front ends.

use ct_core::FlightIdentity;
use ct_report::{ModelVariant, ReportIndex};
use ct_tables::list_flights;

use crate::config::Settings;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightSummary {
    pub path: String,
    pub item_count: usize,
    /// A report for the requested variant exists.
    pub has_precomputed: bool,
}

/// Flights under the data root, smallest first, with report availability
/// for `variant`.
pub fn list_flight_summaries(
    settings: &Settings,
    variant: ModelVariant,
) -> AppResult<Vec<FlightSummary>> {
    let index = ReportIndex::scan(&settings.report_root(variant))?;
    let mut summaries = Vec::new();
    for listing in list_flights(&settings.data_root())? {
        let has_precomputed = match FlightIdentity::parse(&listing.path) {
            Ok(identity) => index.lookup(&identity).is_some(),
            Err(e) => {
                tracing::debug!(path = %listing.path, error = %e, "unparseable flight folder");
                false
            }
        };
        summaries.push(FlightSummary {
            path: listing.path,
            item_count: listing.item_count,
            has_precomputed,
        });
    }
    Ok(summaries)
}
