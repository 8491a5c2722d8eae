//! Pipeline driver: hierarchy → enrichment → fallback.
//!
//! Each stage takes the table by explicit ownership/mutable borrow and hands
//! it to the next; there is no shared global state and no concurrency. The
//! geocoder is injected through the [`Geocoder`] seam, so the whole run is
//! testable without a network.

use crate::enrich::{fill_missing_coordinates, CoordinateEnricher};
use crate::geocode::Geocoder;
use crate::hierarchy::{HierarchyResolver, ResolveSummary};
use crate::records::{LocationRecord, ResolvedLocation};

/// Run configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Macro-region code prefix rooting the hierarchy (e.g. "ITC").
    pub macro_prefix: String,
    /// Context label for communes without a resolved province.
    pub default_context: String,
    /// When false, the enrichment pass is skipped entirely (offline runs);
    /// the fallback pass still runs over whatever coordinates exist.
    pub geocode: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            macro_prefix: "ITC".into(),
            default_context: "Liguria".into(),
            geocode: true,
        }
    }
}

/// Observable outcome of a full run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub hierarchy: ResolveSummary,
    /// Rows filled by direct geocoding.
    pub geocoded: usize,
    /// Rows filled by borrowing a commune's coordinates.
    pub borrowed: usize,
    /// Rows with coordinates after both passes.
    pub with_coordinates: usize,
}

/// The sequential three-stage pipeline.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Resolve, enrich, and fill the record set. Per-record misses never
    /// abort the run; the only hard failures live at the record-store
    /// boundary, before this is called.
    pub fn run<G: Geocoder>(
        &self,
        records: &[LocationRecord],
        geocoder: &mut G,
    ) -> (Vec<ResolvedLocation>, RunSummary) {
        let resolver = HierarchyResolver::new(&self.config.macro_prefix);
        let (mut table, hierarchy) = resolver.resolve(records);
        log::info!(
            "hierarchy: {} regions, {} provinces, {} communes over {} records",
            hierarchy.regions,
            hierarchy.provinces,
            hierarchy.communes,
            records.len()
        );

        let geocoded = if self.config.geocode {
            let enricher = CoordinateEnricher::new(&self.config.default_context);
            enricher.enrich(&mut table, geocoder)
        } else {
            log::info!("offline run: skipping geocoding pass");
            0
        };

        let borrowed = fill_missing_coordinates(&mut table);
        let with_coordinates = table.iter().filter(|r| r.has_coordinates()).count();
        log::info!(
            "coordinates: {} geocoded, {} borrowed, {} total",
            geocoded,
            borrowed,
            with_coordinates
        );

        let summary = RunSummary {
            hierarchy,
            geocoded,
            borrowed,
            with_coordinates,
        };
        (table, summary)
    }
}
