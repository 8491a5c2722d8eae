//! Territorio — ISTAT administrative hierarchy resolver with coordinate
//! enrichment.
//!
//! Takes a flat list of `{id, name}` location records, infers the
//! region → province → commune hierarchy purely from identifier shape and
//! the self-titled-commune name heuristic, geocodes every commune via
//! OpenStreetMap Nominatim under a one-request-per-second pacing gate, and
//! borrows commune coordinates for the provinces and regions the geocoder
//! cannot serve directly.

pub mod codes;
pub mod enrich;
pub mod geocode;
pub mod hierarchy;
pub mod pipeline;
pub mod records;

pub use hierarchy::{HierarchyResolver, ResolveSummary};
pub use pipeline::{Pipeline, PipelineConfig, RunSummary};
pub use records::{LocationRecord, ResolvedLocation};
