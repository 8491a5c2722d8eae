//! Core types for the geocoding subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic point, as returned by the geocoding service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Geocoding errors. All of these are recoverable at the batch level:
/// the enrichment pass treats them as "no coordinates for this row".
#[derive(Debug)]
pub enum GeoError {
    Network(String),
    InvalidResponse(String),
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::InvalidResponse(msg) => write!(f, "Invalid API response: {}", msg),
        }
    }
}

impl std::error::Error for GeoError {}

/// A point lookup against an external geocoding service.
///
/// `context` narrows the query (a province name, or a fixed region label
/// when no province is known); implementations format the query as
/// `"<name>, <context>, <country>"`. `Ok(None)` means the service answered
/// but found nothing — distinct from a transport or payload error.
///
/// Implementations own their pacing: callers issue lookups sequentially
/// and never concurrently.
pub trait Geocoder {
    fn lookup(&mut self, name: &str, context: &str) -> Result<Option<Coordinates>, GeoError>;
}
