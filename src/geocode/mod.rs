//! Geocoding subsystem: Nominatim client, pacing gate, and on-disk cache.
//!
//! The [`Geocoder`] trait is the seam the enrichment pass depends on;
//! everything behind it (throttling, caching, HTTP) is swappable.

pub mod cache;
pub mod client;
pub mod throttle;
pub mod types;

pub use cache::{CachedGeocoder, GeocodeCache};
pub use client::NominatimClient;
pub use throttle::{Sleeper, ThreadSleeper, Throttle};
pub use types::{Coordinates, GeoError, Geocoder};
