//! OpenStreetMap Nominatim client.
//!
//! One query per lookup, `limit=1`, explicit User-Agent, bounded per-call
//! timeout. Non-2xx responses and malformed payloads surface as [`GeoError`];
//! an empty result array is `Ok(None)`.

use super::throttle::{Sleeper, ThreadSleeper, Throttle};
use super::types::{Coordinates, GeoError, Geocoder};
use serde::Deserialize;
use std::time::Duration;

const NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
const USER_AGENT: &str = "territorio/0.3 (istat-hierarchy-geocoder)";
const CALL_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Deserialize, Debug, Clone)]
struct NominatimResult {
    lat: String,
    lon: String,
}

/// Rate-limited Nominatim lookup. Owns its pacing gate: every network call
/// goes through the throttle, so a single client instance can never exceed
/// the service's request budget.
pub struct NominatimClient<S: Sleeper = ThreadSleeper> {
    endpoint: String,
    country: String,
    throttle: Throttle<S>,
}

impl NominatimClient {
    pub fn new(country: impl Into<String>, interval: Duration) -> Self {
        Self {
            endpoint: NOMINATIM_ENDPOINT.to_string(),
            country: country.into(),
            throttle: Throttle::new(interval),
        }
    }

    /// Point the client at a different endpoint (for testing).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl<S: Sleeper> NominatimClient<S> {
    fn search_url(&self, name: &str, context: &str) -> String {
        let query = format!("{}, {}, {}", name, context, self.country);
        format!(
            "{}?q={}&format=json&limit=1",
            self.endpoint,
            urlencode(&query)
        )
    }
}

impl<S: Sleeper> Geocoder for NominatimClient<S> {
    fn lookup(&mut self, name: &str, context: &str) -> Result<Option<Coordinates>, GeoError> {
        let url = self.search_url(name, context);
        self.throttle.wait();

        let response = ureq::get(&url)
            .set("User-Agent", USER_AGENT)
            .timeout(CALL_TIMEOUT)
            .call()
            .map_err(|e| GeoError::Network(e.to_string()))?;

        let results: Vec<NominatimResult> = response
            .into_json()
            .map_err(|e| GeoError::InvalidResponse(e.to_string()))?;

        let Some(first) = results.first() else {
            return Ok(None);
        };

        let lat: f64 = first
            .lat
            .parse()
            .map_err(|_| GeoError::InvalidResponse(format!("bad latitude '{}'", first.lat)))?;
        let lon: f64 = first
            .lon
            .parse()
            .map_err(|_| GeoError::InvalidResponse(format!("bad longitude '{}'", first.lon)))?;

        Ok(Some(Coordinates { lat, lon }))
    }
}

// Minimal percent-encoding, enough for place-name queries; no extra dep.
// Works on UTF-8 bytes so accented names (Forlì, Cantù) encode correctly.
fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
