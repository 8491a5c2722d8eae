//! File-backed geocode cache at ~/.territorio/cache.json.
//!
//! Keys are full lowercased query strings ("genova, liguria, italy").
//! TTL: 30 days. A hit bypasses the network entirely, and with it the
//! pacing gate, so repeated runs over the same table cost nothing.

use super::types::{Coordinates, GeoError, Geocoder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

const CACHE_TTL_MS: i64 = 30 * 24 * 3600 * 1000; // 30 days in ms

#[derive(Serialize, Deserialize, Clone)]
struct CacheEntry {
    lat: f64,
    lon: f64,
    timestamp: i64,
}

/// The on-disk query cache.
pub struct GeocodeCache {
    path: PathBuf,
    entries: HashMap<String, CacheEntry>,
}

impl GeocodeCache {
    /// Load from the default location (~/.territorio/cache.json).
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    /// Load from a specific path (for testing).
    pub fn load_from(path: PathBuf) -> Self {
        let entries = Self::read_file(&path).unwrap_or_default();
        Self { path, entries }
    }

    fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".territorio")
            .join("cache.json")
    }

    fn read_file(path: &PathBuf) -> Option<HashMap<String, CacheEntry>> {
        let data = fs::read_to_string(path).ok()?;
        serde_json::from_str(&data).ok()
    }

    /// Look up a query. Returns None if missing or expired.
    pub fn get(&self, query: &str) -> Option<Coordinates> {
        let entry = self.entries.get(&query.to_lowercase())?;

        let now = chrono::Utc::now().timestamp_millis();
        if now - entry.timestamp > CACHE_TTL_MS {
            return None; // expired
        }

        Some(Coordinates {
            lat: entry.lat,
            lon: entry.lon,
        })
    }

    /// Store a result and persist to disk.
    pub fn put(&mut self, query: &str, coords: Coordinates) {
        self.entries.insert(
            query.to_lowercase(),
            CacheEntry {
                lat: coords.lat,
                lon: coords.lon,
                timestamp: chrono::Utc::now().timestamp_millis(),
            },
        );
        self.persist();
    }

    fn persist(&self) {
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Ok(json) = serde_json::to_string_pretty(&self.entries) {
            let _ = fs::write(&self.path, json);
        }
    }

    /// Number of entries (for testing).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A [`Geocoder`] that answers from the cache when it can and delegates the
/// rest to the wrapped client, caching every successful lookup. Misses and
/// errors are never cached; they retry on the next run.
pub struct CachedGeocoder<G: Geocoder> {
    inner: G,
    cache: GeocodeCache,
}

impl<G: Geocoder> CachedGeocoder<G> {
    pub fn new(inner: G, cache: GeocodeCache) -> Self {
        Self { inner, cache }
    }
}

impl<G: Geocoder> Geocoder for CachedGeocoder<G> {
    fn lookup(&mut self, name: &str, context: &str) -> Result<Option<Coordinates>, GeoError> {
        let key = format!("{}, {}", name, context);
        if let Some(coords) = self.cache.get(&key) {
            return Ok(Some(coords));
        }

        let result = self.inner.lookup(name, context)?;
        if let Some(coords) = result {
            self.cache.put(&key, coords);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    fn test_cache() -> (GeocodeCache, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        (GeocodeCache::load_from(path), dir)
    }

    #[test]
    fn test_cache_put_get() {
        let (mut cache, _dir) = test_cache();
        cache.put("Genova, Liguria, Italy", Coordinates { lat: 44.4, lon: 8.9 });

        let coords = cache.get("genova, liguria, italy").unwrap();
        assert_relative_eq!(coords.lat, 44.4);
        assert_relative_eq!(coords.lon, 8.9);
    }

    #[test]
    fn test_cache_miss() {
        let (cache, _dir) = test_cache();
        assert!(cache.get("rapallo, genova, italy").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_persistence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");

        {
            let mut cache = GeocodeCache::load_from(path.clone());
            cache.put("Rapallo, Genova, Italy", Coordinates { lat: 44.35, lon: 9.23 });
        }

        let cache = GeocodeCache::load_from(path);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("rapallo, genova, italy").is_some());
    }

    #[test]
    fn test_cache_expiry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        let stale = r#"{
            "genova, liguria, italy": { "lat": 44.4, "lon": 8.9, "timestamp": 0 }
        }"#;
        std::fs::write(&path, stale).unwrap();

        let cache = GeocodeCache::load_from(path);
        assert!(cache.get("genova, liguria, italy").is_none());
    }

    /// Counts delegated lookups.
    struct CountingGeocoder {
        calls: usize,
        answer: Option<Coordinates>,
    }

    impl Geocoder for CountingGeocoder {
        fn lookup(&mut self, _: &str, _: &str) -> Result<Option<Coordinates>, GeoError> {
            self.calls += 1;
            Ok(self.answer)
        }
    }

    #[test]
    fn test_cached_geocoder_hits_bypass_inner() {
        let (cache, _dir) = test_cache();
        let inner = CountingGeocoder {
            calls: 0,
            answer: Some(Coordinates { lat: 44.4, lon: 8.9 }),
        };
        let mut geocoder = CachedGeocoder::new(inner, cache);

        assert!(geocoder.lookup("Genova", "Liguria").unwrap().is_some());
        assert!(geocoder.lookup("Genova", "Liguria").unwrap().is_some());
        assert_eq!(geocoder.inner.calls, 1);
    }

    #[test]
    fn test_cached_geocoder_does_not_cache_misses() {
        let (cache, _dir) = test_cache();
        let inner = CountingGeocoder {
            calls: 0,
            answer: None,
        };
        let mut geocoder = CachedGeocoder::new(inner, cache);

        assert!(geocoder.lookup("Atlantide", "Liguria").unwrap().is_none());
        assert!(geocoder.lookup("Atlantide", "Liguria").unwrap().is_none());
        assert_eq!(geocoder.inner.calls, 2);
    }
}
