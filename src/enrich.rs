//! Coordinate enrichment and the name-borrowing fallback pass.
//!
//! Enrichment geocodes communes only — regions and provinces carry no name
//! precise enough for a point lookup. The fallback pass then borrows a
//! commune's point for any row still missing coordinates whose province
//! name matches a geocoded commune (conventionally the capital commune).
//! Both passes are best-effort: a miss leaves the row unresolved.

use crate::geocode::Geocoder;
use crate::records::ResolvedLocation;
use std::collections::HashMap;

/// Geocodes every classified commune, one throttled call each.
pub struct CoordinateEnricher {
    default_context: String,
}

impl CoordinateEnricher {
    /// `default_context` is the label used when a commune has no resolved
    /// province (typically the macro-region's human name).
    pub fn new(default_context: impl Into<String>) -> Self {
        Self {
            default_context: default_context.into(),
        }
    }

    /// Fill coordinates for communes, in place. Returns the number of rows
    /// geocoded.
    ///
    /// A failed or empty lookup leaves the row's coordinates unset and the
    /// pass continues; rows that already have coordinates are never
    /// re-queried or overwritten.
    pub fn enrich<G: Geocoder>(
        &self,
        table: &mut [ResolvedLocation],
        geocoder: &mut G,
    ) -> usize {
        let mut filled = 0;
        for row in table.iter_mut() {
            let Some(commune) = row.commune_name.as_deref() else {
                continue;
            };
            if commune.is_empty() || row.has_coordinates() {
                continue;
            }

            let context = row
                .province_name
                .as_deref()
                .filter(|p| !p.is_empty())
                .unwrap_or(&self.default_context);

            match geocoder.lookup(commune, context) {
                Ok(Some(coords)) => {
                    row.latitude = Some(coords.lat);
                    row.longitude = Some(coords.lon);
                    filled += 1;
                }
                Ok(None) => {
                    log::info!("no geocode result for '{}, {}'", commune, context);
                }
                Err(e) => {
                    log::warn!("geocode failed for '{}, {}': {}", commune, context, e);
                }
            }
        }
        filled
    }
}

/// Borrow coordinates for rows the geocoder could not serve directly.
///
/// For every row still missing coordinates with a known province name, copy
/// lat/lon verbatim from the first commune sharing that name (table order).
/// If that commune is itself uncoordinated the row stays unresolved — a
/// later same-named commune never substitutes for it. Rows with
/// coordinates are never touched. Returns the number of rows filled.
pub fn fill_missing_coordinates(table: &mut [ResolvedLocation]) -> usize {
    // First commune per name wins, with or without coordinates.
    let mut donors: HashMap<String, Option<(f64, f64)>> = HashMap::new();
    for row in table.iter() {
        let Some(name) = row.commune_name.as_deref() else {
            continue;
        };
        let coords = match (row.latitude, row.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        };
        donors.entry(name.to_string()).or_insert(coords);
    }

    let mut filled = 0;
    for row in table.iter_mut() {
        if row.latitude.is_some() || row.longitude.is_some() {
            continue;
        }
        let Some(province) = row.province_name.as_deref() else {
            continue;
        };
        if let Some(Some((lat, lon))) = donors.get(province).copied() {
            row.latitude = Some(lat);
            row.longitude = Some(lon);
            filled += 1;
        }
    }
    filled
}
