//! Hierarchy resolver — infers region/province/commune links from code
//! shape and the self-titled-commune name heuristic.
//!
//! Resolution flow:  regions by shape → provinces by region prefix →
//! communes via the province's name twin (its capital commune), whose
//! numeric code donates the three-digit province prefix.
//!
//! Unmatched records are a normal terminal state, not an error: their
//! hierarchy fields simply stay `None`.

use crate::codes::{self, CodeClass};
use crate::records::{LocationRecord, ResolvedLocation};

/// Counters over the resolved table, one per hierarchy column.
///
/// A commune row counts toward all three (it carries region and province
/// links), matching the non-null column counts of the exported table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveSummary {
    pub regions: usize,
    pub provinces: usize,
    pub communes: usize,
}

/// The three-pass hierarchy resolver.
pub struct HierarchyResolver {
    macro_prefix: String,
}

impl HierarchyResolver {
    pub fn new(macro_prefix: impl Into<String>) -> Self {
        Self {
            macro_prefix: macro_prefix.into(),
        }
    }

    /// Resolve the record set into a table of the same order and size.
    ///
    /// Classification is first-match-wins under the traversal order
    /// region → province → commune: once a row is classified, later passes
    /// never touch it. Matching is exact and case-sensitive. The pass is
    /// deterministic and idempotent for a given input order.
    pub fn resolve(&self, records: &[LocationRecord]) -> (Vec<ResolvedLocation>, ResolveSummary) {
        let mut table: Vec<ResolvedLocation> =
            records.iter().map(ResolvedLocation::from_record).collect();

        let regions: Vec<&LocationRecord> = records
            .iter()
            .filter(|r| codes::classify(&r.id, &self.macro_prefix) == CodeClass::Region)
            .collect();

        for region in &regions {
            if let Some(row) = row_for_mut(&mut table, &region.id) {
                if row.region_code.is_none() {
                    row.region_code = Some(region.id.clone());
                    row.region_name = Some(region.name.clone());
                }
            }

            let provinces: Vec<&LocationRecord> = records
                .iter()
                .filter(|r| r.id.len() == region.id.len() + 1 && r.id.starts_with(&region.id))
                .collect();
            log::debug!("region {}: {} provinces", region.id, provinces.len());

            for province in &provinces {
                if let Some(row) = row_for_mut(&mut table, &province.id) {
                    if row.province_code.is_none() {
                        row.region_code = Some(region.id.clone());
                        row.region_name = Some(region.name.clone());
                        row.province_code = Some(province.id.clone());
                        row.province_name = Some(province.name.clone());
                    }
                }

                let Some(prefix) = province_prefix_candidate(records, &province.id, &province.name)
                else {
                    // No commune shares this province's name: its communes
                    // stay unclassified, silently.
                    log::debug!("province {} ({}): no name twin", province.id, province.name);
                    continue;
                };

                for record in records {
                    if codes::classify(&record.id, &self.macro_prefix) != CodeClass::Commune
                        || !record.id.starts_with(&prefix)
                    {
                        continue;
                    }
                    if let Some(row) = row_for_mut(&mut table, &record.id) {
                        if row.commune_code.is_some() {
                            continue; // first match wins
                        }
                        row.region_code = Some(region.id.clone());
                        row.region_name = Some(region.name.clone());
                        row.province_code = Some(province.id.clone());
                        row.province_name = Some(province.name.clone());
                        row.commune_code = Some(record.id.clone());
                        row.commune_name = Some(record.name.clone());
                    }
                }
            }
        }

        let summary = ResolveSummary {
            regions: table.iter().filter(|r| r.region_code.is_some()).count(),
            provinces: table.iter().filter(|r| r.province_code.is_some()).count(),
            communes: table.iter().filter(|r| r.commune_code.is_some()).count(),
        };
        (table, summary)
    }
}

fn row_for_mut<'a>(table: &'a mut [ResolvedLocation], id: &str) -> Option<&'a mut ResolvedLocation> {
    table.iter_mut().find(|row| row.id == id)
}

/// Discover a province's three-digit commune prefix via its name twin.
///
/// The first record (stable input order) sharing the province's name,
/// excluding the province's own record, whose id is all-digit and at least
/// six characters, donates the prefix. First match wins by policy; this
/// function is the extension point if richer disambiguation is ever needed.
fn province_prefix_candidate(
    records: &[LocationRecord],
    province_code: &str,
    province_name: &str,
) -> Option<String> {
    records
        .iter()
        .filter(|r| r.name == province_name && r.id != province_code)
        .find_map(|r| codes::province_prefix(&r.id).map(str::to_string))
}
