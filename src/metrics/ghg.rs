// Greenhouse gases beyond CO2: methane and nitrous oxide, in CO2-equivalents.

use super::breakdown::{breakdown, breakdown_series, Breakdown};
use super::ranking::{top_n, Ranked};
use super::Series;
use crate::metric::Metric;
use crate::table::EmissionsTable;
use crate::types::EmissionsRecord;
use std::collections::BTreeMap;

pub const GHG_METRICS: [Metric; 3] = [Metric::Co2, Metric::Methane, Metric::NitrousOxide];

/// Per-capita columns in order of preference.
const PER_CAPITA_METRICS: [Metric; 2] = [Metric::GhgPerCapita, Metric::GhgExcludingLucfPerCapita];

pub fn ghg_composition(table: &EmissionsTable, country: &str) -> BTreeMap<Metric, Series> {
    breakdown_series(table, country, i32::MIN..=i32::MAX, &GHG_METRICS)
}

pub fn ghg_breakdown(table: &EmissionsTable, country: &str, year: i32) -> Breakdown {
    breakdown(table, country, year, &GHG_METRICS)
}

/// Ranks by the first per-capita GHG column the source provides.
pub fn ghg_per_capita_ranking(table: &EmissionsTable, year: i32, n: usize) -> Vec<Ranked> {
    match PER_CAPITA_METRICS.into_iter().find(|m| table.has_column(*m)) {
        Some(metric) => top_n(table, metric, year, n),
        None => Vec::new(),
    }
}

/// CO2 + methane + nitrous oxide; all three must be present.
pub fn total_ghg(record: &EmissionsRecord) -> Option<f64> {
    GHG_METRICS.iter().map(|m| record.get(*m)).sum()
}

#[derive(Debug, Clone, PartialEq)]
pub struct GhgPoint {
    pub country: String,
    pub co2: f64,
    pub total_ghg: f64,
    pub population: Option<f64>,
}

pub fn ghg_vs_co2(table: &EmissionsTable, year: i32) -> Vec<GhgPoint> {
    table
        .year(year)
        .filter_map(|r| {
            Some(GhgPoint {
                country: r.country.clone(),
                co2: r.get(Metric::Co2)?,
                total_ghg: total_ghg(r)?,
                population: r.get(Metric::Population),
            })
        })
        .collect()
}
