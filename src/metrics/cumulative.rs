// Cumulative CO2 and historical responsibility.
use super::breakdown::breakdown_series;
use super::ranking::{top_n, Ranked};
use super::Series;
use crate::metric::Metric;
use crate::table::EmissionsTable;
use crate::util::ratio;
use std::collections::BTreeMap;

pub const CUMULATIVE_FUEL_METRICS: [Metric; 3] = [
    Metric::CumulativeCoalCo2,
    Metric::CumulativeOilCo2,
    Metric::CumulativeGasCo2,
];

/// Per-country cumulative CO2 series.
///
/// Uses `cumulative_co2` when the source has it. Otherwise a running total of
/// annual `co2` is built: a year with no `co2` adds nothing and gets no point.
pub fn cumulative_series(table: &EmissionsTable, countries: &[&str]) -> BTreeMap<String, Series> {
    let from_column = table.has_column(Metric::CumulativeCo2);
    let mut out = BTreeMap::new();
    for country in countries {
        let records = table.country(country);
        let series: Series = if from_column {
            records
                .iter()
                .filter_map(|r| r.get(Metric::CumulativeCo2).map(|v| (r.year, v)))
                .collect()
        } else {
            let mut running = 0.0;
            records
                .iter()
                .filter_map(|r| {
                    r.get(Metric::Co2).map(|v| {
                        running += v;
                        (r.year, running)
                    })
                })
                .collect()
        };
        if !series.is_empty() {
            out.insert(country.to_string(), series);
        }
    }
    out
}

pub fn top_historical_emitters(table: &EmissionsTable, year: i32, n: usize) -> Vec<Ranked> {
    top_n(table, Metric::CumulativeCo2, year, n)
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalShare {
    pub country: String,
    pub year: i32,
    pub cumulative_co2: f64,
    /// Fraction of the cumulative total across all countries in `year`.
    pub share: f64,
}

/// Every country's share of the cumulative total in `year`, largest first.
/// Empty when nothing is recorded or the total is zero.
pub fn historical_shares(table: &EmissionsTable, year: i32) -> Vec<HistoricalShare> {
    let values: Vec<(&str, f64)> = table
        .year(year)
        .filter_map(|r| r.get(Metric::CumulativeCo2).map(|v| (r.country.as_str(), v)))
        .collect();
    let total: f64 = values.iter().map(|(_, v)| v).sum();
    let mut out: Vec<HistoricalShare> = values
        .into_iter()
        .filter_map(|(country, v)| {
            ratio(v, total).map(|share| HistoricalShare {
                country: country.to_string(),
                year,
                cumulative_co2: v,
                share,
            })
        })
        .collect();
    out.sort_by(|a, b| b.share.total_cmp(&a.share).then_with(|| a.country.cmp(&b.country)));
    out
}

/// The country's share at the latest year in which it has a cumulative value.
pub fn historical_share(table: &EmissionsTable, country: &str) -> Option<HistoricalShare> {
    let latest = table
        .country(country)
        .iter()
        .rev()
        .find(|r| r.get(Metric::CumulativeCo2).is_some())?;
    historical_shares(table, latest.year)
        .into_iter()
        .find(|s| s.country == country)
}

pub fn cumulative_by_fuel(table: &EmissionsTable, country: &str) -> BTreeMap<Metric, Series> {
    breakdown_series(table, country, i32::MIN..=i32::MAX, &CUMULATIVE_FUEL_METRICS)
}
