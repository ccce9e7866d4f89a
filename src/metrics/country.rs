// Country profile: GDP growth against the change in CO2 per capita between a
// country's first and last recorded values.
use crate::metric::Metric;
use crate::metrics::Series;
use crate::table::EmissionsTable;
use crate::types::EmissionsRecord;
use crate::util::ratio;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct CountrySummary {
    pub country: String,
    pub first_year: i32,
    pub last_year: i32,
    pub gdp_growth_pct: Option<f64>,
    pub co2_per_capita_change_pct: Option<f64>,
    /// GDP grew while CO2 per capita fell. `None` unless both are known.
    pub green_growth: Option<bool>,
}

/// Percentage change between the first and last present values.
fn change_pct(records: &[EmissionsRecord], metric: Metric) -> Option<f64> {
    let mut values = records.iter().filter_map(|r| r.get(metric));
    let start = values.next()?;
    let end = values.last()?;
    ratio(end - start, start).map(|r| r * 100.0)
}

pub fn country_summary(table: &EmissionsTable, country: &str) -> Option<CountrySummary> {
    let records = table.country(country);
    let first = records.first()?;
    let last = records.last()?;
    let gdp_growth_pct = change_pct(records, Metric::Gdp);
    let co2_per_capita_change_pct = change_pct(records, Metric::Co2PerCapita);
    let green_growth = match (gdp_growth_pct, co2_per_capita_change_pct) {
        (Some(g), Some(c)) => Some(g > 0.0 && c < 0.0),
        _ => None,
    };
    Some(CountrySummary {
        country: country.to_string(),
        first_year: first.year,
        last_year: last.year,
        gdp_growth_pct,
        co2_per_capita_change_pct,
        green_growth,
    })
}

/// Summary for every country, in name order.
pub fn green_growth_countries(table: &EmissionsTable) -> Vec<CountrySummary> {
    table
        .countries()
        .into_iter()
        .filter_map(|c| country_summary(table, c))
        .collect()
}

/// `metric` over time for each named country. Years without a value give no
/// point and countries with no points are left out.
pub fn country_series(
    table: &EmissionsTable,
    countries: &[&str],
    metric: Metric,
) -> BTreeMap<String, Series> {
    countries
        .iter()
        .filter_map(|c| {
            let series: Series = table
                .country(c)
                .iter()
                .filter_map(|r| r.get(metric).map(|v| (r.year, v)))
                .collect();
            (!series.is_empty()).then(|| (c.to_string(), series))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub year: i32,
    pub gdp: f64,
    pub co2_per_capita: f64,
    pub population: Option<f64>,
}

/// A country's path through GDP / CO2-per-capita space, one point per year
/// where both are present.
pub fn gdp_vs_co2_per_capita(table: &EmissionsTable, country: &str) -> Vec<TrendPoint> {
    table
        .country(country)
        .iter()
        .filter_map(|r| {
            Some(TrendPoint {
                year: r.year,
                gdp: r.get(Metric::Gdp)?,
                co2_per_capita: r.get(Metric::Co2PerCapita)?,
                population: r.get(Metric::Population),
            })
        })
        .collect()
}
