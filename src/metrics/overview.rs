// Cross-country overview figures: headline totals, continent totals, GDP
// tertiles, the continent/GDP/country hierarchy, the GDP-CO2 correlation and
// map-ready values.

use crate::metric::Metric;
use crate::table::{EmissionsTable, Selection};
use crate::types::{EmissionsRecord, SummaryStats};
use crate::util::{mean, quantile, ratio, sum_present};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Tonnes per million tonnes; `co2` is in Mt and per-capita figures in t.
const TONNES_PER_MEGATONNE: f64 = 1e6;

/// Headline numbers over the selected records.
///
/// `avg_country_co2_per_capita` is the mean over countries of each country's
/// summed CO2 over its summed population, so every country weighs the same.
pub fn summary_stats(table: &EmissionsTable, selection: &Selection) -> SummaryStats {
    let mut per_country: BTreeMap<&str, (Option<f64>, Option<f64>)> = BTreeMap::new();
    let mut years: BTreeSet<i32> = BTreeSet::new();
    for r in table.select(selection) {
        years.insert(r.year);
        let e = per_country.entry(r.country.as_str()).or_insert((None, None));
        e.0 = sum_present([e.0, r.get(Metric::Co2)]);
        e.1 = sum_present([e.1, r.get(Metric::Population)]);
    }

    let total_co2 = sum_present(per_country.values().map(|(c, _)| *c));
    let total_pop = sum_present(per_country.values().map(|(_, p)| *p));
    let co2_per_capita = match (total_co2, total_pop) {
        (Some(c), Some(p)) => ratio(c * TONNES_PER_MEGATONNE, p),
        _ => None,
    };
    let country_rates: Vec<f64> = per_country
        .values()
        .filter_map(|(c, p)| ratio((*c)? * TONNES_PER_MEGATONNE, (*p)?))
        .collect();

    SummaryStats {
        countries: per_country.len(),
        first_year: years.first().copied(),
        last_year: years.last().copied(),
        total_co2,
        co2_per_capita,
        avg_country_co2_per_capita: mean(&country_rates),
    }
}

/// Total CO2 per continent in `year`, largest first.
pub fn co2_by_continent(table: &EmissionsTable, year: i32) -> Vec<(String, f64)> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for r in table.year(year) {
        if let Some(v) = r.get(Metric::Co2) {
            *totals.entry(r.continent_name.as_str()).or_insert(0.0) += v;
        }
    }
    let mut out: Vec<(String, f64)> = totals.into_iter().map(|(c, v)| (c.to_string(), v)).collect();
    out.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GdpCategory {
    Low,
    Mid,
    High,
    Unknown,
}

impl fmt::Display for GdpCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GdpCategory::Low => "low",
            GdpCategory::Mid => "mid",
            GdpCategory::High => "high",
            GdpCategory::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// Per-year GDP tertile cut points (33rd and 66th percentiles).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GdpTertiles {
    cuts: BTreeMap<i32, (f64, f64)>,
}

impl GdpTertiles {
    pub fn compute(table: &EmissionsTable) -> Self {
        let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
        for r in table.records() {
            if let Some(gdp) = r.get(Metric::Gdp) {
                by_year.entry(r.year).or_default().push(gdp);
            }
        }
        let cuts = by_year
            .into_iter()
            .filter_map(|(year, mut values)| {
                values.sort_by(f64::total_cmp);
                Some((year, (quantile(&values, 0.33)?, quantile(&values, 0.66)?)))
            })
            .collect();
        GdpTertiles { cuts }
    }

    pub fn category(&self, record: &EmissionsRecord) -> GdpCategory {
        let cuts = self.cuts.get(&record.year);
        let (Some(gdp), Some((q1, q2))) = (record.get(Metric::Gdp), cuts) else {
            return GdpCategory::Unknown;
        };
        if gdp <= *q1 {
            GdpCategory::Low
        } else if gdp <= *q2 {
            GdpCategory::Mid
        } else {
            GdpCategory::High
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyNode {
    pub continent: String,
    pub gdp_category: GdpCategory,
    pub country: String,
    pub value: f64,
}

type HierarchyKey<'a> = (&'a str, GdpCategory, &'a str);

/// CO2 and population summed per (continent, tertile, country) over the
/// selection. Either sum is `None` when no record in the group had a value.
fn hierarchy_sums<'a>(
    table: &'a EmissionsTable,
    selection: &'a Selection,
) -> BTreeMap<HierarchyKey<'a>, (Option<f64>, Option<f64>)> {
    let tertiles = GdpTertiles::compute(table);
    let mut sums: BTreeMap<HierarchyKey<'a>, (Option<f64>, Option<f64>)> = BTreeMap::new();
    for r in table.select(selection) {
        let key = (r.continent_name.as_str(), tertiles.category(r), r.country.as_str());
        let e = sums.entry(key).or_insert((None, None));
        e.0 = sum_present([e.0, r.get(Metric::Co2)]);
        e.1 = sum_present([e.1, r.get(Metric::Population)]);
    }
    sums
}

fn hierarchy_nodes<'a, F>(
    sums: BTreeMap<HierarchyKey<'a>, (Option<f64>, Option<f64>)>,
    value: F,
) -> Vec<HierarchyNode>
where
    F: Fn(Option<f64>, Option<f64>) -> Option<f64>,
{
    sums.into_iter()
        .filter_map(|((continent, gdp_category, country), (co2, pop))| {
            Some(HierarchyNode {
                continent: continent.to_string(),
                gdp_category,
                country: country.to_string(),
                value: value(co2, pop)?,
            })
        })
        .collect()
}

/// Continent -> GDP tertile -> country CO2 totals over the selection.
///
/// GDP tertiles are per year, so a country whose tertile changed within the
/// selected years appears once under each.
pub fn co2_hierarchy(table: &EmissionsTable, selection: &Selection) -> Vec<HierarchyNode> {
    hierarchy_nodes(hierarchy_sums(table, selection), |co2, _| co2)
}

/// Same grouping as [`co2_hierarchy`], valued by summed CO2 over summed
/// population in tonnes per person. Groups without a non-zero population
/// are left out.
pub fn co2_per_capita_hierarchy(
    table: &EmissionsTable,
    selection: &Selection,
) -> Vec<HierarchyNode> {
    hierarchy_nodes(hierarchy_sums(table, selection), |co2, pop| {
        ratio(co2? * TONNES_PER_MEGATONNE, pop?)
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationPoint {
    pub country: String,
    pub continent_name: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Correlation {
    pub points: Vec<CorrelationPoint>,
    pub slope: f64,
    pub intercept: f64,
    /// `None` when every y is the same.
    pub r_squared: Option<f64>,
    pub log_scale: bool,
}

/// Least-squares fit of CO2 against GDP, one point per country with both
/// summed over the selection. With `log_scale` both axes are log10 and
/// non-positive values are dropped. Needs two points with distinct x.
pub fn gdp_co2_correlation(
    table: &EmissionsTable,
    selection: &Selection,
    log_scale: bool,
) -> Option<Correlation> {
    let mut per_country: BTreeMap<&str, (&str, Option<f64>, Option<f64>)> = BTreeMap::new();
    for r in table.select(selection) {
        let e = per_country
            .entry(r.country.as_str())
            .or_insert((r.continent_name.as_str(), None, None));
        e.1 = sum_present([e.1, r.get(Metric::Gdp)]);
        e.2 = sum_present([e.2, r.get(Metric::Co2)]);
    }

    let transform = |v: f64| -> Option<f64> {
        if log_scale {
            (v > 0.0).then(|| v.log10())
        } else {
            Some(v)
        }
    };
    let points: Vec<CorrelationPoint> = per_country
        .into_iter()
        .filter_map(|(country, (continent, gdp, co2))| {
            Some(CorrelationPoint {
                country: country.to_string(),
                continent_name: continent.to_string(),
                x: transform(gdp?)?,
                y: transform(co2?)?,
            })
        })
        .collect();
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.y).sum::<f64>() / n;
    let sxx: f64 = points.iter().map(|p| (p.x - mean_x).powi(2)).sum();
    let sxy: f64 = points.iter().map(|p| (p.x - mean_x) * (p.y - mean_y)).sum();
    let slope = ratio(sxy, sxx)?;
    let intercept = mean_y - slope * mean_x;

    let ss_tot: f64 = points.iter().map(|p| (p.y - mean_y).powi(2)).sum();
    let ss_res: f64 = points
        .iter()
        .map(|p| (p.y - (slope * p.x + intercept)).powi(2))
        .sum();
    let r_squared = ratio(ss_res, ss_tot).map(|r| 1.0 - r);

    Some(Correlation {
        points,
        slope,
        intercept,
        r_squared,
        log_scale,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapValue {
    pub iso_code: String,
    pub country: String,
    pub value: f64,
}

/// Values keyed by ISO code for choropleths; rows without a code are skipped.
pub fn map_values(table: &EmissionsTable, year: i32, metric: Metric) -> Vec<MapValue> {
    table
        .year(year)
        .filter_map(|r| {
            Some(MapValue {
                iso_code: r.iso_code.clone()?,
                country: r.country.clone(),
                value: r.get(metric)?,
            })
        })
        .collect()
}
