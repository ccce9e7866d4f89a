// Carbon intensity: CO2 per unit of GDP and per unit of energy.
//
// Lower is better, so "improvement" over an interval is the relative drop
// `(earliest - latest) / earliest`.

use super::ranking::{rank_by, Order, Ranked};
use super::Series;
use crate::metric::Metric;
use crate::table::EmissionsTable;
use crate::types::EmissionsRecord;
use crate::util::ratio;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Kilograms per million tonnes, to express `co2 / gdp` as kg per dollar.
const KG_PER_MEGATONNE: f64 = 1e9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EfficiencyMetric {
    Co2PerGdp,
    Co2PerUnitEnergy,
}

impl EfficiencyMetric {
    pub const ALL: [EfficiencyMetric; 2] =
        [EfficiencyMetric::Co2PerGdp, EfficiencyMetric::Co2PerUnitEnergy];

    pub fn metric(self) -> Metric {
        match self {
            EfficiencyMetric::Co2PerGdp => Metric::Co2PerGdp,
            EfficiencyMetric::Co2PerUnitEnergy => Metric::Co2PerUnitEnergy,
        }
    }
}

impl fmt::Display for EfficiencyMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.metric().column())
    }
}

impl FromStr for EfficiencyMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EfficiencyMetric::ALL
            .into_iter()
            .find(|m| m.metric().column() == s.trim())
            .ok_or_else(|| format!("unknown efficiency metric `{s}`"))
    }
}

/// The record's value for `metric`.
///
/// `co2_per_gdp` is derived from `co2` and `gdp` when the source has no such
/// column at all; a present-but-empty column is left empty.
pub fn efficiency_value(
    table: &EmissionsTable,
    record: &EmissionsRecord,
    metric: EfficiencyMetric,
) -> Option<f64> {
    match metric {
        EfficiencyMetric::Co2PerGdp if !table.has_column(Metric::Co2PerGdp) => {
            let co2 = record.get(Metric::Co2)?;
            let gdp = record.get(Metric::Gdp)?;
            ratio(co2 * KG_PER_MEGATONNE, gdp)
        }
        _ => record.get(metric.metric()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EfficiencyImprovement {
    pub country: String,
    pub metric: EfficiencyMetric,
    pub start_year: i32,
    pub end_year: i32,
    pub start: f64,
    pub end: f64,
    /// `(start - end) / start`; positive means the intensity fell.
    pub improvement: f64,
}

/// Relative improvement between the earliest and latest years of `years`
/// that carry a value. Needs two distinct years and a non-zero start.
pub fn efficiency_improvement(
    table: &EmissionsTable,
    country: &str,
    metric: EfficiencyMetric,
    years: RangeInclusive<i32>,
) -> Option<EfficiencyImprovement> {
    let mut points = table
        .country(country)
        .iter()
        .filter(|r| years.contains(&r.year))
        .filter_map(|r| efficiency_value(table, r, metric).map(|v| (r.year, v)));
    let (start_year, start) = points.next()?;
    let (end_year, end) = points.last()?;
    let improvement = ratio(start - end, start)?;
    Some(EfficiencyImprovement {
        country: country.to_string(),
        metric,
        start_year,
        end_year,
        start,
        end,
        improvement,
    })
}

/// Improvement for every country where it is defined, best first.
pub fn improvement_ranking(
    table: &EmissionsTable,
    metric: EfficiencyMetric,
    years: RangeInclusive<i32>,
) -> Vec<EfficiencyImprovement> {
    let mut out: Vec<EfficiencyImprovement> = table
        .countries()
        .into_iter()
        .filter_map(|c| efficiency_improvement(table, c, metric, years.clone()))
        .collect();
    out.sort_by(|a, b| {
        b.improvement
            .total_cmp(&a.improvement)
            .then_with(|| a.country.cmp(&b.country))
    });
    out
}

/// Lowest intensity first.
pub fn most_efficient(
    table: &EmissionsTable,
    year: i32,
    metric: EfficiencyMetric,
    n: usize,
) -> Vec<Ranked> {
    rank_by(table.year(year), n, Order::Ascending, |r| {
        efficiency_value(table, r, metric)
    })
}

pub fn efficiency_trends(
    table: &EmissionsTable,
    countries: &[&str],
    metric: EfficiencyMetric,
) -> BTreeMap<String, Series> {
    countries
        .iter()
        .filter_map(|c| {
            let series: Series = table
                .country(c)
                .iter()
                .filter_map(|r| efficiency_value(table, r, metric).map(|v| (r.year, v)))
                .collect();
            (!series.is_empty()).then(|| (c.to_string(), series))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct EfficiencyPoint {
    pub country: String,
    pub gdp: f64,
    pub co2_per_gdp: f64,
    pub population: Option<f64>,
}

/// GDP against intensity for every country with both in `year`.
pub fn efficiency_vs_gdp(table: &EmissionsTable, year: i32) -> Vec<EfficiencyPoint> {
    table
        .year(year)
        .filter_map(|r| {
            Some(EfficiencyPoint {
                country: r.country.clone(),
                gdp: r.get(Metric::Gdp)?,
                co2_per_gdp: efficiency_value(table, r, EfficiencyMetric::Co2PerGdp)?,
                population: r.get(Metric::Population),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::fixtures::{approx, record, table};

    #[test]
    fn improvement_between_endpoints() {
        let t = table(vec![
            record("A", 1, &[(Metric::Co2PerGdp, 0.5)]),
            record("A", 5, &[(Metric::Co2, 1.0)]),
            record("A", 10, &[(Metric::Co2PerGdp, 0.3)]),
        ]);
        let imp = efficiency_improvement(&t, "A", EfficiencyMetric::Co2PerGdp, 1..=10).unwrap();
        assert_eq!((imp.start_year, imp.end_year), (1, 10));
        assert!(approx(imp.improvement, 0.4));
    }

    #[test]
    fn improvement_requires_two_points_and_nonzero_start() {
        let t = table(vec![
            record("A", 1, &[(Metric::Co2PerGdp, 0.5)]),
            record("B", 1, &[(Metric::Co2PerGdp, 0.0)]),
            record("B", 2, &[(Metric::Co2PerGdp, 0.2)]),
        ]);
        assert!(efficiency_improvement(&t, "A", EfficiencyMetric::Co2PerGdp, 1..=10).is_none());
        assert!(efficiency_improvement(&t, "B", EfficiencyMetric::Co2PerGdp, 1..=10).is_none());
        assert!(efficiency_improvement(&t, "C", EfficiencyMetric::Co2PerGdp, 1..=10).is_none());
        assert!(
            efficiency_improvement(&t, "A", EfficiencyMetric::Co2PerUnitEnergy, 1..=10).is_none()
        );
    }

    #[test]
    fn range_limits_the_endpoints() {
        let t = table(vec![
            record("A", 1, &[(Metric::Co2PerGdp, 1.0)]),
            record("A", 2, &[(Metric::Co2PerGdp, 0.8)]),
            record("A", 3, &[(Metric::Co2PerGdp, 0.4)]),
        ]);
        let imp = efficiency_improvement(&t, "A", EfficiencyMetric::Co2PerGdp, 2..=3).unwrap();
        assert!(approx(imp.improvement, 0.5));
    }

    #[test]
    fn derives_intensity_only_without_the_column() {
        let derived = table(vec![record(
            "A",
            1,
            &[(Metric::Co2, 2.0), (Metric::Gdp, 4e9)],
        )]);
        let r = derived.get("A", 1).unwrap();
        assert_eq!(efficiency_value(&derived, r, EfficiencyMetric::Co2PerGdp), Some(0.5));

        let with_column = table(vec![
            record("A", 1, &[(Metric::Co2, 2.0), (Metric::Gdp, 4e9)]),
            record("B", 1, &[(Metric::Co2PerGdp, 0.1)]),
        ]);
        let r = with_column.get("A", 1).unwrap();
        assert_eq!(efficiency_value(&with_column, r, EfficiencyMetric::Co2PerGdp), None);

        let zero_gdp = table(vec![record("A", 1, &[(Metric::Co2, 2.0), (Metric::Gdp, 0.0)])]);
        let r = zero_gdp.get("A", 1).unwrap();
        assert_eq!(efficiency_value(&zero_gdp, r, EfficiencyMetric::Co2PerGdp), None);
    }

    #[test]
    fn ranking_and_most_efficient() {
        let t = table(vec![
            record("A", 1, &[(Metric::Co2PerGdp, 0.5)]),
            record("A", 2, &[(Metric::Co2PerGdp, 0.25)]),
            record("B", 1, &[(Metric::Co2PerGdp, 0.4)]),
            record("B", 2, &[(Metric::Co2PerGdp, 0.3)]),
        ]);
        let ranked = improvement_ranking(&t, EfficiencyMetric::Co2PerGdp, 1..=2);
        assert_eq!(ranked[0].country, "A");
        assert_eq!(ranked.len(), 2);

        let best = most_efficient(&t, 2, EfficiencyMetric::Co2PerGdp, 1);
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].country, "A");

        let trends = efficiency_trends(&t, &["A", "Z"], EfficiencyMetric::Co2PerGdp);
        assert_eq!(trends.len(), 1);
        assert_eq!(trends["A"], vec![(1, 0.5), (2, 0.25)]);
    }

    #[test]
    fn scatter_needs_gdp_and_intensity() {
        let t = table(vec![
            record("A", 1, &[(Metric::Co2PerGdp, 0.5), (Metric::Gdp, 10.0)]),
            record("B", 1, &[(Metric::Co2PerGdp, 0.4)]),
        ]);
        let pts = efficiency_vs_gdp(&t, 1);
        assert_eq!(pts.len(), 1);
        assert_eq!(pts[0].population, None);
    }
}
