// CO2 by fuel source: coal, oil, gas, cement and flaring.

use super::breakdown::{aggregate_series, breakdown, breakdown_series, Breakdown};
use super::ranking::{top_n, Ranked};
use super::Series;
use crate::metric::Metric;
use crate::table::{EmissionsTable, Selection};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FuelSource {
    Coal,
    Oil,
    Gas,
    Cement,
    Flaring,
}

impl FuelSource {
    pub const ALL: [FuelSource; 5] = [
        FuelSource::Coal,
        FuelSource::Oil,
        FuelSource::Gas,
        FuelSource::Cement,
        FuelSource::Flaring,
    ];

    pub fn metric(self) -> Metric {
        match self {
            FuelSource::Coal => Metric::CoalCo2,
            FuelSource::Oil => Metric::OilCo2,
            FuelSource::Gas => Metric::GasCo2,
            FuelSource::Cement => Metric::CementCo2,
            FuelSource::Flaring => Metric::FlaringCo2,
        }
    }
}

impl fmt::Display for FuelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.metric().label())
    }
}

impl FromStr for FuelSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        FuelSource::ALL
            .into_iter()
            .find(|f| key == f.to_string().to_ascii_lowercase() || key == f.metric().column())
            .ok_or_else(|| format!("unknown fuel source `{s}`"))
    }
}

pub const FUEL_METRICS: [Metric; 5] = [
    Metric::CoalCo2,
    Metric::OilCo2,
    Metric::GasCo2,
    Metric::CementCo2,
    Metric::FlaringCo2,
];

pub fn fuel_breakdown(table: &EmissionsTable, country: &str, year: i32) -> Breakdown {
    breakdown(table, country, year, &FUEL_METRICS)
}

pub fn fuel_breakdown_series(
    table: &EmissionsTable,
    country: &str,
    years: RangeInclusive<i32>,
) -> BTreeMap<Metric, Series> {
    breakdown_series(table, country, years, &FUEL_METRICS)
}

/// Fuel series summed over every country in the table.
pub fn global_fuel_series(table: &EmissionsTable) -> BTreeMap<Metric, Series> {
    aggregate_series(table, &Selection::all(), &FUEL_METRICS)
}

pub fn top_fuel_consumers(
    table: &EmissionsTable,
    year: i32,
    fuel: FuelSource,
    n: usize,
) -> Vec<Ranked> {
    top_n(table, fuel.metric(), year, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::fixtures::{record, table};

    #[test]
    fn parses_fuel_names() {
        assert_eq!("coal".parse::<FuelSource>(), Ok(FuelSource::Coal));
        assert_eq!("Flaring".parse::<FuelSource>(), Ok(FuelSource::Flaring));
        assert_eq!("gas_co2".parse::<FuelSource>(), Ok(FuelSource::Gas));
        assert!("peat".parse::<FuelSource>().is_err());
    }

    #[test]
    fn breakdown_for_one_year() {
        let t = table(vec![record(
            "Poland",
            2020,
            &[(Metric::CoalCo2, 200.0), (Metric::OilCo2, 70.0), (Metric::Co2, 300.0)],
        )]);
        let b = fuel_breakdown(&t, "Poland", 2020);
        assert_eq!(b.len(), 2);
        assert!(!b.contains_key(&Metric::Co2));
    }

    #[test]
    fn top_consumers_of_one_fuel() {
        let t = table(vec![
            record("Poland", 2020, &[(Metric::CoalCo2, 200.0)]),
            record("China", 2020, &[(Metric::CoalCo2, 7000.0)]),
            record("Norway", 2020, &[(Metric::OilCo2, 20.0)]),
        ]);
        let top = top_fuel_consumers(&t, 2020, FuelSource::Coal, 10);
        let names: Vec<&str> = top.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["China", "Poland"]);
        assert!(top_fuel_consumers(&t, 2020, FuelSource::Cement, 10).is_empty());
    }

    #[test]
    fn global_series_spans_countries() {
        let t = table(vec![
            record("Poland", 2020, &[(Metric::CoalCo2, 200.0)]),
            record("China", 2020, &[(Metric::CoalCo2, 7000.0)]),
        ]);
        let s = global_fuel_series(&t);
        assert_eq!(s[&Metric::CoalCo2], vec![(2020, 7200.0)]);
        assert_eq!(s.len(), 1);
    }
}
