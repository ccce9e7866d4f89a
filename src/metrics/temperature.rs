// Estimated global temperature change attributable to a country's emissions.
//
// The dataset already carries the per-gas contributions; shares are each
// gas's contribution over `temperature_change_from_ghg`.
use super::breakdown::{breakdown, breakdown_series, Breakdown};
use super::ranking::top_n;
use super::Series;
use crate::metric::Metric;
use crate::table::EmissionsTable;
use crate::util::ratio;
use std::collections::BTreeMap;

pub const TEMPERATURE_GAS_METRICS: [Metric; 3] = [
    Metric::TemperatureChangeFromCo2,
    Metric::TemperatureChangeFromCh4,
    Metric::TemperatureChangeFromN2o,
];

pub fn temperature_breakdown(table: &EmissionsTable, country: &str) -> BTreeMap<Metric, Series> {
    breakdown_series(table, country, i32::MIN..=i32::MAX, &TEMPERATURE_GAS_METRICS)
}

/// `(year, value)` of the latest `temperature_change_from_ghg` for `country`.
pub fn total_attributed_warming(table: &EmissionsTable, country: &str) -> Option<(i32, f64)> {
    table
        .country(country)
        .iter()
        .rev()
        .find_map(|r| r.get(Metric::TemperatureChangeFromGhg).map(|v| (r.year, v)))
}

/// Each gas's fraction of the total attributed warming in `year`.
pub fn temperature_shares(table: &EmissionsTable, country: &str, year: i32) -> Breakdown {
    let Some(total) = table.value(country, year, Metric::TemperatureChangeFromGhg) else {
        return Breakdown::new();
    };
    breakdown(table, country, year, &TEMPERATURE_GAS_METRICS)
        .into_iter()
        .filter_map(|(m, v)| ratio(v, total).map(|s| (m, s)))
        .collect()
}

/// Shares at the year reported by [`total_attributed_warming`].
pub fn latest_temperature_shares(
    table: &EmissionsTable,
    country: &str,
) -> Option<(i32, Breakdown)> {
    let (year, _) = total_attributed_warming(table, country)?;
    let shares = temperature_shares(table, country, year);
    (!shares.is_empty()).then_some((year, shares))
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureContributor {
    pub country: String,
    pub continent_name: String,
    pub temperature_change: f64,
    /// Share of global temperature change, in percent as published.
    pub share_of_global: Option<f64>,
}

pub fn top_temperature_contributors(
    table: &EmissionsTable,
    year: i32,
    n: usize,
) -> Vec<TemperatureContributor> {
    top_n(table, Metric::TemperatureChangeFromGhg, year, n)
        .into_iter()
        .map(|r| TemperatureContributor {
            share_of_global: table.value(&r.country, year, Metric::ShareOfTemperatureChangeFromGhg),
            country: r.country,
            continent_name: r.continent_name,
            temperature_change: r.value,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemperaturePoint {
    pub country: String,
    pub co2: f64,
    pub temperature_change: f64,
    pub population: Option<f64>,
}

pub fn temperature_vs_emissions(table: &EmissionsTable, year: i32) -> Vec<TemperaturePoint> {
    table
        .year(year)
        .filter_map(|r| {
            Some(TemperaturePoint {
                country: r.country.clone(),
                co2: r.get(Metric::Co2)?,
                temperature_change: r.get(Metric::TemperatureChangeFromGhg)?,
                population: r.get(Metric::Population),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::fixtures::{approx, record, table};

    fn temps(
        country: &str,
        year: i32,
        co2: f64,
        ch4: f64,
        n2o: f64,
    ) -> crate::types::EmissionsRecord {
        record(
            country,
            year,
            &[
                (Metric::TemperatureChangeFromCo2, co2),
                (Metric::TemperatureChangeFromCh4, ch4),
                (Metric::TemperatureChangeFromN2o, n2o),
                (Metric::TemperatureChangeFromGhg, co2 + ch4 + n2o),
            ],
        )
    }

    #[test]
    fn shares_sum_to_one() {
        let t = table(vec![temps("US", 2020, 0.12, 0.05, 0.01)]);
        let s = temperature_shares(&t, "US", 2020);
        assert_eq!(s.len(), 3);
        assert!(approx(s.values().sum::<f64>(), 1.0));
        assert!(approx(s[&Metric::TemperatureChangeFromCo2], 0.12 / 0.18));
    }

    #[test]
    fn missing_or_zero_total_gives_no_shares() {
        let no_total = table(vec![record(
            "US",
            2020,
            &[(Metric::TemperatureChangeFromCo2, 0.1)],
        )]);
        assert!(temperature_shares(&no_total, "US", 2020).is_empty());
        assert!(latest_temperature_shares(&no_total, "US").is_none());

        let zero = table(vec![temps("US", 2020, 0.0, 0.0, 0.0)]);
        assert!(temperature_shares(&zero, "US", 2020).is_empty());
    }

    #[test]
    fn missing_gas_is_omitted() {
        let t = table(vec![record(
            "US",
            2020,
            &[
                (Metric::TemperatureChangeFromCo2, 0.1),
                (Metric::TemperatureChangeFromGhg, 0.2),
            ],
        )]);
        let s = temperature_shares(&t, "US", 2020);
        assert_eq!(s.len(), 1);
        assert!(approx(s[&Metric::TemperatureChangeFromCo2], 0.5));
    }

    #[test]
    fn total_is_latest_year() {
        let t = table(vec![
            temps("US", 2019, 0.1, 0.0, 0.0),
            temps("US", 2020, 0.2, 0.0, 0.0),
            record("US", 2021, &[(Metric::Co2, 1.0)]),
        ]);
        assert_eq!(total_attributed_warming(&t, "US"), Some((2020, 0.2)));
        let (year, shares) = latest_temperature_shares(&t, "US").unwrap();
        assert_eq!(year, 2020);
        assert!(approx(shares[&Metric::TemperatureChangeFromCo2], 1.0));
        assert_eq!(total_attributed_warming(&t, "Peru"), None);
    }

    #[test]
    fn contributors_carry_global_share() {
        let t = table(vec![
            temps("US", 2020, 0.2, 0.0, 0.0).with(Metric::ShareOfTemperatureChangeFromGhg, 17.0),
            temps("UK", 2020, 0.05, 0.0, 0.0),
        ]);
        let top = top_temperature_contributors(&t, 2020, 5);
        assert_eq!(top[0].country, "US");
        assert_eq!(top[0].share_of_global, Some(17.0));
        assert_eq!(top[1].share_of_global, None);
        assert_eq!(temperature_breakdown(&t, "UK").len(), 3);
        assert!(temperature_vs_emissions(&t, 2020).is_empty());
    }
}
