// Category breakdowns: a set of metric columns read side by side, e.g. the
// fuel sources of a country's CO2 or the gases of its GHG emissions.
use super::Series;
use crate::metric::Metric;
use crate::table::{EmissionsTable, Selection};
use crate::util::ratio;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

pub type Breakdown = BTreeMap<Metric, f64>;

/// Category -> value for one country and year. Categories without a value
/// are left out.
pub fn breakdown(
    table: &EmissionsTable,
    country: &str,
    year: i32,
    categories: &[Metric],
) -> Breakdown {
    let Some(record) = table.get(country, year) else {
        return Breakdown::new();
    };
    categories
        .iter()
        .filter_map(|m| record.get(*m).map(|v| (*m, v)))
        .collect()
}

/// Category -> series for one country over an inclusive year range.
pub fn breakdown_series(
    table: &EmissionsTable,
    country: &str,
    years: RangeInclusive<i32>,
    categories: &[Metric],
) -> BTreeMap<Metric, Series> {
    let mut out: BTreeMap<Metric, Series> = BTreeMap::new();
    for record in table.country(country).iter().filter(|r| years.contains(&r.year)) {
        for metric in categories {
            if let Some(v) = record.get(*metric) {
                out.entry(*metric).or_default().push((record.year, v));
            }
        }
    }
    out
}

/// Category -> series of per-year sums across every record in `selection`.
/// A year where no record has a value for the category gets no point.
pub fn aggregate_series(
    table: &EmissionsTable,
    selection: &Selection,
    categories: &[Metric],
) -> BTreeMap<Metric, Series> {
    let mut sums: BTreeMap<Metric, BTreeMap<i32, f64>> = BTreeMap::new();
    for record in table.select(selection) {
        for metric in categories {
            if let Some(v) = record.get(*metric) {
                *sums.entry(*metric).or_default().entry(record.year).or_insert(0.0) += v;
            }
        }
    }
    sums.into_iter()
        .map(|(m, by_year)| (m, by_year.into_iter().collect()))
        .collect()
}

/// Each category's fraction of the breakdown total. Empty when the total is
/// zero.
pub fn shares(breakdown: &Breakdown) -> Breakdown {
    let total: f64 = breakdown.values().sum();
    breakdown
        .iter()
        .filter_map(|(m, v)| ratio(*v, total).map(|s| (*m, s)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::fixtures::{approx, record, table};

    const CATS: [Metric; 3] = [Metric::CoalCo2, Metric::OilCo2, Metric::GasCo2];

    #[test]
    fn omits_missing_categories() {
        let t = table(vec![record(
            "Chile",
            2020,
            &[(Metric::CoalCo2, 10.0), (Metric::GasCo2, 0.0)],
        )]);
        let b = breakdown(&t, "Chile", 2020, &CATS);
        assert_eq!(b.len(), 2);
        assert_eq!(b.get(&Metric::GasCo2), Some(&0.0));
        assert!(!b.contains_key(&Metric::OilCo2));
    }

    #[test]
    fn unknown_country_or_year_is_empty() {
        let t = table(vec![record("Chile", 2020, &[(Metric::CoalCo2, 1.0)])]);
        assert!(breakdown(&t, "Peru", 2020, &CATS).is_empty());
        assert!(breakdown(&t, "Chile", 2021, &CATS).is_empty());
        assert!(breakdown_series(&t, "Chile", 2000..=2010, &CATS).is_empty());
    }

    #[test]
    fn series_skips_gaps() {
        let t = table(vec![
            record("Chile", 2000, &[(Metric::CoalCo2, 1.0)]),
            record("Chile", 2001, &[(Metric::OilCo2, 2.0)]),
            record("Chile", 2002, &[(Metric::CoalCo2, 3.0)]),
        ]);
        let s = breakdown_series(&t, "Chile", 2000..=2002, &CATS);
        assert_eq!(s[&Metric::CoalCo2], vec![(2000, 1.0), (2002, 3.0)]);
        assert_eq!(s[&Metric::OilCo2], vec![(2001, 2.0)]);
        assert!(!s.contains_key(&Metric::GasCo2));
    }

    #[test]
    fn aggregate_sums_present_values_only() {
        let t = table(vec![
            record("Chile", 2000, &[(Metric::CoalCo2, 1.0)]),
            record("Peru", 2000, &[(Metric::CoalCo2, 2.5)]),
            record("Peru", 2001, &[(Metric::OilCo2, 4.0)]),
        ]);
        let s = aggregate_series(&t, &Selection::all(), &CATS);
        assert_eq!(s[&Metric::CoalCo2], vec![(2000, 3.5)]);
        assert_eq!(s[&Metric::OilCo2], vec![(2001, 4.0)]);
    }

    #[test]
    fn shares_sum_to_one() {
        let b: Breakdown = [(Metric::CoalCo2, 3.0), (Metric::OilCo2, 1.0)].into();
        let s = shares(&b);
        assert!(approx(s[&Metric::CoalCo2], 0.75));
        assert!(approx(s.values().sum::<f64>(), 1.0));
        let zero: Breakdown = [(Metric::CoalCo2, 0.0)].into();
        assert!(shares(&zero).is_empty());
    }
}
