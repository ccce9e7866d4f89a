use crate::metric::Metric;
use crate::table::{EmissionsTable, Selection};
use crate::types::EmissionsRecord;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Largest value first.
    Descending,
    /// Smallest value first.
    Ascending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ranked {
    pub country: String,
    pub continent_name: String,
    pub year: i32,
    pub value: f64,
}

/// Rank records by `value`, skipping records where it is missing.
///
/// Ties are broken by country name ascending regardless of `order`, so the
/// result is deterministic. At most `n` entries are returned.
pub fn rank_by<'a, I, F>(records: I, n: usize, order: Order, value: F) -> Vec<Ranked>
where
    I: IntoIterator<Item = &'a EmissionsRecord>,
    F: Fn(&EmissionsRecord) -> Option<f64>,
{
    let mut ranked: Vec<Ranked> = records
        .into_iter()
        .filter_map(|r| {
            value(r).filter(|v| v.is_finite()).map(|v| Ranked {
                country: r.country.clone(),
                continent_name: r.continent_name.clone(),
                year: r.year,
                value: v,
            })
        })
        .collect();
    ranked.sort_by(|a, b| compare(a, b, order));
    ranked.truncate(n);
    ranked
}

fn compare(a: &Ranked, b: &Ranked, order: Order) -> Ordering {
    let by_value = match order {
        Order::Descending => b.value.total_cmp(&a.value),
        Order::Ascending => a.value.total_cmp(&b.value),
    };
    by_value
        .then_with(|| a.country.cmp(&b.country))
        .then_with(|| a.year.cmp(&b.year))
}

/// Top `n` countries by `metric` in `year`, largest first.
pub fn top_n(table: &EmissionsTable, metric: Metric, year: i32, n: usize) -> Vec<Ranked> {
    rank_by(table.year(year), n, Order::Descending, |r| r.get(metric))
}

/// Rank records matching `selection` by `metric`.
pub fn rank(
    table: &EmissionsTable,
    metric: Metric,
    selection: &Selection,
    n: usize,
    order: Order,
) -> Vec<Ranked> {
    rank_by(table.select(selection), n, order, |r| r.get(metric))
}
