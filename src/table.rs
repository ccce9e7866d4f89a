// The in-memory emissions table.
//
// Records are kept sorted by `(country, year)`, which makes a country's
// history a contiguous, year-ascending slice and turns key lookups into
// binary searches. The table is never mutated after construction.

use crate::metric::Metric;
use crate::types::EmissionsRecord;
use std::collections::BTreeSet;
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct EmissionsTable {
    records: Vec<EmissionsRecord>,
    columns: BTreeSet<Metric>,
    duplicates_dropped: usize,
}

impl EmissionsTable {
    /// Build a table from records and the set of metric columns the source
    /// provided. The first record seen for a `(country, year)` key wins.
    pub fn new(records: Vec<EmissionsRecord>, columns: impl IntoIterator<Item = Metric>) -> Self {
        let mut records = records;
        // Stable sort keeps input order among duplicates so dedup keeps the first.
        records.sort_by(|a, b| (a.country.as_str(), a.year).cmp(&(b.country.as_str(), b.year)));
        let before = records.len();
        records.dedup_by(|later, earlier| {
            later.country == earlier.country && later.year == earlier.year
        });
        let duplicates_dropped = before - records.len();
        if duplicates_dropped > 0 {
            warn!(duplicates_dropped, "dropped duplicate (country, year) rows");
        }
        EmissionsTable {
            records,
            columns: columns.into_iter().collect(),
            duplicates_dropped,
        }
    }

    /// Build a table whose column set is every metric populated in at least
    /// one record.
    pub fn from_records(records: Vec<EmissionsRecord>) -> Self {
        let columns: BTreeSet<Metric> = records.iter().flat_map(|r| r.populated()).collect();
        EmissionsTable::new(records, columns)
    }

    pub fn records(&self) -> &[EmissionsRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn duplicates_dropped(&self) -> usize {
        self.duplicates_dropped
    }

    /// Whether the source carried this column at all.
    pub fn has_column(&self, metric: Metric) -> bool {
        self.columns.contains(&metric)
    }

    pub fn columns(&self) -> impl Iterator<Item = Metric> + '_ {
        self.columns.iter().copied()
    }

    pub fn get(&self, country: &str, year: i32) -> Option<&EmissionsRecord> {
        self.records
            .binary_search_by(|r| (r.country.as_str(), r.year).cmp(&(country, year)))
            .ok()
            .map(|i| &self.records[i])
    }

    pub fn value(&self, country: &str, year: i32, metric: Metric) -> Option<f64> {
        self.get(country, year).and_then(|r| r.get(metric))
    }

    /// All records of one country, oldest year first.
    pub fn country(&self, country: &str) -> &[EmissionsRecord] {
        let start = self.records.partition_point(|r| r.country.as_str() < country);
        let end = self.records.partition_point(|r| r.country.as_str() <= country);
        &self.records[start..end]
    }

    pub fn year(&self, year: i32) -> impl Iterator<Item = &EmissionsRecord> + '_ {
        self.records.iter().filter(move |r| r.year == year)
    }

    pub fn select<'a>(
        &'a self,
        selection: &'a Selection,
    ) -> impl Iterator<Item = &'a EmissionsRecord> + 'a {
        self.records.iter().filter(move |r| selection.matches(r))
    }

    /// Distinct country names in ascending order.
    pub fn countries(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.records.iter().map(|r| r.country.as_str()).collect();
        out.dedup();
        out
    }

    /// Distinct years in ascending order.
    pub fn years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.records.iter().map(|r| r.year).collect();
        years.into_iter().collect()
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.records.iter().map(|r| r.year).max()
    }
}

/// Row filter shared by operations that accept a year list and continents.
///
/// An empty selection matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    years: Option<BTreeSet<i32>>,
    continents: Vec<String>,
}

impl Selection {
    pub fn all() -> Self {
        Selection::default()
    }

    pub fn year(year: i32) -> Self {
        Selection::years([year])
    }

    pub fn years(years: impl IntoIterator<Item = i32>) -> Self {
        Selection {
            years: Some(years.into_iter().collect()),
            continents: Vec::new(),
        }
    }

    pub fn with_continents<S: Into<String>>(
        mut self,
        continents: impl IntoIterator<Item = S>,
    ) -> Self {
        self.continents = continents.into_iter().map(Into::into).collect();
        self
    }

    pub fn matches(&self, record: &EmissionsRecord) -> bool {
        let year_ok = self
            .years
            .as_ref()
            .map_or(true, |ys| ys.contains(&record.year));
        let continent_ok = self.continents.is_empty()
            || self.continents.iter().any(|c| *c == record.continent_name);
        year_ok && continent_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(country: &str, year: i32, co2: f64) -> EmissionsRecord {
        EmissionsRecord::new(country, year).with(Metric::Co2, co2)
    }

    #[test]
    fn keeps_first_duplicate_and_sorts() {
        let table = EmissionsTable::from_records(vec![
            rec("Chile", 2001, 2.0),
            rec("Brazil", 2000, 1.0),
            rec("Chile", 2000, 3.0),
            rec("Chile", 2001, 99.0),
        ]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.duplicates_dropped(), 1);
        assert_eq!(table.value("Chile", 2001, Metric::Co2), Some(2.0));
        assert_eq!(table.countries(), vec!["Brazil", "Chile"]);
        let years: Vec<i32> = table.country("Chile").iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2000, 2001]);
    }

    #[test]
    fn lookups_on_missing_keys_are_empty() {
        let table = EmissionsTable::from_records(vec![rec("Chile", 2000, 3.0)]);
        assert!(table.get("Peru", 2000).is_none());
        assert!(table.get("Chile", 1999).is_none());
        assert!(table.country("Peru").is_empty());
        assert_eq!(table.value("Chile", 2000, Metric::Gdp), None);
    }

    #[test]
    fn infers_columns_from_values() {
        let table = EmissionsTable::from_records(vec![
            rec("Chile", 2000, 3.0),
            EmissionsRecord::new("Peru", 2000).with(Metric::Gdp, 10.0),
        ]);
        assert!(table.has_column(Metric::Co2));
        assert!(table.has_column(Metric::Gdp));
        assert!(!table.has_column(Metric::Methane));
    }

    #[test]
    fn non_finite_values_read_as_missing() {
        let table = EmissionsTable::from_records(vec![rec("Chile", 2000, f64::NAN)]);
        assert_eq!(table.value("Chile", 2000, Metric::Co2), None);
        assert!(!table.has_column(Metric::Co2));
    }

    #[test]
    fn selection_filters_years_and_continents() {
        let table = EmissionsTable::from_records(vec![
            rec("Chile", 2000, 1.0).with_continent("South America"),
            rec("Chile", 2001, 1.0).with_continent("South America"),
            rec("France", 2000, 1.0).with_continent("Europe"),
        ]);
        let sel = Selection::year(2000).with_continents(["Europe"]);
        let hits: Vec<&str> = table.select(&sel).map(|r| r.country.as_str()).collect();
        assert_eq!(hits, vec!["France"]);
        assert_eq!(table.select(&Selection::all()).count(), 3);
    }
}
