// The metric engine.
//
// Every function here is a pure query over an `EmissionsTable`: it never
// mutates the table and never fails. Missing columns, unknown countries or
// years and empty filters all produce an empty container or `None`.

pub mod breakdown;
pub mod consumption;
pub mod country;
pub mod cumulative;
pub mod efficiency;
pub mod fuel;
pub mod ghg;
pub mod overview;
pub mod ranking;
pub mod temperature;

/// Year-ascending `(year, value)` points with no missing years represented.
pub type Series = Vec<(i32, f64)>;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::metric::Metric;
    use crate::table::EmissionsTable;
    use crate::types::EmissionsRecord;

    pub const TOLERANCE: f64 = 1e-9;

    pub fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    pub fn record(country: &str, year: i32, values: &[(Metric, f64)]) -> EmissionsRecord {
        values
            .iter()
            .fold(EmissionsRecord::new(country, year), |r, (m, v)| r.with(*m, *v))
    }

    pub fn table(records: Vec<EmissionsRecord>) -> EmissionsTable {
        EmissionsTable::from_records(records)
    }
}
