use crate::config::LoadOptions;
use crate::error::{Error, Result};
use crate::metric::Metric;
use crate::table::EmissionsTable;
use crate::types::{ContinentRow, EmissionsRecord, DEFAULT_CONTINENT};
use crate::util::{parse_f64_safe, parse_i32_safe};
use csv::ReaderBuilder;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub parse_errors: usize,
    pub aggregate_rows: usize,
    pub out_of_range: usize,
    pub duplicates_dropped: usize,
    pub unmapped_continents: usize,
}

/// Transcontinental countries pinned to a single continent.
static CONTINENT_OVERRIDES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("RUS", "Europe"),
        ("AZE", "Asia"),
        ("ARM", "Asia"),
        ("CYP", "Europe"),
        ("GEO", "Europe"),
        ("KAZ", "Asia"),
        ("UMI", "Oceania"),
        ("TUR", "Europe"),
    ])
});

/// Read the ISO3 -> continent mapping. The first row for a code wins after
/// overrides are applied.
pub fn read_continents<R: Read>(reader: R) -> Result<HashMap<String, String>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut map: HashMap<String, String> = HashMap::new();
    for result in rdr.deserialize::<ContinentRow>() {
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                debug!("skipping continent row: {e}");
                continue;
            }
        };
        let Some(code) = row.three_letter_code.map(|c| c.trim().to_string()) else {
            continue;
        };
        if code.is_empty() {
            continue;
        }
        let continent = match CONTINENT_OVERRIDES.get(code.as_str()) {
            Some(c) => c.to_string(),
            None => match row.continent_name {
                Some(c) if !c.trim().is_empty() => c.trim().to_string(),
                _ => continue,
            },
        };
        map.entry(code).or_insert(continent);
    }
    Ok(map)
}

pub fn load_continents(path: &Path) -> Result<HashMap<String, String>> {
    let file = std::fs::File::open(path)?;
    read_continents(file)
}

/// Parse the emissions CSV into a table.
///
/// `country` and `year` columns are required; every other recognised column
/// is optional and unknown columns are ignored.
pub fn read_emissions<R: Read>(
    reader: R,
    continents: &HashMap<String, String>,
    options: &LoadOptions,
    source: &str,
) -> Result<(EmissionsTable, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);

    let country_idx = position("country").ok_or_else(|| Error::MissingColumn {
        column: "country",
        path: source.to_string(),
    })?;
    let year_idx = position("year").ok_or_else(|| Error::MissingColumn {
        column: "year",
        path: source.to_string(),
    })?;
    let iso_idx = position("iso_code");
    let metric_cols: Vec<(usize, Metric)> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| Metric::from_column(h).map(|m| (i, m)))
        .collect();
    debug!(
        columns = metric_cols.len(),
        "recognised metric columns in {source}"
    );

    let mut report = LoadReport::default();
    let mut records: Vec<EmissionsRecord> = Vec::new();

    for result in rdr.records() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(_) => {
                report.parse_errors += 1;
                continue;
            }
        };

        let country = row.get(country_idx).map(str::trim).unwrap_or_default();
        if country.is_empty() {
            report.parse_errors += 1;
            continue;
        }
        let year = match parse_i32_safe(row.get(year_idx)) {
            Some(y) => y,
            None => {
                report.parse_errors += 1;
                continue;
            }
        };
        if !options.years.contains(&year) {
            report.out_of_range += 1;
            continue;
        }

        let iso_code = iso_idx
            .and_then(|i| row.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        if iso_code.is_none() && !options.include_aggregates {
            report.aggregate_rows += 1;
            continue;
        }

        let continent = match iso_code.as_deref().and_then(|c| continents.get(c)) {
            Some(c) => c.clone(),
            None => {
                report.unmapped_continents += 1;
                DEFAULT_CONTINENT.to_string()
            }
        };

        let mut record = EmissionsRecord::new(country, year).with_continent(continent);
        record.iso_code = iso_code;
        for (idx, metric) in &metric_cols {
            record.set(*metric, parse_f64_safe(row.get(*idx)));
        }
        records.push(record);
    }

    let table = EmissionsTable::new(records, metric_cols.iter().map(|(_, m)| *m));
    report.duplicates_dropped = table.duplicates_dropped();
    report.kept_rows = table.len();
    Ok((table, report))
}

/// Load the dataset described by `options`, attaching continents when the
/// mapping file exists.
pub fn load_and_clean(options: &LoadOptions) -> Result<(EmissionsTable, LoadReport)> {
    let continents = match options.continents_path() {
        Some(path) if path.exists() => load_continents(&path)?,
        Some(path) => {
            warn!(
                "continent mapping {} not found; countries will be grouped as \"{}\"",
                path.display(),
                DEFAULT_CONTINENT
            );
            HashMap::new()
        }
        None => HashMap::new(),
    };

    let path = options.emissions_path();
    let file = std::fs::File::open(&path)?;
    let (table, report) = read_emissions(file, &continents, options, &path.display().to_string())?;
    info!(
        total = report.total_rows,
        kept = report.kept_rows,
        skipped = report.parse_errors,
        "loaded {}",
        path.display()
    );
    if report.parse_errors > 0 {
        warn!("{} rows skipped due to parse errors", report.parse_errors);
    }
    Ok((table, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMISSIONS: &str = "\
country,year,iso_code,co2,coal_co2,gdp,unknown_col
World,2010,,33000,14000,,x
Russia,2010,RUS,1700,,3.1e12,x
Russia,2010,RUS,9999,,,x
Chile,2010,CHL,80.5,20,,x
Chile,1990,CHL,30,,,x
Chile,abc,CHL,30,,,x
";

    const CONTINENTS: &str = "\
Continent_Name,Three_Letter_Country_Code
Asia,RUS
Europe,RUS
South America,CHL
";

    #[test]
    fn reads_rows_and_counts_skips() {
        let continents = read_continents(CONTINENTS.as_bytes()).unwrap();
        let options = LoadOptions::default();
        let (table, report) =
            read_emissions(EMISSIONS.as_bytes(), &continents, &options, "inline").unwrap();

        assert_eq!(report.total_rows, 6);
        assert_eq!(report.aggregate_rows, 1);
        assert_eq!(report.out_of_range, 1);
        assert_eq!(report.parse_errors, 1);
        assert_eq!(report.duplicates_dropped, 1);
        assert_eq!(report.kept_rows, 2);

        let russia = table.get("Russia", 2010).unwrap();
        assert_eq!(russia.continent_name, "Europe");
        assert_eq!(russia.get(Metric::Co2), Some(1700.0));
        assert_eq!(russia.get(Metric::CoalCo2), None);
        assert_eq!(russia.get(Metric::Gdp), Some(3.1e12));
        assert_eq!(table.get("Chile", 2010).unwrap().continent_name, "South America");

        assert!(table.has_column(Metric::CoalCo2));
        assert!(!table.has_column(Metric::Methane));
    }

    #[test]
    fn keeps_aggregates_when_asked() {
        let options = LoadOptions {
            include_aggregates: true,
            ..LoadOptions::default()
        };
        let (table, report) =
            read_emissions(EMISSIONS.as_bytes(), &HashMap::new(), &options, "inline").unwrap();
        assert_eq!(report.aggregate_rows, 0);
        assert_eq!(table.get("World", 2010).unwrap().continent_name, "Other");
    }

    #[test]
    fn missing_year_column_is_an_error() {
        let err = read_emissions(
            "country,co2\nChile,1\n".as_bytes(),
            &HashMap::new(),
            &LoadOptions::default(),
            "inline",
        )
        .unwrap_err();
        assert!(matches!(err, Error::MissingColumn { column: "year", .. }));
    }
}
