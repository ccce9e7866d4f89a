// Production-based vs consumption-based CO2 and the trade balance between
// them. A positive balance (production above consumption) means the country
// exports more embodied emissions than it imports.
use crate::metric::Metric;
use crate::metrics::overview::MapValue;
use crate::table::EmissionsTable;
use crate::types::EmissionsRecord;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeStatus {
    NetExporter,
    NetImporter,
    Balanced,
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TradeStatus::NetExporter => "Net exporter",
            TradeStatus::NetImporter => "Net importer",
            TradeStatus::Balanced => "Balanced",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductionConsumption {
    pub year: i32,
    pub production: Option<f64>,
    pub consumption: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeBalance {
    pub country: String,
    pub year: i32,
    pub production: f64,
    pub consumption: f64,
    /// `production - consumption`.
    pub balance: f64,
    pub status: TradeStatus,
}

impl TradeBalance {
    fn from_record(record: &EmissionsRecord) -> Option<TradeBalance> {
        let production = record.get(Metric::Co2)?;
        let consumption = record.get(Metric::ConsumptionCo2)?;
        let status = match consumption.partial_cmp(&production)? {
            Ordering::Less => TradeStatus::NetExporter,
            Ordering::Greater => TradeStatus::NetImporter,
            Ordering::Equal => TradeStatus::Balanced,
        };
        Some(TradeBalance {
            country: record.country.clone(),
            year: record.year,
            production,
            consumption,
            balance: production - consumption,
            status,
        })
    }
}

/// Years of `country` where at least one of the two figures is present.
pub fn production_vs_consumption(
    table: &EmissionsTable,
    country: &str,
) -> Vec<ProductionConsumption> {
    table
        .country(country)
        .iter()
        .map(|r| ProductionConsumption {
            year: r.year,
            production: r.get(Metric::Co2),
            consumption: r.get(Metric::ConsumptionCo2),
        })
        .filter(|p| p.production.is_some() || p.consumption.is_some())
        .collect()
}

/// Classification for each year where both figures are present.
pub fn trade_balance(table: &EmissionsTable, country: &str) -> Vec<TradeBalance> {
    table
        .country(country)
        .iter()
        .filter_map(TradeBalance::from_record)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeLeaders {
    /// Largest positive balance first.
    pub exporters: Vec<TradeBalance>,
    /// Most negative balance first.
    pub importers: Vec<TradeBalance>,
}

/// Top `n` net exporters and importers of embodied emissions in `year`.
pub fn trade_leaders(table: &EmissionsTable, year: i32, n: usize) -> TradeLeaders {
    let balances: Vec<TradeBalance> = table
        .year(year)
        .filter_map(TradeBalance::from_record)
        .collect();

    let mut exporters: Vec<TradeBalance> = balances
        .iter()
        .filter(|b| b.status == TradeStatus::NetExporter)
        .cloned()
        .collect();
    exporters.sort_by(|a, b| {
        b.balance
            .total_cmp(&a.balance)
            .then_with(|| a.country.cmp(&b.country))
    });
    exporters.truncate(n);

    let mut importers: Vec<TradeBalance> = balances
        .into_iter()
        .filter(|b| b.status == TradeStatus::NetImporter)
        .collect();
    importers.sort_by(|a, b| {
        a.balance
            .total_cmp(&b.balance)
            .then_with(|| a.country.cmp(&b.country))
    });
    importers.truncate(n);

    TradeLeaders { exporters, importers }
}

/// Trade balance per ISO code in `year` for choropleths. Rows without an ISO
/// code or without both figures are skipped.
pub fn trade_balance_map(table: &EmissionsTable, year: i32) -> Vec<MapValue> {
    table
        .year(year)
        .filter_map(|r| {
            let iso_code = r.iso_code.clone()?;
            let b = TradeBalance::from_record(r)?;
            Some(MapValue {
                iso_code,
                country: b.country,
                value: b.balance,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::fixtures::{record, table};

    fn pc(country: &str, year: i32, prod: f64, cons: f64) -> EmissionsRecord {
        record(
            country,
            year,
            &[(Metric::Co2, prod), (Metric::ConsumptionCo2, cons)],
        )
    }

    #[test]
    fn classifies_each_year_independently() {
        let t = table(vec![
            pc("China", 2000, 100.0, 80.0),
            pc("China", 2001, 100.0, 120.0),
            pc("China", 2002, 100.0, 100.0),
            record("China", 2003, &[(Metric::Co2, 100.0)]),
        ]);
        let tb = trade_balance(&t, "China");
        let statuses: Vec<(i32, TradeStatus)> = tb.iter().map(|b| (b.year, b.status)).collect();
        assert_eq!(
            statuses,
            vec![
                (2000, TradeStatus::NetExporter),
                (2001, TradeStatus::NetImporter),
                (2002, TradeStatus::Balanced),
            ]
        );
        assert_eq!(tb[0].balance, 20.0);
    }

    #[test]
    fn comparison_keeps_partial_years() {
        let t = table(vec![
            pc("China", 2000, 100.0, 80.0),
            record("China", 2001, &[(Metric::Co2, 90.0)]),
            record("China", 2002, &[(Metric::Gdp, 1.0)]),
        ]);
        let rows = production_vs_consumption(&t, "China");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].consumption, None);
    }

    #[test]
    fn missing_consumption_column_is_empty() {
        let t = table(vec![record("China", 2000, &[(Metric::Co2, 100.0)])]);
        assert!(trade_balance(&t, "China").is_empty());
        assert_eq!(trade_leaders(&t, 2000, 5), TradeLeaders::default());
    }

    #[test]
    fn leaders_split_by_direction() {
        let t = table(vec![
            pc("China", 2020, 100.0, 80.0),
            pc("Russia", 2020, 50.0, 20.0),
            pc("Swiss", 2020, 5.0, 15.0),
            pc("UK", 2020, 30.0, 60.0),
            pc("Even", 2020, 10.0, 10.0),
        ]);
        let l = trade_leaders(&t, 2020, 1);
        assert_eq!(l.exporters.len(), 1);
        assert_eq!(l.exporters[0].country, "Russia");
        assert_eq!(l.importers.len(), 1);
        assert_eq!(l.importers[0].country, "UK");
    }

    #[test]
    fn balance_map_needs_iso_code_and_both_figures() {
        let t = table(vec![
            pc("China", 2020, 100.0, 80.0).with_iso_code("CHN"),
            pc("UK", 2020, 30.0, 60.0).with_iso_code("GBR"),
            pc("World", 2020, 300.0, 300.0),
            record("India", 2020, &[(Metric::Co2, 40.0)]).with_iso_code("IND"),
            pc("China", 2019, 90.0, 80.0).with_iso_code("CHN"),
        ]);
        let map = trade_balance_map(&t, 2020);
        let got: Vec<(&str, f64)> = map.iter().map(|m| (m.iso_code.as_str(), m.value)).collect();
        assert_eq!(got, vec![("CHN", 20.0), ("GBR", -30.0)]);
        assert!(trade_balance_map(&t, 1990).is_empty());
    }
}
