use crate::metric::Metric;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

pub const DEFAULT_CONTINENT: &str = "Other";

/// One row of the country/continent mapping file.
#[derive(Debug, Deserialize)]
pub struct ContinentRow {
    #[serde(rename = "Three_Letter_Country_Code")]
    pub three_letter_code: Option<String>,
    #[serde(rename = "Continent_Name")]
    pub continent_name: Option<String>,
}

/// One country-year of the emissions dataset.
///
/// Every numeric column is optional: a missing measurement is `None`, never
/// zero. Non-finite inputs are stored as `None` as well.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionsRecord {
    pub country: String,
    pub iso_code: Option<String>,
    pub continent_name: String,
    pub year: i32,
    values: [Option<f64>; Metric::COUNT],
}

impl EmissionsRecord {
    pub fn new(country: impl Into<String>, year: i32) -> Self {
        EmissionsRecord {
            country: country.into(),
            iso_code: None,
            continent_name: DEFAULT_CONTINENT.to_string(),
            year,
            values: [None; Metric::COUNT],
        }
    }

    pub fn with_iso_code(mut self, iso_code: impl Into<String>) -> Self {
        self.iso_code = Some(iso_code.into());
        self
    }

    pub fn with_continent(mut self, continent: impl Into<String>) -> Self {
        self.continent_name = continent.into();
        self
    }

    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.set(metric, Some(value));
        self
    }

    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        self.values[metric.index()] = value.filter(|v| v.is_finite());
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values[metric.index()]
    }

    /// Metrics that carry a value in this record.
    pub fn populated(&self) -> impl Iterator<Item = Metric> + '_ {
        Metric::ALL
            .into_iter()
            .filter(move |m| self.values[m.index()].is_some())
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RankingRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "Continent")]
    #[tabled(rename = "Continent")]
    pub continent: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct BreakdownRow {
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
    #[serde(rename = "SharePct")]
    #[tabled(rename = "SharePct")]
    pub share_pct: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SeriesRow {
    #[serde(rename = "Series")]
    #[tabled(rename = "Series")]
    pub series: String,
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TradeRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "ProductionCO2")]
    #[tabled(rename = "ProductionCO2")]
    pub production: String,
    #[serde(rename = "ConsumptionCO2")]
    #[tabled(rename = "ConsumptionCO2")]
    pub consumption: String,
    #[serde(rename = "TradeBalance")]
    #[tabled(rename = "TradeBalance")]
    pub balance: String,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TradeLeaderRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "ProductionCO2")]
    #[tabled(rename = "ProductionCO2")]
    pub production: String,
    #[serde(rename = "ConsumptionCO2")]
    #[tabled(rename = "ConsumptionCO2")]
    pub consumption: String,
    #[serde(rename = "TradeBalance")]
    #[tabled(rename = "TradeBalance")]
    pub balance: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ImprovementRow {
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "StartYear")]
    #[tabled(rename = "StartYear")]
    pub start_year: i32,
    #[serde(rename = "EndYear")]
    #[tabled(rename = "EndYear")]
    pub end_year: i32,
    #[serde(rename = "Start")]
    #[tabled(rename = "Start")]
    pub start: String,
    #[serde(rename = "End")]
    #[tabled(rename = "End")]
    pub end: String,
    #[serde(rename = "ImprovementPct")]
    #[tabled(rename = "ImprovementPct")]
    pub improvement_pct: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct HistoricalShareRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "CumulativeCO2")]
    #[tabled(rename = "CumulativeCO2")]
    pub cumulative: String,
    #[serde(rename = "SharePct")]
    #[tabled(rename = "SharePct")]
    pub share_pct: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ContinentRowOut {
    #[serde(rename = "Continent")]
    #[tabled(rename = "Continent")]
    pub continent: String,
    #[serde(rename = "TotalCO2")]
    #[tabled(rename = "TotalCO2")]
    pub total_co2: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CountrySummaryRow {
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "Years")]
    #[tabled(rename = "Years")]
    pub years: String,
    #[serde(rename = "GdpGrowthPct")]
    #[tabled(rename = "GdpGrowthPct")]
    pub gdp_growth_pct: String,
    #[serde(rename = "Co2PerCapitaChangePct")]
    #[tabled(rename = "Co2PerCapitaChangePct")]
    pub co2_per_capita_change_pct: String,
    #[serde(rename = "GreenGrowth")]
    #[tabled(rename = "GreenGrowth")]
    pub green_growth: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct HierarchyRow {
    #[serde(rename = "Continent")]
    #[tabled(rename = "Continent")]
    pub continent: String,
    #[serde(rename = "GdpCategory")]
    #[tabled(rename = "GdpCategory")]
    pub gdp_category: String,
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MapRow {
    #[serde(rename = "IsoCode")]
    #[tabled(rename = "IsoCode")]
    pub iso_code: String,
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TrendRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "GDP")]
    #[tabled(rename = "GDP")]
    pub gdp: String,
    #[serde(rename = "CO2PerCapita")]
    #[tabled(rename = "CO2PerCapita")]
    pub co2_per_capita: String,
    #[serde(rename = "Population")]
    #[tabled(rename = "Population")]
    pub population: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub countries: usize,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    pub total_co2: Option<f64>,
    pub co2_per_capita: Option<f64>,
    pub avg_country_co2_per_capita: Option<f64>,
}
