// Numeric columns of the OWID CO2 dataset.
//
// `Metric` is the typed handle for a column: records store one optional
// value per metric, and every engine operation selects columns through it
// instead of passing raw column names around.
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Co2,
    Co2PerCapita,
    ConsumptionCo2,
    CoalCo2,
    OilCo2,
    GasCo2,
    CementCo2,
    FlaringCo2,
    CumulativeCo2,
    CumulativeCo2IncludingLuc,
    CumulativeCoalCo2,
    CumulativeOilCo2,
    CumulativeGasCo2,
    Population,
    Gdp,
    Co2PerGdp,
    Co2PerUnitEnergy,
    EnergyPerCapita,
    Methane,
    NitrousOxide,
    GhgPerCapita,
    GhgExcludingLucfPerCapita,
    TemperatureChangeFromCo2,
    TemperatureChangeFromCh4,
    TemperatureChangeFromN2o,
    TemperatureChangeFromGhg,
    ShareOfTemperatureChangeFromGhg,
}

impl Metric {
    pub const COUNT: usize = 27;

    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::Co2,
        Metric::Co2PerCapita,
        Metric::ConsumptionCo2,
        Metric::CoalCo2,
        Metric::OilCo2,
        Metric::GasCo2,
        Metric::CementCo2,
        Metric::FlaringCo2,
        Metric::CumulativeCo2,
        Metric::CumulativeCo2IncludingLuc,
        Metric::CumulativeCoalCo2,
        Metric::CumulativeOilCo2,
        Metric::CumulativeGasCo2,
        Metric::Population,
        Metric::Gdp,
        Metric::Co2PerGdp,
        Metric::Co2PerUnitEnergy,
        Metric::EnergyPerCapita,
        Metric::Methane,
        Metric::NitrousOxide,
        Metric::GhgPerCapita,
        Metric::GhgExcludingLucfPerCapita,
        Metric::TemperatureChangeFromCo2,
        Metric::TemperatureChangeFromCh4,
        Metric::TemperatureChangeFromN2o,
        Metric::TemperatureChangeFromGhg,
        Metric::ShareOfTemperatureChangeFromGhg,
    ];

    /// Slot of this metric in a record's value array.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Column name as it appears in the dataset header.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Co2 => "co2",
            Metric::Co2PerCapita => "co2_per_capita",
            Metric::ConsumptionCo2 => "consumption_co2",
            Metric::CoalCo2 => "coal_co2",
            Metric::OilCo2 => "oil_co2",
            Metric::GasCo2 => "gas_co2",
            Metric::CementCo2 => "cement_co2",
            Metric::FlaringCo2 => "flaring_co2",
            Metric::CumulativeCo2 => "cumulative_co2",
            Metric::CumulativeCo2IncludingLuc => "cumulative_co2_including_luc",
            Metric::CumulativeCoalCo2 => "cumulative_coal_co2",
            Metric::CumulativeOilCo2 => "cumulative_oil_co2",
            Metric::CumulativeGasCo2 => "cumulative_gas_co2",
            Metric::Population => "population",
            Metric::Gdp => "gdp",
            Metric::Co2PerGdp => "co2_per_gdp",
            Metric::Co2PerUnitEnergy => "co2_per_unit_energy",
            Metric::EnergyPerCapita => "energy_per_capita",
            Metric::Methane => "methane",
            Metric::NitrousOxide => "nitrous_oxide",
            Metric::GhgPerCapita => "ghg_per_capita",
            Metric::GhgExcludingLucfPerCapita => "ghg_excluding_lucf_per_capita",
            Metric::TemperatureChangeFromCo2 => "temperature_change_from_co2",
            Metric::TemperatureChangeFromCh4 => "temperature_change_from_ch4",
            Metric::TemperatureChangeFromN2o => "temperature_change_from_n2o",
            Metric::TemperatureChangeFromGhg => "temperature_change_from_ghg",
            Metric::ShareOfTemperatureChangeFromGhg => "share_of_temperature_change_from_ghg",
        }
    }

    /// Short human-readable label used in report headers.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Co2 => "CO2",
            Metric::Co2PerCapita => "CO2 per capita",
            Metric::ConsumptionCo2 => "Consumption CO2",
            Metric::CoalCo2 | Metric::CumulativeCoalCo2 => "Coal",
            Metric::OilCo2 | Metric::CumulativeOilCo2 => "Oil",
            Metric::GasCo2 | Metric::CumulativeGasCo2 => "Gas",
            Metric::CementCo2 => "Cement",
            Metric::FlaringCo2 => "Flaring",
            Metric::CumulativeCo2 => "Cumulative CO2",
            Metric::CumulativeCo2IncludingLuc => "Cumulative CO2 incl. LUC",
            Metric::Population => "Population",
            Metric::Gdp => "GDP",
            Metric::Co2PerGdp => "CO2 per GDP",
            Metric::Co2PerUnitEnergy => "CO2 per unit energy",
            Metric::EnergyPerCapita => "Energy per capita",
            Metric::Methane => "Methane",
            Metric::NitrousOxide => "Nitrous Oxide",
            Metric::GhgPerCapita => "GHG per capita",
            Metric::GhgExcludingLucfPerCapita => "GHG per capita excl. LUCF",
            Metric::TemperatureChangeFromCo2 => "CO2",
            Metric::TemperatureChangeFromCh4 => "Methane",
            Metric::TemperatureChangeFromN2o => "Nitrous Oxide",
            Metric::TemperatureChangeFromGhg => "Temperature change (GHG)",
            Metric::ShareOfTemperatureChangeFromGhg => "Share of temperature change",
        }
    }
}

static BY_COLUMN: Lazy<HashMap<&'static str, Metric>> =
    Lazy::new(|| Metric::ALL.iter().map(|m| (m.column(), *m)).collect());

impl Metric {
    /// Look up a metric by its dataset column name.
    pub fn from_column(name: &str) -> Option<Metric> {
        BY_COLUMN.get(name.trim()).copied()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown metric column `{0}`")]
pub struct UnknownMetric(pub String);

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::from_column(s).ok_or_else(|| UnknownMetric(s.to_string()))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_declaration_order() {
        for (i, m) in Metric::ALL.iter().enumerate() {
            assert_eq!(m.index(), i, "{m} is out of place");
        }
    }

    #[test]
    fn parses_column_names() {
        assert_eq!("co2_per_gdp".parse::<Metric>(), Ok(Metric::Co2PerGdp));
        assert_eq!(
            Metric::from_column(" temperature_change_from_n2o "),
            Some(Metric::TemperatureChangeFromN2o)
        );
        assert_eq!(
            "co3".parse::<Metric>(),
            Err(UnknownMetric("co3".to_string()))
        );
    }

    #[test]
    fn column_names_round_trip_through_lookup() {
        for m in Metric::ALL {
            assert_eq!(Metric::from_column(m.column()), Some(m));
        }
    }
}
