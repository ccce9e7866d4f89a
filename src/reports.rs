// Turn engine results into display rows.
//
// Numbers are formatted here and nowhere else; missing values render as an
// em dash so they are never mistaken for zero.
use crate::metric::Metric;
use crate::metrics::breakdown::{shares, Breakdown};
use crate::metrics::consumption::TradeBalance;
use crate::metrics::country::{CountrySummary, TrendPoint};
use crate::metrics::cumulative::HistoricalShare;
use crate::metrics::efficiency::EfficiencyImprovement;
use crate::metrics::overview::{HierarchyNode, MapValue};
use crate::metrics::ranking::Ranked;
use crate::metrics::temperature::TemperatureContributor;
use crate::metrics::Series;
use crate::types::{
    BreakdownRow, ContinentRowOut, CountrySummaryRow, HierarchyRow, HistoricalShareRow,
    ImprovementRow, MapRow, RankingRow, SeriesRow, TradeLeaderRow, TradeRow, TrendRow,
};
use crate::util::{format_number, format_opt};
use std::collections::BTreeMap;

pub fn ranking_rows(ranked: &[Ranked], decimals: usize) -> Vec<RankingRow> {
    ranked
        .iter()
        .enumerate()
        .map(|(idx, r)| RankingRow {
            rank: idx + 1,
            country: r.country.clone(),
            continent: r.continent_name.clone(),
            value: format_number(r.value, decimals),
        })
        .collect()
}

pub fn temperature_rows(contributors: &[TemperatureContributor]) -> Vec<RankingRow> {
    contributors
        .iter()
        .enumerate()
        .map(|(idx, c)| RankingRow {
            rank: idx + 1,
            country: c.country.clone(),
            continent: c.continent_name.clone(),
            value: match c.share_of_global {
                Some(share) => format!(
                    "{} \u{b0}C ({}%)",
                    format_number(c.temperature_change, 4),
                    format_number(share, 2)
                ),
                None => format!("{} \u{b0}C", format_number(c.temperature_change, 4)),
            },
        })
        .collect()
}

pub fn breakdown_rows(breakdown: &Breakdown, decimals: usize) -> Vec<BreakdownRow> {
    let pct = shares(breakdown);
    breakdown
        .iter()
        .map(|(m, v)| BreakdownRow {
            category: m.label().to_string(),
            value: format_number(*v, decimals),
            share_pct: format_opt(pct.get(m).map(|s| s * 100.0), 2),
        })
        .collect()
}

/// Rows for a share map whose values are already fractions.
pub fn share_rows(values: &Breakdown, fractions: &Breakdown, decimals: usize) -> Vec<BreakdownRow> {
    values
        .iter()
        .map(|(m, v)| BreakdownRow {
            category: m.label().to_string(),
            value: format_number(*v, decimals),
            share_pct: format_opt(fractions.get(m).map(|s| s * 100.0), 2),
        })
        .collect()
}

pub fn metric_series_rows(series: &BTreeMap<Metric, Series>, decimals: usize) -> Vec<SeriesRow> {
    series
        .iter()
        .flat_map(|(m, points)| {
            points.iter().map(move |(year, v)| SeriesRow {
                series: m.label().to_string(),
                year: *year,
                value: format_number(*v, decimals),
            })
        })
        .collect()
}

pub fn named_series_rows(series: &BTreeMap<String, Series>, decimals: usize) -> Vec<SeriesRow> {
    series
        .iter()
        .flat_map(|(name, points)| {
            points.iter().map(move |(year, v)| SeriesRow {
                series: name.clone(),
                year: *year,
                value: format_number(*v, decimals),
            })
        })
        .collect()
}

pub fn trade_rows(balances: &[TradeBalance]) -> Vec<TradeRow> {
    balances
        .iter()
        .map(|b| TradeRow {
            year: b.year,
            production: format_number(b.production, 2),
            consumption: format_number(b.consumption, 2),
            balance: format_number(b.balance, 2),
            status: b.status.to_string(),
        })
        .collect()
}

pub fn trade_leader_rows(balances: &[TradeBalance]) -> Vec<TradeLeaderRow> {
    balances
        .iter()
        .enumerate()
        .map(|(idx, b)| TradeLeaderRow {
            rank: idx + 1,
            country: b.country.clone(),
            production: format_number(b.production, 2),
            consumption: format_number(b.consumption, 2),
            balance: format_number(b.balance, 2),
        })
        .collect()
}

pub fn improvement_rows(improvements: &[EfficiencyImprovement]) -> Vec<ImprovementRow> {
    improvements
        .iter()
        .map(|i| ImprovementRow {
            country: i.country.clone(),
            start_year: i.start_year,
            end_year: i.end_year,
            start: format_number(i.start, 4),
            end: format_number(i.end, 4),
            improvement_pct: format_number(i.improvement * 100.0, 2),
        })
        .collect()
}

pub fn historical_share_rows(shares: &[HistoricalShare]) -> Vec<HistoricalShareRow> {
    shares
        .iter()
        .enumerate()
        .map(|(idx, s)| HistoricalShareRow {
            rank: idx + 1,
            country: s.country.clone(),
            cumulative: format_number(s.cumulative_co2, 2),
            share_pct: format_number(s.share * 100.0, 2),
        })
        .collect()
}

pub fn continent_rows(totals: &[(String, f64)]) -> Vec<ContinentRowOut> {
    totals
        .iter()
        .map(|(continent, total)| ContinentRowOut {
            continent: continent.clone(),
            total_co2: format_number(*total, 2),
        })
        .collect()
}

pub fn hierarchy_rows(nodes: &[HierarchyNode], decimals: usize) -> Vec<HierarchyRow> {
    nodes
        .iter()
        .map(|n| HierarchyRow {
            continent: n.continent.clone(),
            gdp_category: n.gdp_category.to_string(),
            country: n.country.clone(),
            value: format_number(n.value, decimals),
        })
        .collect()
}

pub fn map_rows(values: &[MapValue], decimals: usize) -> Vec<MapRow> {
    values
        .iter()
        .map(|v| MapRow {
            iso_code: v.iso_code.clone(),
            country: v.country.clone(),
            value: format_number(v.value, decimals),
        })
        .collect()
}

pub fn trend_rows(points: &[TrendPoint]) -> Vec<TrendRow> {
    points
        .iter()
        .map(|p| TrendRow {
            year: p.year,
            gdp: format_number(p.gdp, 0),
            co2_per_capita: format_number(p.co2_per_capita, 3),
            population: format_opt(p.population, 0),
        })
        .collect()
}

pub fn country_summary_rows(summaries: &[CountrySummary]) -> Vec<CountrySummaryRow> {
    summaries
        .iter()
        .map(|s| CountrySummaryRow {
            country: s.country.clone(),
            years: format!("{}\u{2013}{}", s.first_year, s.last_year),
            gdp_growth_pct: format_opt(s.gdp_growth_pct, 2),
            co2_per_capita_change_pct: format_opt(s.co2_per_capita_change_pct, 2),
            green_growth: match s.green_growth {
                Some(true) => "Yes".to_string(),
                Some(false) => "No".to_string(),
                None => "\u{2014}".to_string(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::consumption::TradeStatus;

    #[test]
    fn ranks_start_at_one() {
        let ranked = vec![
            Ranked {
                country: "China".into(),
                continent_name: "Asia".into(),
                year: 2020,
                value: 10668.0,
            },
            Ranked {
                country: "United States".into(),
                continent_name: "North America".into(),
                year: 2020,
                value: 4715.5,
            },
        ];
        let rows = ranking_rows(&ranked, 1);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].value, "10,668.0");
        assert_eq!(rows[1].rank, 2);
    }

    #[test]
    fn breakdown_rows_show_shares() {
        let b: Breakdown = [(Metric::CoalCo2, 3.0), (Metric::OilCo2, 1.0)].into();
        let rows = breakdown_rows(&b, 1);
        assert_eq!(rows[0].category, "Coal");
        assert_eq!(rows[0].share_pct, "75.00");
        assert_eq!(rows[1].share_pct, "25.00");
    }

    #[test]
    fn unknown_values_render_as_dash() {
        let rows = country_summary_rows(&[CountrySummary {
            country: "Chad".into(),
            first_year: 2000,
            last_year: 2020,
            gdp_growth_pct: Some(100.0),
            co2_per_capita_change_pct: None,
            green_growth: None,
        }]);
        assert_eq!(rows[0].co2_per_capita_change_pct, "\u{2014}");
        assert_eq!(rows[0].green_growth, "\u{2014}");
        assert_eq!(rows[0].gdp_growth_pct, "100.00");
    }

    #[test]
    fn named_series_flatten_in_key_order() {
        let series: BTreeMap<String, Series> = [
            ("India".to_string(), vec![(2019, 1.5), (2020, 1.25)]),
            ("Chile".to_string(), vec![(2020, 0.5)]),
        ]
        .into();
        let rows = named_series_rows(&series, 2);
        let keys: Vec<(&str, i32)> = rows.iter().map(|r| (r.series.as_str(), r.year)).collect();
        assert_eq!(keys, vec![("Chile", 2020), ("India", 2019), ("India", 2020)]);
        assert_eq!(rows[2].value, "1.25");
    }

    #[test]
    fn trend_rows_dash_missing_population() {
        let rows = trend_rows(&[TrendPoint {
            year: 2020,
            gdp: 2.5e11,
            co2_per_capita: 4.1234,
            population: None,
        }]);
        assert_eq!(rows[0].gdp, "250,000,000,000");
        assert_eq!(rows[0].co2_per_capita, "4.123");
        assert_eq!(rows[0].population, "\u{2014}");
    }

    #[test]
    fn trade_rows_carry_status() {
        let rows = trade_rows(&[TradeBalance {
            country: "China".into(),
            year: 2020,
            production: 100.0,
            consumption: 80.0,
            balance: 20.0,
            status: TradeStatus::NetExporter,
        }]);
        assert_eq!(rows[0].status, "Net exporter");
        assert_eq!(rows[0].balance, "20.00");
    }
}
