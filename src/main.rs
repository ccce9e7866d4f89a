// Entry point and high-level CLI flow.
//
// The dataset is loaded once, then the chosen subcommand queries the metric
// engine and prints markdown previews (or, for `export`, writes every report
// to disk).
use clap::Parser;
use co2_report::cli::{Cli, Commands};
use co2_report::metrics::efficiency::{self, EfficiencyMetric};
use co2_report::metrics::fuel::{self, FuelSource};
use co2_report::metrics::ranking::{self, Order};
use co2_report::metrics::{
    breakdown, consumption, country, cumulative, ghg, overview, temperature,
};
use co2_report::{loader, output, reports, util, EmissionsTable, Metric, Result, Selection};
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info, level_filters::LevelFilter, Level};
use tracing_subscriber::EnvFilter;

fn init_logging(level: Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve an optional `--year` to the latest loaded year.
fn year_or_latest(table: &EmissionsTable, year: Option<i32>) -> Option<i32> {
    year.or_else(|| table.latest_year())
}

fn handle_summary(table: &EmissionsTable, year: Option<i32>, continents: &[String], rows: usize) {
    let selection = match year {
        Some(y) => Selection::year(y),
        None => Selection::all(),
    }
    .with_continents(continents.iter().cloned());
    let stats = overview::summary_stats(table, &selection);
    println!("Summary ({} countries)", util::format_int(stats.countries));
    println!("  Total CO2 (Mt):              {}", util::format_opt(stats.total_co2, 2));
    println!("  CO2 per capita (t):          {}", util::format_opt(stats.co2_per_capita, 2));
    println!(
        "  Avg country CO2 per capita:  {}\n",
        util::format_opt(stats.avg_country_co2_per_capita, 2)
    );
    if let Some(y) = year_or_latest(table, year) {
        let totals = overview::co2_by_continent(table, y);
        output::preview_table(
            &format!("Total CO2 by Continent \u{2014} {y}"),
            None,
            &reports::continent_rows(&totals),
            rows,
        );
    }
    output::preview_table(
        "CO2 by Continent and GDP Category",
        Some("GDP tertiles computed per year"),
        &reports::hierarchy_rows(&overview::co2_hierarchy(table, &selection), 2),
        rows,
    );
    output::preview_table(
        "CO2 per Capita by Continent and GDP Category",
        Some("tonnes per person"),
        &reports::hierarchy_rows(&overview::co2_per_capita_hierarchy(table, &selection), 3),
        rows,
    );
    match overview::gdp_co2_correlation(table, &selection, true) {
        Some(fit) => println!(
            "GDP vs CO2 (log10): {} countries, slope {}, R\u{b2} {}\n",
            fit.points.len(),
            util::format_number(fit.slope, 3),
            util::format_opt(fit.r_squared, 3)
        ),
        None => println!("GDP vs CO2: not enough data for a fit.\n"),
    }
}

fn handle_fuel(
    table: &EmissionsTable,
    country: Option<&str>,
    year: Option<i32>,
    top_fuel: FuelSource,
    n: usize,
    rows: usize,
) {
    let year = year_or_latest(table, year);
    match country {
        Some(c) => {
            if let Some(y) = year {
                let b = fuel::fuel_breakdown(table, c, y);
                output::preview_table(
                    &format!("CO2 by Fuel Source \u{2014} {c}, {y}"),
                    None,
                    &reports::breakdown_rows(&b, 2),
                    rows,
                );
            }
            let series = fuel::fuel_breakdown_series(table, c, i32::MIN..=i32::MAX);
            output::preview_table(
                &format!("Fuel Source Time Series \u{2014} {c}"),
                None,
                &reports::metric_series_rows(&series, 2),
                rows,
            );
        }
        None => {
            let series = fuel::global_fuel_series(table);
            output::preview_table(
                "Fuel Source Time Series \u{2014} All Countries",
                None,
                &reports::metric_series_rows(&series, 2),
                rows,
            );
        }
    }
    if let Some(y) = year {
        let top = fuel::top_fuel_consumers(table, y, top_fuel, n);
        output::preview_table(
            &format!("Top {top_fuel} Emitters \u{2014} {y}"),
            None,
            &reports::ranking_rows(&top, 2),
            rows,
        );
    }
}

fn handle_top(
    table: &EmissionsTable,
    metric: Metric,
    year: Option<i32>,
    n: usize,
    continents: &[String],
    ascending: bool,
    rows: usize,
) {
    let Some(y) = year_or_latest(table, year) else {
        println!("(no data)");
        return;
    };
    let order = if ascending { Order::Ascending } else { Order::Descending };
    let selection = Selection::year(y).with_continents(continents.iter().cloned());
    let top = ranking::rank(table, metric, &selection, n, order);
    output::preview_table(
        &format!("Top {n} countries by {} \u{2014} {y}", metric.label()),
        (!continents.is_empty()).then(|| continents.join(", ")).as_deref(),
        &reports::ranking_rows(&top, 3),
        rows,
    );
}

fn handle_trade(
    table: &EmissionsTable,
    country: Option<&str>,
    year: Option<i32>,
    n: usize,
    rows: usize,
) {
    if let Some(c) = country {
        let balances = consumption::trade_balance(table, c);
        output::preview_table(
            &format!("Production vs Consumption CO2 \u{2014} {c}"),
            Some("positive balance: net exporter of embodied emissions"),
            &reports::trade_rows(&balances),
            rows,
        );
    }
    if let Some(y) = year_or_latest(table, year) {
        let leaders = consumption::trade_leaders(table, y, n);
        output::preview_table(
            &format!("Top Net Exporters \u{2014} {y}"),
            None,
            &reports::trade_leader_rows(&leaders.exporters),
            rows,
        );
        output::preview_table(
            &format!("Top Net Importers \u{2014} {y}"),
            None,
            &reports::trade_leader_rows(&leaders.importers),
            rows,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_efficiency(
    table: &EmissionsTable,
    metric: EfficiencyMetric,
    country: Option<&str>,
    year: Option<i32>,
    from: Option<i32>,
    to: Option<i32>,
    n: usize,
    rows: usize,
) {
    let years = from.unwrap_or(i32::MIN)..=to.unwrap_or(i32::MAX);
    if let Some(c) = country {
        match efficiency::efficiency_improvement(table, c, metric, years.clone()) {
            Some(imp) => output::preview_table(
                &format!("Efficiency Improvement ({metric}) \u{2014} {c}"),
                None,
                &reports::improvement_rows(&[imp]),
                rows,
            ),
            None => println!("No {metric} improvement available for {c}.\n"),
        }
        output::preview_table(
            &format!("{metric} Trend \u{2014} {c}"),
            None,
            &reports::named_series_rows(&efficiency::efficiency_trends(table, &[c], metric), 4),
            rows,
        );
    }
    if let Some(y) = year_or_latest(table, year) {
        let best = efficiency::most_efficient(table, y, metric, n);
        output::preview_table(
            &format!("Most Efficient Countries ({metric}) \u{2014} {y}"),
            Some("lowest intensity first"),
            &reports::ranking_rows(&best, 4),
            rows,
        );
    }
    let mut ranked = efficiency::improvement_ranking(table, metric, years);
    ranked.truncate(n);
    output::preview_table(
        &format!("Largest Efficiency Improvements ({metric})"),
        None,
        &reports::improvement_rows(&ranked),
        rows,
    );
}

fn handle_history(
    table: &EmissionsTable,
    country: Option<&str>,
    year: Option<i32>,
    n: usize,
    rows: usize,
) {
    if let Some(c) = country {
        match cumulative::historical_share(table, c) {
            Some(share) => println!(
                "{c}: {}% of cumulative CO2 in {} ({} Mt)\n",
                util::format_number(share.share * 100.0, 2),
                share.year,
                util::format_number(share.cumulative_co2, 2)
            ),
            None => println!("No historical share available for {c}.\n"),
        }
        output::preview_table(
            &format!("Cumulative CO2 \u{2014} {c}"),
            None,
            &reports::named_series_rows(&cumulative::cumulative_series(table, &[c]), 2),
            rows,
        );
        let by_fuel = cumulative::cumulative_by_fuel(table, c);
        output::preview_table(
            &format!("Cumulative CO2 by Fuel \u{2014} {c}"),
            None,
            &reports::metric_series_rows(&by_fuel, 2),
            rows,
        );
    }
    if let Some(y) = year_or_latest(table, year) {
        let mut shares = cumulative::historical_shares(table, y);
        shares.truncate(n);
        output::preview_table(
            &format!("Historical Share of Cumulative CO2 \u{2014} {y}"),
            None,
            &reports::historical_share_rows(&shares),
            rows,
        );
    }
}

fn handle_ghg(
    table: &EmissionsTable,
    country: Option<&str>,
    year: Option<i32>,
    n: usize,
    rows: usize,
) {
    let year = year_or_latest(table, year);
    if let Some(c) = country {
        if let Some(y) = year {
            output::preview_table(
                &format!("Greenhouse Gas Composition \u{2014} {c}, {y}"),
                Some("CO2-equivalent"),
                &reports::breakdown_rows(&ghg::ghg_breakdown(table, c, y), 2),
                rows,
            );
        }
        output::preview_table(
            &format!("Greenhouse Gas Time Series \u{2014} {c}"),
            None,
            &reports::metric_series_rows(&ghg::ghg_composition(table, c), 2),
            rows,
        );
    }
    if let Some(y) = year {
        output::preview_table(
            &format!("Top GHG Emitters per Capita \u{2014} {y}"),
            None,
            &reports::ranking_rows(&ghg::ghg_per_capita_ranking(table, y, n), 2),
            rows,
        );
    }
}

fn handle_temperature(
    table: &EmissionsTable,
    country: Option<&str>,
    year: Option<i32>,
    n: usize,
    rows: usize,
) {
    if let Some(c) = country {
        match temperature::total_attributed_warming(table, c) {
            Some((y, total)) => {
                println!(
                    "{c}: {} \u{b0}C attributed warming as of {y}\n",
                    util::format_number(total, 4)
                );
                let contributions = breakdown::breakdown(
                    table,
                    c,
                    y,
                    &temperature::TEMPERATURE_GAS_METRICS,
                );
                let shares = temperature::temperature_shares(table, c, y);
                output::preview_table(
                    &format!("Temperature Contribution by Gas \u{2014} {c}, {y}"),
                    None,
                    &reports::share_rows(&contributions, &shares, 4),
                    rows,
                );
            }
            None => println!("No temperature attribution available for {c}.\n"),
        }
    }
    if let Some(y) = year_or_latest(table, year) {
        let top = temperature::top_temperature_contributors(table, y, n);
        output::preview_table(
            &format!("Top Contributors to Global Temperature Change \u{2014} {y}"),
            None,
            &reports::temperature_rows(&top),
            rows,
        );
    }
}

fn handle_country(
    table: &EmissionsTable,
    name: &str,
    compare: &[String],
    metric: Metric,
    rows: usize,
) {
    match country::country_summary(table, name) {
        Some(summary) => output::preview_table(
            &format!("Country Profile \u{2014} {name}"),
            None,
            &reports::country_summary_rows(&[summary]),
            rows,
        ),
        None => {
            println!("No data for {name}.\n");
            return;
        }
    }

    let trends = breakdown::breakdown_series(
        table,
        name,
        i32::MIN..=i32::MAX,
        &[Metric::Gdp, Metric::Co2PerCapita],
    );
    output::preview_table(
        &format!("GDP and CO2 per Capita over Time \u{2014} {name}"),
        None,
        &reports::metric_series_rows(&trends, 3),
        rows,
    );
    output::preview_table(
        &format!("GDP vs CO2 per Capita \u{2014} {name}"),
        Some("years with both values"),
        &reports::trend_rows(&country::gdp_vs_co2_per_capita(table, name)),
        rows,
    );

    let mut names: Vec<&str> = vec![name];
    names.extend(compare.iter().map(String::as_str));
    output::preview_table(
        &format!("{} over Time", metric.label()),
        None,
        &reports::named_series_rows(&country::country_series(table, &names, metric), 3),
        rows,
    );
}

fn handle_green_growth(table: &EmissionsTable, all: bool, rows: usize) {
    let summaries: Vec<_> = country::green_growth_countries(table)
        .into_iter()
        .filter(|s| all || s.green_growth == Some(true))
        .collect();
    output::preview_table(
        "Green Growth",
        Some("GDP up, CO2 per capita down between first and last recorded years"),
        &reports::country_summary_rows(&summaries),
        rows,
    );
}

fn handle_export(
    table: &EmissionsTable,
    out_dir: &Path,
    year: Option<i32>,
    n: usize,
) -> Result<()> {
    std::fs::create_dir_all(out_dir)?;
    let year = year_or_latest(table, year);

    if let Some(y) = year {
        let top = ranking::top_n(table, Metric::Co2, y, n);
        output::write_csv(&out_dir.join("top_co2.csv"), &reports::ranking_rows(&top, 3))?;

        let continents = overview::co2_by_continent(table, y);
        output::write_csv(&out_dir.join("continents.csv"), &reports::continent_rows(&continents))?;

        let leaders = consumption::trade_leaders(table, y, n);
        output::write_csv(
            &out_dir.join("trade_exporters.csv"),
            &reports::trade_leader_rows(&leaders.exporters),
        )?;
        output::write_csv(
            &out_dir.join("trade_importers.csv"),
            &reports::trade_leader_rows(&leaders.importers),
        )?;

        let shares = cumulative::historical_shares(table, y);
        output::write_csv(
            &out_dir.join("historical_share.csv"),
            &reports::historical_share_rows(&shares),
        )?;

        let map = overview::map_values(table, y, Metric::Co2PerCapita);
        output::write_csv(&out_dir.join("map_co2_per_capita.csv"), &reports::map_rows(&map, 3))?;
        let balance_map = consumption::trade_balance_map(table, y);
        output::write_csv(
            &out_dir.join("map_trade_balance.csv"),
            &reports::map_rows(&balance_map, 2),
        )?;

        let temps = temperature::top_temperature_contributors(table, y, n);
        output::write_csv(
            &out_dir.join("temperature_contributors.csv"),
            &reports::temperature_rows(&temps),
        )?;
    }

    let improvements =
        efficiency::improvement_ranking(table, EfficiencyMetric::Co2PerGdp, i32::MIN..=i32::MAX);
    output::write_csv(
        &out_dir.join("efficiency_improvement.csv"),
        &reports::improvement_rows(&improvements),
    )?;

    let summaries = country::green_growth_countries(table);
    output::write_csv(
        &out_dir.join("green_growth.csv"),
        &reports::country_summary_rows(&summaries),
    )?;

    let selection = year.map_or_else(Selection::all, Selection::year);
    output::write_csv(
        &out_dir.join("hierarchy.csv"),
        &reports::hierarchy_rows(&overview::co2_hierarchy(table, &selection), 2),
    )?;
    output::write_csv(
        &out_dir.join("hierarchy_per_capita.csv"),
        &reports::hierarchy_rows(&overview::co2_per_capita_hierarchy(table, &selection), 3),
    )?;
    output::write_json(
        &out_dir.join("summary.json"),
        &overview::summary_stats(table, &selection),
    )?;

    info!("reports written to {}", out_dir.display());
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let (table, load_report) = loader::load_and_clean(&cli.load_options())?;
    println!(
        "Processing dataset... ({} rows read, {} kept for {}\u{2013}{})\n",
        util::format_int(load_report.total_rows),
        util::format_int(load_report.kept_rows),
        cli.min_year,
        cli.max_year
    );

    let rows = cli.rows;
    match &cli.command {
        Commands::Summary { year, continents } => handle_summary(&table, *year, continents, rows),
        Commands::Fuel { country, year, fuel, n } => {
            handle_fuel(&table, country.as_deref(), *year, *fuel, *n, rows)
        }
        Commands::Top {
            metric,
            year,
            n,
            continents,
            ascending,
        } => handle_top(&table, *metric, *year, *n, continents, *ascending, rows),
        Commands::Trade { country, year, n } => {
            handle_trade(&table, country.as_deref(), *year, *n, rows)
        }
        Commands::Efficiency {
            metric,
            country,
            year,
            from,
            to,
            n,
        } => handle_efficiency(&table, *metric, country.as_deref(), *year, *from, *to, *n, rows),
        Commands::History { country, year, n } => {
            handle_history(&table, country.as_deref(), *year, *n, rows)
        }
        Commands::Ghg { country, year, n } => {
            handle_ghg(&table, country.as_deref(), *year, *n, rows)
        }
        Commands::Temperature { country, year, n } => {
            handle_temperature(&table, country.as_deref(), *year, *n, rows)
        }
        Commands::Country {
            name,
            compare,
            metric,
        } => handle_country(&table, name, compare, *metric, rows),
        Commands::GreenGrowth { all } => handle_green_growth(&table, *all, rows),
        Commands::Export { out_dir, year, n } => handle_export(&table, out_dir, *year, *n)?,
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
