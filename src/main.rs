use ai_client::create_ai_client;
use analytics::StatsEngine;
use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use configuration::{init_tracing, load_config, Config, LogFormat};
use core_types::{
    available_date_range, default_selected_years, filter_by_date_range, group_by_year,
    indicator_categories, indicator_values, latest_year_range, resolve_indicator_key,
    surplus_series, DateRange, PeriodKey, TimeSeries,
};
use indicatif::{ProgressBar, ProgressStyle};
use simulator::{ForecastSummary, MonteCarloEngine, SimulationParams};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use web_server::AppState;

/// The main entry point for the Budget Lens application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Secrets such as OPENROUTER_API_KEY may live in a .env file.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(path) = cli.data {
        config.data.path = path;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    let _guard = init_tracing(&config.logging)?;

    let data = dataset::load_from_path(&config.data.path)
        .with_context(|| format!("Failed to load dataset from {}", config.data.path.display()))?;
    tracing::info!(
        path = %config.data.path.display(),
        indicators = data.len(),
        "Dataset loaded."
    );

    // Execute the appropriate command
    match cli.command {
        Commands::Indicators => handle_indicators(&data),
        Commands::Overview(args) => handle_overview(&config, &data, args),
        Commands::Stats(args) => handle_stats(&data, args),
        Commands::Compare(args) => handle_compare(&data, args),
        Commands::Trend(args) => handle_trend(&data, args),
        Commands::Simulate(args) => handle_simulate(&config, &data, args),
        Commands::Insights(args) => handle_insights(&config, &data, args).await,
        Commands::Serve(args) => handle_serve(config, data, args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Descriptive statistics, year-over-year comparisons and Monte Carlo forecasts
/// for monthly state budget indicators.
#[derive(Parser)]
#[command(name = "budget-lens", author, version, about, long_about = None)]
struct Cli {
    /// Configuration file. Defaults to an optional `config.toml` in the working directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dataset file, overriding `data.path` from the configuration.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Log output format, overriding `logging.format`.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the dataset's indicators with their catalogue category.
    Indicators,
    /// Headline revenue, expenditure, tax and surplus figures.
    Overview(OverviewArgs),
    /// Descriptive statistics for one or more indicators.
    Stats(StatsArgs),
    /// Month-by-month year-over-year changes.
    Compare(CompareArgs),
    /// Direction, volatility and seasonality of an indicator.
    Trend(TrendArgs),
    /// Monte Carlo forecast of an indicator.
    Simulate(SimulateArgs),
    /// Monte Carlo forecast plus a narrative analysis from the AI service.
    Insights(SimulateArgs),
    /// Serve the HTTP API.
    Serve(ServeArgs),
}

/// An inclusive `YYYY-MM` window.
#[derive(Args)]
struct WindowArgs {
    /// First month to include (YYYY-MM).
    #[arg(long)]
    from: Option<PeriodKey>,

    /// Last month to include (YYYY-MM).
    #[arg(long)]
    to: Option<PeriodKey>,
}

impl WindowArgs {
    fn range(&self) -> DateRange {
        DateRange::new(
            self.from.as_ref().map(PeriodKey::to_string).unwrap_or_default(),
            self.to
                .as_ref()
                .map(PeriodKey::to_string)
                .unwrap_or_else(|| "9999-12".to_string()),
        )
    }

    fn is_set(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }
}

#[derive(Args)]
struct OverviewArgs {
    #[command(flatten)]
    window: WindowArgs,
}

#[derive(Args)]
struct StatsArgs {
    /// Indicator name; repeat for several.
    #[arg(long = "indicator", required = true)]
    indicators: Vec<String>,

    #[command(flatten)]
    window: WindowArgs,
}

#[derive(Args)]
struct CompareArgs {
    /// Indicator name; repeat for several.
    #[arg(long = "indicator", required = true)]
    indicators: Vec<String>,

    /// Year to compare (YYYY); repeat for several. Defaults to the two most recent.
    #[arg(long = "year")]
    years: Vec<String>,
}

#[derive(Args)]
struct TrendArgs {
    #[arg(long)]
    indicator: String,

    #[command(flatten)]
    window: WindowArgs,
}

#[derive(Args)]
struct SimulateArgs {
    #[arg(long)]
    indicator: String,

    /// Periods to project forward. Defaults to `simulation.periods`.
    #[arg(long)]
    periods: Option<usize>,

    /// Number of trajectories. Defaults to `simulation.simulations`.
    #[arg(long)]
    simulations: Option<usize>,

    #[command(flatten)]
    window: WindowArgs,
}

#[derive(Args)]
struct ServeArgs {
    /// Listen address. Defaults to `server.addr`.
    #[arg(long)]
    addr: Option<SocketAddr>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Chronological readings of `indicator` inside `range`.
fn indicator_window(data: &TimeSeries, indicator: &str, range: &DateRange) -> anyhow::Result<Vec<f64>> {
    if !data.contains_key(indicator) {
        bail!("Unknown indicator '{}'. Run `budget-lens indicators` to list them.", indicator);
    }
    let windowed = filter_by_date_range(data, &range.start, &range.end);
    Ok(indicator_values(&windowed, indicator))
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.iter().map(|h| Cell::new(*h)));
    table
}

fn handle_indicators(data: &TimeSeries) -> anyhow::Result<()> {
    let categories = indicator_categories();
    let mut table = new_table(&["Indicator", "Category", "Months"]);

    for (indicator, series) in data {
        let category = categories
            .iter()
            .find(|c| c.indicators.iter().any(|i| i == indicator))
            .map(|c| c.name.as_str())
            .unwrap_or("-");
        table.add_row(vec![
            Cell::new(indicator),
            Cell::new(category),
            Cell::new(series.len()),
        ]);
    }

    let coverage = available_date_range(data);
    println!("Coverage: {} .. {}", coverage.start, coverage.end);
    println!("{table}");
    Ok(())
}

/// Headline figures for the latest year, or for the given window.
fn handle_overview(config: &Config, data: &TimeSeries, args: OverviewArgs) -> anyhow::Result<()> {
    let range = if args.window.is_set() {
        args.window.range()
    } else {
        latest_year_range(data).context("The dataset contains no readings")?
    };
    let revenue_key = resolve_indicator_key(data, &config.data.revenue_candidates);
    let expenditure_key = resolve_indicator_key(data, &config.data.expenditure_candidates);
    let tax_key = resolve_indicator_key(data, &config.data.tax_candidates);

    let revenue = match revenue_key {
        Some(key) => indicator_window(data, key, &range)?,
        None => Vec::new(),
    };
    let expenditure = match expenditure_key {
        Some(key) => indicator_window(data, key, &range)?,
        None => Vec::new(),
    };
    let taxes = match tax_key {
        Some(key) => indicator_window(data, key, &range)?,
        None => Vec::new(),
    };
    let surplus = surplus_series(&revenue, &expenditure);

    let engine = StatsEngine::new();
    let mut table = new_table(&["Figure", "Indicator", "Total", "Average", "Growth %"]);
    for (label, key, values) in [
        ("Revenue", revenue_key, &revenue),
        ("Expenditure", expenditure_key, &expenditure),
        ("Taxes", tax_key, &taxes),
        ("Surplus", None, &surplus),
    ] {
        let stats = engine.calculate_stats(values);
        table.add_row(vec![
            Cell::new(label),
            Cell::new(key.unwrap_or("-")),
            Cell::new(format!("{:.2}", stats.total)),
            Cell::new(format!("{:.2}", stats.average)),
            Cell::new(format!("{:.2}", stats.growth_rate)),
        ]);
    }

    println!("Period: {} .. {}", range.start, range.end);
    println!("{table}");
    Ok(())
}

fn handle_stats(data: &TimeSeries, args: StatsArgs) -> anyhow::Result<()> {
    let engine = StatsEngine::new();
    let mut table = new_table(&[
        "Indicator", "Total", "Average", "Min", "Max", "Growth %", "Std Dev",
    ]);

    for indicator in &args.indicators {
        let values = indicator_window(data, indicator, &args.window.range())?;
        let stats = engine.calculate_stats(&values);
        table.add_row(vec![
            Cell::new(indicator),
            Cell::new(format!("{:.2}", stats.total)),
            Cell::new(format!("{:.2}", stats.average)),
            Cell::new(format!("{:.2}", stats.min)),
            Cell::new(format!("{:.2}", stats.max)),
            Cell::new(format!("{:.2}", stats.growth_rate)),
            Cell::new(format!("{:.2}", stats.standard_deviation)),
        ]);
    }

    println!("{table}");
    Ok(())
}

fn handle_compare(data: &TimeSeries, args: CompareArgs) -> anyhow::Result<()> {
    let years = if args.years.is_empty() {
        default_selected_years(data)
    } else {
        args.years
    };
    if years.len() < 2 {
        println!("Select at least two years to compare.");
        return Ok(());
    }

    let grouped = group_by_year(data, &args.indicators, &years);
    let metrics = StatsEngine::new().compute_yoy_metrics(&grouped, &args.indicators, &years);

    let mut table = new_table(&["Indicator", "Period", "Delta", "Change %"]);
    for (indicator, by_period) in &metrics {
        for (period, metric) in by_period {
            table.add_row(vec![
                Cell::new(indicator),
                Cell::new(period),
                Cell::new(format!("{:.2}", metric.delta)),
                Cell::new(format!("{:.2}", metric.percent_change)),
            ]);
        }
    }

    println!("{table}");
    Ok(())
}

fn handle_trend(data: &TimeSeries, args: TrendArgs) -> anyhow::Result<()> {
    let values = indicator_window(data, &args.indicator, &args.window.range())?;
    let trend = StatsEngine::new().analyze_budget_trend(&values);

    let mut table = new_table(&["Indicator", "Trend", "Volatility", "Seasonal"]);
    table.add_row(vec![
        Cell::new(&args.indicator),
        Cell::new(trend.trend),
        Cell::new(trend.volatility),
        Cell::new(if trend.seasonal { "yes" } else { "no" }),
    ]);

    println!("{table}");
    Ok(())
}

fn simulation_params(config: &Config, args: &SimulateArgs) -> SimulationParams {
    SimulationParams::new(
        args.periods.unwrap_or(config.simulation.periods),
        args.simulations.unwrap_or(config.simulation.simulations),
    )
}

fn handle_simulate(config: &Config, data: &TimeSeries, args: SimulateArgs) -> anyhow::Result<()> {
    let values = indicator_window(data, &args.indicator, &args.window.range())?;
    let params = simulation_params(config, &args);
    tracing::debug!(periods = params.periods, simulations = params.simulations, "Running simulation.");
    let result = MonteCarloEngine::new().run(&values, params)?;

    let mut table = new_table(&["Statistic", "Value"]);
    for (label, value) in [
        ("Mean", result.mean),
        ("Std Dev", result.standard_deviation),
        ("P5", result.percentile5),
        ("P25", result.percentile25),
        ("P50", result.percentile50),
        ("P75", result.percentile75),
        ("P95", result.percentile95),
    ] {
        table.add_row(vec![Cell::new(label), Cell::new(format!("{:.2}", value))]);
    }

    println!(
        "{}: {} periods, {} simulations",
        args.indicator, params.periods, params.simulations
    );
    println!("{table}");
    Ok(())
}

async fn handle_insights(config: &Config, data: &TimeSeries, args: SimulateArgs) -> anyhow::Result<()> {
    let Some(ai) = create_ai_client(&config.ai) else {
        bail!("AI features are disabled. Set OPENROUTER_API_KEY or ai.api_key to enable them.");
    };

    let values = indicator_window(data, &args.indicator, &args.window.range())?;
    let params = simulation_params(config, &args);
    let result = MonteCarloEngine::new().run(&values, params)?;
    let summary = ForecastSummary::from(&result);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("Asking for insights on {}...", args.indicator));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let text = ai
        .generate_forecast_insights(&args.indicator, &values, &summary)
        .await;

    spinner.finish_and_clear();
    println!("{text}");
    Ok(())
}

async fn handle_serve(config: Config, data: TimeSeries, args: ServeArgs) -> anyhow::Result<()> {
    let addr = args.addr.unwrap_or(config.server.addr);

    let mut state = AppState::new(data, config.simulation);
    if let Some(ai) = create_ai_client(&config.ai) {
        state = state.with_ai(ai.into_shared());
    }
    tracing::info!(%addr, ai_enabled = state.ai.is_some(), "Starting web server.");

    web_server::run_server(addr, state).await
}
