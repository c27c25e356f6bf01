use analytics::{
    AnalyticsEngine, CategorySummary, CurrencyFormat, Dashboard, DashboardViewModel,
    DashboardWarning,
};
use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::{CellAlignment, Table, presets::UTF8_FULL};
use configuration::{DisplayConfig, LogFormat, LoggingConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

/// The main entry point for the Storefront dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // STOREFRONT_* overrides may come from a .env file.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = configuration::load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(path) = cli.data {
        config.data.path = path;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }

    // Must outlive every log call so the file writer flushes.
    let _log_guard = init_tracing(&config.logging)?;

    // The one and only read of the source; every request shares the result.
    let dataset = dataset::load_dataset(&config.data.path).with_context(|| {
        format!("Failed to load dataset from {}", config.data.path.display())
    })?;
    tracing::info!(
        source = dataset.source(),
        rows = dataset.len(),
        top_n = config.analytics.top_n,
        "Dashboard context ready."
    );
    let dashboard = Dashboard::new(
        Arc::new(dataset),
        AnalyticsEngine::with_top_n(config.analytics.top_n),
        currency_format(&config.display),
    );

    match cli.command {
        Commands::Serve(args) => {
            let addr = match args.addr {
                Some(addr) => addr,
                None => config.server.socket_addr()?,
            };
            web_server::run_server(addr, dashboard).await?;
        }
        Commands::Report(args) => handle_report(&dashboard, args)?,
        Commands::Bounds => handle_bounds(&dashboard),
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Date-filtered analytics over an e-commerce order-line extract.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file (default: ./storefront.toml, if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the order-line CSV, overriding `data.path`.
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
    /// Serve the dashboard API over HTTP.
    Serve(ServeArgs),
    /// Compute the dashboard once and print it.
    Report(ReportArgs),
    /// Print the earliest and latest carrier delivery dates.
    Bounds,
}

#[derive(Parser)]
struct ServeArgs {
    /// Listen address (e.g. "0.0.0.0:3000"), overriding `server.host`/`server.port`.
    #[arg(long)]
    addr: Option<SocketAddr>,
}

#[derive(Parser)]
struct ReportArgs {
    /// First day of the range (format: YYYY-MM-DD). Defaults to the earliest delivery.
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last day of the range, inclusive (format: YYYY-MM-DD). Defaults to the latest delivery.
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Print the view model as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Setup
// ==============================================================================

/// Installs the global subscriber. `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .with_context(|| format!("Invalid log level '{}'", logging.level))?;

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    layers.push(match logging.format {
        LogFormat::Full => fmt::layer().boxed(),
        LogFormat::Compact => fmt::layer().compact().boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
    });

    let guard = match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "storefront.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(fmt::layer().with_ansi(false).with_writer(writer).boxed());
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok(guard)
}

fn currency_format(display: &DisplayConfig) -> CurrencyFormat {
    CurrencyFormat {
        symbol: display.currency_symbol.clone(),
        thousands_separator: display.thousands_separator.clone(),
        decimal_separator: display.decimal_separator.clone(),
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_bounds(dashboard: &Dashboard) {
    match dashboard.date_bounds() {
        Some(bounds) => println!("{} {}", bounds.start(), bounds.end()),
        None => println!("No order line has a carrier delivery date."),
    }
}

fn handle_report(dashboard: &Dashboard, args: ReportArgs) -> anyhow::Result<()> {
    let range = dashboard.resolve_range(args.start, args.end)?;
    let view = dashboard.compute(&range)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    print_report(&view);
    Ok(())
}

fn print_report(view: &DashboardViewModel) {
    println!(
        "Order lines delivered to carrier {} .. {}: {}",
        view.range.start(),
        view.range.end(),
        view.row_count
    );
    if view.warnings.contains(&DashboardWarning::EmptyResult) {
        println!("No order lines fall in the selected range.");
    }
    println!("Total orders:  {}", view.headline.total_orders);
    println!("Total revenue: {}", view.headline.total_revenue_display);

    let mut monthly = new_table(&["Order Month", "Order Count", "Revenue"]);
    for month in &view.monthly_orders {
        monthly.add_row(vec![
            month.order_month_label.clone(),
            month.order_count.to_string(),
            month.revenue.to_string(),
        ]);
    }
    println!("\nMonthly Orders\n{monthly}");

    print_categories("Highest Income Categories", &view.highest_income);
    print_categories("Lowest Income Categories", &view.lowest_income);
    print_categories("Highest Sales Categories", &view.highest_sales);
    print_categories("Lowest Sales Categories", &view.lowest_sales);

    let mut states = new_table(&["State", "Customers"]);
    for state in &view.customers_by_state {
        states.add_row(vec![state.customer_state.clone(), state.customer_count.to_string()]);
    }
    println!("\nCustomers by State\n{states}");
}

fn print_categories(title: &str, categories: &[CategorySummary]) {
    let mut table = new_table(&["Category", "Orders", "Revenue"]);
    for category in categories {
        table.add_row(vec![
            category.category.clone(),
            category.order_count.to_string(),
            category.revenue.to_string(),
        ]);
    }
    println!("\n{title}\n{table}");
}

/// A table whose numeric columns (all but the first) are right-aligned.
fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header.to_vec());
    for idx in 1..header.len() {
        if let Some(column) = table.column_mut(idx) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    table
}
