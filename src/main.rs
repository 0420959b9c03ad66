use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{ConfigCommand, GroceryCommand, MealCommand, PlanCommand, SwapCommand};
use config::Config;
use nutrifit_core::{HttpNutritionApi, PlanCache, PlanSession};

#[derive(Parser)]
#[command(name = "nutrifit")]
#[command(version)]
#[command(about = "Meal plan and nutrition tracking CLI", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Day to operate on (YYYY-MM-DD), defaults to today
    #[arg(long, short, global = true)]
    date: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// View, refresh, regenerate, and save the day's meal plan
    Plan(PlanCommand),

    /// Swap a planned meal or snack for an alternative
    Swap(SwapCommand),

    /// Log planned meals as eaten and review the day
    Meal(MealCommand),

    /// Grocery list aggregated from the day's plan
    Grocery(GroceryCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load(cli.config)?;
    tracing::debug!(
        config_file = ?config.config_file,
        configured = config.service.is_configured(),
        "configuration loaded"
    );

    if let Commands::Config(cmd) = &cli.command {
        return cmd.run(&config);
    }

    let date = parse_date_or_today(cli.date.as_deref())?;
    let session = build_session(&config, date)?;

    match &cli.command {
        Commands::Plan(cmd) => cmd.run(&session).await,
        Commands::Swap(cmd) => cmd.run(&session).await,
        Commands::Meal(cmd) => cmd.run(&session).await,
        Commands::Grocery(cmd) => cmd.run(&session).await,
        Commands::Config(_) => unreachable!("handled above"),
    }
}

fn build_session(config: &Config, date: NaiveDate) -> Result<PlanSession, Box<dyn std::error::Error>> {
    let (server_url, api_key) = match (&config.service.server_url, &config.service.api_key) {
        (Some(url), Some(key)) => (url.clone(), key.clone()),
        _ => {
            return Err("Service not configured. Add server_url and api_key to the config \
                 file, or set NUTRIFIT_SERVER_URL and NUTRIFIT_API_KEY."
                .into())
        }
    };

    let cache = PlanCache::new(Duration::from_secs(config.cache_ttl_secs.value));
    let api = HttpNutritionApi::new(server_url, api_key, cache);
    Ok(PlanSession::new(
        Arc::new(api),
        config.profile.clone(),
        date,
    ))
}

/// Parse a date argument or default to today.
fn parse_date_or_today(date: Option<&str>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| format!("Invalid date format '{}'. Use YYYY-MM-DD.", s).into()),
        None => Ok(Local::now().date_naive()),
    }
}
