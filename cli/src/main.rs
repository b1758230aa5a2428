//! cropstage - crop growth stage estimation from Growing Degree Days
//!
//! Fetches daily temperatures for a location, accumulates GDD since planting
//! and reports the crop's phenological stage.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chrono::{Datelike, Local, NaiveDate};
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use cropstage_shared::GpsCoordinates;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod services;

use config::Config;
use external::WeatherClient;
use services::{ReportService, SeasonRequest, SeasonService};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Crop growth stage estimation from Growing Degree Days",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available crops and their stage thresholds
    Crops(CropsArgs),
    /// Report the current growth stage of a planted crop
    Summary(SummaryArgs),
}

#[derive(Parser, Debug)]
struct CropsArgs {
    /// Custom crop table in JSON
    #[arg(long, value_hint = ValueHint::FilePath)]
    crop_table: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SummaryArgs {
    /// Crop identifier, see `cropstage crops`
    #[arg(long)]
    crop: String,

    /// Location label used in the report and export file names
    #[arg(long)]
    location: String,

    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,

    /// Planting date (YYYY-MM-DD)
    #[arg(long)]
    planting_date: NaiveDate,

    /// Read observations from a `date,tmin,tmax` CSV instead of Open-Meteo
    #[arg(long, value_hint = ValueHint::FilePath)]
    weather_csv: Option<PathBuf>,

    /// Also report the stage as of this date (YYYY-MM-DD)
    #[arg(long)]
    on: Option<NaiveDate>,

    /// Write the daily GDD series to the output directory
    #[arg(long, action = ArgAction::SetTrue)]
    export: bool,

    /// Compare against past years and write the envelope CSV
    #[arg(long, action = ArgAction::SetTrue)]
    history: bool,

    /// Custom crop table in JSON
    #[arg(long, value_hint = ValueHint::FilePath)]
    crop_table: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cropstage=info,cropstage_shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Crops(args) => run_crops(&args),
        Command::Summary(args) => run_summary(args).await,
    }
}

/// Load `.env` and the layered configuration
fn load_config() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();
    let config = Config::load().map_err(error::AppError::from)?;
    tracing::debug!(environment = %config.environment, "Configuration loaded");
    Ok(config)
}

fn run_crops(args: &CropsArgs) -> anyhow::Result<()> {
    let table = SeasonService::load_table(args.crop_table.as_deref())?;
    print!("{}", ReportService::render_crop_table(&table));
    Ok(())
}

async fn run_summary(args: SummaryArgs) -> anyhow::Result<()> {
    let config = load_config()?;
    let today = Local::now().date_naive();

    let table = SeasonService::load_table(args.crop_table.as_deref())?;
    let client = WeatherClient::new(
        config.weather.api_endpoint.clone(),
        Duration::from_secs(config.weather.timeout_secs),
    )?;
    let service = SeasonService::new(table, client, config.history.earliest_year);

    let request = SeasonRequest {
        crop_id: args.crop,
        location: args.location,
        coordinates: GpsCoordinates::new(args.lat, args.lon),
        planting_date: args.planting_date,
    };
    service.validate_request(&request, today)?;

    tracing::info!(
        crop_id = %request.crop_id,
        location = %request.location,
        planting_date = %request.planting_date,
        "Estimating growth stage"
    );

    let weather = match args.weather_csv.as_deref() {
        Some(path) => SeasonService::read_weather_csv(path)?,
        None => service.fetch_season_weather(&request, today).await?,
    };

    let mut season = service.build_season(&request, &weather)?;
    let summary = season.summary_today();
    print!("{}", ReportService::render_summary(&summary, season.location()));

    if let Some(on) = args.on {
        let report = season.stage_on_date(on);
        println!("{}", ReportService::render_stage_report(on, &report));
    }

    let output_dir = Path::new(&config.output.dir);

    if args.export {
        let rows = ReportService::series_rows(&season);
        if rows.is_empty() {
            tracing::warn!("No GDD data available to export");
        } else {
            let name =
                ReportService::export_file_name(today, season.crop_id(), season.location(), "");
            let path = ReportService::write_csv(output_dir, &name, &rows)?;
            println!("Saved series to {}", path.display());
        }
    }

    if args.history {
        let window_days = u32::try_from(season.observations().len())
            .context("season too long for historical comparison")?;
        let envelope = service
            .historical_envelope(&season, request.coordinates, window_days, today.year())
            .await?;
        if envelope.is_empty() {
            tracing::warn!("No complete historical years available");
        } else {
            let name = ReportService::export_file_name(
                today,
                season.crop_id(),
                season.location(),
                "_history",
            );
            let path = ReportService::write_csv(output_dir, &name, &envelope)?;
            println!("Saved historical comparison to {}", path.display());
        }
    }

    Ok(())
}
