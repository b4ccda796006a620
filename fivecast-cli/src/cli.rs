use std::sync::Arc;

use clap::{Parser, Subcommand};
use fivecast_core::{
    Config, Coordinates, FixedLocationProvider, ForecastPipeline, ForecastResult,
    IpLocationProvider, LocationProvider, OpenWeatherProvider, PipelineState,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "fivecast", version, about = "5-day weather forecast for your location")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show the 5-day forecast for the current (or given) location.
    Show {
        /// Latitude override; skips the IP-based lookup when both are given.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude override.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { lat, lon } => show(lat, lon).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(lat: Option<f64>, lon: Option<f64>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let api_key = config.api_key()?.to_owned();

    let location: Arc<dyn LocationProvider> = match (lat, lon) {
        (Some(lat), Some(lon)) => Arc::new(FixedLocationProvider(Coordinates::new(lat, lon)?)),
        _ => Arc::new(IpLocationProvider::new()),
    };
    let provider = Arc::new(OpenWeatherProvider::new(api_key));

    let pipeline = ForecastPipeline::new(location, provider);
    tracing::debug!(explicit_coordinates = lat.is_some(), "starting forecast run");
    println!("Fetching forecast...");

    match pipeline.run_once().await {
        PipelineState::Ready(result) => {
            render(&result, pipeline.last_coordinates());
            Ok(())
        }
        PipelineState::Failed(err) => Err(err.into()),
        state => anyhow::bail!("pipeline ended in unexpected state: {state:?}"),
    }
}

fn render(result: &ForecastResult, coordinates: Option<Coordinates>) {
    println!();
    println!("{}: 5-day forecast", result.city_name);
    if let Some(coordinates) = coordinates {
        println!("Location: {coordinates}");
    }
    println!();

    for day in &result.days {
        println!(
            "  {}  {:<24} {:>6.1} C  [{}]",
            day.date, day.description, day.temperature_c, day.icon
        );
    }
}
