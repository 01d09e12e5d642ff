use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use sunny_notify::cli::{Cli, Command};
use sunny_notify::{SunnyConfig, SunnyError, SunnyForecastService, logging};
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<SunnyError>() {
                Some(err) => eprintln!("{}", err.user_message()),
                None => eprintln!("{e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = SunnyConfig::load_from_path(cli.config.clone())?;
    logging::init(&config.logging, cli.verbose)?;

    let location = cli.resolve_location(&config)?;
    let service = SunnyForecastService::from_config(&config)?;
    info!("Forecasting for {}", location);

    let message = match &cli.command {
        Command::Forecast { day } => Some(service.forecast_message(day.as_deref(), location).await?),
        Command::Morning => Some(service.morning_message(location).await?),
        Command::Hourly => service.hourly_message(location).await?,
    };

    match message {
        Some(message) => println!("{message}"),
        None => info!("No sunny range starts within the next hour"),
    }

    Ok(())
}
