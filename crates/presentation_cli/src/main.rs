//! met.hu forecast CLI
//!
//! Command-line stand-in for the home-automation host.

#![allow(clippy::print_stdout)]

use std::sync::Arc;

use anyhow::Context;
use application::ForecastService;
use clap::Parser;
use infrastructure::{
    AppConfig, MetHuForecastAdapter, PollingScheduler, SchedulerConfig,
    create_forecast_refresh_task, forecast_task_name, init_telemetry,
};
use methu_cli::{Cli, Commands, LocationArgs, log_filter_from_verbosity, output};
use tracing::{info, warn};

/// Read configuration, layer command-line overrides and validate
fn load_config(cli: &Cli, location: Option<&LocationArgs>) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::read_from(cli.config.as_deref())
        .context("failed to read configuration")?;

    if let Some(location) = location {
        location.apply(&mut config);
    }
    if let Some(filter) = log_filter_from_verbosity(cli.verbose) {
        config.telemetry.log_filter = filter.to_string();
    }

    Ok(config)
}

/// Build a service for the configured location
async fn build_service(config: &AppConfig) -> anyhow::Result<Arc<ForecastService>> {
    config.validate().context("invalid configuration")?;

    let adapter = Arc::new(MetHuForecastAdapter::with_config(config.provider.clone())?);
    let service = ForecastService::setup(
        adapter,
        &config.location.settlement,
        config.location.manual.as_ref(),
    )
    .await?;
    Ok(Arc::new(service))
}

/// Poll until Ctrl-C, logging each cycle
async fn watch(config: &AppConfig) -> anyhow::Result<()> {
    let service = build_service(config).await?;
    let interval = config.update.effective_interval();

    let scheduler = PollingScheduler::new(SchedulerConfig::default()).await?;
    let mut events = scheduler
        .take_event_receiver()
        .context("scheduler event channel unavailable")?;
    scheduler
        .add_polling_task(
            &forecast_task_name(&service),
            interval,
            create_forecast_refresh_task(Arc::clone(&service)),
        )
        .await?;

    info!(
        settlement = %service.location().name(),
        interval_minutes = interval.as_secs() / 60,
        "Watching forecast, press Ctrl-C to stop"
    );

    loop {
        tokio::select! {
            Some(event) = events.recv() => {
                if event.success {
                    let current = service.current_conditions();
                    info!(
                        temperature = ?current.as_ref().and_then(|c| c.temperature),
                        condition = ?current.as_ref().map(|c| c.condition),
                        duration_ms = event.duration_ms,
                        "Forecast published"
                    );
                } else {
                    warn!(
                        error = ?event.error,
                        consecutive_failures = service.status().consecutive_failures,
                        "Update failed, entities marked stale"
                    );
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            },
        }
    }

    scheduler.stop().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let location = match &cli.command {
        Commands::Resolve { .. } => None,
        Commands::Forecast { location, .. }
        | Commands::Sensors { location, .. }
        | Commands::Watch { location } => Some(location),
    };
    let config = load_config(&cli, location)?;
    init_telemetry(&config.telemetry)?;

    match &cli.command {
        Commands::Resolve { name } => {
            let adapter = Arc::new(MetHuForecastAdapter::with_config(config.provider.clone())?);
            let service = ForecastService::setup(adapter, name, None).await?;
            println!("{}", output::render_location(service.location()));
        },

        Commands::Forecast { json, .. } => {
            let service = build_service(&config).await?;
            let snapshot = service.refresh().await?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&*snapshot)?);
            } else {
                print!("{}", output::render_forecast(&snapshot));
            }
        },

        Commands::Sensors { json, .. } => {
            let service = build_service(&config).await?;
            if let Err(e) = service.refresh().await {
                warn!(error = %e, "Update failed");
            }

            let states = service.sensor_states();
            if *json {
                println!("{}", serde_json::to_string_pretty(&states)?);
            } else {
                print!("{}", output::render_sensors(&states));
            }
        },

        Commands::Watch { .. } => watch(&config).await?,
    }

    Ok(())
}
