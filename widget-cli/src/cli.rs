use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Text};
use std::{
    io::{BufRead, BufReader},
    sync::Arc,
    thread,
};
use tokio::sync::mpsc;
use tracing::debug;
use widget_core::{ForecastSource, OpenMeteoFetcher, RefreshScheduler, WidgetConfig};

use crate::{config::CliConfig, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-widget", version, about = "Open-Meteo weather widget for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the widget location and options interactively.
    Configure,

    /// Fetch once and print today's conditions.
    Show {
        /// Print the view model as JSON instead of the text panel.
        #[arg(long)]
        json: bool,
    },

    /// Keep the widget on screen, refreshing on a timer. Press Enter to refresh now.
    Watch,

    /// Print the config file location.
    Path,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { json } => show(CliConfig::load()?.widget, json).await,
            Command::Watch => watch(CliConfig::load()?.widget).await,
            Command::Path => {
                println!("{}", CliConfig::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

fn configure() -> Result<()> {
    let mut cfg = CliConfig::load()?;
    let widget = &mut cfg.widget;

    widget.latitude = CustomType::<f64>::new("Latitude:")
        .with_default(widget.latitude)
        .with_error_message("Please enter a number between -90 and 90")
        .prompt()?;
    widget.longitude = CustomType::<f64>::new("Longitude:")
        .with_default(widget.longitude)
        .with_error_message("Please enter a number between -180 and 180")
        .prompt()?;

    // An empty name is kept as-is so it is not replaced by the default on reload.
    let place = Text::new("Place name (leave empty for the timezone):")
        .with_default(widget.place_name.as_deref().unwrap_or_default())
        .prompt()?;
    widget.place_name = Some(place.trim().to_string());

    widget.include_humidity = Confirm::new("Fetch humidity for humidex?")
        .with_default(widget.include_humidity)
        .prompt()?;

    widget.validate()?;
    let path = cfg.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn show(config: WidgetConfig, json: bool) -> Result<()> {
    let fetcher = OpenMeteoFetcher::new(config)?;
    let view = fetcher
        .fetch_forecast()
        .await
        .context("Couldn't load weather")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render::render_view(&view));
    }
    Ok(())
}

async fn watch(config: WidgetConfig) -> Result<()> {
    let fetcher = OpenMeteoFetcher::new(config.clone())?;
    let scheduler = RefreshScheduler::new(Arc::new(fetcher), config.refresh_interval());
    let mut updates = scheduler.subscribe();
    let mut lines = spawn_line_reader(BufReader::new(std::io::stdin()));
    let mut stdin_open = true;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    scheduler.start();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                println!("{}", render::render_state(&state));
            }
            line = lines.recv(), if stdin_open => match line {
                Some(()) => scheduler.refresh_now(),
                // stdin closed: keep refreshing on the timer only
                None => stdin_open = false,
            },
            _ = &mut ctrl_c => break,
        }
    }

    scheduler.stop();
    Ok(())
}

/// Forwards one message per input line from a plain OS thread. The channel
/// closes at end of input; a read still pending at exit does not hold up the
/// runtime shutdown.
fn spawn_line_reader<R>(reader: R) -> mpsc::UnboundedReceiver<()>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in reader.lines() {
            if let Err(e) = line {
                debug!(error = %e, "Stopped reading stdin");
                break;
            }
            if tx.send(()).is_err() {
                break;
            }
        }
    });
    rx
}
