//! Core library for the Open-Meteo weather widget.
//!
//! This crate defines:
//! - Display formatters and derived metrics (humidex, snow chance)
//! - Weather-code classification
//! - The forecast view model and its normalization from raw API payloads
//! - The forecast source abstraction and its Open-Meteo implementation
//! - The refresh scheduler a host UI drives and renders from
//!
//! It has no files, environment variables or persisted state; hosts pass a
//! [`WidgetConfig`] in explicitly.

pub mod classify;
pub mod config;
pub mod error;
pub mod format;
pub mod humidex;
pub mod model;
pub mod scheduler;
pub mod source;

pub use classify::{WeatherCategory, classify_snow_chance, classify_weather_code};
pub use config::WidgetConfig;
pub use error::{ConfigError, ErrorInfo, FetchError};
pub use format::{PLACEHOLDER, format_percent, format_temperature};
pub use humidex::{compute_humidex, humidex_celsius};
pub use model::{ForecastView, RawForecastResponse, RawHumidityResponse};
pub use scheduler::{RefreshPhase, RefreshScheduler, WidgetState};
pub use source::{ForecastSource, OpenMeteoFetcher};
