use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::FetchError, model::ForecastView};

pub mod open_meteo;

pub use open_meteo::OpenMeteoFetcher;

/// Produces one normalized forecast per call.
///
/// The refresh scheduler only depends on this trait, so hosts and tests can
/// plug in their own source.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch_forecast(&self) -> Result<ForecastView, FetchError>;
}
