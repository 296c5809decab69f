use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::{
    config::WidgetConfig,
    error::{ConfigError, FetchError},
    model::{ForecastView, RawForecastResponse, RawHumidityResponse},
};

use super::ForecastSource;

const USER_AGENT: &str = concat!("weather-widget/", env!("CARGO_PKG_VERSION"));

const CURRENT_FIELDS: &str = "temperature_2m";
const HUMIDITY_FIELDS: &str = "relative_humidity_2m";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,weather_code";
const PRECIPITATION_FIELD: &str = "precipitation_probability_max";

/// Fetches today's forecast (and optionally humidity) from Open-Meteo.
#[derive(Debug, Clone)]
pub struct OpenMeteoFetcher {
    config: WidgetConfig,
    http: Client,
}

impl OpenMeteoFetcher {
    pub fn new(config: WidgetConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self { config, http })
    }

    fn location_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", self.config.latitude.to_string()),
            ("longitude", self.config.longitude.to_string()),
        ]
    }

    fn forecast_query(&self) -> Vec<(&'static str, String)> {
        let mut daily = DAILY_FIELDS.to_string();
        if self.config.include_precipitation {
            daily.push(',');
            daily.push_str(PRECIPITATION_FIELD);
        }

        let mut query = self.location_query();
        query.push(("current", CURRENT_FIELDS.to_string()));
        query.push(("daily", daily));
        query.push(("timezone", "auto".to_string()));
        query
    }

    fn humidity_query(&self) -> Vec<(&'static str, String)> {
        let mut query = self.location_query();
        query.push(("current", HUMIDITY_FIELDS.to_string()));
        query.push(("timezone", "auto".to_string()));
        query
    }

    /// One GET against the forecast endpoint. Only transport failures, non-2xx
    /// statuses and non-JSON bodies are errors; a JSON body of the wrong shape
    /// decodes to the all-`None` default.
    async fn get_json<T>(
        &self,
        query: &[(&'static str, String)],
        what: &str,
    ) -> Result<T, FetchError>
    where
        T: DeserializeOwned + Default,
    {
        let url = self.config.forecast_url();
        debug!(url = %url, request = what, "Fetching Open-Meteo data");

        let res = self.http.get(&url).query(query).send().await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            debug!(
                request = what,
                status = status.as_u16(),
                body = %truncate_body(&body),
                "Open-Meteo request failed"
            );
            return Err(FetchError::Http { status: status.as_u16() });
        }

        let body = res.text().await?;
        let value: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            FetchError::network(format!("Failed to parse Open-Meteo {what} JSON: {e}"))
        })?;

        Ok(decode_payload(value, what))
    }
}

/// Decodes a JSON object into `T`. Anything else (arrays, scalars, `null`, an
/// object that still fails to decode) becomes `T::default()`.
fn decode_payload<T>(value: serde_json::Value, what: &str) -> T
where
    T: DeserializeOwned + Default,
{
    if !value.is_object() {
        warn!(request = what, "Open-Meteo payload is not a JSON object, using empty data");
        return T::default();
    }

    serde_json::from_value(value).unwrap_or_else(|e| {
        warn!(request = what, error = %e, "Unexpected Open-Meteo payload shape, using empty data");
        T::default()
    })
}

#[async_trait]
impl ForecastSource for OpenMeteoFetcher {
    #[instrument(skip(self))]
    async fn fetch_forecast(&self) -> Result<ForecastView, FetchError> {
        debug!(
            lat = self.config.latitude,
            lon = self.config.longitude,
            humidity = self.config.include_humidity,
            "Fetching forecast"
        );
        let forecast_query = self.forecast_query();

        let (forecast, humidity) = if self.config.include_humidity {
            let humidity_query = self.humidity_query();
            // Fails as soon as either request fails; the other is dropped.
            let (forecast, humidity) = tokio::try_join!(
                self.get_json::<RawForecastResponse>(&forecast_query, "forecast"),
                self.get_json::<RawHumidityResponse>(&humidity_query, "humidity"),
            )?;
            (forecast, Some(humidity))
        } else {
            let forecast = self.get_json::<RawForecastResponse>(&forecast_query, "forecast").await?;
            (forecast, None)
        };

        Ok(ForecastView::from_raw(forecast, humidity.as_ref(), &self.config, Utc::now()))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
