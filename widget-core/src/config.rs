use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1";

/// Everything a widget instance needs to know about where and how often to fetch.
///
/// Example TOML (as a `[widget]` table):
/// latitude = 45.650002
/// longitude = -74.083336
/// place_name = "Mirabel"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Open-Meteo API base URL, without the `/forecast` path.
    pub base_url: String,

    pub latitude: f64,
    pub longitude: f64,

    /// Appended to the location label when set.
    pub place_name: Option<String>,

    /// Issue the second `relative_humidity_2m` request needed for humidex.
    pub include_humidity: bool,

    /// Request `precipitation_probability_max` in the daily fields.
    pub include_precipitation: bool,

    pub timeout_secs: u64,

    pub refresh_interval_secs: u64,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            latitude: 45.650002,
            longitude: -74.083336,
            place_name: Some("Mirabel".to_string()),
            include_humidity: true,
            include_precipitation: true,
            timeout_secs: 10,
            refresh_interval_secs: 10 * 60,
        }
    }
}

impl WidgetConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(-90.0..=90.0).contains(&self.latitude) || !(-180.0..=180.0).contains(&self.longitude)
        {
            return Err(ConfigError::InvalidCoordinates {
                latitude: self.latitude,
                longitude: self.longitude,
            });
        }
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full URL of the forecast endpoint.
    pub fn forecast_url(&self) -> String {
        format!("{}/forecast", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_widget_location() {
        let cfg = WidgetConfig::default();
        assert_eq!(cfg.base_url, "https://api.open-meteo.com/v1");
        assert_eq!(cfg.place_name.as_deref(), Some("Mirabel"));
        assert_eq!(cfg.refresh_interval(), Duration::from_secs(600));
        assert!(cfg.include_humidity);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let cfg = WidgetConfig { latitude: 91.0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidCoordinates { .. })));

        let cfg = WidgetConfig { longitude: -180.5, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidCoordinates { .. })));

        let cfg = WidgetConfig { latitude: f64::NAN, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_durations() {
        let cfg = WidgetConfig { refresh_interval_secs: 0, ..Default::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroInterval));

        let cfg = WidgetConfig { timeout_secs: 0, ..Default::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroTimeout));
    }

    #[test]
    fn forecast_url_ignores_trailing_slash() {
        let cfg = WidgetConfig { base_url: "http://localhost:1234/".into(), ..Default::default() };
        assert_eq!(cfg.forecast_url(), "http://localhost:1234/forecast");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: WidgetConfig =
            serde_json::from_str(r#"{ "latitude": 52.52, "longitude": 13.41, "place_name": null }"#)
                .expect("should deserialize");
        assert_eq!(cfg.latitude, 52.52);
        assert_eq!(cfg.place_name, None);
        assert_eq!(cfg.timeout_secs, 10);
    }
}
