use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};

use crate::{
    classify::{WeatherCategory, classify_snow_chance},
    config::WidgetConfig,
    humidex::compute_humidex,
};

/// Decodes a field to `None` instead of failing when it has the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Forecast endpoint payload. Only the fields the widget reads are modelled.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawForecastResponse {
    #[serde(deserialize_with = "lenient")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub longitude: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub timezone: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub current: Option<RawCurrent>,
    #[serde(deserialize_with = "lenient")]
    pub daily: Option<RawDaily>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawCurrent {
    #[serde(deserialize_with = "lenient")]
    pub temperature_2m: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub relative_humidity_2m: Option<f64>,
}

/// Parallel arrays indexed by day offset; index 0 is today.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawDaily {
    #[serde(deserialize_with = "lenient")]
    pub temperature_2m_max: Option<Vec<Option<f64>>>,
    #[serde(deserialize_with = "lenient")]
    pub temperature_2m_min: Option<Vec<Option<f64>>>,
    #[serde(deserialize_with = "lenient")]
    pub weather_code: Option<Vec<Option<i32>>>,
    #[serde(deserialize_with = "lenient")]
    pub precipitation_probability_max: Option<Vec<Option<f64>>>,
}

/// Humidity endpoint payload (`current=relative_humidity_2m`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawHumidityResponse {
    #[serde(deserialize_with = "lenient")]
    pub current: Option<RawCurrent>,
}

impl RawHumidityResponse {
    pub fn relative_humidity(&self) -> Option<f64> {
        self.current.as_ref().and_then(|c| c.relative_humidity_2m)
    }
}

fn today<T: Copy>(series: Option<&[Option<T>]>) -> Option<T> {
    series.and_then(|values| values.first().copied().flatten())
}

/// Flat view model produced by one successful fetch cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastView {
    pub current_temp: Option<f64>,
    pub today_max: Option<f64>,
    pub today_min: Option<f64>,
    pub today_weather_code: Option<i32>,
    pub today_precip_chance: Option<f64>,
    pub humidity: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Option<String>,
    pub timezone_label: String,
    pub fetched_at: DateTime<Utc>,
}

impl ForecastView {
    /// Normalize raw payloads. Every missing field becomes `None`; coordinates
    /// fall back to the configured ones when the response omits them.
    pub fn from_raw(
        forecast: RawForecastResponse,
        humidity: Option<&RawHumidityResponse>,
        config: &WidgetConfig,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let daily = forecast.daily.as_ref();
        let latitude = forecast.latitude.unwrap_or(config.latitude);
        let longitude = forecast.longitude.unwrap_or(config.longitude);
        let timezone_label = location_label(
            latitude,
            longitude,
            config.place_name.as_deref(),
            forecast.timezone.as_deref(),
        );

        Self {
            current_temp: forecast.current.as_ref().and_then(|c| c.temperature_2m),
            today_max: today(daily.and_then(|d| d.temperature_2m_max.as_deref())),
            today_min: today(daily.and_then(|d| d.temperature_2m_min.as_deref())),
            today_weather_code: today(daily.and_then(|d| d.weather_code.as_deref())),
            today_precip_chance: today(
                daily.and_then(|d| d.precipitation_probability_max.as_deref()),
            ),
            humidity: humidity.and_then(RawHumidityResponse::relative_humidity),
            latitude,
            longitude,
            timezone: forecast.timezone,
            timezone_label,
            fetched_at,
        }
    }

    pub fn category(&self) -> Option<WeatherCategory> {
        self.today_weather_code.map(WeatherCategory::from_wmo_code)
    }

    pub fn humidex(&self) -> String {
        compute_humidex(self.current_temp, self.humidity)
    }

    pub fn snow_chance(&self) -> &'static str {
        classify_snow_chance(self.today_weather_code)
    }
}

/// `"Lat 45.650, Lon -74.083 • Mirabel"`; the suffix is the place name,
/// else the timezone, else nothing.
pub fn location_label(
    latitude: f64,
    longitude: f64,
    place_name: Option<&str>,
    timezone: Option<&str>,
) -> String {
    let base = format!("Lat {latitude:.3}, Lon {longitude:.3}");
    let non_blank = |s: &&str| !s.trim().is_empty();
    match place_name.filter(non_blank).or(timezone.filter(non_blank)) {
        Some(suffix) => format!("{base} • {suffix}"),
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fetched_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).single().expect("valid date")
    }

    fn parse(json: &str) -> RawForecastResponse {
        serde_json::from_str(json).expect("should parse")
    }

    #[test]
    fn normalizes_full_payload() {
        let raw = parse(
            r#"{
                "latitude": 45.65,
                "longitude": -74.08,
                "timezone": "America/Toronto",
                "current": { "temperature_2m": 21.4 },
                "daily": {
                    "temperature_2m_max": [24.9, 20.0],
                    "temperature_2m_min": [12.1, 9.0],
                    "weather_code": [61, 0],
                    "precipitation_probability_max": [80, 5]
                }
            }"#,
        );
        let humidity: RawHumidityResponse =
            serde_json::from_str(r#"{ "current": { "relative_humidity_2m": 65 } }"#).expect("parse");

        let view = ForecastView::from_raw(raw, Some(&humidity), &WidgetConfig::default(), fetched_at());

        assert_eq!(view.current_temp, Some(21.4));
        assert_eq!(view.today_max, Some(24.9));
        assert_eq!(view.today_min, Some(12.1));
        assert_eq!(view.today_weather_code, Some(61));
        assert_eq!(view.today_precip_chance, Some(80.0));
        assert_eq!(view.humidity, Some(65.0));
        assert_eq!(view.timezone.as_deref(), Some("America/Toronto"));
        assert_eq!(view.timezone_label, "Lat 45.650, Lon -74.080 • Mirabel");
        assert_eq!(view.category(), Some(WeatherCategory::Rain));
        assert_eq!(view.snow_chance(), "0%");
        assert_eq!(view.fetched_at, fetched_at());
    }

    #[test]
    fn empty_object_defaults_every_field() {
        let config = WidgetConfig { place_name: None, ..Default::default() };
        let view = ForecastView::from_raw(parse("{}"), None, &config, fetched_at());

        assert_eq!(view.current_temp, None);
        assert_eq!(view.today_max, None);
        assert_eq!(view.today_weather_code, None);
        assert_eq!(view.humidity, None);
        assert_eq!(view.latitude, config.latitude);
        assert_eq!(view.timezone_label, "Lat 45.650, Lon -74.083");
        assert_eq!(view.humidex(), "—");
        assert_eq!(view.snow_chance(), "—");
    }

    #[test]
    fn wrong_types_only_null_their_own_field() {
        let raw = parse(
            r#"{
                "latitude": "north",
                "longitude": 10.0,
                "current": { "temperature_2m": "warm" },
                "daily": {
                    "temperature_2m_max": [null, 3.0],
                    "temperature_2m_min": "none",
                    "weather_code": [73]
                }
            }"#,
        );
        assert_eq!(raw.latitude, None);
        assert_eq!(raw.longitude, Some(10.0));

        let view = ForecastView::from_raw(raw, None, &WidgetConfig::default(), fetched_at());
        assert_eq!(view.current_temp, None);
        assert_eq!(view.today_max, None);
        assert_eq!(view.today_min, None);
        assert_eq!(view.today_weather_code, Some(73));
        assert_eq!(view.today_precip_chance, None);
        assert_eq!(view.snow_chance(), "100%");
    }

    #[test]
    fn empty_daily_arrays_are_none() {
        let raw = parse(r#"{ "daily": { "temperature_2m_max": [], "weather_code": [] } }"#);
        let view = ForecastView::from_raw(raw, None, &WidgetConfig::default(), fetched_at());
        assert_eq!(view.today_max, None);
        assert_eq!(view.category(), None);
    }

    #[test]
    fn label_uses_timezone_without_place_name() {
        assert_eq!(
            location_label(52.52, 13.405, None, Some("Europe/Berlin")),
            "Lat 52.520, Lon 13.405 • Europe/Berlin"
        );
        assert_eq!(location_label(-33.8688, 151.2093, None, None), "Lat -33.869, Lon 151.209");
        assert_eq!(
            location_label(1.0, 2.0, Some("Home"), Some("UTC")),
            "Lat 1.000, Lon 2.000 • Home"
        );
    }

    #[test]
    fn blank_place_name_falls_back_to_timezone() {
        assert_eq!(
            location_label(1.0, 2.0, Some(""), Some("Europe/Berlin")),
            "Lat 1.000, Lon 2.000 • Europe/Berlin"
        );
        assert_eq!(
            location_label(1.0, 2.0, Some("  "), Some("Europe/Berlin")),
            "Lat 1.000, Lon 2.000 • Europe/Berlin"
        );
        assert_eq!(location_label(1.0, 2.0, Some(""), Some(" ")), "Lat 1.000, Lon 2.000");
    }
}
