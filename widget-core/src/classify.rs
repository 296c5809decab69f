use serde::{Deserialize, Serialize};

use crate::format::PLACEHOLDER;

/// WMO codes for drizzle, rain, showers and thunderstorms.
const RAIN_CODES: [i32; 16] = [
    51, 53, 55, 56, 57, 61, 63, 65, 66, 67, 80, 81, 82, 95, 96, 99,
];

/// WMO codes for snowfall, snow grains and snow showers.
const SNOW_CODES: [i32; 6] = [71, 73, 75, 77, 85, 86];

/// Coarse sky condition derived from a WMO weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCategory {
    Clear,
    Rain,
    Cloudy,
}

impl WeatherCategory {
    /// Unknown codes fall back to `Cloudy`.
    pub fn from_wmo_code(code: i32) -> Self {
        if RAIN_CODES.contains(&code) {
            Self::Rain
        } else if code == 0 {
            Self::Clear
        } else {
            Self::Cloudy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCategory::Clear => "clear",
            WeatherCategory::Rain => "rain",
            WeatherCategory::Cloudy => "cloudy",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            WeatherCategory::Clear => "☀️",
            WeatherCategory::Rain => "🌧️",
            WeatherCategory::Cloudy => "☁️",
        }
    }
}

impl std::fmt::Display for WeatherCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the WMO code is one of the snow codes.
pub fn is_snow_code(code: i32) -> bool {
    SNOW_CODES.contains(&code)
}

/// `"clear"`, `"rain"` or `"cloudy"`; the placeholder when no code is known.
pub fn classify_weather_code(code: Option<i32>) -> &'static str {
    code.map(WeatherCategory::from_wmo_code)
        .map_or(PLACEHOLDER, |category| category.as_str())
}

/// Binary snow indicator: any snow code counts as certainty.
pub fn classify_snow_chance(code: Option<i32>) -> &'static str {
    match code {
        None => PLACEHOLDER,
        Some(code) if is_snow_code(code) => "100%",
        Some(_) => "0%",
    }
}
