//! Humidex from air temperature and relative humidity.
//!
//! The dew point comes from the Magnus approximation; the vapour pressure
//! then follows the Environment Canada humidex definition.

use crate::format::{PLACEHOLDER, format_temperature};

const MAGNUS_A: f64 = 17.27;
const MAGNUS_B: f64 = 237.7;

/// Magnus `alpha` term for temperature `t` (°C) and humidity `rh` (%).
fn alpha(t: f64, rh: f64) -> f64 {
    (MAGNUS_A * t) / (MAGNUS_B + t) + (rh / 100.0).ln()
}

/// Undefined when `alpha == 17.27`.
fn dew_point(alpha: f64) -> Option<f64> {
    let denominator = MAGNUS_A - alpha;
    if denominator == 0.0 {
        return None;
    }
    Some((MAGNUS_B * alpha) / denominator).filter(|d| d.is_finite())
}

/// Humidex in °C, or `None` when an input is missing or the formula
/// leaves the finite range.
pub fn humidex_celsius(temperature_c: f64, relative_humidity_pct: f64) -> Option<f64> {
    if !temperature_c.is_finite() || !relative_humidity_pct.is_finite() {
        return None;
    }

    let dew_point = dew_point(alpha(temperature_c, relative_humidity_pct))?;
    let vapor_pressure = 6.11 * (5417.7530 * (1.0 / 273.16 - 1.0 / (273.15 + dew_point))).exp();
    let humidex = temperature_c + 0.5555 * (vapor_pressure - 10.0);

    humidex.is_finite().then_some(humidex)
}

/// Formatted humidex, e.g. `"41°C"`.
pub fn compute_humidex(temperature_c: Option<f64>, relative_humidity_pct: Option<f64>) -> String {
    match (temperature_c, relative_humidity_pct) {
        (Some(t), Some(rh)) => match humidex_celsius(t, rh) {
            Some(h) => format_temperature(Some(h)),
            None => PLACEHOLDER.to_string(),
        },
        _ => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hot_and_humid_reference_value() {
        let h = humidex_celsius(30.0, 70.0).expect("finite humidex");
        assert!((h - 41.19).abs() < 0.1, "got {h}");
        assert_eq!(compute_humidex(Some(30.0), Some(70.0)), "41°C");
    }

    #[test]
    fn mild_reference_value() {
        let h = humidex_celsius(20.0, 50.0).expect("finite humidex");
        assert!((h - 20.94).abs() < 0.1, "got {h}");
    }

    #[test]
    fn cold_humidex_is_below_air_temperature() {
        let h = humidex_celsius(-5.0, 80.0).expect("finite humidex");
        assert!((h - -8.68).abs() < 0.1, "got {h}");
        assert_eq!(compute_humidex(Some(-5.0), Some(80.0)), "-9°C");
    }

    #[test]
    fn missing_inputs_are_placeholder() {
        assert_eq!(compute_humidex(None, Some(70.0)), "—");
        assert_eq!(compute_humidex(Some(30.0), None), "—");
        assert_eq!(compute_humidex(Some(f64::NAN), Some(70.0)), "—");
        assert_eq!(compute_humidex(Some(30.0), Some(f64::NAN)), "—");
    }

    #[test]
    fn dew_point_undefined_at_magnus_a() {
        assert_eq!(dew_point(MAGNUS_A), None);
    }

    #[test]
    fn saturated_extreme_temperature_hits_singularity() {
        // At 100% humidity alpha tends to 17.27 and reaches it exactly here.
        assert_eq!(alpha(1e20, 100.0), MAGNUS_A);
        assert_eq!(humidex_celsius(1e20, 100.0), None);
        assert_eq!(compute_humidex(Some(1e20), Some(100.0)), "—");
    }

    #[test]
    fn zero_humidity_is_placeholder() {
        // ln(0) is -inf, so the dew point is not finite.
        assert_eq!(compute_humidex(Some(25.0), Some(0.0)), "—");
    }
}
