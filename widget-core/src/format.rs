//! Display formatting for raw forecast values.

/// Shown wherever a value is missing or cannot be computed.
pub const PLACEHOLDER: &str = "—";

/// Rounds half away from zero; `None` for missing, NaN or infinite input.
fn round_display(value: Option<f64>) -> Option<i64> {
    let value = value.filter(|v| v.is_finite())?;
    // `as` saturates, and turns -0.0 into 0.
    Some(value.round() as i64)
}

/// Format a Celsius temperature, e.g. `20.4` -> `"20°C"`.
pub fn format_temperature(value: Option<f64>) -> String {
    match round_display(value) {
        Some(rounded) => format!("{rounded}°C"),
        None => PLACEHOLDER.to_string(),
    }
}

/// Format a percentage, e.g. `49.6` -> `"50%"`.
pub fn format_percent(value: Option<f64>) -> String {
    match round_display(value) {
        Some(rounded) => format!("{rounded}%"),
        None => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_missing_is_placeholder() {
        assert_eq!(format_temperature(None), "—");
        assert_eq!(format_temperature(Some(f64::NAN)), "—");
        assert_eq!(format_temperature(Some(f64::INFINITY)), "—");
        assert_eq!(format_temperature(Some(f64::NEG_INFINITY)), "—");
    }

    #[test]
    fn temperature_rounds_to_nearest() {
        assert_eq!(format_temperature(Some(20.4)), "20°C");
        assert_eq!(format_temperature(Some(20.6)), "21°C");
        assert_eq!(format_temperature(Some(-3.2)), "-3°C");
    }

    #[test]
    fn temperature_half_rounds_away_from_zero() {
        assert_eq!(format_temperature(Some(0.5)), "1°C");
        assert_eq!(format_temperature(Some(20.5)), "21°C");
        assert_eq!(format_temperature(Some(-0.5)), "-1°C");
        assert_eq!(format_temperature(Some(-2.5)), "-3°C");
    }

    #[test]
    fn temperature_never_shows_negative_zero() {
        assert_eq!(format_temperature(Some(-0.4)), "0°C");
        assert_eq!(format_temperature(Some(-0.0)), "0°C");
    }

    #[test]
    fn percent_formats() {
        assert_eq!(format_percent(Some(f64::NAN)), "—");
        assert_eq!(format_percent(None), "—");
        assert_eq!(format_percent(Some(49.6)), "50%");
        assert_eq!(format_percent(Some(0.0)), "0%");
        assert_eq!(format_percent(Some(100.0)), "100%");
    }
}
