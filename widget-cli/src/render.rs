use chrono::Local;
use std::fmt::Write;
use widget_core::{
    ForecastView, PLACEHOLDER, WidgetState, classify_weather_code, format_percent,
    format_temperature,
};

/// Human-readable panel for the current widget state.
pub fn render_state(state: &WidgetState) -> String {
    let mut out = String::new();

    if let Some(view) = &state.view {
        out.push_str(&render_view(view));
    } else if !state.loading() && state.error.is_none() {
        out.push_str("No weather data yet.\n");
    }

    if state.loading() {
        out.push_str("Loading…\n");
    }

    if let Some(info) = &state.error {
        let _ = writeln!(out, "Couldn't load weather: {info}");
        out.push_str("Check your connection; the next refresh will retry.\n");
    }

    out
}

pub fn render_view(view: &ForecastView) -> String {
    let icon = view.category().map_or(PLACEHOLDER, |c| c.emoji());
    let fetched = view.fetched_at.with_timezone(&Local).format("%H:%M:%S");

    let mut out = String::new();
    let _ = writeln!(out, "{icon}  Weather ({})", classify_weather_code(view.today_weather_code));
    let _ = writeln!(out, "Location: {}   [{fetched}]", view.timezone_label);
    let _ = writeln!(
        out,
        "  Current {:>6}   Max (Today) {:>6}   Min (Today) {:>6}",
        format_temperature(view.current_temp),
        format_temperature(view.today_max),
        format_temperature(view.today_min),
    );
    let _ = writeln!(
        out,
        "  Humidex {:>6}   Precip Chance {:>4}   Snow Chance {:>4}",
        view.humidex(),
        format_percent(view.today_precip_chance),
        view.snow_chance(),
    );
    out
}
