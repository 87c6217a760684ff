//! Presentation: a pure mapping from [`ViewState`] to what gets drawn.

use std::fmt::Write as _;

use crate::{ViewState, WeatherReport};

/// Placeholder; precipitation is not part of the conditions lookup.
pub const PRECIPITATION_PLACEHOLDER: &str = "7 mm/h";

const FIRST_HOUR: u32 = 14;
const HOUR_SLOTS: u32 = 5;
const BAR_BASE: u32 = 20;
const BAR_STEP: u32 = 5;
const COLUMN: usize = 7;

/// One marker on the "Next Hours" strip. Synthetic: derived from the
/// current temperature, not from forecast data.
#[derive(Debug, Clone, PartialEq)]
pub struct HourSlot {
    pub label: String,
    pub temperature_c: f64,
    pub bar_height: u32,
}

impl HourSlot {
    /// Rounded half up (toward positive infinity on ties).
    pub fn display_temperature(&self) -> i64 {
        let t = self.temperature_c;
        let floor = t.floor();
        let rounded = if t - floor >= 0.5 { floor + 1.0 } else { floor };
        rounded as i64
    }
}

pub fn hourly_strip(temperature_c: f64) -> Vec<HourSlot> {
    (0..HOUR_SLOTS)
        .map(|i| HourSlot {
            label: format!("{}:00", FIRST_HOUR + i),
            temperature_c: temperature_c - f64::from(i),
            bar_height: BAR_BASE + i * BAR_STEP,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricTile {
    pub label: &'static str,
    pub value: String,
}

pub fn metric_tiles(report: &WeatherReport) -> [MetricTile; 4] {
    [
        MetricTile { label: "Precipitation", value: PRECIPITATION_PLACEHOLDER.to_string() },
        MetricTile { label: "Wind", value: format!("{} km/h", report.wind_speed_kmh) },
        MetricTile { label: "Humidity", value: format!("{}%", report.humidity_pct) },
        MetricTile { label: "Feels Like", value: format!("{}°", report.real_feel_c) },
    ]
}

/// "Region, Country", skipping whichever part is empty.
pub fn location_subtext(report: &WeatherReport) -> String {
    [report.region.as_str(), report.country.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Append the underlying error detail below the user-facing message.
    pub verbose: bool,
}

pub fn render(state: &ViewState, opts: RenderOptions) -> String {
    match state {
        ViewState::Loading => "⠋ Loading weather...\n".to_string(),
        ViewState::Error(err) => {
            let mut out = format!("{}\n", err.message());
            if opts.verbose {
                let _ = writeln!(out, "  ({})", err.detail);
            }
            out
        }
        ViewState::Ready(report) => render_report(report),
    }
}

fn render_report(report: &WeatherReport) -> String {
    let mut out = String::new();

    // summary card
    let _ = writeln!(out, "{}", report.city);
    let subtext = location_subtext(report);
    if !subtext.is_empty() {
        let _ = writeln!(out, "{subtext}");
    }
    let _ = writeln!(out, "{}°", report.temperature_c);
    let _ = writeln!(out, "{}", report.condition_text);
    if let Some(at) = report.observed_at {
        let _ = writeln!(out, "Observed {}", at.format("%H:%M UTC"));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Next Hours");
    render_strip(&mut out, &hourly_strip(report.temperature_c));

    let _ = writeln!(out);
    for tile in metric_tiles(report) {
        let _ = writeln!(out, "{:<14}{}", tile.label, tile.value);
    }

    out
}

fn render_strip(out: &mut String, slots: &[HourSlot]) {
    push_row(out, slots, |s| format!("{}°", s.display_temperature()));

    let rows = |s: &HourSlot| s.bar_height / BAR_STEP;
    let tallest = slots.iter().map(rows).max().unwrap_or(0);
    for level in (1..=tallest).rev() {
        push_row(out, slots, |s| if rows(s) >= level { "█".to_string() } else { String::new() });
    }

    push_row(out, slots, |s| s.label.clone());
}

fn push_row(out: &mut String, slots: &[HourSlot], cell: impl Fn(&HourSlot) -> String) {
    let row: String =
        slots.iter().map(|s| format!("{:^width$}", cell(s), width = COLUMN)).collect();
    let _ = writeln!(out, "{}", row.trim_end());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ViewError, error::ErrorKind};

    fn report(temp: f64) -> WeatherReport {
        WeatherReport {
            city: "Bengaluru".into(),
            region: "Karnataka".into(),
            country: "India".into(),
            temperature_c: temp,
            condition_text: "Partly cloudy".into(),
            wind_speed_kmh: 10.0,
            humidity_pct: 60,
            real_feel_c: 29.0,
            observed_at: None,
        }
    }

    #[test]
    fn strip_counts_down_from_current_temperature() {
        for temp in [27.0, -3.0, 0.5, 101.25] {
            let temps: Vec<f64> = hourly_strip(temp).iter().map(|s| s.temperature_c).collect();
            assert_eq!(temps, vec![temp, temp - 1.0, temp - 2.0, temp - 3.0, temp - 4.0]);
        }
    }

    #[test]
    fn strip_labels_and_bars_are_fixed() {
        let strip = hourly_strip(12.0);
        let labels: Vec<&str> = strip.iter().map(|s| s.label.as_str()).collect();
        let bars: Vec<u32> = strip.iter().map(|s| s.bar_height).collect();

        assert_eq!(labels, ["14:00", "15:00", "16:00", "17:00", "18:00"]);
        assert_eq!(bars, [20, 25, 30, 35, 40]);
    }

    #[test]
    fn strip_rounds_half_up() {
        let strip = hourly_strip(2.5);
        let shown: Vec<i64> = strip.iter().map(HourSlot::display_temperature).collect();
        assert_eq!(shown, [3, 2, 1, 0, -1]);
    }

    #[test]
    fn rounding_has_no_float_drift_near_ties() {
        let shown = |t: f64| HourSlot { label: String::new(), temperature_c: t, bar_height: 0 }
            .display_temperature();

        assert_eq!(shown(0.49999999999999994), 0);
        assert_eq!(shown(-2.5), -2);
        assert_eq!(shown(-2.6), -3);
        assert_eq!(shown(4_503_599_627_370_497.0), 4_503_599_627_370_497);
    }

    #[test]
    fn tiles_show_placeholder_precipitation_and_fetched_metrics() {
        let tiles = metric_tiles(&report(27.0));

        assert_eq!(tiles[0], MetricTile { label: "Precipitation", value: "7 mm/h".into() });
        assert_eq!(tiles[1].value, "10 km/h");
        assert_eq!(tiles[2].value, "60%");
        assert_eq!(tiles[3].value, "29°");
    }

    #[test]
    fn subtext_skips_missing_parts() {
        let mut r = report(1.0);
        assert_eq!(location_subtext(&r), "Karnataka, India");

        r.region.clear();
        assert_eq!(location_subtext(&r), "India");
    }

    #[test]
    fn ready_render_contains_card_strip_and_tiles() {
        let out = render(&ViewState::Ready(report(27.0)), RenderOptions::default());

        assert!(out.starts_with("Bengaluru\nKarnataka, India\n27°\nPartly cloudy\n"));
        assert!(out.contains("Next Hours"));
        assert!(out.contains("23°"));
        assert!(out.contains("18:00"));
        assert!(out.contains("Feels Like    29°"));
    }

    #[test]
    fn error_render_hides_detail_unless_verbose() {
        let state = ViewState::Error(ViewError {
            kind: ErrorKind::Network,
            detail: "connection refused".into(),
        });

        let quiet = render(&state, RenderOptions::default());
        assert_eq!(quiet, "Failed to fetch weather.\n");

        let loud = render(&state, RenderOptions { verbose: true });
        assert!(loud.contains("connection refused"));
    }

    #[test]
    fn loading_render_is_a_spinner_line() {
        assert!(render(&ViewState::Loading, RenderOptions::default()).contains("Loading"));
    }
}
