//! Color tokens and style helpers for the dashboard.
//!
//! Dark background with a cyan accent. The two price series keep the
//! salmon / sky-blue pair the dashboard has always used, so a ticker's
//! color matches across the chart, the stats table and the sidebar.

use ratatui::style::{Color, Modifier, Style};

use pairlab_core::stats::Leg;

pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT: Color = Color::White;

/// #ff9999
pub const FIRST_SERIES: Color = Color::Rgb(0xff, 0x99, 0x99);
/// #66b3ff
pub const SECOND_SERIES: Color = Color::Rgb(0x66, 0xb3, 0xff);

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

/// Style for the focused row in the sidebar.
pub fn selected() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn series_color(leg: Leg) -> Color {
    match leg {
        Leg::First => FIRST_SERIES,
        Leg::Second => SECOND_SERIES,
    }
}

pub fn series(leg: Leg) -> Style {
    Style::default().fg(series_color(leg))
}

/// Strong positive or negative correlation stands out; weak stays neutral.
pub fn correlation_color(r: f64) -> Color {
    match r {
        r if r >= 0.7 => POSITIVE,
        r if r <= -0.7 => NEGATIVE,
        r if r.abs() >= 0.3 => ACCENT,
        _ => NEUTRAL,
    }
}
