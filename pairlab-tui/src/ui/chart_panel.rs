//! Overlaid closing-price chart of both tickers.

use ratatui::layout::Rect;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use pairlab_core::stats::Leg;
use pairlab_runner::AnalysisReport;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(app.report.is_some()))
        .title(" Price chart ")
        .title_style(theme::panel_title(app.report.is_some()));

    match &app.report {
        Some(report) if !report.dates.is_empty() => render_chart(f, area, block, report),
        _ => {
            let hint = Paragraph::new(Line::from(Span::styled(
                "The closing prices of both stocks will be drawn here.",
                theme::muted(),
            )))
            .block(block);
            f.render_widget(hint, area);
        }
    }
}

/// `(index, close)` pairs; the x axis is the shared-trading-day index.
fn points(prices: &[f64]) -> Vec<(f64, f64)> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| (i as f64, p))
        .collect()
}

/// Padded `[min, max]` across both series.
fn y_bounds(report: &AnalysisReport) -> [f64; 2] {
    let lo = report.first_summary.min.min(report.second_summary.min);
    let hi = report.first_summary.max.max(report.second_summary.max);
    let padding = ((hi - lo).abs() * 0.05).max(0.5);
    [lo - padding, hi + padding]
}

/// First, middle and last dates.
fn x_labels(report: &AnalysisReport) -> Vec<Span<'static>> {
    let n = report.dates.len();
    let mut picks = vec![0, n / 2, n - 1];
    picks.dedup();
    picks
        .into_iter()
        .map(|i| Span::styled(report.dates[i].format("%Y-%m-%d").to_string(), theme::muted()))
        .collect()
}

fn render_chart(f: &mut Frame, area: Rect, block: Block, report: &AnalysisReport) {
    let first = points(&report.first_prices);
    let second = points(&report.second_prices);
    let [y_min, y_max] = y_bounds(report);
    let x_max = (report.dates.len().saturating_sub(1) as f64).max(1.0);

    let datasets = vec![
        Dataset::default()
            .name(report.first.to_string())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme::series(Leg::First))
            .data(&first),
        Dataset::default()
            .name(report.second.to_string())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme::series(Leg::Second))
            .data(&second),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title(Span::styled("Date", theme::muted()))
                .style(theme::muted())
                .bounds([0.0, x_max])
                .labels(x_labels(report)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Close", theme::muted()))
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format!("{y_min:.0}"), theme::muted()),
                    Span::styled(format!("{y_max:.0}"), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}
