//! Screen layout: picker sidebar on the left, results on the right, one
//! status line at the bottom, overlays on top.

pub mod chart_panel;
pub mod overlays;
pub mod sidebar;
pub mod stats_panel;
pub mod status_bar;

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use pairlab_runner::Correlation;

use crate::app::{AppState, Overlay};
use crate::theme;

pub fn draw(f: &mut Frame, app: &AppState) {
    let [body, status] = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(f.area());
    let [picker, results] =
        Layout::horizontal([Constraint::Length(32), Constraint::Min(20)]).areas(body);

    sidebar::render(f, picker, app);
    draw_results(f, results, app);
    status_bar::render(f, status, app);

    match &app.overlay {
        Overlay::None => {}
        Overlay::Help => overlays::render_help(f, body, app),
        Overlay::Edit { field, buffer } => overlays::render_edit(f, body, *field, buffer),
    }
}

fn draw_results(f: &mut Frame, area: Rect, app: &AppState) {
    let [header, chart, stats] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Min(8),
        Constraint::Length(8),
    ])
    .areas(area);

    draw_header(f, header, app);
    chart_panel::render(f, chart, app);
    stats_panel::render(f, stats, app);
}

fn draw_header(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(app.report.is_some()))
        .title(" Correlation ")
        .title_style(theme::panel_title(app.report.is_some()));

    let lines = match &app.report {
        Some(report) => {
            let value = match &report.correlation {
                Correlation::Defined { value } => Span::styled(
                    format!("{value:.2}"),
                    theme::accent_bold().fg(theme::correlation_color(*value)),
                ),
                Correlation::Undefined { reason } => {
                    Span::styled(format!("undefined ({reason})"), theme::warning())
                }
            };
            vec![
                Line::from(vec![
                    Span::styled(format!("{}: ", report.title()), theme::text()),
                    value,
                ]),
                Line::from(Span::styled(
                    format!(
                        "{} to {} | {} shared trading days | {}",
                        report.start,
                        report.end,
                        report.row_count(),
                        report.source.label()
                    ),
                    theme::muted(),
                )),
            ]
        }
        None if app.in_flight => vec![Line::from(Span::styled("Fetching prices...", theme::neutral()))],
        None => vec![Line::from(Span::styled(
            "Pick two stocks and a date range, then press a to analyze.",
            theme::muted(),
        ))],
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// A `percent_x` by `percent_y` box in the middle of `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
