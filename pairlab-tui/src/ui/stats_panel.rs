//! Summary statistics table, one column per ticker.

use ratatui::layout::{Constraint, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use pairlab_core::stats::{Leg, SummaryStats};

use crate::app::AppState;
use crate::theme;

/// Labelled values in display order.
fn stat_rows(s: &SummaryStats) -> [(&'static str, f64); 4] {
    [
        ("Mean", s.mean),
        ("Standard Deviation", s.std_dev),
        ("Minimum", s.min),
        ("Maximum", s.max),
    ]
}

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(app.report.is_some()))
        .title(" Summary statistics ")
        .title_style(theme::panel_title(app.report.is_some()));

    let Some(report) = &app.report else {
        let hint = Paragraph::new(Line::from(Span::styled(
            "Mean, standard deviation, minimum and maximum per stock.",
            theme::muted(),
        )))
        .block(block);
        f.render_widget(hint, area);
        return;
    };

    let header = Row::new(vec![
        Cell::from("Statistic").style(theme::accent_bold()),
        Cell::from(report.first.to_string()).style(theme::series(Leg::First)),
        Cell::from(report.second.to_string()).style(theme::series(Leg::Second)),
    ]);

    let rows = stat_rows(&report.first_summary)
        .into_iter()
        .zip(stat_rows(&report.second_summary))
        .map(|((label, a), (_, b))| {
            Row::new(vec![
                Cell::from(label).style(theme::muted()),
                Cell::from(format!("{a:.2}")),
                Cell::from(format!("{b:.2}")),
            ])
        });

    let table = Table::new(
        rows,
        [
            Constraint::Length(20),
            Constraint::Length(14),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(block);

    f.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use crate::ui::tests::{app_with_report, render_to_string};

    #[test]
    fn table_uses_the_analysed_tickers() {
        let app = app_with_report();
        let report = app.report.as_ref().unwrap();
        let screen = render_to_string(&app, 120, 40);
        assert!(screen.contains("Statistic"));
        assert!(screen.contains("Minimum"));
        assert!(screen.contains(&format!("{:.2}", report.first_summary.mean)));
        assert!(screen.contains(&format!("{:.2}", report.second_summary.max)));
    }
}
