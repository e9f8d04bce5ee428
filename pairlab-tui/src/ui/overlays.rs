//! Popups drawn over the dashboard: key help and the one-line editor.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{AppState, Field};
use crate::theme;
use crate::ui::centered_rect;

pub fn render_help(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(60, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Keys [Esc]close ")
        .title_style(theme::accent_bold());

    let key = |k: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {k:<10}"), theme::accent()),
            Span::styled(what, theme::muted()),
        ])
    };

    let mut text = vec![
        key("j/k Tab", "move between fields"),
        key("h/l", "previous / next ticker, or date -/+ 1 day"),
        key("H/L", "date -/+ 1 month"),
        key("e", "type a date (YYYY-MM-DD)"),
        key("a, Enter", "analyze the selected pair"),
        key("?", "toggle this help"),
        key("q", "quit"),
        Line::from(""),
    ];
    if app.allow_custom {
        text.insert(4, key("e", "type any ticker on a stock field"));
    } else {
        text.push(Line::from(Span::styled(
            "Custom tickers are disabled; set allow_custom_tickers = true in the config to enable them.",
            theme::neutral(),
        )));
    }

    f.render_widget(Paragraph::new(text).block(block).wrap(Wrap { trim: true }), popup);
}

pub fn render_edit(f: &mut Frame, area: Rect, field: Field, buffer: &str) {
    let popup = centered_rect(50, 20, area);
    f.render_widget(Clear, popup);

    let hint = if field.is_date() {
        "YYYY-MM-DD, Enter to apply, Esc to cancel"
    } else {
        "Ticker code, Enter to apply, Esc to cancel"
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(format!(" {} ", field.label()))
        .title_style(theme::accent_bold());

    let text = vec![
        Line::from(vec![
            Span::styled("> ", theme::accent()),
            Span::styled(buffer, theme::text()),
            Span::styled("_", theme::accent()),
        ]),
        Line::from(""),
        Line::from(Span::styled(hint, theme::muted())),
    ];

    f.render_widget(Paragraph::new(text).block(block), popup);
}
