//! One-line footer: key hints, then the latest status message.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::Frame;

use crate::app::{AppState, StatusLevel};
use crate::theme;

const HINTS: &str = " a:Analyze ?:Help q:Quit";

fn level_style(level: StatusLevel) -> Style {
    match level {
        StatusLevel::Info => theme::accent(),
        StatusLevel::Warning => theme::warning(),
        StatusLevel::Error => theme::negative(),
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut line = Line::from(vec![Span::styled(HINTS, theme::muted()), Span::raw(" | ")]);
    if let Some((message, level)) = &app.status_message {
        line.push_span(Span::styled(message.as_str(), level_style(*level)));
    }
    f.render_widget(line, area);
}
