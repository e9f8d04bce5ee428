//! Left column with the pickers, the date range and the Analyze action.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use pairlab_core::stats::Leg;

use crate::app::{AppState, Field};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(" Pair ")
        .title_style(theme::panel_title(true));

    let mut lines = vec![Line::from(Span::styled("Pick your stocks", theme::accent_bold()))];
    lines.push(field_line(app, Field::First, &app.catalog.label_for(&app.first), theme::series(Leg::First)));
    lines.push(field_line(app, Field::Second, &app.catalog.label_for(&app.second), theme::series(Leg::Second)));
    if app.allow_custom {
        lines.push(Line::from(Span::styled("  e: type any ticker", theme::muted())));
    }
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("When shall we look?", theme::accent_bold())));
    lines.push(field_line(app, Field::Start, &app.start.to_string(), theme::text()));
    lines.push(field_line(app, Field::End, &app.end.to_string(), theme::text()));
    lines.push(Line::from(""));

    let action = if app.in_flight { "  [ Analyzing... ]" } else { "  [ Analyze ]" };
    let action_style = if app.focus == Field::Analyze {
        theme::selected()
    } else {
        theme::accent()
    };
    lines.push(Line::from(Span::styled(action, action_style)));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn field_line<'a>(app: &AppState, field: Field, value: &str, value_style: Style) -> Line<'a> {
    let focused = app.focus == field;
    let marker = if focused { "> " } else { "  " };
    let label_style = if focused { theme::selected() } else { theme::muted() };
    Line::from(vec![
        Span::styled(format!("{marker}{:<12}", field.label()), label_style),
        Span::styled(format!(" {value}"), value_style),
    ])
}
