//! Key dispatch. An open overlay gets the key first, then global keys, then
//! the focused sidebar row.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Field, Overlay};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match &app.overlay {
        Overlay::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.overlay = Overlay::None;
            }
            return;
        }
        Overlay::Edit { .. } => {
            handle_edit_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
            return;
        }
        KeyCode::Char('?') => {
            app.overlay = Overlay::Help;
            return;
        }
        KeyCode::Char('a') => {
            app.request_analysis();
            return;
        }
        KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => {
            app.focus = app.focus.next();
            return;
        }
        KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => {
            app.focus = app.focus.prev();
            return;
        }
        _ => {}
    }

    // 3. Focused-field keys.
    let field = app.focus;
    match (field, key.code) {
        (Field::Analyze, KeyCode::Enter) => app.request_analysis(),
        (_, KeyCode::Enter) => app.focus = field.next(),
        (_, KeyCode::Char('e')) => app.begin_edit(field),

        (f, KeyCode::Char('h') | KeyCode::Left) if f.is_ticker() => app.cycle_ticker(f, false),
        (f, KeyCode::Char('l') | KeyCode::Right) if f.is_ticker() => app.cycle_ticker(f, true),

        (f, KeyCode::Char('h') | KeyCode::Left) if f.is_date() => app.shift_days(f, -1),
        (f, KeyCode::Char('l') | KeyCode::Right) if f.is_date() => app.shift_days(f, 1),
        (f, KeyCode::Char('H')) if f.is_date() => app.shift_months(f, -1),
        (f, KeyCode::Char('L')) if f.is_date() => app.shift_months(f, 1),
        _ => {}
    }
}

fn handle_edit_overlay(app: &mut AppState, key: KeyEvent) {
    let Overlay::Edit { field, buffer } = &mut app.overlay else {
        return;
    };
    match key.code {
        KeyCode::Esc => app.overlay = Overlay::None,
        KeyCode::Backspace => {
            buffer.pop();
        }
        KeyCode::Char(c) => buffer.push(c),
        KeyCode::Enter => {
            let (field, text) = (*field, std::mem::take(buffer));
            app.overlay = Overlay::None;
            match app.commit_edit(field, &text) {
                Ok(()) => app.set_status(format!("{} set", field.label())),
                Err(e) => app.set_error(e),
            }
        }
        _ => {}
    }
}
