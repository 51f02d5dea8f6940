use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    app.status = None;

    if app.detail_visible() {
        handle_detail_key(app, key);
    } else {
        handle_page_key(app, key);
    }
}

fn handle_page_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.previous(),
        KeyCode::Char('g') | KeyCode::Home => app.first(),
        KeyCode::Char('G') | KeyCode::End => app.last(),

        KeyCode::Enter => app.open_selected(),
        KeyCode::Char(' ') => app.toggle_selected(),

        KeyCode::Char('l') => app.toggle_language(),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('r') => app.reload(),
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_detail(),

        KeyCode::Char('j') | KeyCode::Down => app.scroll_detail_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_detail_up(1),
        KeyCode::PageDown | KeyCode::Char('d') => app.scroll_detail_down(10),
        KeyCode::PageUp | KeyCode::Char('u') => app.scroll_detail_up(10),
        KeyCode::Char('g') | KeyCode::Home => app.detail_scroll = 0,

        // Language applies to the open text as well
        KeyCode::Char('l') => app.toggle_language(),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('o') => app.open_fallback(),
        _ => {}
    }
}
