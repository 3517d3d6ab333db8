//! UI rendering for the simulator browser.

pub mod theme;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, CatalogState, CatalogView, View, MENU_ENTRY};
use crate::format::{format_device, format_section};
use crate::ui::theme::Theme;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Render the main UI.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(3),    // Body
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_title(frame, app, chunks[0]);
    match &app.view {
        View::Menu => render_menu(frame, chunks[1]),
        View::Catalog(view) => render_catalog(frame, app, view, chunks[1]),
    }
    render_footer(frame, app, chunks[2]);
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let location = match &app.view {
        View::Menu => String::new(),
        View::Catalog(_) => format!("> {} ", MENU_ENTRY),
    };

    let title = Line::from(vec![
        Span::styled(" simdeck ", Theme::title().add_modifier(Modifier::BOLD)),
        Span::styled(location, Theme::muted()),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::title());
    frame.render_widget(Paragraph::new(title).block(block), area);
}

fn render_menu(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::muted());

    let items = vec![ListItem::new(Line::from(vec![
        Span::raw("  "),
        Span::styled(MENU_ENTRY, Theme::device_name()),
    ]))];
    let list = List::new(items).block(block).highlight_style(Theme::selected());

    let mut state = ListState::default().with_selected(Some(0));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_catalog(frame: &mut Frame, app: &App, view: &CatalogView, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", MENU_ENTRY))
        .borders(Borders::ALL)
        .border_style(Theme::muted());

    match &view.state {
        CatalogState::Loading => {
            let spinner = SPINNER[(app.tick as usize) % SPINNER.len()];
            let text = Line::from(vec![
                Span::styled(format!("{} ", spinner), Theme::title()),
                Span::styled("Loading simulators...", Theme::muted()),
            ]);
            frame.render_widget(Paragraph::new(text).block(block), area);
        }
        CatalogState::Failed(message) => {
            let text = vec![
                Line::from(Span::styled("Failed to load simulators", Theme::error().add_modifier(Modifier::BOLD))),
                Line::from(Span::styled(message.clone(), Theme::error())),
            ];
            frame.render_widget(Paragraph::new(text).block(block), area);
        }
        CatalogState::Populated(catalog) if catalog.is_empty() => {
            let text = Line::from(Span::styled("No simulators available", Theme::muted()));
            frame.render_widget(Paragraph::new(text).block(block), area);
        }
        CatalogState::Populated(catalog) => {
            let mut items = Vec::with_capacity(catalog.len_devices() + catalog.groups().len());
            for group in catalog.groups() {
                items.push(ListItem::new(format_section(group)));
                items.extend(group.devices.iter().map(|d| ListItem::new(format_device(d))));
            }

            let list = List::new(items).block(block).highlight_style(Theme::selected());
            let mut state = ListState::default().with_selected(view.selected_row());
            frame.render_stateful_widget(list, area, &mut state);
        }
    }
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(toast) = &app.toast {
        Line::from(Span::styled(format!(" {}", toast.text), Theme::toast(toast.kind)))
    } else {
        let hints = match &app.view {
            View::Menu => " enter=open  q=quit",
            View::Catalog(_) => " j/k=move  c=copy UDID  b=boot  o=reveal data  esc=back  q=quit",
        };
        Line::from(Span::styled(hints, Theme::muted()))
    };
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppEvent;
    use crossterm::event::KeyCode;
    use ratatui::{backend::TestBackend, Terminal};
    use simdeck_core::catalog;
    use std::time::{Duration, Instant};

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn opened(json: &[u8]) -> App {
        let mut app = App::new(Duration::from_secs(2));
        app.handle_key(KeyCode::Enter);
        app.handle_event(
            AppEvent::CatalogLoaded { load_id: 1, result: catalog::from_json(json) },
            Instant::now(),
        );
        app
    }

    #[test]
    fn test_menu_screen() {
        let app = App::new(Duration::from_secs(2));
        let text = screen(&app);
        assert!(text.contains("simdeck"));
        assert!(text.contains("Simulators"));
        assert!(text.contains("enter=open"));
    }

    #[test]
    fn test_loading_screen() {
        let mut app = App::new(Duration::from_secs(2));
        app.handle_key(KeyCode::Enter);
        assert!(screen(&app).contains("Loading simulators"));
    }

    #[test]
    fn test_populated_screen_has_sections() {
        let app = opened(br#"{"devices": {
            "com.apple.CoreSimulator.SimRuntime.iOS-15-5": [
                {"udid": "AAA", "isAvailable": true, "state": "Shutdown", "name": "iPhone 8", "dataPath": "/a"}
            ],
            "com.apple.CoreSimulator.SimRuntime.iOS-16-2": [
                {"udid": "BBB", "isAvailable": true, "state": "Booted", "name": "iPhone 14", "dataPath": "/b"}
            ]
        }}"#);
        let text = screen(&app);
        assert!(text.contains("iOS (2)"));
        assert!(text.contains("iPhone 8 (15.5)"));
        assert!(text.contains("iPhone 14 (16.2)"));
    }

    #[test]
    fn test_empty_screen() {
        let text = screen(&opened(br#"{"devices": {}}"#));
        assert!(text.contains("No simulators available"));
        assert!(!text.contains("Failed"));
    }

    #[test]
    fn test_failed_screen() {
        let text = screen(&opened(b"xcrun: error"));
        assert!(text.contains("Failed to load simulators"));
    }

    #[test]
    fn test_toast_replaces_hints() {
        let mut app = App::new(Duration::from_secs(2));
        app.notify("Copied AAA", crate::app::ToastKind::Info, Instant::now());
        let text = screen(&app);
        assert!(text.contains("Copied AAA"));
        assert!(!text.contains("enter=open"));
    }
}
