//! Application state and event handling.
//!
//! The app is a small stack of two views: the top-level menu and the catalog.
//! Key presses and background completions mutate state here and return an
//! [`Effect`] for the event loop to carry out, so nothing in this module
//! touches the terminal, the clipboard, or simctl directly.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use simdeck_core::boot::BootResult;
use simdeck_core::catalog::{CatalogError, DeviceRecord, GroupedCatalog};
use tracing::{debug, info, warn};

/// Title of the single menu entry.
pub const MENU_ENTRY: &str = "Simulators";

/// Messages delivered to the event loop by background tasks.
#[derive(Debug)]
pub enum AppEvent {
    /// A catalog load finished. `load_id` identifies which activation asked.
    CatalogLoaded {
        load_id: u64,
        result: Result<GroupedCatalog, CatalogError>,
    },
    BootFinished(BootResult),
    /// Revealing a data path in the file manager failed.
    RevealFailed(String),
}

/// Side effects requested by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start loading the catalog for activation `load_id`.
    LoadCatalog { load_id: u64 },
    /// Abandon the in-flight load.
    CancelLoad,
    CopyUdid(String),
    Boot(String),
    Reveal(PathBuf),
}

/// Load state of the catalog view. Moves one way, from `Loading`.
#[derive(Debug)]
pub enum CatalogState {
    Loading,
    Populated(GroupedCatalog),
    Failed(String),
}

#[derive(Debug)]
pub struct CatalogView {
    pub load_id: u64,
    pub state: CatalogState,
    /// Flat index of the selected device.
    pub selected: usize,
}

impl CatalogView {
    pub fn catalog(&self) -> Option<&GroupedCatalog> {
        match &self.state {
            CatalogState::Populated(catalog) => Some(catalog),
            _ => None,
        }
    }

    pub fn selected_device(&self) -> Option<&DeviceRecord> {
        self.catalog().and_then(|c| c.get(self.selected))
    }

    /// Row of the selected device once section headers are interleaved.
    pub fn selected_row(&self) -> Option<usize> {
        let catalog = self.catalog()?;
        let mut remaining = self.selected;
        let mut row = 0;
        for group in catalog.groups() {
            row += 1;
            if remaining < group.devices.len() {
                return Some(row + remaining);
            }
            remaining -= group.devices.len();
            row += group.devices.len();
        }
        None
    }

    fn move_selection(&mut self, delta: isize) {
        let Some(len) = self.catalog().map(|c| c.len_devices()) else {
            return;
        };
        if len == 0 {
            return;
        }
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, len as isize - 1) as usize;
    }
}

#[derive(Debug)]
pub enum View {
    Menu,
    Catalog(CatalogView),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

/// A transient notification.
#[derive(Debug, Clone)]
pub struct Toast {
    pub text: String,
    pub kind: ToastKind,
    pub expires_at: Instant,
}

/// Application state.
pub struct App {
    pub view: View,
    pub toast: Option<Toast>,
    pub toast_duration: Duration,
    /// Animation counter for the loading indicator.
    pub tick: u64,
    pub should_quit: bool,
    next_load_id: u64,
}

impl App {
    pub fn new(toast_duration: Duration) -> Self {
        Self {
            view: View::Menu,
            toast: None,
            toast_duration,
            tick: 0,
            should_quit: false,
            next_load_id: 0,
        }
    }

    /// Push the catalog view in its loading state.
    pub fn open_catalog(&mut self) -> Effect {
        self.next_load_id += 1;
        let load_id = self.next_load_id;
        debug!(load_id, "opening catalog view");
        self.view = View::Catalog(CatalogView {
            load_id,
            state: CatalogState::Loading,
            selected: 0,
        });
        Effect::LoadCatalog { load_id }
    }

    /// Pop back to the menu.
    pub fn close_catalog(&mut self) -> Option<Effect> {
        let was_loading = matches!(
            &self.view,
            View::Catalog(CatalogView { state: CatalogState::Loading, .. })
        );
        self.view = View::Menu;
        was_loading.then_some(Effect::CancelLoad)
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Option<Effect> {
        match &mut self.view {
            View::Menu => match code {
                KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => Some(self.open_catalog()),
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                    None
                }
                _ => None,
            },
            View::Catalog(view) => match code {
                KeyCode::Up | KeyCode::Char('k') => {
                    view.move_selection(-1);
                    None
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    view.move_selection(1);
                    None
                }
                KeyCode::Home | KeyCode::Char('g') => {
                    view.move_selection(isize::MIN / 2);
                    None
                }
                KeyCode::End | KeyCode::Char('G') => {
                    view.move_selection(isize::MAX / 2);
                    None
                }
                KeyCode::Char('c') => view.selected_device().map(|d| Effect::CopyUdid(d.udid.clone())),
                KeyCode::Char('b') | KeyCode::Enter => {
                    view.selected_device().map(|d| Effect::Boot(d.udid.clone()))
                }
                KeyCode::Char('o') => view.selected_device().map(|d| Effect::Reveal(d.data_path.clone())),
                KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => self.close_catalog(),
                KeyCode::Char('q') => {
                    let effect = self.close_catalog();
                    self.should_quit = true;
                    effect
                }
                _ => None,
            },
        }
    }

    /// Apply a background completion.
    pub fn handle_event(&mut self, event: AppEvent, now: Instant) {
        match event {
            AppEvent::CatalogLoaded { load_id, result } => {
                let View::Catalog(view) = &mut self.view else {
                    debug!(load_id, "catalog view closed, dropping load result");
                    return;
                };
                if view.load_id != load_id || !matches!(view.state, CatalogState::Loading) {
                    debug!(load_id, current = view.load_id, "stale load result dropped");
                    return;
                }
                view.state = match result {
                    Ok(catalog) => {
                        info!(devices = catalog.len_devices(), "catalog view populated");
                        CatalogState::Populated(catalog)
                    }
                    Err(e) => {
                        warn!(error = %e, "catalog load failed");
                        CatalogState::Failed(e.to_string())
                    }
                };
                view.selected = 0;
            }
            AppEvent::BootFinished(result) => {
                let kind = if result.is_success() { ToastKind::Success } else { ToastKind::Error };
                self.notify(result.notification().to_string(), kind, now);
            }
            AppEvent::RevealFailed(message) => self.notify(message, ToastKind::Error, now),
        }
    }

    /// Show a transient notification, replacing any current one.
    pub fn notify(&mut self, text: impl Into<String>, kind: ToastKind, now: Instant) {
        self.toast = Some(Toast {
            text: text.into(),
            kind,
            expires_at: now + self.toast_duration,
        });
    }

    /// Advance animations and expire notifications. Returns whether anything
    /// visible changed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if self.toast.as_ref().is_some_and(|t| now >= t.expires_at) {
            self.toast = None;
            changed = true;
        }
        if matches!(&self.view, View::Catalog(CatalogView { state: CatalogState::Loading, .. })) {
            self.tick = self.tick.wrapping_add(1);
            changed = true;
        }
        changed
    }
}
