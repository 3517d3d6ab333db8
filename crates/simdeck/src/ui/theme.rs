//! Color theme for the TUI.

use ratatui::style::{Color, Modifier, Style};

use crate::app::ToastKind;

/// Theme colors for consistent styling across the UI.
pub struct Theme;

impl Theme {
    /// Title bar styling.
    pub fn title() -> Style {
        Style::default().fg(Color::Cyan)
    }

    /// Muted/secondary text (frames, borders, hints).
    pub fn muted() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    /// OS section headers.
    pub fn section() -> Style {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    }

    /// Device name styling.
    pub fn device_name() -> Style {
        Style::default().fg(Color::White)
    }

    /// OS version next to the device name.
    pub fn device_version() -> Style {
        Style::default().fg(Color::Cyan)
    }

    /// UDID styling.
    pub fn device_udid() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    /// Device state (Booted).
    pub fn device_booted() -> Style {
        Style::default().fg(Color::Green)
    }

    /// Device state (Shutdown).
    pub fn device_shutdown() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    /// Selected item highlight.
    pub fn selected() -> Style {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    }

    /// Error messages and failure indicators.
    pub fn error() -> Style {
        Style::default().fg(Color::Red)
    }

    pub fn toast(kind: ToastKind) -> Style {
        match kind {
            ToastKind::Info => Style::default().fg(Color::Cyan),
            ToastKind::Success => Style::default().fg(Color::Green),
            ToastKind::Error => Self::error(),
        }
    }
}
