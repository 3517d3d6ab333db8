//! Formatters for devices and catalog sections.

use std::fmt::Write;

use ratatui::text::{Line, Span};
use simdeck_core::catalog::{DeviceGroup, DeviceRecord, GroupedCatalog};

use crate::ui::theme::Theme;

/// Format a section header for an OS group.
///
/// Format: `iOS (3)`
pub fn format_section(group: &DeviceGroup) -> Line<'static> {
    Line::from(vec![
        Span::styled(group.os_name.clone(), Theme::section()),
        Span::styled(format!(" ({})", group.devices.len()), Theme::muted()),
    ])
}

/// Format a DeviceRecord as a styled Line.
///
/// Format: `  Name (Version) State UDID`
pub fn format_device(dev: &DeviceRecord) -> Line<'static> {
    let state_style = if dev.is_booted() {
        Theme::device_booted()
    } else {
        Theme::device_shutdown()
    };

    Line::from(vec![
        Span::raw("  "),
        Span::styled(dev.name.clone(), Theme::device_name()),
        Span::styled(format!(" ({})", dev.os.version), Theme::device_version()),
        Span::raw(" "),
        Span::styled(dev.state.clone(), state_style),
        Span::raw(" "),
        Span::styled(dev.udid.clone(), Theme::device_udid()),
    ])
}

/// Plain-text listing used by `simdeck list`.
///
/// ```text
/// iOS
///   iPhone 15 Pro (17.0) [Booted] A1B2C3D4-...
/// ```
pub fn catalog_text(catalog: &GroupedCatalog) -> String {
    let mut out = String::new();
    for group in catalog.groups() {
        let _ = writeln!(out, "{}", group.os_name);
        for dev in &group.devices {
            let _ = writeln!(out, "  {} [{}] {}", dev.title(), dev.state, dev.udid);
        }
    }
    out
}
