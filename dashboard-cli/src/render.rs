use dashboard_core::{DashboardView, Phase, Renderer};
use std::{
    fmt::Write as _,
    io::{self, Write},
};

const CLEAR: &str = "\x1b[2J\x1b[H";
const RULE: &str = "------------------------------------------------------------";

/// Redraws the whole dashboard on every change.
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn render(&self, view: &DashboardView) {
        let mut out = io::stdout().lock();
        let drawn = write!(out, "{CLEAR}{}search> ", frame(view)).and_then(|()| out.flush());
        if let Err(e) = drawn {
            tracing::debug!("Failed to draw dashboard: {}", e);
        }
    }
}

/// The dashboard as plain text, one field per line.
pub fn frame(view: &DashboardView) -> String {
    let mut s = String::new();

    let _ = writeln!(s, "{}  |  {}", view.location, view.date);
    let _ = writeln!(s, "{RULE}");
    let _ = writeln!(s, "{} {}  {}", view.icon, view.temperature, view.condition);
    let _ = writeln!(s, "Wind: {}   Elevation: {}", view.wind, view.elevation);
    let _ = writeln!(
        s,
        "Local time: {} {} {}",
        view.local_time, view.day_night_icon, view.day_night_title
    );

    match &view.map {
        Some(map) => {
            let popup = if map.marker.popup_open { map.marker.popup.as_str() } else { "" };
            let _ = writeln!(s, "Map: {} @ z{}  [{}]", map.center, map.zoom, popup);
            let _ = writeln!(s, "     {}", map.center_tile_url());
            let _ = writeln!(s, "     {}", map.tile_layer.attribution);
        }
        None => {
            let _ = writeln!(s, "Map: --");
        }
    }

    if let Some(background) = &view.background {
        let _ = writeln!(s, "Background: {background}");
    }

    let _ = writeln!(s, "{RULE}");
    if let Some(banner) = &view.error_banner {
        let _ = writeln!(s, "[!] {banner}");
    }
    if let Some(notice) = &view.notice {
        let _ = writeln!(s, "(i) {notice}  (/dismiss to hide)");
    }
    if view.phase == Phase::Resolving {
        let _ = writeln!(s, "Loading...");
    }

    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_shows_banner_and_notice_only_when_set() {
        let mut view = DashboardView { location: "Oslo, Norway".into(), ..Default::default() };
        let plain = frame(&view);
        assert!(plain.starts_with("Oslo, Norway"));
        assert!(!plain.contains("[!]"));
        assert!(!plain.contains("(i)"));
        assert!(plain.contains("Map: --"));

        view.error_banner = Some("Weather data not available".into());
        view.notice = Some("Location not found".into());
        let flagged = frame(&view);
        assert!(flagged.contains("[!] Weather data not available"));
        assert!(flagged.contains("(i) Location not found"));
    }
}
