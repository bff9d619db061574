//! Display state shared by every part of the dashboard.
//!
//! [`DashboardView`] holds what the user sees. [`Screen`] owns it behind a
//! single lock, tracks which request generation and which clock may write,
//! and pushes every change to a [`Renderer`].

use parking_lot::Mutex;
use std::{fmt::Debug, sync::Arc};

use crate::map::MapState;

const PLACEHOLDER: &str = "--";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Resolving,
    Ready,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub phase: Phase,
    pub location: String,
    /// True once `location` holds a resolved name for the current request.
    pub location_resolved: bool,
    pub date: String,
    pub temperature: String,
    pub condition: String,
    pub icon: String,
    pub wind: String,
    pub elevation: String,
    pub local_time: String,
    pub day_night_icon: String,
    pub day_night_title: String,
    /// Persistent banner; `None` means hidden.
    pub error_banner: Option<String>,
    /// Transient notice, cleared by the next search or on dismissal.
    pub notice: Option<String>,
    /// URL of the image currently shown behind the dashboard.
    pub background: Option<String>,
    pub map: Option<MapState>,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            location: PLACEHOLDER.into(),
            location_resolved: false,
            date: String::new(),
            temperature: PLACEHOLDER.into(),
            condition: PLACEHOLDER.into(),
            icon: String::new(),
            wind: PLACEHOLDER.into(),
            elevation: PLACEHOLDER.into(),
            local_time: PLACEHOLDER.into(),
            day_night_icon: String::new(),
            day_night_title: String::new(),
            error_banner: None,
            notice: None,
            background: None,
            map: None,
        }
    }
}

/// Receives the full view after every change.
///
/// Called with the screen lock held, so implementations must not call back
/// into the [`Screen`].
pub trait Renderer: Send + Sync + Debug {
    fn render(&self, view: &DashboardView);
}

/// Renderer that draws nothing; for one-shot use and tests.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&self, _view: &DashboardView) {}
}

/// Identifies the request that resolved the coordinates currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

#[derive(Debug, Default)]
struct ScreenState {
    view: DashboardView,
    generation: u64,
    clock_owner: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Screen {
    state: Arc<Mutex<ScreenState>>,
    renderer: Arc<dyn Renderer>,
}

impl Screen {
    pub fn new(renderer: Arc<dyn Renderer>) -> Self {
        Self { state: Arc::new(Mutex::new(ScreenState::default())), renderer }
    }

    pub fn headless() -> Self {
        Self::new(Arc::new(NullRenderer))
    }

    pub fn snapshot(&self) -> DashboardView {
        self.state.lock().view.clone()
    }

    pub fn update(&self, f: impl FnOnce(&mut DashboardView)) {
        let mut state = self.state.lock();
        f(&mut state.view);
        self.renderer.render(&state.view);
    }

    /// Start a new request; completions tagged with older generations are dropped.
    pub fn begin_request(&self) -> Generation {
        let mut state = self.state.lock();
        state.generation += 1;
        state.view.location_resolved = false;
        Generation(state.generation)
    }

    pub fn current_generation(&self) -> Generation {
        Generation(self.state.lock().generation)
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.state.lock().generation == generation.0
    }

    /// Apply `f` only if no newer request has started. Returns whether it ran.
    pub fn update_if_current(
        &self,
        generation: Generation,
        f: impl FnOnce(&mut DashboardView),
    ) -> bool {
        let mut state = self.state.lock();
        if state.generation != generation.0 {
            return false;
        }
        f(&mut state.view);
        self.renderer.render(&state.view);
        true
    }

    /// Hand the time display to clock `id` and show its first reading.
    pub(crate) fn claim_clock(&self, id: u64, time: String) {
        let mut state = self.state.lock();
        state.clock_owner = Some(id);
        state.view.local_time = time;
        self.renderer.render(&state.view);
    }

    /// Write a tick from clock `id`; ignored unless it still owns the display.
    pub(crate) fn write_clock(&self, id: u64, time: String) -> bool {
        let mut state = self.state.lock();
        if state.clock_owner != Some(id) {
            return false;
        }
        state.view.local_time = time;
        self.renderer.render(&state.view);
        true
    }

    pub(crate) fn release_clock(&self, id: u64) {
        let mut state = self.state.lock();
        if state.clock_owner == Some(id) {
            state.clock_owner = None;
        }
    }

    #[cfg(test)]
    pub(crate) fn clock_owner(&self) -> Option<u64> {
        self.state.lock().clock_owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingRenderer(AtomicUsize);

    impl Renderer for CountingRenderer {
        fn render(&self, _view: &DashboardView) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn update_renders_once_per_change() {
        let renderer = Arc::new(CountingRenderer::default());
        let screen = Screen::new(renderer.clone());

        screen.update(|v| v.location = "Oslo".into());
        screen.update(|v| v.temperature = "3°".into());

        assert_eq!(renderer.0.load(Ordering::SeqCst), 2);
        assert_eq!(screen.snapshot().location, "Oslo");
    }

    #[test]
    fn stale_generation_is_ignored() {
        let screen = Screen::headless();
        let first = screen.begin_request();
        let second = screen.begin_request();

        assert!(!screen.update_if_current(first, |v| v.location = "Old".into()));
        assert!(screen.update_if_current(second, |v| v.location = "New".into()));
        assert_eq!(screen.snapshot().location, "New");
        assert!(!screen.is_current(first));
    }

    #[test]
    fn begin_request_clears_resolved_flag() {
        let screen = Screen::headless();
        let g = screen.begin_request();
        screen.update_if_current(g, |v| v.location_resolved = true);

        screen.begin_request();
        assert!(!screen.snapshot().location_resolved);
    }

    #[test]
    fn only_owning_clock_writes() {
        let screen = Screen::headless();
        screen.claim_clock(1, "01:00:00 AM".into());
        screen.claim_clock(2, "02:00:00 AM".into());

        assert!(!screen.write_clock(1, "stale".into()));
        assert!(screen.write_clock(2, "02:00:01 AM".into()));
        assert_eq!(screen.snapshot().local_time, "02:00:01 AM");

        screen.release_clock(1);
        assert_eq!(screen.clock_owner(), Some(2));
        screen.release_clock(2);
        assert!(!screen.write_clock(2, "late".into()));
    }
}
