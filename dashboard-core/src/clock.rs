//! Live local-time display for the location on screen.
//!
//! Only one clock may write the time display. [`ClockService::start`] claims
//! the display for the new clock, and cancelling or dropping a
//! [`ClockHandle`] releases it and aborts the ticking task.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};
use tokio::task::JoinHandle;

use crate::view::Screen;

const TICK: Duration = Duration::from_secs(1);

/// Parse an IANA id, falling back to UTC for ids chrono-tz doesn't know.
pub fn resolve_timezone(timezone: &str) -> Tz {
    timezone.parse::<Tz>().unwrap_or_else(|_| {
        tracing::warn!("Unknown timezone '{}', showing UTC instead", timezone);
        Tz::UTC
    })
}

/// en-US 12-hour wall clock, e.g. "09:05:03 PM".
pub fn format_time(now: DateTime<Utc>, tz: Tz) -> String {
    now.with_timezone(&tz).format("%I:%M:%S %p").to_string()
}

#[derive(Debug)]
pub struct ClockService {
    screen: Screen,
    next_id: AtomicU64,
}

impl ClockService {
    pub fn new(screen: Screen) -> Self {
        Self { screen, next_id: AtomicU64::new(1) }
    }

    /// Render the time in `timezone` now, then once per second until cancelled.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, timezone: &str) -> ClockHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let tz = resolve_timezone(timezone);

        self.screen.claim_clock(id, format_time(Utc::now(), tz));

        let screen = self.screen.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(TICK);
            // The first tick completes immediately and the initial render already happened.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if !screen.write_clock(id, format_time(Utc::now(), tz)) {
                    break;
                }
            }
        });

        ClockHandle {
            id,
            timezone: timezone.to_string(),
            screen: self.screen.clone(),
            task,
        }
    }

    pub fn cancel(&self, handle: ClockHandle) {
        handle.cancel();
    }
}

/// A running clock. Dropping it stops the clock.
#[derive(Debug)]
pub struct ClockHandle {
    id: u64,
    timezone: String,
    screen: Screen,
    task: JoinHandle<()>,
}

impl ClockHandle {
    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    pub fn cancel(self) {
        // Drop does the work.
    }

    fn stop(&self) {
        self.screen.release_clock(self.id);
        self.task.abort();
    }
}

impl Drop for ClockHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
