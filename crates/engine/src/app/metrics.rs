use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::warn;

#[derive(Debug, Clone, Copy, Default)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub tps: f32,
    pub frame_time_ms: f32,
}

/// Shared read handle for the loop's published metrics. A poisoned lock is
/// recovered rather than propagated; metrics are advisory.
#[derive(Clone, Debug, Default)]
pub struct MetricsHandle {
    shared: Arc<RwLock<LoopMetricsSnapshot>>,
}

impl MetricsHandle {
    pub fn snapshot(&self) -> LoopMetricsSnapshot {
        *self
            .shared
            .read()
            .unwrap_or_else(|poisoned| recover("read", poisoned))
    }

    pub(crate) fn publish(&self, snapshot: LoopMetricsSnapshot) {
        *self
            .shared
            .write()
            .unwrap_or_else(|poisoned| recover("write", poisoned)) = snapshot;
    }
}

fn recover<G>(operation: &'static str, poisoned: PoisonError<G>) -> G {
    warn!(operation, "metrics lock poisoned; recovered inner value");
    poisoned.into_inner()
}

/// Counts frames and sim ticks over a logging window and turns them into a
/// snapshot when the window elapses.
#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    window_start: Instant,
    window: Duration,
    frames: u32,
    ticks: u32,
    frame_time_total: Duration,
}

impl MetricsAccumulator {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            window_start: Instant::now(),
            window,
            frames: 0,
            ticks: 0,
            frame_time_total: Duration::ZERO,
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration) {
        self.frames = self.frames.saturating_add(1);
        self.frame_time_total = self.frame_time_total.saturating_add(frame_dt);
    }

    pub(crate) fn record_tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    pub(crate) fn flush(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.window {
            return None;
        }

        let elapsed_seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = if self.frames == 0 {
            0.0
        } else {
            self.frame_time_total.as_secs_f32() * 1000.0 / self.frames as f32
        };
        let snapshot = LoopMetricsSnapshot {
            fps: self.frames as f32 / elapsed_seconds,
            tps: self.ticks as f32 / elapsed_seconds,
            frame_time_ms,
        };

        self.window_start = now;
        self.frames = 0;
        self.ticks = 0;
        self.frame_time_total = Duration::ZERO;
        Some(snapshot)
    }
}
