//! Frame-rate meter with a short weighted history.

use std::time::{Duration, Instant};

/// Length of one counting window.
pub const WINDOW: Duration = Duration::from_secs(1);

/// Counts frames per one-second window and smooths over the last three windows.
///
/// The reported rate weights the windows 4:2:1, newest first.
#[derive(Debug, Clone)]
pub struct FpsMeter {
    window_start: Instant,
    frames_in_window: u32,
    history: [u32; 3],
}

impl FpsMeter {
    /// Start measuring from `now`.
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames_in_window: 0,
            history: [0; 3],
        }
    }

    /// Count one presented frame.
    ///
    /// Returns the new weighted rate whenever a window closes.
    pub fn frame(&mut self, now: Instant) -> Option<f32> {
        self.frames_in_window += 1;
        if now.duration_since(self.window_start) < WINDOW {
            return None;
        }

        self.history.rotate_left(1);
        self.history[2] = self.frames_in_window;
        self.frames_in_window = 0;
        self.window_start = now;
        Some(self.weighted())
    }

    /// Weighted average of the stored windows.
    pub fn weighted(&self) -> f32 {
        let [oldest, previous, latest] = self.history;
        (latest * 4 + previous * 2 + oldest) as f32 / 7.0
    }
}

/// Status line shown for a rate.
pub fn title(fps: f32) -> String {
    format!("Doku - FPS: {:.2}", fps)
}
