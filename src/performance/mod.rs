//! # Frame Timing
//!
//! Measures the time between idle ticks and derives a frame rate averaged
//! over a sliding window of recent frames.
//!
//! ```rust
//! use wiremesh::performance::FrameTimer;
//!
//! let mut timer = FrameTimer::new();
//!
//! // In the idle callback
//! let elapsed = timer.measure();
//! // ... move the camera by `elapsed`, draw the frame ...
//! let label = timer.fps_text();
//! timer.update_frame_count();
//! # let _ = (elapsed, label);
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Frames averaged into the reported rate.
pub const DEFAULT_WINDOW: usize = 30;

pub struct FrameTimer {
    frame_times: VecDeque<Duration>,
    max_samples: usize,
    last_tick: Option<Instant>,
    frame_count: u64,
    fps: f32,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::with_window(DEFAULT_WINDOW)
    }

    pub fn with_window(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples,
            last_tick: None,
            frame_count: 0,
            fps: 0.0,
        }
    }

    /// Seconds since the previous call, 0 on the first call.
    pub fn measure(&mut self) -> f32 {
        self.measure_at(Instant::now())
    }

    pub fn measure_at(&mut self, now: Instant) -> f32 {
        let Some(last) = self.last_tick.replace(now) else {
            return 0.0;
        };
        let elapsed = now.saturating_duration_since(last);

        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(elapsed);
        elapsed.as_secs_f32()
    }

    /// Closes the current frame and refreshes the averaged rate.
    pub fn update_frame_count(&mut self) {
        self.frame_count += 1;
        if self.frame_times.is_empty() {
            return;
        }

        let total: Duration = self.frame_times.iter().sum();
        let seconds = total.as_secs_f32();
        self.fps = if seconds > 0.0 {
            self.frame_times.len() as f32 / seconds
        } else {
            0.0
        };
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn fps_text(&self) -> String {
        format!("fps: {:.1}", self.fps)
    }

    /// Forgets the previous tick so the next measurement starts over.
    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.last_tick = None;
        self.fps = 0.0;
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_measure_is_zero() {
        let mut timer = FrameTimer::new();
        assert_eq!(timer.measure_at(Instant::now()), 0.0);
    }

    #[test]
    fn averages_over_the_window() {
        let mut timer = FrameTimer::with_window(4);
        let start = Instant::now();
        timer.measure_at(start);
        for i in 1..=10 {
            let elapsed = timer.measure_at(start + Duration::from_millis(20 * i));
            assert!((elapsed - 0.02).abs() < 1e-4);
            timer.update_frame_count();
        }
        assert!((timer.fps() - 50.0).abs() < 0.1);
        assert_eq!(timer.frame_count(), 10);
        assert_eq!(timer.fps_text(), "fps: 50.0");
    }

    #[test]
    fn reset_starts_a_new_measurement() {
        let mut timer = FrameTimer::new();
        let start = Instant::now();
        timer.measure_at(start);
        timer.measure_at(start + Duration::from_millis(10));
        timer.update_frame_count();
        timer.reset();
        assert_eq!(timer.fps(), 0.0);
        assert_eq!(timer.measure_at(start + Duration::from_secs(5)), 0.0);
        assert_eq!(timer.frame_count(), 1);
    }

    #[test]
    fn old_frames_leave_the_window() {
        let mut timer = FrameTimer::with_window(2);
        let start = Instant::now();
        timer.measure_at(start);
        timer.measure_at(start + Duration::from_millis(500));
        timer.measure_at(start + Duration::from_millis(510));
        timer.measure_at(start + Duration::from_millis(520));
        timer.update_frame_count();
        assert!((timer.fps() - 100.0).abs() < 0.5);
    }
}
