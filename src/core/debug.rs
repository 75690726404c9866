//! Debug and statistics module

use std::collections::VecDeque;
use std::time::Duration;

use crate::renderer::DebugOverlay;

/// Rolling frame time statistics
#[derive(Debug)]
pub struct FrameStats {
    /// Frame time history for averaging
    frame_times: VecDeque<Duration>,
    /// Maximum samples to keep
    max_samples: usize,
    /// Average frame time in milliseconds
    avg_frame_time_ms: f32,
    /// Minimum frame time in milliseconds
    min_frame_time_ms: f32,
    /// Maximum frame time in milliseconds
    max_frame_time_ms: f32,
    /// Total frames recorded
    total_frames: u64,
}

impl FrameStats {
    /// Create a tracker averaging over the last `max_samples` frames
    pub fn new(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples,
            avg_frame_time_ms: 0.0,
            min_frame_time_ms: 0.0,
            max_frame_time_ms: 0.0,
            total_frames: 0,
        }
    }

    /// Record a frame with the given delta time
    pub fn record_frame(&mut self, delta: Duration) {
        self.total_frames += 1;

        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(delta);

        self.update_stats();
    }

    fn update_stats(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }

        let mut total = Duration::ZERO;
        let mut min = Duration::MAX;
        let mut max = Duration::ZERO;

        for &dt in &self.frame_times {
            total += dt;
            min = min.min(dt);
            max = max.max(dt);
        }

        let count = self.frame_times.len() as f32;
        self.avg_frame_time_ms = total.as_secs_f32() * 1000.0 / count;
        self.min_frame_time_ms = min.as_secs_f32() * 1000.0;
        self.max_frame_time_ms = max.as_secs_f32() * 1000.0;
    }

    /// Frames per second derived from the average frame time.
    ///
    /// The small bias keeps a zero average finite.
    pub fn fps(&self) -> f32 {
        (1000.0 / (self.avg_frame_time_ms + 0.001)).round()
    }

    /// Get average frame time in milliseconds
    pub fn avg_frame_time_ms(&self) -> f32 {
        self.avg_frame_time_ms
    }

    /// Get minimum frame time in milliseconds
    pub fn min_frame_time_ms(&self) -> f32 {
        self.min_frame_time_ms
    }

    /// Get maximum frame time in milliseconds
    pub fn max_frame_time_ms(&self) -> f32 {
        self.max_frame_time_ms
    }

    /// Get total frames recorded
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Number of samples currently averaged
    pub fn samples(&self) -> usize {
        self.frame_times.len()
    }

    /// Get a formatted stats string
    pub fn format_stats(&self) -> String {
        format!(
            "FPS: {} | Frame: {:.2}ms (min: {:.2}, max: {:.2})",
            self.fps(),
            self.avg_frame_time_ms,
            self.min_frame_time_ms,
            self.max_frame_time_ms
        )
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(10)
    }
}

/// Debug overlay state
#[derive(Debug, Default)]
pub struct DebugInfo {
    /// Whether the overlay is shown
    pub show: bool,
    /// Frame statistics
    pub frame_stats: FrameStats,
    /// Lines pushed by behaviours this frame
    custom_lines: Vec<String>,
}

impl DebugInfo {
    /// Create debug info averaging over `samples` frames
    pub fn new(show: bool, samples: usize) -> Self {
        Self {
            show,
            frame_stats: FrameStats::new(samples),
            custom_lines: Vec::new(),
        }
    }

    /// Toggle debug overlay
    pub fn toggle(&mut self) {
        self.show = !self.show;
        log::debug!("Debug overlay {}", if self.show { "shown" } else { "hidden" });
    }

    /// Add a line to this frame's overlay
    pub fn add_line(&mut self, line: impl Into<String>) {
        self.custom_lines.push(line.into());
    }

    /// Clear custom lines
    pub fn clear_lines(&mut self) {
        self.custom_lines.clear();
    }

    /// Lines added this frame
    pub fn custom_lines(&self) -> &[String] {
        &self.custom_lines
    }

    /// Record a frame
    pub fn record_frame(&mut self, delta: Duration) {
        self.frame_stats.record_frame(delta);
    }

    /// Build the overlay for this frame, or `None` while hidden
    pub fn overlay(&self, object_count: usize) -> Option<DebugOverlay> {
        if !self.show {
            return None;
        }
        let mut lines = vec![
            format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            self.frame_stats.format_stats(),
            format!("Objects: {object_count}"),
        ];
        lines.extend(self.custom_lines.iter().cloned());
        Some(DebugOverlay { lines })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_over_window() {
        let mut stats = FrameStats::new(2);
        stats.record_frame(Duration::from_millis(40));
        stats.record_frame(Duration::from_millis(10));
        stats.record_frame(Duration::from_millis(20));

        assert_eq!(stats.samples(), 2);
        assert_eq!(stats.total_frames(), 3);
        assert!((stats.avg_frame_time_ms() - 15.0).abs() < 1e-3);
        assert!((stats.min_frame_time_ms() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_fps_from_average() {
        let mut stats = FrameStats::new(10);
        assert_eq!(stats.fps(), 1_000_000.0);

        stats.record_frame(Duration::from_millis(16));
        assert_eq!(stats.fps(), 62.0);
    }

    #[test]
    fn test_overlay_only_when_shown() {
        let mut debug = DebugInfo::new(false, 10);
        debug.add_line("hello");
        assert!(debug.overlay(3).is_none());

        debug.toggle();
        let overlay = debug.overlay(3).unwrap();
        assert!(overlay.lines[0].starts_with("vixeria"));
        assert!(overlay.lines.contains(&"Objects: 3".to_string()));
        assert_eq!(overlay.lines.last().map(String::as_str), Some("hello"));
    }
}
