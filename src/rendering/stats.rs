use std::collections::VecDeque;

const WINDOW: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceMetrics {
    pub avg_frame_time_ms: f32,
    pub min_frame_time_ms: f32,
    pub max_frame_time_ms: f32,
    pub avg_fps: f32,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            avg_frame_time_ms: 16.67, // 60 FPS
            min_frame_time_ms: 16.67,
            max_frame_time_ms: 16.67,
            avg_fps: 60.0,
        }
    }
}

/// Rolling frame-time window behind the on-screen FPS counter.
#[derive(Debug, Default)]
pub struct FrameStats {
    frame_times: VecDeque<f32>,
    frames: u64,
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(WINDOW),
            frames: 0,
        }
    }

    pub fn record_frame(&mut self, delta_seconds: f32) {
        self.frames += 1;
        if delta_seconds <= 0.0 {
            return;
        }
        self.frame_times.push_back(delta_seconds);
        if self.frame_times.len() > WINDOW {
            self.frame_times.pop_front();
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn metrics(&self) -> PerformanceMetrics {
        if self.frame_times.is_empty() {
            return PerformanceMetrics::default();
        }

        let total: f32 = self.frame_times.iter().sum();
        let avg = total / self.frame_times.len() as f32;
        let min = self.frame_times.iter().copied().fold(f32::INFINITY, f32::min);
        let max = self.frame_times.iter().copied().fold(0.0, f32::max);

        PerformanceMetrics {
            avg_frame_time_ms: avg * 1000.0,
            min_frame_time_ms: min * 1000.0,
            max_frame_time_ms: max * 1000.0,
            avg_fps: 1.0 / avg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_keeps_last_sixty_frames() {
        let mut stats = FrameStats::new();
        for _ in 0..10 {
            stats.record_frame(0.1);
        }
        for _ in 0..WINDOW {
            stats.record_frame(0.02);
        }
        let metrics = stats.metrics();
        assert!((metrics.avg_frame_time_ms - 20.0).abs() < 1e-3);
        assert!((metrics.avg_fps - 50.0).abs() < 1e-2);
        assert_eq!(stats.frames(), 70);
    }

    #[test]
    fn zero_delta_counts_but_is_not_averaged() {
        let mut stats = FrameStats::new();
        stats.record_frame(0.0);
        assert_eq!(stats.frames(), 1);
        assert_eq!(stats.metrics(), PerformanceMetrics::default());
    }
}
