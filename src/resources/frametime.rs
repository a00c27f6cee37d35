/// Timing of the frame being processed.
///
/// `delta` is the scaled step every hook should use; `raw_delta` ignores
/// `time_scale`. `elapsed` accumulates `delta` over the whole run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    pub elapsed: f32,
    pub delta: f32,
    pub raw_delta: f32,
    pub time_scale: f32,
    /// Frames drawn so far.
    pub frame_count: u64,
}

impl Default for FrameTime {
    fn default() -> Self {
        FrameTime {
            elapsed: 0.0,
            delta: 0.0,
            raw_delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl FrameTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// A single frame's timing with the given deltas.
    pub fn fixed(delta: f32, raw_delta: f32) -> Self {
        FrameTime {
            delta,
            raw_delta,
            ..Default::default()
        }
    }

    /// Apply `time_scale` to an unscaled delta.
    pub fn advance(&mut self, raw_delta: f32) {
        self.step(raw_delta * self.time_scale, raw_delta);
    }

    pub fn step(&mut self, delta: f32, raw_delta: f32) {
        self.delta = delta;
        self.raw_delta = raw_delta;
        self.elapsed += delta;
    }
}
