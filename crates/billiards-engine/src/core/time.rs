/// Length of the reference frame the integrator is tuned for (60 Hz).
pub const REFERENCE_FRAME_SECONDS: f32 = 1.0 / 60.0;

/// Largest frame multiplier handed to the integrator.
pub const MAX_FRAME_DELTA: f32 = 10.0;

/// Converts wall-clock frame time into the dimensionless per-frame
/// multiplier the ball integrator expects (1.0 = one reference frame).
pub struct FrameClock {
    /// Seconds in one reference frame.
    frame_seconds: f32,
    /// Multiplier produced by the last call to `delta`.
    last_delta: f32,
}

impl FrameClock {
    pub fn new(frame_seconds: f32) -> Self {
        Self {
            frame_seconds,
            last_delta: 0.0,
        }
    }

    /// Multiplier for a frame that took `elapsed_seconds`.
    /// Capped at [`MAX_FRAME_DELTA`] so a stalled tab does not fling balls
    /// through walls on resume.
    pub fn delta(&mut self, elapsed_seconds: f32) -> f32 {
        let delta = (elapsed_seconds / self.frame_seconds).clamp(0.0, MAX_FRAME_DELTA);
        self.last_delta = if delta.is_nan() { 0.0 } else { delta };
        self.last_delta
    }

    pub fn last_delta(&self) -> f32 {
        self.last_delta
    }

    pub fn frame_seconds(&self) -> f32 {
        self.frame_seconds
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(REFERENCE_FRAME_SECONDS)
    }
}
