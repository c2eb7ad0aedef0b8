use crate::config::{MAX_FRAME_DT_MS, NOMINAL_FRAME_MS};

#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    /// Milliseconds since the previous tick: zero on the first tick, clamped so a
    /// backgrounded tab does not teleport everything on return.
    pub fn tick(&mut self, timestamp_ms: f64) -> f64 {
        let dt = match self.last {
            Some(last) => (timestamp_ms - last).clamp(0.0, MAX_FRAME_DT_MS),
            None => 0.0,
        };
        self.last = Some(timestamp_ms);
        dt
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Number of nominal 60 Hz frames covered by `dt_ms`.
#[inline]
pub fn frame_steps(dt_ms: f64) -> f64 {
    dt_ms / NOMINAL_FRAME_MS
}
