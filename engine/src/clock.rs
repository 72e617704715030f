use std::time::Duration;

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Frame timing derived from the length of the last loop iteration. Display
/// only: nothing is scheduled from these values.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    fps: f64,
    dt: f64,
}

impl SimulationClock {
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Seconds per frame, `1 / fps`.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn record(&mut self, elapsed: Duration) {
        // a sub-nanosecond iteration still counts as one tick
        let elapsed_ns = elapsed.as_nanos().max(1) as f64;
        self.fps = NANOS_PER_SECOND / elapsed_ns;
        self.dt = 1.0 / self.fps;
    }

    pub fn rounded_fps(&self) -> i64 {
        self.fps.round() as i64
    }
}
