use std::time::Instant;

pub struct Telemetry {
    start: Instant,
}

impl Telemetry {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new()
    }
}
