//! Simulation clock: owns physical time and the iteration counter.

use crate::types::{IterationStep, PhysicalTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    pub physical_time: PhysicalTime,
    pub iteration:     IterationStep,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one step of size `dt`. Returns the new iteration number.
    /// Panics on a negative or non-finite step; callers must check.
    pub fn advance(&mut self, dt: PhysicalTime) -> IterationStep {
        assert!(dt.is_finite() && dt >= 0.0, "advance() called with dt = {dt}");
        self.physical_time += dt;
        self.iteration += 1;
        self.iteration
    }

    /// Jump to a restored checkpoint.
    pub fn restore(&mut self, iteration: IterationStep, physical_time: PhysicalTime) {
        self.iteration = iteration;
        self.physical_time = physical_time;
    }
}
