//! Shared primitive types used across the checkpoint layer.

/// A discrete simulation iteration counter.
pub type IterationStep = u64;

/// The simulation clock value, in simulation time units.
pub type PhysicalTime = f64;
