//! Force and torque bookkeeping shared by every backend.

pub mod accumulator;

pub use accumulator::ForceAccumulator;
