//! Utility helpers including the generational arena, logging, and math extensions.

pub mod allocator;
pub mod logging;
pub mod math;

pub use allocator::{Arena, EntityId, GenerationalId};
pub use math::*;
