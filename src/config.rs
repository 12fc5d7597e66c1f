//! Global configuration constants for the rigid link layer.

/// Default gravity vector used by the reference backend (Y-up).
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, -9.81, 0.0];

/// Default integration timestep (in seconds).
pub const DEFAULT_TIME_STEP: f32 = 1.0 / 60.0;

/// Default damping applied to linear velocity.
pub const DEFAULT_LINEAR_DAMPING: f32 = 0.0;

/// Default damping applied to angular velocity.
pub const DEFAULT_ANGULAR_DAMPING: f32 = 0.0;

/// Density used for collisions that declare neither mass nor density.
pub const DEFAULT_COLLISION_DENSITY: f32 = 1.0;

/// Laser retro-reflectivity assigned to collisions that do not declare one.
pub const DEFAULT_LASER_RETRO: f32 = 0.0;

/// Version stamped into every [`LinkMsg`](crate::msgs::LinkMsg).
pub const LINK_MSG_VERSION: u32 = 1;

/// Per-step budget after which [`Model::update`](crate::model::Model::update) warns.
pub const DEFAULT_STEP_BUDGET_MS: f32 = 4.0;
