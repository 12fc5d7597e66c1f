use serde::{Deserialize, Serialize};

use super::types::{Acceleration, Pose, Velocity, Wrench};

/// Point-in-time snapshot of a link, used for replay and rewind.
///
/// All quantities are expressed in the world frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkState {
    pub name: String,
    pub pose: Pose,
    pub velocity: Velocity,
    pub acceleration: Acceleration,
    pub wrench: Wrench,
}
