//! Data types a link is built from: poses, inertials, collisions, joints,
//! attachments, descriptions, and snapshots.

pub mod attachments;
pub mod collision;
pub mod description;
pub mod event;
pub mod inertial;
pub mod joints;
pub mod registry;
pub mod state;
pub mod types;

pub use attachments::{Attachment, AttachmentTable, StaticModel, StaticModelHandle};
pub use collision::{CollideMode, Collision, CollisionId, CollisionShape};
pub use description::{CollisionDescription, LinkDescription, SensorDescription};
pub use event::{Signal, SubscriberId};
pub use inertial::Inertial;
pub use joints::{JointMembership, JointRef};
pub use registry::CollisionRegistry;
pub use state::LinkState;
pub use types::{Aabb, Acceleration, InertiaTensorExt, Pose, Velocity, Wrench};
