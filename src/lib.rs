//! Rigid Link – engine-agnostic rigid bodies for articulated models.
//!
//! A [`Link`] owns the physics-engine-independent half of a rigid body:
//! its inertial, collisions, joint membership, accumulated forces, attached
//! static models, and sensors. Integration is delegated to a
//! [`LinkBackend`]; [`ReferenceBackend`] is a small semi-implicit Euler
//! implementation. A [`Model`] owns links and the joints between them.

pub mod backend;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod link;
pub mod model;
pub mod msgs;
pub mod utils;

pub use glam::{Mat3, Quat, Vec3};

pub use backend::{BodyFrame, LinkBackend, ReferenceBackend};
pub use crate::core::{
    attachments::{StaticModel, StaticModelHandle},
    collision::{CollideMode, Collision, CollisionId, CollisionShape},
    description::{CollisionDescription, LinkDescription, SensorDescription},
    event::SubscriberId,
    inertial::Inertial,
    joints::JointRef,
    state::LinkState,
    types::{Aabb, Acceleration, Pose, Velocity, Wrench},
};
pub use dynamics::ForceAccumulator;
pub use error::{LinkError, Result};
pub use link::{Link, LinkLifecycle};
pub use model::{Joint, Model};
pub use msgs::{CollisionMsg, LinkMsg};
pub use utils::allocator::{Arena, EntityId, GenerationalId};
