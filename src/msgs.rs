//! Wire messages describing a link's externally visible configuration.
//!
//! Every field except `version` is optional so the same structure carries
//! full snapshots ([`Link::fill_msg`](crate::link::Link::fill_msg)) and
//! partial updates ([`Link::process_msg`](crate::link::Link::process_msg)).

use serde::{Deserialize, Serialize};

use crate::{
    config::LINK_MSG_VERSION,
    core::{
        collision::{CollideMode, Collision, CollisionId},
        inertial::Inertial,
        types::Pose,
    },
    error::{LinkError, Result},
    utils::allocator::EntityId,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkMsg {
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pose: Option<Pose>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inertial: Option<Inertial>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gravity: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_collide: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kinematic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linear_damping: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angular_damping: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub collisions: Vec<CollisionMsg>,
    /// Read-only; ignored by `process_msg`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sensors: Vec<String>,
}

impl Default for LinkMsg {
    fn default() -> Self {
        Self {
            version: LINK_MSG_VERSION,
            id: None,
            name: None,
            pose: None,
            inertial: None,
            enabled: None,
            gravity: None,
            self_collide: None,
            kinematic: None,
            linear_damping: None,
            angular_damping: None,
            collisions: Vec::new(),
            sensors: Vec::new(),
        }
    }
}

impl LinkMsg {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes a message, rejecting schemas newer than this crate.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let msg: LinkMsg = serde_json::from_slice(bytes)?;
        if msg.version > LINK_MSG_VERSION {
            return Err(LinkError::UnsupportedVersion(msg.version));
        }
        Ok(msg)
    }
}

/// Summary of one collision.
///
/// `name`, `pose`, and `mass` are informational; only `laser_retro` and
/// `collide_mode` are applied when processed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionMsg {
    pub id: CollisionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pose: Option<Pose>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mass: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub laser_retro: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collide_mode: Option<CollideMode>,
}

impl From<&Collision> for CollisionMsg {
    fn from(collision: &Collision) -> Self {
        Self {
            id: collision.id(),
            name: Some(collision.name().to_string()),
            pose: Some(collision.pose),
            mass: Some(collision.mass()),
            laser_retro: Some(collision.laser_retro()),
            collide_mode: Some(collision.collide_mode()),
        }
    }
}
