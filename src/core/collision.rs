use std::fmt;
use std::str::FromStr;

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

use super::{
    description::CollisionDescription,
    inertial::Inertial,
    types::{InertiaTensorExt, Pose},
};
use crate::config::DEFAULT_COLLISION_DENSITY;
use crate::error::LinkError;
use crate::utils::math::{inertia_capsule, inertia_cylinder};

/// Link-local collision identifier, assigned sequentially at load.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CollisionId(pub u32);

impl fmt::Display for CollisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Enumeration of supported collision geometries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionShape {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
    /// Aligned along the local Y axis.
    Capsule { radius: f32, height: f32 },
    /// Aligned along the local Y axis.
    Cylinder { radius: f32, height: f32 },
}

impl CollisionShape {
    pub fn volume(&self) -> f32 {
        use std::f32::consts::PI;
        match self {
            CollisionShape::Sphere { radius } => 4.0 / 3.0 * PI * radius.powi(3),
            CollisionShape::Box { half_extents } => 8.0 * half_extents.x * half_extents.y * half_extents.z,
            CollisionShape::Capsule { radius, height } => {
                PI * radius * radius * height + 4.0 / 3.0 * PI * radius.powi(3)
            }
            CollisionShape::Cylinder { radius, height } => PI * radius * radius * height,
        }
    }

    /// Inertia tensor about the shape's own origin for the given mass.
    pub fn inertia(&self, mass: f32) -> Mat3 {
        match self {
            CollisionShape::Sphere { radius } => Mat3::for_solid_sphere(*radius, mass),
            CollisionShape::Box { half_extents } => Mat3::for_solid_box(*half_extents, mass),
            CollisionShape::Capsule { radius, height } => inertia_capsule(*radius, *height, mass),
            CollisionShape::Cylinder { radius, height } => inertia_cylinder(*radius, *height, mass),
        }
    }

    pub fn bounding_radius(&self) -> f32 {
        match self {
            CollisionShape::Sphere { radius } => *radius,
            CollisionShape::Box { half_extents } => half_extents.length(),
            CollisionShape::Capsule { radius, height } => radius + height * 0.5,
            CollisionShape::Cylinder { radius, height } => {
                (radius.powi(2) + (height * 0.5).powi(2)).sqrt()
            }
        }
    }

    /// Rejects non-finite or non-positive dimensions.
    pub fn validate(&self) -> Result<(), String> {
        let ok = match self {
            CollisionShape::Sphere { radius } => radius.is_finite() && *radius > 0.0,
            CollisionShape::Box { half_extents } => {
                half_extents.is_finite() && half_extents.min_element() > 0.0
            }
            CollisionShape::Capsule { radius, height }
            | CollisionShape::Cylinder { radius, height } => {
                radius.is_finite() && height.is_finite() && *radius > 0.0 && *height >= 0.0
            }
        };
        if ok {
            Ok(())
        } else {
            Err(format!("invalid shape dimensions: {self:?}"))
        }
    }
}

/// Which contacts a collision participates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollideMode {
    /// Collides with everything.
    #[default]
    All,
    /// Collides with nothing.
    None,
    /// Only reports contacts to sensors.
    Sensors,
    /// Collides only with static geometry.
    Fixed,
    /// Collides with nothing and is invisible to sensors.
    Ghost,
}

impl CollideMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollideMode::All => "all",
            CollideMode::None => "none",
            CollideMode::Sensors => "sensors",
            CollideMode::Fixed => "fixed",
            CollideMode::Ghost => "ghost",
        }
    }
}

impl FromStr for CollideMode {
    type Err = LinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(CollideMode::All),
            "none" => Ok(CollideMode::None),
            "sensors" => Ok(CollideMode::Sensors),
            "fixed" => Ok(CollideMode::Fixed),
            "ghost" => Ok(CollideMode::Ghost),
            other => Err(LinkError::MalformedDescription(format!(
                "unknown collide mode '{other}'"
            ))),
        }
    }
}

/// Named collision geometry owned by one link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collision {
    id: CollisionId,
    name: String,
    pub shape: CollisionShape,
    /// Pose relative to the link frame.
    pub pose: Pose,
    mass: f32,
    laser_retro: f32,
    collide_mode: CollideMode,
}

impl Collision {
    /// Builds a collision from an already validated description.
    pub(crate) fn from_description(id: CollisionId, desc: &CollisionDescription) -> Self {
        let mass = desc.mass.unwrap_or_else(|| {
            desc.density.unwrap_or(DEFAULT_COLLISION_DENSITY) * desc.shape.volume()
        });
        Self {
            id,
            name: desc.name.clone(),
            shape: desc.shape.clone(),
            pose: desc.pose,
            mass,
            laser_retro: desc.laser_retro,
            collide_mode: desc.collide_mode,
        }
    }

    pub fn id(&self) -> CollisionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn laser_retro(&self) -> f32 {
        self.laser_retro
    }

    pub fn collide_mode(&self) -> CollideMode {
        self.collide_mode
    }

    pub(crate) fn set_laser_retro(&mut self, retro: f32) {
        self.laser_retro = retro;
    }

    pub(crate) fn set_collide_mode(&mut self, mode: CollideMode) {
        self.collide_mode = mode;
    }

    /// Mass properties of this collision expressed in the link frame.
    pub fn inertial(&self) -> Inertial {
        Inertial::new(self.mass, Vec3::ZERO, self.shape.inertia(self.mass)).transformed(&self.pose)
    }

    pub fn world_pose(&self, link_pose: &Pose) -> Pose {
        link_pose.compose(&self.pose)
    }
}
