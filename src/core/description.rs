//! Declarative link descriptions consumed by [`Link::load`](crate::link::Link::load).
//!
//! Every field other than the names has a default, so a loader may supply
//! any subset. Descriptions deserialize from JSON through `serde_json`.

use serde::{Deserialize, Serialize};

use super::{
    collision::{CollideMode, CollisionShape},
    inertial::Inertial,
    types::Pose,
};
use crate::config::{DEFAULT_ANGULAR_DAMPING, DEFAULT_LASER_RETRO, DEFAULT_LINEAR_DAMPING};
use crate::error::{LinkError, Result};

fn default_true() -> bool {
    true
}

fn default_linear_damping() -> f32 {
    DEFAULT_LINEAR_DAMPING
}

fn default_angular_damping() -> f32 {
    DEFAULT_ANGULAR_DAMPING
}

fn default_laser_retro() -> f32 {
    DEFAULT_LASER_RETRO
}

/// Description of one link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkDescription {
    pub name: String,
    /// Initial world pose of the link.
    #[serde(default)]
    pub pose: Pose,
    /// Explicit mass properties; derived from collisions when absent.
    #[serde(default)]
    pub inertial: Option<Inertial>,
    #[serde(default)]
    pub collisions: Vec<CollisionDescription>,
    #[serde(default)]
    pub sensors: Vec<SensorDescription>,
    #[serde(default = "default_true")]
    pub gravity: bool,
    #[serde(default)]
    pub self_collide: bool,
    #[serde(default)]
    pub kinematic: bool,
    #[serde(default = "default_true")]
    pub auto_disable: bool,
    #[serde(default = "default_linear_damping")]
    pub linear_damping: f32,
    #[serde(default = "default_angular_damping")]
    pub angular_damping: f32,
}

impl LinkDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pose: Pose::default(),
            inertial: None,
            collisions: Vec::new(),
            sensors: Vec::new(),
            gravity: true,
            self_collide: false,
            kinematic: false,
            auto_disable: true,
            linear_damping: DEFAULT_LINEAR_DAMPING,
            angular_damping: DEFAULT_ANGULAR_DAMPING,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }

    pub fn with_inertial(mut self, inertial: Inertial) -> Self {
        self.inertial = Some(inertial);
        self
    }

    pub fn with_collision(mut self, collision: CollisionDescription) -> Self {
        self.collisions.push(collision);
        self
    }

    pub fn with_sensor(mut self, name: impl Into<String>, kind: impl Into<String>) -> Self {
        self.sensors.push(SensorDescription {
            name: name.into(),
            kind: kind.into(),
        });
        self
    }

    /// Checks link-level fields. Collisions are validated as they load.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LinkError::MalformedDescription("link name is empty".into()));
        }
        if !self.pose.is_finite() {
            return Err(LinkError::MalformedDescription(format!(
                "link '{}' has a non-finite pose",
                self.name
            )));
        }
        if !self.linear_damping.is_finite() || !self.angular_damping.is_finite() {
            return Err(LinkError::MalformedDescription(format!(
                "link '{}' has non-finite damping",
                self.name
            )));
        }
        if let Some(sensor) = self.sensors.iter().find(|s| s.name.trim().is_empty()) {
            return Err(LinkError::MalformedDescription(format!(
                "link '{}' declares a sensor of type '{}' without a name",
                self.name, sensor.kind
            )));
        }
        Ok(())
    }
}

/// Description of one collision sub-object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionDescription {
    pub name: String,
    pub shape: CollisionShape,
    /// Pose relative to the link frame.
    #[serde(default)]
    pub pose: Pose,
    /// Explicit mass; takes precedence over density.
    #[serde(default)]
    pub mass: Option<f32>,
    #[serde(default)]
    pub density: Option<f32>,
    #[serde(default = "default_laser_retro")]
    pub laser_retro: f32,
    #[serde(default)]
    pub collide_mode: CollideMode,
}

impl CollisionDescription {
    pub fn new(name: impl Into<String>, shape: CollisionShape) -> Self {
        Self {
            name: name.into(),
            shape,
            pose: Pose::default(),
            mass: None,
            density: None,
            laser_retro: DEFAULT_LASER_RETRO,
            collide_mode: CollideMode::default(),
        }
    }

    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = Some(density);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let malformed = |msg: String| Err(LinkError::MalformedDescription(msg));
        if self.name.trim().is_empty() {
            return malformed("collision name is empty".into());
        }
        if let Err(msg) = self.shape.validate() {
            return malformed(format!("collision '{}': {msg}", self.name));
        }
        if !self.pose.is_finite() {
            return malformed(format!("collision '{}' has a non-finite pose", self.name));
        }
        for (field, value) in [("mass", self.mass), ("density", self.density)] {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return malformed(format!(
                        "collision '{}' has invalid {field} {value}",
                        self.name
                    ));
                }
            }
        }
        if !self.laser_retro.is_finite() {
            return malformed(format!("collision '{}' has a non-finite laser retro", self.name));
        }
        Ok(())
    }
}

/// Sensor declared on a link. Only the name is kept by the link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorDescription {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_description_applies_defaults() {
        let desc = LinkDescription::from_json(
            r#"{
                "name": "arm",
                "collisions": [
                    { "name": "c0", "shape": { "sphere": { "radius": 0.5 } } }
                ]
            }"#,
        )
        .expect("description should parse");

        assert_eq!(desc.name, "arm");
        assert!(desc.gravity);
        assert!(!desc.self_collide);
        assert!(desc.inertial.is_none());
        assert!(desc.sensors.is_empty());
        assert_eq!(desc.collisions[0].collide_mode, CollideMode::All);
        assert_eq!(desc.collisions[0].laser_retro, DEFAULT_LASER_RETRO);
    }

    #[test]
    fn negative_collision_mass_is_malformed() {
        let collision = CollisionDescription::new("c", CollisionShape::Sphere { radius: 1.0 })
            .with_mass(-1.0);
        assert!(matches!(
            collision.validate(),
            Err(LinkError::MalformedDescription(_))
        ));
    }
}
