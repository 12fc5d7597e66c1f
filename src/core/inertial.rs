use std::iter::Sum;
use std::ops::Add;

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

use super::types::{InertiaTensorExt, Pose};
use crate::utils::math::parallel_axis;

/// Mass, center of mass, and inertia tensor of one body.
///
/// The tensor is expressed about the center of mass, in the axes of the
/// frame the center of mass is given in. The descriptor is replaced as a
/// whole; there is no per-field mutation on a link.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Inertial {
    pub mass: f32,
    pub center_of_mass: Vec3,
    pub inertia: Mat3,
}

impl Default for Inertial {
    fn default() -> Self {
        Self {
            mass: 1.0,
            center_of_mass: Vec3::ZERO,
            inertia: Mat3::IDENTITY,
        }
    }
}

impl Inertial {
    pub const ZERO: Inertial = Inertial {
        mass: 0.0,
        center_of_mass: Vec3::ZERO,
        inertia: Mat3::ZERO,
    };

    pub fn new(mass: f32, center_of_mass: Vec3, inertia: Mat3) -> Self {
        Self {
            mass,
            center_of_mass,
            inertia,
        }
    }

    /// Point mass located at `position`.
    pub fn point_mass(mass: f32, position: Vec3) -> Self {
        Self::new(mass, position, Mat3::ZERO)
    }

    /// Re-expresses the descriptor in the parent frame of `pose`.
    pub fn transformed(&self, pose: &Pose) -> Inertial {
        Inertial {
            mass: self.mass,
            center_of_mass: pose.transform_point(self.center_of_mass),
            inertia: self.inertia.rotated(pose.rotation),
        }
    }

    /// Inertia tensor about an arbitrary reference point (same axes).
    pub fn inertia_about(&self, point: Vec3) -> Mat3 {
        self.inertia + parallel_axis(self.mass, self.center_of_mass - point)
    }

    pub fn inverse_mass(&self) -> f32 {
        if self.mass.abs() < f32::EPSILON {
            0.0
        } else {
            1.0 / self.mass
        }
    }
}

impl Add for Inertial {
    type Output = Inertial;

    /// Composes two bodies rigidly joined in the same frame.
    fn add(self, other: Inertial) -> Inertial {
        let mass = self.mass + other.mass;
        if mass.abs() < f32::EPSILON {
            return Inertial::ZERO;
        }
        let center_of_mass = (self.center_of_mass * self.mass + other.center_of_mass * other.mass) / mass;
        let inertia = self.inertia_about(center_of_mass) + other.inertia_about(center_of_mass);
        Inertial {
            mass,
            center_of_mass,
            inertia,
        }
    }
}

impl Sum for Inertial {
    fn sum<I: Iterator<Item = Inertial>>(iter: I) -> Inertial {
        iter.fold(Inertial::ZERO, Add::add)
    }
}
