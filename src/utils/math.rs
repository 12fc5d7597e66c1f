//! Additional math helpers layered on top of `glam`.

use glam::{Mat3, Quat, Vec3};

/// Converts angular velocity vector (radians/sec) into a quaternion delta.
pub fn angular_velocity_to_quat(angular: Vec3, dt: f32) -> Quat {
    let angle = angular.length() * dt;
    if angle.abs() < 1e-6 {
        return Quat::IDENTITY;
    }
    let axis = angular.normalize();
    Quat::from_axis_angle(axis, angle)
}

/// Builds an inertia tensor for a solid capsule aligned along Y.
pub fn inertia_capsule(radius: f32, height: f32, mass: f32) -> Mat3 {
    let cylinder_volume = std::f32::consts::PI * radius * radius * height;
    let sphere_volume = 4.0 / 3.0 * std::f32::consts::PI * radius.powi(3);
    let total = cylinder_volume + sphere_volume;
    if total <= 0.0 {
        return Mat3::ZERO;
    }
    let cylinder_mass = mass * cylinder_volume / total;
    let cap_mass = mass - cylinder_mass;

    let cylinder = inertia_cylinder(radius, height, cylinder_mass);

    // Both hemispheres, shifted to the cylinder ends.
    let cap_axial = 0.4 * cap_mass * radius * radius;
    let cap_transverse =
        cap_mass * (0.4 * radius * radius + 0.25 * height * height + 0.375 * height * radius);

    cylinder + Mat3::from_diagonal(Vec3::new(cap_transverse, cap_axial, cap_transverse))
}

/// Builds an inertia tensor for a solid cylinder aligned along Y.
pub fn inertia_cylinder(radius: f32, height: f32, mass: f32) -> Mat3 {
    let transverse = (1.0 / 12.0) * mass * (3.0 * radius * radius + height * height);
    Mat3::from_diagonal(Vec3::new(transverse, 0.5 * mass * radius * radius, transverse))
}

/// Parallel-axis term `m * (|d|² E - d dᵀ)`.
pub fn parallel_axis(mass: f32, offset: Vec3) -> Mat3 {
    let outer = Mat3::from_cols(offset * offset.x, offset * offset.y, offset * offset.z);
    (Mat3::IDENTITY * offset.length_squared() - outer) * mass
}
