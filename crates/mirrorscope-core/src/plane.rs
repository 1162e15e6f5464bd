//! Reflective surface geometry.

use glam::{Quat, Vec3, Vec4};

use crate::error::{ReflectionError, Result};

/// Smallest squared normal length accepted before normalizing.
const MIN_NORMAL_LENGTH_SQUARED: f32 = 1e-12;

/// World transform of the reflective surface, as read from the scene graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceTransform {
    /// World position of the surface origin.
    pub position: Vec3,
    /// World rotation of the surface.
    pub rotation: Quat,
}

impl SurfaceTransform {
    /// Creates a transform from position and rotation.
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// A horizontal surface at the given height.
    pub fn horizontal(height: f32) -> Self {
        Self::new(Vec3::new(0.0, height, 0.0), Quat::IDENTITY)
    }

    /// The surface's local +Y axis in world space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

impl Default for SurfaceTransform {
    fn default() -> Self {
        Self::horizontal(0.0)
    }
}

/// The plane a surface reflects across, rebuilt every invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectivePlane {
    position: Vec3,
    normal: Vec3,
}

impl ReflectivePlane {
    /// Creates a plane through `position` with the given normal.
    ///
    /// The normal is normalized. Zero-length or non-finite input is rejected
    /// so no NaN reaches the matrices.
    pub fn new(position: Vec3, normal: Vec3) -> Result<Self> {
        if !position.is_finite() {
            return Err(ReflectionError::DegenerateGeometry(format!(
                "surface position {position} is not finite"
            )));
        }
        if !normal.is_finite() || normal.length_squared() < MIN_NORMAL_LENGTH_SQUARED {
            return Err(ReflectionError::DegenerateGeometry(format!(
                "surface normal {normal} has no usable direction"
            )));
        }
        Ok(Self {
            position,
            normal: normal.normalize(),
        })
    }

    /// Builds the plane from a surface transform, using its up axis as normal.
    pub fn from_surface(surface: &SurfaceTransform) -> Result<Self> {
        Self::new(surface.position, surface.up())
    }

    /// A point on the plane.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit normal of the plane.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Plane equation `(n, d)` with `n·x + d = 0`, pushed `offset` along the normal.
    pub fn equation(&self, offset: f32) -> Vec4 {
        let d = -self.normal.dot(self.position) - offset;
        self.normal.extend(d)
    }

    /// Signed distance from `point` to the plane; positive on the normal side.
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        (point - self.position).dot(self.normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_up_follows_rotation() {
        let surface = SurfaceTransform::new(Vec3::ZERO, Quat::from_rotation_x(std::f32::consts::FRAC_PI_2));
        let up = surface.up();
        assert!((up - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_plane_normalizes() {
        let plane = ReflectivePlane::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0)).unwrap();
        assert_eq!(plane.normal(), Vec3::Y);
    }

    #[test]
    fn test_zero_normal_rejected() {
        let result = ReflectivePlane::new(Vec3::ZERO, Vec3::ZERO);
        assert!(matches!(result, Err(ReflectionError::DegenerateGeometry(_))));

        let result = ReflectivePlane::new(Vec3::ZERO, Vec3::new(f32::NAN, 1.0, 0.0));
        assert!(result.is_err());
    }

    #[test]
    fn test_non_finite_position_rejected() {
        let result = ReflectivePlane::new(Vec3::splat(f32::INFINITY), Vec3::Y);
        assert!(result.is_err());
    }

    #[test]
    fn test_equation_bakes_offset() {
        let plane = ReflectivePlane::new(Vec3::new(0.0, 2.0, 0.0), Vec3::Y).unwrap();
        let eq = plane.equation(0.5);
        assert_eq!(eq, Vec4::new(0.0, 1.0, 0.0, -2.5));
    }

    #[test]
    fn test_signed_distance() {
        let plane = ReflectivePlane::from_surface(&SurfaceTransform::horizontal(1.0)).unwrap();
        assert!((plane.signed_distance(Vec3::new(4.0, 3.0, -2.0)) - 2.0).abs() < 1e-6);
        assert!((plane.signed_distance(Vec3::new(0.0, -1.0, 0.0)) + 2.0).abs() < 1e-6);
    }
}
