//! Planar reflection math.
//!
//! Everything here is pure: the orchestrator feeds in the viewer's matrices and
//! the surface plane and gets back the mirror camera's matrices.

use glam::{Mat3, Mat4, Quat, Vec3, Vec4};

use crate::camera::{rotation_to_euler, view_rotation};
use crate::error::{ReflectionError, Result};
use crate::plane::ReflectivePlane;

/// Computes the affine matrix reflecting points across `n·x + d = 0`.
///
/// `plane` is `(nx, ny, nz, d)` with a unit normal:
///
/// ```text
/// | 1-2nx²   -2nxny   -2nxnz   -2d·nx |
/// | -2nxny   1-2ny²   -2nynz   -2d·ny |
/// | -2nxnz   -2nynz   1-2nz²   -2d·nz |
/// |    0        0        0        1   |
/// ```
pub fn reflection_matrix(plane: Vec4) -> Mat4 {
    let n = plane.truncate();
    let d = plane.w;

    Mat4::from_cols(
        Vec4::new(1.0 - 2.0 * n.x * n.x, -2.0 * n.y * n.x, -2.0 * n.z * n.x, 0.0),
        Vec4::new(-2.0 * n.x * n.y, 1.0 - 2.0 * n.y * n.y, -2.0 * n.z * n.y, 0.0),
        Vec4::new(-2.0 * n.x * n.z, -2.0 * n.y * n.z, 1.0 - 2.0 * n.z * n.z, 0.0),
        Vec4::new(-2.0 * d * n.x, -2.0 * d * n.y, -2.0 * d * n.z, 1.0),
    )
}

/// Reflection across `plane` pushed `clip_plane_offset` along its normal.
pub fn plane_reflection_matrix(plane: &ReflectivePlane, clip_plane_offset: f32) -> Mat4 {
    reflection_matrix(plane.equation(clip_plane_offset))
}

/// Transforms a world-space plane into a camera's view space.
///
/// The plane passes through `position + normal * clip_plane_offset`. The
/// normal is transformed like a direction, which is exact because view
/// matrices carry no scale, then normalized and multiplied by `side_sign`.
/// Returns `(n, -dot(p, n))` in view space.
pub fn camera_space_plane(
    world_to_view: Mat4,
    position: Vec3,
    normal: Vec3,
    clip_plane_offset: f32,
    side_sign: f32,
) -> Result<Vec4> {
    let offset_position = position + normal * clip_plane_offset;
    let view_position = world_to_view.transform_point3(offset_position);
    let view_normal = world_to_view
        .transform_vector3(normal)
        .try_normalize()
        .ok_or_else(|| {
            ReflectionError::DegenerateGeometry(format!(
                "normal {normal} vanishes in view space"
            ))
        })?
        * side_sign;

    Ok(view_normal.extend(-view_position.dot(view_normal)))
}

/// Skews the depth row of `projection` so its near plane is `clip_plane`.
///
/// `projection` is right-handed with a [0, 1] depth range; `clip_plane` is in
/// view space with its normal pointing at the geometry to keep. The far plane
/// is rescaled to still contain the frustum corner opposite the clip plane.
/// A plane edge-on to that corner leaves the projection unchanged.
pub fn oblique_projection(projection: Mat4, clip_plane: Vec4) -> Mat4 {
    let corner = Vec4::new(clip_plane.x.signum(), clip_plane.y.signum(), 1.0, 1.0);
    let q = projection.inverse() * corner;

    let denominator = clip_plane.dot(q);
    let scale = projection.row(3).dot(q) / denominator;
    if !scale.is_finite() || scale.abs() < f32::EPSILON {
        log::debug!("oblique projection degenerate for plane {clip_plane}, keeping projection");
        return projection;
    }

    let depth_row = clip_plane * scale;
    let mut oblique = projection;
    oblique.x_axis.z = depth_row.x;
    oblique.y_axis.z = depth_row.y;
    oblique.z_axis.z = depth_row.z;
    oblique.w_axis.z = depth_row.w;
    oblique
}

/// Mirror camera Euler angles for a horizontal plane: pitch negated.
pub fn mirrored_euler(euler_degrees: Vec3) -> Vec3 {
    Vec3::new(-euler_degrees.x, euler_degrees.y, euler_degrees.z)
}

/// Reflects a direction across a plane with unit normal `normal`.
pub fn reflect_direction(direction: Vec3, normal: Vec3) -> Vec3 {
    direction - 2.0 * direction.dot(normal) * normal
}

/// Mirror camera rotation for an arbitrary plane.
///
/// Forward and up are reflected across the plane. A reflection alone is not a
/// rotation, so the up axis is flipped whenever it ends up pointing below the
/// horizon and right is rebuilt from the other two. For a horizontal plane and
/// zero roll this equals negating the pitch.
pub fn reflected_rotation(viewer_rotation: Quat, normal: Vec3) -> Quat {
    let back = reflect_direction(viewer_rotation * Vec3::Z, normal);
    let mut up = reflect_direction(viewer_rotation * Vec3::Y, normal);
    if up.dot(Vec3::Y) < 0.0 {
        up = -up;
    }
    let right = up.cross(back);
    Quat::from_mat3(&Mat3::from_cols(right, up, back)).normalize()
}

/// Euler angles (degrees) of [`reflected_rotation`] for a viewer view matrix.
pub fn reflected_euler(viewer_world_to_view: Mat4, normal: Vec3) -> Vec3 {
    rotation_to_euler(reflected_rotation(view_rotation(viewer_world_to_view), normal))
}
