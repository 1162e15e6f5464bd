//! Camera descriptions shared between the host and the mirror camera.

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::handle::{CameraHandle, TargetHandle};
use crate::layers::LayerMask;

/// Camera projection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectionMode {
    /// Perspective projection.
    #[default]
    Perspective,
    /// Orthographic projection.
    Orthographic,
}

/// What a camera clears its target to before drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClearFlags {
    /// Clear to the sky.
    #[default]
    Skybox,
    /// Clear to the background color.
    SolidColor,
    /// Clear depth only.
    DepthOnly,
    /// Do not clear.
    Nothing,
}

/// Rendering path a camera uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderPath {
    /// Whatever the pipeline defaults to.
    #[default]
    PipelineDefault,
    /// Forward shading.
    Forward,
    /// Deferred shading. Incompatible with an oblique near plane.
    Deferred,
}

/// General camera parameters, copied wholesale from viewer to mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Projection mode.
    pub projection_mode: ProjectionMode,
    /// Half height of the view volume in orthographic mode.
    pub ortho_size: f32,
    /// Clear behavior.
    pub clear_flags: ClearFlags,
    /// Background color used with [`ClearFlags::SolidColor`].
    pub background_color: Vec4,
    /// Draw order among cameras; lower renders first.
    pub depth: f32,
    /// Whether the camera renders in HDR.
    pub allow_hdr: bool,
    /// Rendering path.
    pub render_path: RenderPath,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: std::f32::consts::FRAC_PI_3,
            aspect_ratio: 16.0 / 9.0,
            near: 0.3,
            far: 1000.0,
            projection_mode: ProjectionMode::Perspective,
            ortho_size: 5.0,
            clear_flags: ClearFlags::Skybox,
            background_color: Vec4::new(0.19, 0.30, 0.47, 1.0),
            depth: 0.0,
            allow_hdr: true,
            render_path: RenderPath::PipelineDefault,
        }
    }
}

impl CameraConfig {
    /// Returns the projection matrix, right-handed with a [0, 1] depth range.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection_mode {
            ProjectionMode::Perspective => {
                Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let half_height = self.ortho_size;
                let half_width = half_height * self.aspect_ratio;
                Mat4::orthographic_rh(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.near,
                    self.far,
                )
            }
        }
    }
}

/// Converts Euler angles in degrees (x = pitch, y = yaw, z = roll) to a rotation.
///
/// Yaw is applied first, then pitch, then roll.
#[must_use]
pub fn euler_to_rotation(euler_degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        euler_degrees.y.to_radians(),
        euler_degrees.x.to_radians(),
        euler_degrees.z.to_radians(),
    )
}

/// Inverse of [`euler_to_rotation`].
#[must_use]
pub fn rotation_to_euler(rotation: Quat) -> Vec3 {
    let (yaw, pitch, roll) = rotation.to_euler(EulerRot::YXZ);
    Vec3::new(pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees())
}

/// World rotation of a camera with the given world-to-view matrix.
///
/// Assumes the view matrix has no scale.
#[must_use]
pub fn view_rotation(world_to_view: Mat4) -> Quat {
    Quat::from_mat3(&Mat3::from_mat4(world_to_view).transpose())
}

/// The viewer camera the host is currently rendering with.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerCamera {
    /// General camera parameters.
    pub config: CameraConfig,
    /// World-to-view matrix.
    pub world_to_view: Mat4,
    /// Projection matrix.
    pub projection: Mat4,
    /// World position.
    pub position: Vec3,
    /// World Euler angles in degrees.
    pub euler_angles: Vec3,
}

impl ViewerCamera {
    /// Creates a viewer at `position` looking at `target`.
    pub fn looking_at(config: CameraConfig, position: Vec3, target: Vec3, up: Vec3) -> Self {
        let world_to_view = Mat4::look_at_rh(position, target, up);
        let projection = config.projection_matrix();
        Self {
            config,
            world_to_view,
            projection,
            position,
            euler_angles: rotation_to_euler(view_rotation(world_to_view)),
        }
    }

    /// Creates a viewer from a position and Euler angles in degrees.
    pub fn from_euler(config: CameraConfig, position: Vec3, euler_degrees: Vec3) -> Self {
        let rotation = euler_to_rotation(euler_degrees);
        let world_to_view = Mat4::from_rotation_translation(rotation, position).inverse();
        let projection = config.projection_matrix();
        Self {
            config,
            world_to_view,
            projection,
            position,
            euler_angles: euler_degrees,
        }
    }

    /// World-space forward direction.
    pub fn forward(&self) -> Vec3 {
        view_rotation(self.world_to_view) * Vec3::NEG_Z
    }
}

/// Mutable state of the hidden mirror camera.
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorCameraState {
    /// Host proxy this state drives.
    pub handle: CameraHandle,
    /// Parameters copied from the viewer, with the render path forced to forward.
    pub config: CameraConfig,
    /// World-to-view matrix, set explicitly rather than derived from the pose.
    pub world_to_view: Mat4,
    /// Projection matrix (oblique once a reflection has been set up).
    pub projection: Mat4,
    /// View-space plane the oblique projection clips against.
    pub clip_plane: Vec4,
    /// World position, for consumers that read it.
    pub position: Vec3,
    /// World Euler angles in degrees.
    pub euler_angles: Vec3,
    /// Render target the camera draws into.
    pub target: Option<TargetHandle>,
    /// Layers the camera renders.
    pub culling_mask: LayerMask,
    /// Whether the host's per-frame camera loop may render it. Always false.
    pub enabled: bool,
}

impl MirrorCameraState {
    /// Creates the state for a freshly created proxy.
    pub fn new(handle: CameraHandle) -> Self {
        Self {
            handle,
            config: CameraConfig::default(),
            world_to_view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            clip_plane: Vec4::ZERO,
            position: Vec3::ZERO,
            euler_angles: Vec3::ZERO,
            target: None,
            culling_mask: LayerMask::ALL,
            enabled: false,
        }
    }

    /// Copies every general parameter from the viewer.
    pub fn copy_config_from(&mut self, viewer: &ViewerCamera) {
        self.config = viewer.config.clone();
        self.projection = viewer.projection;
    }

    /// Combined view-projection matrix.
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.world_to_view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_vec3(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_euler_round_trip() {
        let euler = Vec3::new(-26.5, 180.0 - 30.0, 10.0);
        let back = rotation_to_euler(euler_to_rotation(euler));
        assert!(approx_vec3(back, euler), "{back} != {euler}");
    }

    #[test]
    fn test_looking_at_forward() {
        let viewer = ViewerCamera::looking_at(
            CameraConfig::default(),
            Vec3::new(0.0, 5.0, -10.0),
            Vec3::ZERO,
            Vec3::Y,
        );
        let expected = Vec3::new(0.0, -5.0, 10.0).normalize();
        assert!(approx_vec3(viewer.forward(), expected));
        // Looking down means negative pitch.
        assert!(viewer.euler_angles.x < 0.0);
    }

    #[test]
    fn test_from_euler_matches_looking_at() {
        let a = ViewerCamera::looking_at(
            CameraConfig::default(),
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-2.0, 0.0, -1.0),
            Vec3::Y,
        );
        let b = ViewerCamera::from_euler(CameraConfig::default(), a.position, a.euler_angles);
        assert!((a.world_to_view - b.world_to_view).abs_diff_eq(Mat4::ZERO, 1e-4));
    }

    #[test]
    fn test_orthographic_projection() {
        let config = CameraConfig {
            projection_mode: ProjectionMode::Orthographic,
            ..CameraConfig::default()
        };
        let proj = config.projection_matrix();
        assert!((proj.w_axis.w - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_mirror_state_defaults() {
        let state = MirrorCameraState::new(CameraHandle(3));
        assert!(!state.enabled);
        assert!(state.target.is_none());
        assert_eq!(state.view_projection(), Mat4::IDENTITY);
    }

    #[test]
    fn test_copy_config_from_viewer() {
        let config = CameraConfig {
            fov: 1.2,
            far: 50.0,
            clear_flags: ClearFlags::SolidColor,
            render_path: RenderPath::Deferred,
            ..CameraConfig::default()
        };
        let viewer = ViewerCamera::looking_at(config.clone(), Vec3::Z, Vec3::ZERO, Vec3::Y);
        let mut state = MirrorCameraState::new(CameraHandle(1));
        state.copy_config_from(&viewer);
        assert_eq!(state.config, config);
        assert_eq!(state.projection, viewer.projection);
    }
}
