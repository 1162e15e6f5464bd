//! GPU layout of the mirror camera.

use glam::Mat4;
use mirrorscope_core::MirrorCameraState;

/// GPU representation of the mirror camera, bound while rendering the reflection.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct ReflectionUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub view_projection: [[f32; 4]; 4],
    /// View-space clip plane `(n, d)`.
    pub clip_plane: [f32; 4],
    pub camera_position: [f32; 3],
    pub _padding: f32,
}

impl Default for ReflectionUniforms {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY.to_cols_array_2d(),
            projection: Mat4::IDENTITY.to_cols_array_2d(),
            view_projection: Mat4::IDENTITY.to_cols_array_2d(),
            clip_plane: [0.0; 4],
            camera_position: [0.0; 3],
            _padding: 0.0,
        }
    }
}

impl From<&MirrorCameraState> for ReflectionUniforms {
    fn from(camera: &MirrorCameraState) -> Self {
        Self {
            view: camera.world_to_view.to_cols_array_2d(),
            projection: camera.projection.to_cols_array_2d(),
            view_projection: camera.view_projection().to_cols_array_2d(),
            clip_plane: camera.clip_plane.to_array(),
            camera_position: camera.position.to_array(),
            _padding: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};
    use mirrorscope_core::CameraHandle;

    #[test]
    fn test_reflection_uniforms_size() {
        // Ensure uniform is correctly aligned for GPU
        assert_eq!(
            std::mem::size_of::<ReflectionUniforms>(),
            64 * 3 + 16 + 12 + 4 // 3 matrices + clip plane + position + padding
        );
    }

    #[test]
    fn test_from_camera_state() {
        let mut camera = MirrorCameraState::new(CameraHandle(1));
        camera.world_to_view = Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0));
        camera.projection = Mat4::perspective_rh(1.0, 1.0, 0.1, 10.0);
        camera.clip_plane = Vec4::new(0.0, 1.0, 0.0, 0.5);
        camera.position = Vec3::new(1.0, -2.0, 3.0);

        let uniforms = ReflectionUniforms::from(&camera);
        assert_eq!(
            uniforms.view_projection,
            (camera.projection * camera.world_to_view).to_cols_array_2d()
        );
        assert_eq!(uniforms.clip_plane, [0.0, 1.0, 0.0, 0.5]);
        assert_eq!(uniforms.camera_position, [1.0, -2.0, 3.0]);
    }
}
