//! mirrorscope: planar water reflections for real-time renderers.
//!
//! A reflective surface is rendered by a second "mirror" camera placed under
//! the surface plane. Its view is the viewer's view composed with the plane's
//! reflection, its near plane is bent onto the surface with an oblique
//! projection, and the resulting texture is handed to the water material.
//!
//! # Quick Start
//!
//! ```no_run
//! use mirrorscope::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let viewer = ViewerCamera::looking_at(
//!         CameraConfig::default(),
//!         Vec3::new(0.0, 5.0, -10.0),
//!         Vec3::ZERO,
//!         Vec3::Y,
//!     );
//!     let mut host = HeadlessHost::with_camera(viewer);
//!     let mut materials = RecordingMaterials::new();
//!     let mut renderer = ReflectionRenderer::new(ReflectionSettings::with_material("Lake"));
//!
//!     let outcome = render_water_reflection(
//!         &mut renderer,
//!         &mut host,
//!         &mut materials,
//!         &SurfaceTransform::default(),
//!     );
//!     assert!(outcome.is_rendered());
//!
//!     renderer.disable(&mut host);
//!     Ok(())
//! }
//! ```
//!
//! # Hosts
//!
//! The pipeline is reached through [`RenderHost`], [`TargetAllocator`] and
//! [`MaterialSink`]. [`HeadlessHost`] records calls instead of drawing, and
//! [`GpuTargetPool`] provides wgpu-backed reflection targets.

// Re-export core types
pub use mirrorscope_core::{
    camera_space_plane, euler_to_rotation, mirrored_euler, oblique_projection,
    plane_reflection_matrix, reflected_euler, reflection_matrix, rotation_to_euler, CameraConfig,
    CameraHandle, ClearFlags, LayerMask, MirrorCameraState, OrientationRule, ProjectionMode,
    ReflectionError, ReflectionScope, ReflectionSettings, ReflectivePlane, RenderContext,
    RenderPath, Result, SurfaceTransform, TargetHandle, ViewerCamera, WATER_LAYER,
};
pub use mirrorscope_core::{Mat4, Quat, Vec3, Vec4};

// Re-export render types
pub use mirrorscope_render::{
    request_headless_device, GpuReflectionTarget, GpuTargetPool, HeadlessHost, HostEvent,
    InvertedWinding, MaterialSink, RecordingMaterials, ReflectionOutcome, ReflectionRenderer,
    ReflectionUniforms, RenderError, RenderHost, ResourceManager, TargetAllocator,
    TargetDescriptor, REFLECTION_TEXTURE_SLOT,
};

/// Initializes `env_logger` from `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    if env_logger::try_init().is_ok() {
        log::debug!("mirrorscope logging initialized");
    }
}

/// Renders one reflection under the process-wide [`RenderContext`].
///
/// All surfaces rendered through this function share one re-entrancy guard, so
/// a reflection triggered from inside another reflection's render is skipped.
pub fn render_water_reflection<H, M>(
    renderer: &mut ReflectionRenderer,
    host: &mut H,
    materials: &mut M,
    surface: &SurfaceTransform,
) -> ReflectionOutcome
where
    H: RenderHost + ?Sized,
    M: MaterialSink + ?Sized,
{
    renderer.render_reflection(RenderContext::global(), host, materials, surface)
}
