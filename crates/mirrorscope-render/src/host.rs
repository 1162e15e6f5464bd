//! Services the host renderer provides to a reflective surface.
//!
//! The orchestrator never talks to a graphics API directly. Everything it needs
//! from the engine goes through [`RenderHost`], [`TargetAllocator`] and
//! [`MaterialSink`], so it can run against a real pipeline or a recording fake.

use glam::{Mat4, Vec4};
use mirrorscope_core::{
    oblique_projection, CameraHandle, MirrorCameraState, Result, TargetHandle, ViewerCamera,
};

/// Texture slot the water material samples the reflection from.
pub const REFLECTION_TEXTURE_SLOT: &str = "_ReflectionTex";

/// Debug label of reflection targets.
pub const REFLECTION_TARGET_LABEL: &str = "WaterReflection";

/// Depth buffer precision of reflection targets.
pub const REFLECTION_DEPTH_BITS: u32 = 16;

/// Description of an off-screen render target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDescriptor {
    /// Debug label.
    pub label: &'static str,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Depth buffer bits; 0 for none.
    pub depth_bits: u32,
    /// Whether the target is saved with the scene and swept by scene teardown.
    pub persistent: bool,
}

impl TargetDescriptor {
    /// Square, non-persistent reflection target with a 16-bit depth buffer.
    pub fn reflection(resolution: u32) -> Self {
        Self {
            label: REFLECTION_TARGET_LABEL,
            width: resolution,
            height: resolution,
            depth_bits: REFLECTION_DEPTH_BITS,
            persistent: false,
        }
    }
}

/// Allocates and frees off-screen render targets.
pub trait TargetAllocator {
    /// Allocates a target.
    fn allocate_render_target(&mut self, descriptor: &TargetDescriptor) -> Result<TargetHandle>;

    /// Frees a target. Unknown handles are ignored.
    fn release_render_target(&mut self, target: TargetHandle);
}

/// The host rendering pipeline.
pub trait RenderHost: TargetAllocator {
    /// The viewer camera currently rendering, if any.
    fn active_camera(&self) -> Option<ViewerCamera>;

    /// Creates a hidden, non-persistent camera proxy that the host's own
    /// per-frame loop never renders.
    fn create_camera_proxy(&mut self) -> Result<CameraHandle>;

    /// Destroys a camera proxy. Unknown handles are ignored.
    fn release_camera_proxy(&mut self, camera: CameraHandle);

    /// Builds the viewer's projection with its near plane replaced by `clip_plane`
    /// (view space).
    fn build_oblique_projection(&self, viewer: &ViewerCamera, clip_plane: Vec4) -> Mat4 {
        oblique_projection(viewer.projection, clip_plane)
    }

    /// Toggles global front-face winding inversion.
    fn set_invert_winding(&mut self, inverted: bool);

    /// Renders `camera` into its target, blocking until done.
    fn render(&mut self, camera: &MirrorCameraState) -> Result<()>;
}

/// Receives rendered textures for materials.
pub trait MaterialSink {
    /// Binds `target` to `slot` on the named material.
    fn set_texture(&mut self, material: &str, slot: &str, target: TargetHandle);
}
