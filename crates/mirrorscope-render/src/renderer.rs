//! Per-frame reflection orchestration.

use mirrorscope_core::{
    camera_space_plane, mirrored_euler, plane_reflection_matrix, reflected_euler,
    MirrorCameraState, OrientationRule, ReflectionError, ReflectionSettings, ReflectivePlane,
    RenderContext, Result, SurfaceTransform, TargetHandle, ViewerCamera, WATER_LAYER,
};

use crate::host::{MaterialSink, RenderHost, REFLECTION_TEXTURE_SLOT};
use crate::resources::ResourceManager;
use crate::winding::InvertedWinding;

/// What one call to [`ReflectionRenderer::render_reflection`] did.
#[derive(Debug)]
pub enum ReflectionOutcome {
    /// The mirror camera rendered into `target`.
    Rendered {
        /// The reflection texture.
        target: TargetHandle,
        /// Whether the texture was handed to a material.
        published: bool,
    },
    /// Nothing was rendered this frame.
    Skipped(ReflectionError),
}

impl ReflectionOutcome {
    /// Returns whether a render happened.
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered { .. })
    }
}

/// Renders the planar reflection of one surface.
///
/// Call [`render_reflection`](Self::render_reflection) once per viewer camera
/// that sees the surface, and [`disable`](Self::disable) when the surface goes
/// away.
#[derive(Debug, Default)]
pub struct ReflectionRenderer {
    settings: ReflectionSettings,
    resources: ResourceManager,
}

impl ReflectionRenderer {
    /// Creates a renderer. No resources are allocated until the first render.
    pub fn new(settings: ReflectionSettings) -> Self {
        Self {
            settings,
            resources: ResourceManager::new(),
        }
    }

    /// Current settings.
    pub fn settings(&self) -> &ReflectionSettings {
        &self.settings
    }

    /// Mutable settings. Changes apply on the next render.
    pub fn settings_mut(&mut self) -> &mut ReflectionSettings {
        &mut self.settings
    }

    /// The owned resources.
    pub fn resources(&self) -> &ResourceManager {
        &self.resources
    }

    /// The mirror camera as of the last render.
    pub fn mirror_camera(&self) -> Option<&MirrorCameraState> {
        self.resources.camera()
    }

    /// Renders the reflection for the host's active camera.
    ///
    /// Skips without side effects when `ctx` is already inside a reflection
    /// render or no camera is active. Any failure after that is logged and
    /// reported as [`ReflectionOutcome::Skipped`]; the context guard and winding
    /// inversion are restored on every path.
    pub fn render_reflection<H, M>(
        &mut self,
        ctx: &RenderContext,
        host: &mut H,
        materials: &mut M,
        surface: &SurfaceTransform,
    ) -> ReflectionOutcome
    where
        H: RenderHost + ?Sized,
        M: MaterialSink + ?Sized,
    {
        let Some(_scope) = ctx.try_enter() else {
            log::trace!("reflection skipped: already rendering a reflection");
            return ReflectionOutcome::Skipped(ReflectionError::ReentrantInvocation);
        };
        let Some(viewer) = host.active_camera() else {
            log::trace!("reflection skipped: no active camera");
            return ReflectionOutcome::Skipped(ReflectionError::NoActiveCamera);
        };

        let target = match self.render_mirror(host, &viewer, surface) {
            Ok(target) => target,
            Err(err) => {
                match &err {
                    ReflectionError::RenderFailed(_) => log::error!("reflection render failed: {err}"),
                    _ => log::warn!("reflection skipped: {err}"),
                }
                return ReflectionOutcome::Skipped(err);
            }
        };

        let published = match self.settings.water_material.as_deref() {
            Some(material) => {
                materials.set_texture(material, REFLECTION_TEXTURE_SLOT, target);
                true
            }
            None => false,
        };

        ReflectionOutcome::Rendered { target, published }
    }

    /// Sets up the mirror camera and renders it with winding inverted.
    fn render_mirror<H: RenderHost + ?Sized>(
        &mut self,
        host: &mut H,
        viewer: &ViewerCamera,
        surface: &SurfaceTransform,
    ) -> Result<TargetHandle> {
        let settings = &self.settings;
        let (target, camera) = self.resources.ensure(host, settings, viewer)?;

        let plane = ReflectivePlane::from_surface(surface)?;
        let offset = settings.clip_plane_offset;
        let reflection = plane_reflection_matrix(&plane, offset);

        let mirror_position = reflection.transform_point3(viewer.position);
        camera.world_to_view = viewer.world_to_view * reflection;

        camera.clip_plane = camera_space_plane(
            camera.world_to_view,
            plane.position(),
            plane.normal(),
            offset,
            1.0,
        )?;
        camera.projection = host.build_oblique_projection(viewer, camera.clip_plane);

        camera.culling_mask = settings.reflect_layers.without(WATER_LAYER);
        camera.target = Some(target);

        let mut inverted = InvertedWinding::begin(host);
        camera.position = mirror_position;
        camera.euler_angles = match settings.orientation {
            OrientationRule::NegatePitch => mirrored_euler(viewer.euler_angles),
            OrientationRule::ReflectBasis => reflected_euler(viewer.world_to_view, plane.normal()),
        };
        inverted.render(camera)?;

        Ok(target)
    }

    /// Releases the reflection target and the mirror camera.
    ///
    /// The next render recreates both.
    pub fn disable<H: RenderHost + ?Sized>(&mut self, host: &mut H) {
        self.resources.release(host);
    }
}

impl Drop for ReflectionRenderer {
    fn drop(&mut self) {
        if self.resources.is_allocated() {
            log::warn!("reflection renderer dropped without disable(); host resources leak");
        }
    }
}
