//! Lazily created render target and mirror camera of one reflective surface.

use mirrorscope_core::{
    MirrorCameraState, ReflectionSettings, RenderPath, Result, TargetHandle, ViewerCamera,
};

use crate::host::{RenderHost, TargetDescriptor};

/// A target the manager currently owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OwnedTarget {
    handle: TargetHandle,
    resolution: u32,
}

/// Owns the reflection buffer and the mirror camera proxy.
///
/// Nothing is allocated until [`ensure`](Self::ensure) is called. Both
/// resources must be handed back with [`release`](Self::release) before the
/// manager is dropped, since only the host can free them.
#[derive(Debug, Default)]
pub struct ResourceManager {
    target: Option<OwnedTarget>,
    camera: Option<MirrorCameraState>,
}

impl ResourceManager {
    /// Creates a manager that owns nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes sure a target of the configured resolution and a camera proxy exist.
    ///
    /// A target with a different resolution is released and replaced. The
    /// viewer's camera parameters are copied into the mirror camera on every
    /// call, and the render path is forced to forward since an oblique near
    /// plane breaks deferred geometry passes. Calling again with unchanged
    /// settings allocates nothing.
    pub fn ensure<H: RenderHost + ?Sized>(
        &mut self,
        host: &mut H,
        settings: &ReflectionSettings,
        viewer: &ViewerCamera,
    ) -> Result<(TargetHandle, &mut MirrorCameraState)> {
        settings.validate()?;
        let resolution = settings.texture_resolution;

        if let Some(stale) = self.target.filter(|t| t.resolution != resolution) {
            log::debug!(
                "reflection target {} resized {} -> {resolution}",
                stale.handle,
                stale.resolution
            );
            host.release_render_target(stale.handle);
            self.target = None;
        }

        let target = match self.target {
            Some(owned) => owned.handle,
            None => {
                let handle = host.allocate_render_target(&TargetDescriptor::reflection(resolution))?;
                log::debug!("allocated reflection target {handle} ({resolution}x{resolution})");
                self.target = Some(OwnedTarget { handle, resolution });
                handle
            }
        };

        let camera = match self.camera.take() {
            Some(camera) => camera,
            None => {
                let handle = host.create_camera_proxy()?;
                log::debug!("created mirror camera {handle}");
                MirrorCameraState::new(handle)
            }
        };
        let camera = self.camera.insert(camera);

        camera.copy_config_from(viewer);
        camera.config.render_path = RenderPath::Forward;
        camera.enabled = false;

        Ok((target, camera))
    }

    /// Releases the target and the camera proxy, if present.
    pub fn release<H: RenderHost + ?Sized>(&mut self, host: &mut H) {
        if let Some(owned) = self.target.take() {
            host.release_render_target(owned.handle);
            log::debug!("released reflection target {}", owned.handle);
        }
        if let Some(camera) = self.camera.take() {
            host.release_camera_proxy(camera.handle);
            log::debug!("released mirror camera {}", camera.handle);
        }
    }

    /// Handle of the current target.
    pub fn target(&self) -> Option<TargetHandle> {
        self.target.map(|t| t.handle)
    }

    /// Resolution of the current target.
    pub fn resolution(&self) -> Option<u32> {
        self.target.map(|t| t.resolution)
    }

    /// The mirror camera state.
    pub fn camera(&self) -> Option<&MirrorCameraState> {
        self.camera.as_ref()
    }

    /// Returns whether either resource is held.
    pub fn is_allocated(&self) -> bool {
        self.target.is_some() || self.camera.is_some()
    }
}
