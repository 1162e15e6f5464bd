//! CPU-only host that records every call instead of drawing.
//!
//! Useful for tests, tooling, and for checking what a reflective surface asks of
//! a pipeline before wiring it to a real one.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use mirrorscope_core::{
    CameraHandle, MirrorCameraState, ReflectionError, Result, TargetHandle, ViewerCamera,
};

use crate::host::{MaterialSink, RenderHost, TargetAllocator, TargetDescriptor};

/// One call made against a [`HeadlessHost`].
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// A render target was allocated.
    AllocateTarget {
        target: TargetHandle,
        descriptor: TargetDescriptor,
    },
    /// A render target was released.
    ReleaseTarget(TargetHandle),
    /// A camera proxy was created.
    CreateCamera(CameraHandle),
    /// A camera proxy was released.
    ReleaseCamera(CameraHandle),
    /// Winding inversion was toggled.
    InvertWinding(bool),
    /// A camera was rendered.
    Render {
        camera: CameraHandle,
        target: Option<TargetHandle>,
        winding_inverted: bool,
    },
}

/// A host with no GPU behind it.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    active_camera: Option<ViewerCamera>,
    events: Vec<HostEvent>,
    renders: Vec<MirrorCameraState>,
    live_targets: BTreeMap<TargetHandle, TargetDescriptor>,
    live_cameras: BTreeSet<CameraHandle>,
    winding_inverted: bool,
    next_id: u64,
    fail_allocations: bool,
    fail_renders: bool,
}

impl HeadlessHost {
    /// Creates a host with no active camera.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a host whose active camera is `viewer`.
    pub fn with_camera(viewer: ViewerCamera) -> Self {
        Self {
            active_camera: Some(viewer),
            ..Self::default()
        }
    }

    /// Replaces the active camera.
    pub fn set_active_camera(&mut self, viewer: Option<ViewerCamera>) {
        self.active_camera = viewer;
    }

    /// Makes target and camera allocation fail.
    pub fn set_fail_allocations(&mut self, fail: bool) {
        self.fail_allocations = fail;
    }

    /// Makes rendering fail.
    pub fn set_fail_renders(&mut self, fail: bool) {
        self.fail_renders = fail;
    }

    /// Every call recorded so far.
    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    /// Forgets recorded events and renders. Live resources are kept.
    pub fn clear_events(&mut self) {
        self.events.clear();
        self.renders.clear();
    }

    /// Camera state as it was at each render call.
    pub fn renders(&self) -> &[MirrorCameraState] {
        &self.renders
    }

    /// Number of target allocations recorded.
    pub fn allocation_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, HostEvent::AllocateTarget { .. }))
            .count()
    }

    /// Targets allocated and not yet released.
    pub fn live_targets(&self) -> impl Iterator<Item = (&TargetHandle, &TargetDescriptor)> {
        self.live_targets.iter()
    }

    /// Number of live targets.
    pub fn live_target_count(&self) -> usize {
        self.live_targets.len()
    }

    /// Descriptor a live target was allocated with.
    pub fn target_descriptor(&self, target: TargetHandle) -> Option<&TargetDescriptor> {
        self.live_targets.get(&target)
    }

    /// Number of live camera proxies.
    pub fn live_camera_count(&self) -> usize {
        self.live_cameras.len()
    }

    /// Current winding inversion state.
    pub fn winding_inverted(&self) -> bool {
        self.winding_inverted
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl TargetAllocator for HeadlessHost {
    fn allocate_render_target(&mut self, descriptor: &TargetDescriptor) -> Result<TargetHandle> {
        if self.fail_allocations {
            return Err(ReflectionError::ResourceError(format!(
                "headless allocation of {}x{} refused",
                descriptor.width, descriptor.height
            )));
        }
        let target = TargetHandle(self.next_id());
        self.live_targets.insert(target, descriptor.clone());
        self.events.push(HostEvent::AllocateTarget {
            target,
            descriptor: descriptor.clone(),
        });
        Ok(target)
    }

    fn release_render_target(&mut self, target: TargetHandle) {
        if self.live_targets.remove(&target).is_some() {
            self.events.push(HostEvent::ReleaseTarget(target));
        } else {
            log::warn!("release of unknown render target {target}");
        }
    }
}

impl RenderHost for HeadlessHost {
    fn active_camera(&self) -> Option<ViewerCamera> {
        self.active_camera.clone()
    }

    fn create_camera_proxy(&mut self) -> Result<CameraHandle> {
        if self.fail_allocations {
            return Err(ReflectionError::ResourceError(
                "headless camera creation refused".into(),
            ));
        }
        let camera = CameraHandle(self.next_id());
        self.live_cameras.insert(camera);
        self.events.push(HostEvent::CreateCamera(camera));
        Ok(camera)
    }

    fn release_camera_proxy(&mut self, camera: CameraHandle) {
        if self.live_cameras.remove(&camera) {
            self.events.push(HostEvent::ReleaseCamera(camera));
        } else {
            log::warn!("release of unknown camera proxy {camera}");
        }
    }

    fn set_invert_winding(&mut self, inverted: bool) {
        self.winding_inverted = inverted;
        self.events.push(HostEvent::InvertWinding(inverted));
    }

    fn render(&mut self, camera: &MirrorCameraState) -> Result<()> {
        self.events.push(HostEvent::Render {
            camera: camera.handle,
            target: camera.target,
            winding_inverted: self.winding_inverted,
        });
        self.renders.push(camera.clone());
        if self.fail_renders {
            return Err(ReflectionError::RenderFailed(format!(
                "headless render of {} failed",
                camera.handle
            )));
        }
        if !self.live_cameras.contains(&camera.handle) {
            return Err(ReflectionError::RenderFailed(format!(
                "{} is not a live camera proxy",
                camera.handle
            )));
        }
        Ok(())
    }
}

/// Material sink that remembers what was bound where.
#[derive(Debug, Default)]
pub struct RecordingMaterials {
    bindings: HashMap<(String, String), TargetHandle>,
    history: Vec<(String, String, TargetHandle)>,
}

impl RecordingMaterials {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture currently bound to `slot` on `material`.
    pub fn texture(&self, material: &str, slot: &str) -> Option<TargetHandle> {
        self.bindings
            .get(&(material.to_owned(), slot.to_owned()))
            .copied()
    }

    /// Number of `set_texture` calls so far.
    pub fn set_count(&self) -> usize {
        self.history.len()
    }

    /// Every binding in call order.
    pub fn history(&self) -> &[(String, String, TargetHandle)] {
        &self.history
    }
}

impl MaterialSink for RecordingMaterials {
    fn set_texture(&mut self, material: &str, slot: &str, target: TargetHandle) {
        self.bindings
            .insert((material.to_owned(), slot.to_owned()), target);
        self.history
            .push((material.to_owned(), slot.to_owned(), target));
    }
}
