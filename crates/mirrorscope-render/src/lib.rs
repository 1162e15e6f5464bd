//! Rendering side of mirrorscope.
//!
//! This crate drives a planar reflection through a host pipeline:
//! - [`RenderHost`], [`TargetAllocator`] and [`MaterialSink`], the services a pipeline provides
//! - [`ReflectionRenderer`], the per-frame mirror camera pass
//! - [`ResourceManager`] for the lazily created target and camera proxy
//! - [`GpuTargetPool`], wgpu-backed reflection targets
//! - [`HeadlessHost`], a recording host for tests and tooling

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod gpu;
pub mod headless;
pub mod host;
pub mod renderer;
pub mod resources;
pub mod uniforms;
pub mod winding;

pub use error::{RenderError, RenderResult};
pub use gpu::{request_headless_device, GpuReflectionTarget, GpuTargetPool};
pub use headless::{HeadlessHost, HostEvent, RecordingMaterials};
pub use host::{
    MaterialSink, RenderHost, TargetAllocator, TargetDescriptor, REFLECTION_DEPTH_BITS,
    REFLECTION_TARGET_LABEL, REFLECTION_TEXTURE_SLOT,
};
pub use renderer::{ReflectionOutcome, ReflectionRenderer};
pub use resources::ResourceManager;
pub use uniforms::ReflectionUniforms;
pub use winding::InvertedWinding;
