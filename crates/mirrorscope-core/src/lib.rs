//! Core abstractions for mirrorscope.
//!
//! This crate holds everything about a planar reflection that does not touch a GPU:
//! - [`reflection`] math: reflection matrix, camera-space clip plane, oblique projection
//! - [`ReflectivePlane`] and [`SurfaceTransform`] for the reflecting surface
//! - [`ReflectionSettings`] and [`LayerMask`] configuration
//! - Camera descriptions for the viewer and the mirror camera
//! - [`RenderContext`], the re-entrancy guard shared by all reflective surfaces

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Matrix entries are written out with short component names
#![allow(clippy::many_single_char_names)]

pub mod camera;
pub mod context;
pub mod error;
pub mod handle;
pub mod layers;
pub mod plane;
pub mod reflection;
pub mod settings;

pub use camera::{
    euler_to_rotation, rotation_to_euler, CameraConfig, ClearFlags, MirrorCameraState,
    ProjectionMode, RenderPath, ViewerCamera,
};
pub use context::{ReflectionScope, RenderContext};
pub use error::{ReflectionError, Result};
pub use handle::{CameraHandle, TargetHandle};
pub use layers::{LayerMask, WATER_LAYER};
pub use plane::{ReflectivePlane, SurfaceTransform};
pub use reflection::{
    camera_space_plane, mirrored_euler, oblique_projection, plane_reflection_matrix,
    reflected_euler, reflection_matrix,
};
pub use settings::{OrientationRule, ReflectionSettings};

// Re-export glam types for convenience
pub use glam::{Mat4, Quat, Vec3, Vec4};
