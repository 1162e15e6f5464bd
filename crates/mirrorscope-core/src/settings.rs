//! Configuration for a reflective surface.

use serde::{Deserialize, Serialize};

use crate::error::{ReflectionError, Result};
use crate::layers::LayerMask;

/// How the mirror camera's orientation is derived from the viewer's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrientationRule {
    /// Negate the viewer's pitch and keep yaw and roll.
    ///
    /// Exact only for horizontal planes.
    #[default]
    NegatePitch,
    /// Take the orientation from the rotation part of the mirrored view matrix.
    ReflectBasis,
}

/// Settings for one reflective surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectionSettings {
    /// Width and height of the reflection texture in pixels.
    pub texture_resolution: u32,
    /// Distance the reflection plane is pushed along the surface normal.
    pub clip_plane_offset: f32,
    /// Layers rendered into the reflection. The water layer is always excluded.
    pub reflect_layers: LayerMask,
    /// Material receiving the reflection texture, if any.
    pub water_material: Option<String>,
    /// Orientation rule for the mirror camera.
    pub orientation: OrientationRule,
}

impl Default for ReflectionSettings {
    fn default() -> Self {
        Self {
            texture_resolution: 512,
            clip_plane_offset: 0.07,
            reflect_layers: LayerMask::ALL,
            water_material: None,
            orientation: OrientationRule::NegatePitch,
        }
    }
}

impl ReflectionSettings {
    /// Creates settings that publish to the named material.
    pub fn with_material(material: impl Into<String>) -> Self {
        Self {
            water_material: Some(material.into()),
            ..Self::default()
        }
    }

    /// Sets the texture resolution, clamped to at least one pixel.
    pub fn set_texture_resolution(&mut self, resolution: u32) {
        self.texture_resolution = resolution.max(1);
    }

    /// Sets the clip plane offset, clamped to be non-negative.
    pub fn set_clip_plane_offset(&mut self, offset: f32) {
        self.clip_plane_offset = offset.max(0.0);
    }

    /// Checks the settings can drive a render.
    pub fn validate(&self) -> Result<()> {
        if self.texture_resolution == 0 {
            return Err(ReflectionError::InvalidSettings(
                "texture_resolution must be greater than zero".into(),
            ));
        }
        if !self.clip_plane_offset.is_finite() || self.clip_plane_offset < 0.0 {
            return Err(ReflectionError::InvalidSettings(format!(
                "clip_plane_offset must be finite and non-negative, got {}",
                self.clip_plane_offset
            )));
        }
        Ok(())
    }

    /// Parses and validates settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serializes the settings to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
