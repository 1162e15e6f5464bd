//! Render layer masks.

use std::ops::{BitAnd, BitOr, Not};

use serde::{Deserialize, Serialize};

/// Layer index reserved for water and other reflective surfaces.
///
/// The mirror camera never renders this layer, so a surface cannot reflect itself.
pub const WATER_LAYER: u32 = 4;

/// A bitmask selecting which of the 32 render layers participate in a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Every layer.
    pub const ALL: Self = Self(u32::MAX);
    /// No layer.
    pub const NONE: Self = Self(0);

    /// Mask containing a single layer.
    ///
    /// Layers outside `0..32` produce an empty mask.
    pub fn layer(index: u32) -> Self {
        Self(1u32.checked_shl(index).unwrap_or(0))
    }

    /// Returns the raw bits.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Returns whether `index` is part of the mask.
    pub fn contains(self, index: u32) -> bool {
        self.0 & Self::layer(index).0 != 0
    }

    /// Returns this mask with `index` added.
    #[must_use]
    pub fn with(self, index: u32) -> Self {
        self | Self::layer(index)
    }

    /// Returns this mask with `index` removed.
    #[must_use]
    pub fn without(self, index: u32) -> Self {
        self & !Self::layer(index)
    }

    /// Returns whether no layer is selected.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitAnd for LayerMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for LayerMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl Not for LayerMask {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_all() {
        assert_eq!(LayerMask::default(), LayerMask::ALL);
        assert!(LayerMask::ALL.contains(WATER_LAYER));
    }

    #[test]
    fn test_without_water() {
        let mask = LayerMask::ALL.without(WATER_LAYER);
        assert!(!mask.contains(WATER_LAYER));
        assert!(mask.contains(0));
        assert!(mask.contains(31));
        assert_eq!(mask.bits(), !(1 << 4));
    }

    #[test]
    fn test_with_and_layer() {
        let mask = LayerMask::NONE.with(2).with(7);
        assert_eq!(mask.bits(), 0b1000_0100);
        assert!(LayerMask::layer(40).is_empty());
    }
}
