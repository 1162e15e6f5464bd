//! Scoped winding-order inversion.

use std::ops::{Deref, DerefMut};

use crate::host::RenderHost;

/// Keeps the host's winding inversion on while alive.
///
/// A mirror transform flips handedness, so front faces would be culled as back
/// faces. Inversion is switched off again when the scope drops, including when
/// the render in between fails or panics.
#[must_use = "winding inversion ends as soon as the scope is dropped"]
pub struct InvertedWinding<'a, H: RenderHost + ?Sized> {
    host: &'a mut H,
}

impl<'a, H: RenderHost + ?Sized> InvertedWinding<'a, H> {
    /// Turns inversion on.
    pub fn begin(host: &'a mut H) -> Self {
        host.set_invert_winding(true);
        Self { host }
    }
}

impl<H: RenderHost + ?Sized> Deref for InvertedWinding<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: RenderHost + ?Sized> DerefMut for InvertedWinding<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.host
    }
}

impl<H: RenderHost + ?Sized> Drop for InvertedWinding<'_, H> {
    fn drop(&mut self) {
        self.host.set_invert_winding(false);
    }
}
