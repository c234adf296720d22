// SPDX-License-Identifier: GPL-3.0-only

//! Shared geometry types for viewport and buffer math

mod matrix;

pub use matrix::Mat4;

use serde::{Deserialize, Serialize};

/// Display orientation of the target viewport
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Orientation {
    /// Device upright, home edge down
    #[default]
    Portrait,
    /// Device upright, home edge up
    PortraitUpsideDown,
    /// Device rotated left, home edge to the right
    LandscapeLeft,
    /// Device rotated right, home edge to the left
    LandscapeRight,
}

impl Orientation {
    /// Whether this orientation belongs to the landscape class
    pub fn is_landscape(self) -> bool {
        matches!(self, Orientation::LandscapeLeft | Orientation::LandscapeRight)
    }
}

/// A pixel resolution (viewport, image, or buffer dimensions)
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Resolution {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Resolution {
    /// Create a resolution from explicit dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether the resolution belongs to the landscape class (width > height)
    pub fn is_landscape(self) -> bool {
        self.width > self.height
    }

    /// The same resolution with width and height exchanged
    pub fn swapped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
