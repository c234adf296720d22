// SPDX-License-Identifier: GPL-3.0-only

//! Awareness-buffer capability contract
//!
//! The processor is generic over the concrete buffer type: anything that
//! exposes its dimensions, camera intrinsics, a fallible copy, and the
//! three transform calculators can be processed. Release is `Drop`: a
//! buffer copy is dropped exactly once, either when superseded by a newer
//! copy or when the processor is torn down.

use serde::{Deserialize, Serialize};

use crate::frame::TrackingCamera;
use crate::geometry::{Mat4, Orientation, Resolution};

/// Pinhole camera intrinsics attached to an awareness buffer
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Intrinsics {
    /// Focal length in pixels (x-axis)
    pub fx: f32,
    /// Focal length in pixels (y-axis)
    pub fy: f32,
    /// Principal point x (pixels)
    pub cx: f32,
    /// Principal point y (pixels)
    pub cy: f32,
}

impl Intrinsics {
    /// Construct from explicit parameters
    pub fn new(fx: f32, fy: f32, cx: f32, cy: f32) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// Build the normalized intrinsics matrix for a buffer of the given
    /// dimensions
    ///
    /// Focal lengths land on the diagonal and the principal point in the
    /// translation column, all divided by `width - 1` / `height - 1` so the
    /// matrix operates on normalized viewport coordinates instead of
    /// pixels. Returns `None` for degenerate dimensions (either side at or
    /// below one pixel).
    pub fn normalized(&self, width: u32, height: u32) -> Option<Mat4> {
        if width <= 1 || height <= 1 {
            return None;
        }
        let sx = (width - 1) as f32;
        let sy = (height - 1) as f32;
        Some(Mat4::from_cols([
            [self.fx / sx, 0.0, 0.0, 0.0],
            [0.0, self.fy / sy, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [self.cx / sx, self.cy / sy, 0.0, 1.0],
        ]))
    }
}

/// Capability contract for a per-frame awareness buffer (depth map,
/// semantic map, or similar per-pixel grid attached to camera intrinsics)
///
/// Implementations wrap whatever the tracking subsystem delivers. The
/// processor never shares buffer instances: it takes a copy on capture
/// because the source's lifetime may end when the frame-producing pipeline
/// iterates.
pub trait AwarenessBuffer: Sized {
    /// Camera type the transform calculators consume
    type Camera: TrackingCamera;

    /// Buffer width in samples
    fn width(&self) -> u32;

    /// Buffer height in samples
    fn height(&self) -> u32;

    /// Intrinsics of the camera that produced the buffer
    fn intrinsics(&self) -> Intrinsics;

    /// Take an owned copy of the buffer
    ///
    /// `None` models a copy failure (for example the native handle was
    /// already invalidated); the processor degrades the tick to a no-op.
    fn try_clone(&self) -> Option<Self>;

    /// Transform from the AR image plane at the given camera image
    /// resolution into buffer coordinates
    fn display_transform(&self, image_resolution: Resolution) -> Mat4;

    /// Temporal correction transform for camera motion during the buffer's
    /// inference latency
    ///
    /// `preference` in [0, 1] trades off alignment with near vs. far
    /// content.
    fn interpolation_transform(
        &self,
        camera: &Self::Camera,
        orientation: Orientation,
        preference: f32,
    ) -> Mat4;

    /// Transform from the buffer's camera space into world space at the
    /// given camera pose
    fn camera_to_world_transform(&self, camera: &Self::Camera) -> Mat4;

    /// Buffer dimensions as a [`Resolution`]
    fn resolution(&self) -> Resolution {
        Resolution::new(self.width(), self.height())
    }
}
