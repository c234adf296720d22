// SPDX-License-Identifier: GPL-3.0-only

//! Frame and camera capability contracts
//!
//! The frame source is an external collaborator (an AR session, a tracking
//! pipeline). The processor only needs camera access and a display
//! transform per tick, so that is all the contract asks for.

use crate::geometry::{Mat4, Orientation, Resolution};

/// Camera attached to a tracking frame
pub trait TrackingCamera {
    /// Resolution of the camera image the awareness buffer was inferred
    /// from
    fn image_resolution(&self) -> Resolution;
}

/// One frame delivered by the tracking pipeline
pub trait TrackingFrame {
    /// Camera type exposed by this frame
    type Camera: TrackingCamera;

    /// The frame's camera, absent while tracking is not ready
    fn camera(&self) -> Option<&Self::Camera>;

    /// Transform mapping normalized viewport coordinates of the given
    /// orientation and resolution onto the AR image plane
    fn display_transform(&self, orientation: Orientation, viewport: Resolution) -> Mat4;
}
