// SPDX-License-Identifier: GPL-3.0-only

//! Awareness-buffer processing core for AR session streams
//!
//! This library turns a raw per-frame awareness buffer (a depth or
//! semantic map produced by a tracking stream, possibly arriving at a
//! lower or irregular cadence than the display refresh) into a
//! display-ready, temporally-smoothed buffer plus a composed sampling
//! transform usable by shaders or CPU code.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`processor`]: the per-stream [`BufferProcessor`] tick, dropped-frame
//!   recovery, and stream notifications
//! - [`buffer`]: the awareness-buffer capability contract and camera
//!   intrinsics
//! - [`frame`]: frame/camera capability contracts for the tracking
//!   collaborator
//! - [`geometry`]: viewport math and the 4x4 sampling transform type
//! - [`texture`]: CPU texture materialization targets
//! - [`viz`]: stock depth-visualization sampling functions
//! - [`config`]: runtime processor configuration
//!
//! # Example
//!
//! ```ignore
//! let mut processor = BufferProcessor::<DepthBuffer>::new();
//! let handle = processor.dropped_frame_handle();
//! // per rendered frame, on the primary context:
//! processor.process_frame(Some(&frame), new_buffer.as_ref(), viewport, orientation);
//! // from the pipeline's drop callback, on any context:
//! handle.register(dropped_buffer.as_ref());
//! ```

pub mod buffer;
pub mod config;
pub mod errors;
pub mod frame;
pub mod geometry;
pub mod processor;
pub mod texture;
pub mod viz;

// Re-export commonly used types
pub use buffer::{AwarenessBuffer, Intrinsics};
pub use config::{
    DEFAULT_INTERPOLATION_PREFERENCE, InterpolationMode, PoseUpdatePolicy, ProcessorConfig,
};
pub use errors::{ProcessorError, ProcessorResult};
pub use frame::{TrackingCamera, TrackingFrame};
pub use geometry::{Mat4, Orientation, Resolution};
pub use processor::{BufferProcessor, DroppedFrameHandle, StreamBegan, StreamUpdated};
pub use texture::{TextureTarget, container_resolution};
