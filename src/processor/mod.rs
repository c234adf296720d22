// SPDX-License-Identifier: GPL-3.0-only

//! The awareness-buffer processor
//!
//! One processor instance per stream. The primary execution context calls
//! [`BufferProcessor::process_frame`] once per rendered frame; a secondary
//! context (the frame pipeline's drop callback) may park buffers through
//! [`DroppedFrameHandle::register`] at any time. The processor owns the
//! live buffer, composes the sampling transforms, and materializes the
//! buffer into CPU textures on request.

mod dropped;
mod events;

pub use dropped::DroppedFrameHandle;
pub use events::{StreamBegan, StreamUpdated};

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::buffer::AwarenessBuffer;
use crate::config::{InterpolationMode, PoseUpdatePolicy, ProcessorConfig};
use crate::errors::{ProcessorError, ProcessorResult};
use crate::frame::{TrackingCamera, TrackingFrame};
use crate::geometry::{Mat4, Orientation, Resolution};
use crate::texture::{TextureTarget, container_resolution};
use dropped::DroppedFrameSlot;
use events::EventRegistry;

/// Turns a raw per-frame awareness buffer into a display-ready,
/// temporally-smoothed buffer plus a composed sampling transform
///
/// Generic over any buffer type implementing [`AwarenessBuffer`]. All
/// entry points are synchronous and bounded; the processor creates no
/// threads of its own.
pub struct BufferProcessor<B: AwarenessBuffer> {
    config: ProcessorConfig,
    current: Option<B>,
    dropped: Arc<DroppedFrameSlot<B>>,
    events: EventRegistry,

    // Transform from the AR image plane into buffer coordinates, fixed at
    // the first keyframe
    image_to_buffer: Mat4,
    display_transform: Mat4,
    interpolation_transform: Mat4,
    sampler_transform: Option<Mat4>,
    back_projection_transform: Option<Mat4>,
    camera_to_world_transform: Option<Mat4>,

    // Last-seen viewport, to detect when the display transform is stale
    viewport: Option<(Resolution, Orientation)>,
    did_receive_first_update: bool,
}

impl<B: AwarenessBuffer> BufferProcessor<B> {
    /// Create a processor with default configuration
    pub fn new() -> Self {
        Self::with_config(ProcessorConfig::default())
    }

    /// Create a processor with explicit configuration
    ///
    /// The interpolation preference is clamped to [0, 1].
    pub fn with_config(config: ProcessorConfig) -> Self {
        Self {
            config: config.clamped(),
            current: None,
            dropped: Arc::new(DroppedFrameSlot::new()),
            events: EventRegistry::new(),
            image_to_buffer: Mat4::IDENTITY,
            display_transform: Mat4::IDENTITY,
            interpolation_transform: Mat4::IDENTITY,
            sampler_transform: None,
            back_projection_transform: None,
            camera_to_world_transform: None,
            viewport: None,
            did_receive_first_update: false,
        }
    }

    /// The core per-frame tick
    ///
    /// Expected to run once per rendered frame on the primary execution
    /// context. Updates the live buffer from `buffer` (or from a parked
    /// dropped-frame buffer), recomputes any transform invalidated by
    /// orientation, resolution, or buffer changes, and fires notifications
    /// when the visible representation changed. Missing inputs degrade to
    /// a logged no-op; the caller's per-frame cadence is the retry
    /// mechanism.
    pub fn process_frame<F>(
        &mut self,
        frame: Option<&F>,
        buffer: Option<&B>,
        viewport: Resolution,
        orientation: Orientation,
    ) where
        F: TrackingFrame<Camera = B::Camera>,
    {
        let Some(frame) = frame else {
            debug!("No frame supplied; skipping tick");
            return;
        };
        let Some(camera) = frame.camera() else {
            debug!("Frame has no camera yet; skipping tick");
            return;
        };

        // A directly supplied buffer wins over a parked one, but the slot
        // is drained either way: once a newer keyframe exists, the parked
        // copy is stale
        let drained = self.dropped.take();
        let update = buffer.or(drained.as_ref());

        let mut updated_this_tick = false;
        if let Some(update) = update {
            match update.try_clone() {
                Some(copy) => {
                    self.current = Some(copy);
                    updated_this_tick = true;
                }
                None => warn!("Awareness buffer copy failed; treating tick as empty"),
            }
        }

        let Some(current) = self.current.as_ref() else {
            debug!("No awareness buffer received yet");
            return;
        };

        let is_first_update = updated_this_tick && !self.did_receive_first_update;
        if is_first_update {
            self.did_receive_first_update = true;
            self.image_to_buffer = current.display_transform(camera.image_resolution());
            info!(
                buffer = %current.resolution(),
                image = %camera.image_resolution(),
                "Awareness stream began"
            );
            self.events.emit_began(StreamBegan {
                buffer_resolution: current.resolution(),
                intrinsics: current.intrinsics(),
            });
        }

        let viewport_key = (viewport, orientation);
        let recompute_display = is_first_update || self.viewport != Some(viewport_key);
        if recompute_display {
            self.viewport = Some(viewport_key);
            self.display_transform =
                self.image_to_buffer * frame.display_transform(orientation, viewport);
        }

        let recompute_interpolation = match self.config.interpolation_mode {
            InterpolationMode::None => false,
            InterpolationMode::Balanced => updated_this_tick,
            // Smooth corrects for camera motion during the inference
            // latency window, so it recomputes even without new data
            InterpolationMode::Smooth => true,
        };
        if recompute_interpolation {
            self.interpolation_transform = current.interpolation_transform(
                camera,
                orientation,
                self.config.interpolation_preference,
            );
        }

        let sampler_changed = recompute_display || recompute_interpolation;
        if sampler_changed {
            self.sampler_transform = Some(match self.config.interpolation_mode {
                InterpolationMode::None => self.display_transform,
                _ => self.interpolation_transform * self.display_transform,
            });
        }

        if updated_this_tick {
            let intrinsics = current.intrinsics();
            match intrinsics
                .normalized(current.width(), current.height())
                .and_then(|ni| ni.inverse_affine())
            {
                Some(inv) => {
                    self.back_projection_transform = Some(inv * self.display_transform);
                }
                None => warn!(
                    buffer = %current.resolution(),
                    "Normalized intrinsics not invertible; keeping previous back-projection"
                ),
            }
        }

        let recompute_pose = match self.config.pose_update_policy {
            PoseUpdatePolicy::EveryTick => true,
            PoseUpdatePolicy::OnRepresentationChange => updated_this_tick || sampler_changed,
        };
        if recompute_pose {
            self.camera_to_world_transform = Some(current.camera_to_world_transform(camera));
        }

        if updated_this_tick || sampler_changed {
            self.events.emit_updated(StreamUpdated {
                keyframe: updated_this_tick,
            });
        }
    }

    /// Park a dropped frame's buffer for recovery on the next tick
    ///
    /// Safe to call from a non-primary execution context concurrently with
    /// [`Self::process_frame`]: only the back-buffer slot is written,
    /// never the live buffer. The frame accompanying the drop is accepted
    /// for signature parity with the pipeline's drop callback and is not
    /// otherwise consulted. Absent buffers are a no-op.
    pub fn register_dropped_frame<F>(&self, _frame: Option<&F>, buffer: Option<&B>)
    where
        F: TrackingFrame,
    {
        self.dropped.register(buffer);
    }

    /// A clonable handle for registering dropped-frame buffers without a
    /// reference to the processor
    pub fn dropped_frame_handle(&self) -> DroppedFrameHandle<B> {
        DroppedFrameHandle {
            slot: Arc::clone(&self.dropped),
        }
    }

    /// Subscribe to the one-time stream-began notification
    ///
    /// If the stream has already begun, the handler is invoked
    /// synchronously with the stream-began snapshot before this call
    /// returns, so late subscribers never miss the ready signal. The
    /// sampler transform becomes usable with the first stream-updated
    /// notification that follows.
    pub fn on_stream_began<H>(&mut self, handler: H)
    where
        H: FnMut(StreamBegan) + Send + 'static,
    {
        self.events.subscribe_began(handler);
    }

    /// Subscribe to per-tick representation updates
    pub fn on_stream_updated<H>(&mut self, handler: H)
    where
        H: FnMut(StreamUpdated) + Send + 'static,
    {
        self.events.subscribe_updated(handler);
    }

    /// Materialize the current buffer into 4-channel color output
    ///
    /// The container resolution is derived from the buffer dimensions and
    /// `orientation`; `sample` is invoked once per output pixel with
    /// normalized pixel-center coordinates.
    pub fn materialize_color<S>(
        &self,
        target: &mut TextureTarget,
        orientation: Orientation,
        sample: S,
    ) -> ProcessorResult<()>
    where
        S: FnMut(f32, f32) -> [u8; 4],
    {
        let Some(buffer) = self.current.as_ref() else {
            debug!("Color materialization requested before any buffer arrived");
            return Err(ProcessorError::NoBuffer);
        };
        target.fill_color(container_resolution(buffer.resolution(), orientation), sample)
    }

    /// Materialize the current buffer into single-channel scalar output
    pub fn materialize_scalar<S>(
        &self,
        target: &mut TextureTarget,
        orientation: Orientation,
        sample: S,
    ) -> ProcessorResult<()>
    where
        S: FnMut(f32, f32) -> f32,
    {
        let Some(buffer) = self.current.as_ref() else {
            debug!("Scalar materialization requested before any buffer arrived");
            return Err(ProcessorError::NoBuffer);
        };
        target.fill_scalar(container_resolution(buffer.resolution(), orientation), sample)
    }

    /// Map a normalized viewport coordinate plus depth to a camera-space
    /// point through the back-projection transform
    ///
    /// `None` until the first keyframe buffer has been processed.
    pub fn back_project(&self, u: f32, v: f32, depth: f32) -> Option<[f32; 3]> {
        let p = self.back_projection_transform?.transform_point([u, v, 1.0]);
        Some([p[0] * depth, p[1] * depth, p[2] * depth])
    }

    /// The live awareness buffer, if any keyframe has been processed
    pub fn current_buffer(&self) -> Option<&B> {
        self.current.as_ref()
    }

    /// Composed sampling transform; `None` before the first keyframe
    pub fn sampler_transform(&self) -> Option<Mat4> {
        self.sampler_transform
    }

    /// Back-projection transform; `None` before the first keyframe
    pub fn back_projection_transform(&self) -> Option<Mat4> {
        self.back_projection_transform
    }

    /// Camera-to-world transform; `None` before the first keyframe
    pub fn camera_to_world_transform(&self) -> Option<Mat4> {
        self.camera_to_world_transform
    }

    /// Last viewport resolution seen by [`Self::process_frame`]
    pub fn viewport_resolution(&self) -> Option<Resolution> {
        self.viewport.map(|(resolution, _)| resolution)
    }

    /// Whether the stream-began notification has fired
    pub fn stream_began(&self) -> bool {
        self.events.has_begun()
    }

    /// Current interpolation mode
    pub fn interpolation_mode(&self) -> InterpolationMode {
        self.config.interpolation_mode
    }

    /// Set the interpolation mode; takes effect on the next tick
    pub fn set_interpolation_mode(&mut self, mode: InterpolationMode) {
        self.config.interpolation_mode = mode;
    }

    /// Current interpolation preference
    pub fn interpolation_preference(&self) -> f32 {
        self.config.interpolation_preference
    }

    /// Set the interpolation preference, clamped to [0, 1]
    pub fn set_interpolation_preference(&mut self, preference: f32) {
        self.config.interpolation_preference = preference.clamp(0.0, 1.0);
    }

    /// Current pose-update policy
    pub fn pose_update_policy(&self) -> PoseUpdatePolicy {
        self.config.pose_update_policy
    }

    /// Set the pose-update policy
    pub fn set_pose_update_policy(&mut self, policy: PoseUpdatePolicy) {
        self.config.pose_update_policy = policy;
    }

    /// Whether a dropped-frame buffer is parked awaiting the next tick
    pub fn has_pending_dropped_frame(&self) -> bool {
        self.dropped.is_occupied()
    }

    /// Release both buffer slots and close the dropped-frame slot
    ///
    /// Idempotent; also runs on drop as a safety net, but explicit
    /// disposal is the primary contract.
    pub fn dispose(&mut self) {
        if self.current.take().is_some() {
            debug!("Released live awareness buffer");
        }
        self.dropped.close();
    }
}

impl<B: AwarenessBuffer> Default for BufferProcessor<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: AwarenessBuffer> Drop for BufferProcessor<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}
