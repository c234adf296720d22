// SPDX-License-Identifier: GPL-3.0-only

//! Processor configuration types
//!
//! All types here are serde-serializable so a host application can persist
//! them alongside its own settings.

use serde::{Deserialize, Serialize};

/// Default interpolation preference, biasing temporal correction toward
/// alignment with far-field content
pub const DEFAULT_INTERPOLATION_PREFERENCE: f32 = 0.9;

/// Temporal interpolation policy
///
/// Selects how the sampling position is corrected for camera motion that
/// occurred during the buffer's inference latency window.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum InterpolationMode {
    /// No temporal correction; the sampler transform is the display
    /// transform alone
    None,
    /// Correct only when a new keyframe buffer arrives
    #[default]
    Balanced,
    /// Correct every tick, tracking continuous camera motion even between
    /// keyframes
    Smooth,
}

/// When the camera-to-world transform is recomputed
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum PoseUpdatePolicy {
    /// Recompute every tick, so consumers sampling world-space positions
    /// always see the current camera pose
    #[default]
    EveryTick,
    /// Recompute only on ticks where the visible representation changed,
    /// keeping the pose consistent with the awareness-buffer timestamp
    OnRepresentationChange,
}

/// Runtime configuration for a [`BufferProcessor`](crate::BufferProcessor)
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct ProcessorConfig {
    /// Temporal interpolation policy
    pub interpolation_mode: InterpolationMode,
    /// Near/far alignment trade-off in [0, 1]; clamped on construction and
    /// on every write through the processor setter
    pub interpolation_preference: f32,
    /// Camera-to-world recompute cadence
    pub pose_update_policy: PoseUpdatePolicy,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            interpolation_mode: InterpolationMode::default(),
            interpolation_preference: DEFAULT_INTERPOLATION_PREFERENCE,
            pose_update_policy: PoseUpdatePolicy::default(),
        }
    }
}

impl ProcessorConfig {
    /// Clamp fields to their valid ranges
    pub fn clamped(mut self) -> Self {
        self.interpolation_preference = self.interpolation_preference.clamp(0.0, 1.0);
        self
    }
}
