// SPDX-License-Identifier: GPL-3.0-only

//! Notification channels for the buffer processor
//!
//! Two channels: stream-began fires once per processor lifetime and is
//! replayed synchronously to late subscribers, so no subscriber misses the
//! ready signal regardless of subscribe timing; stream-updated fires on
//! every representation-changing tick.

use crate::buffer::Intrinsics;
use crate::geometry::Resolution;

/// Payload of the stream-began notification
///
/// Captured when the first keyframe buffer is processed; the same snapshot
/// is replayed to subscribers that attach after the stream has started.
#[derive(Clone, Copy, Debug)]
pub struct StreamBegan {
    /// Dimensions of the awareness buffer that started the stream
    pub buffer_resolution: Resolution,
    /// Intrinsics of the camera that produced it
    pub intrinsics: Intrinsics,
}

/// Payload of the stream-updated notification
#[derive(Clone, Copy, Debug)]
pub struct StreamUpdated {
    /// `true` when a new keyframe buffer arrived this tick, `false` for a
    /// transform-only refresh
    pub keyframe: bool,
}

type BeganHandler = Box<dyn FnMut(StreamBegan) + Send>;
type UpdatedHandler = Box<dyn FnMut(StreamUpdated) + Send>;

/// Subscription registry backing both channels
#[derive(Default)]
pub(crate) struct EventRegistry {
    began: Vec<BeganHandler>,
    updated: Vec<UpdatedHandler>,
    began_snapshot: Option<StreamBegan>,
}

impl EventRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn has_begun(&self) -> bool {
        self.began_snapshot.is_some()
    }

    /// Subscribe to stream-began; replays immediately if the stream has
    /// already started
    pub(crate) fn subscribe_began<H>(&mut self, mut handler: H)
    where
        H: FnMut(StreamBegan) + Send + 'static,
    {
        if let Some(snapshot) = self.began_snapshot {
            handler(snapshot);
        }
        self.began.push(Box::new(handler));
    }

    pub(crate) fn subscribe_updated<H>(&mut self, handler: H)
    where
        H: FnMut(StreamUpdated) + Send + 'static,
    {
        self.updated.push(Box::new(handler));
    }

    /// Fire stream-began, delivered synchronously to every current
    /// subscriber in subscription order
    pub(crate) fn emit_began(&mut self, snapshot: StreamBegan) {
        self.began_snapshot = Some(snapshot);
        for handler in &mut self.began {
            handler(snapshot);
        }
    }

    pub(crate) fn emit_updated(&mut self, update: StreamUpdated) {
        for handler in &mut self.updated {
            handler(update);
        }
    }
}
