// SPDX-License-Identifier: GPL-3.0-only

//! Dropped-frame buffer recovery
//!
//! When the frame pipeline drops a frame that was carrying a keyframe
//! buffer, the drop callback runs off the primary execution context. The
//! buffer is parked here and drained into the live slot by the next
//! regular processing tick. Mutable state is partitioned: the secondary
//! context only ever writes this slot, never the live buffer, so the two
//! contexts cannot race on in-flight consumption.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::buffer::AwarenessBuffer;

/// The shared back-buffer slot
///
/// Last writer wins between secondary-context registrations; the lock is
/// held only for the swap, so the primary tick is never blocked for longer
/// than that.
pub(crate) struct DroppedFrameSlot<B> {
    slot: Mutex<Option<B>>,
    closed: AtomicBool,
}

impl<B: AwarenessBuffer> DroppedFrameSlot<B> {
    pub(crate) fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            closed: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<B>> {
        // A poisoned lock only means a registration panicked mid-swap; the
        // slot content is still a plain Option and safe to reuse
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Park a copy of `buffer`, replacing (and dropping) any previous
    /// content. Absent buffer and failed copies are no-ops.
    pub(crate) fn register(&self, buffer: Option<&B>) {
        if self.closed.load(Ordering::SeqCst) {
            debug!("Dropped-frame slot is closed; ignoring registration");
            return;
        }
        let Some(buffer) = buffer else {
            return;
        };
        match buffer.try_clone() {
            Some(copy) => {
                *self.lock() = Some(copy);
            }
            None => {
                warn!("Failed to copy dropped-frame buffer; nothing parked");
            }
        }
    }

    /// Drain the slot, transferring ownership of any parked buffer
    pub(crate) fn take(&self) -> Option<B> {
        self.lock().take()
    }

    /// Whether a parked buffer is waiting
    pub(crate) fn is_occupied(&self) -> bool {
        self.lock().is_some()
    }

    /// Drop any parked buffer and refuse further registrations
    pub(crate) fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        *self.lock() = None;
    }
}

/// Clonable registration handle for the secondary execution context
///
/// Move a clone into the frame pipeline's drop callback; the callback
/// never needs a reference to the processor itself.
pub struct DroppedFrameHandle<B> {
    pub(crate) slot: Arc<DroppedFrameSlot<B>>,
}

impl<B> Clone for DroppedFrameHandle<B> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<B: AwarenessBuffer> DroppedFrameHandle<B> {
    /// Park a copy of a dropped frame's buffer for recovery on the next
    /// processing tick
    pub fn register(&self, buffer: Option<&B>) {
        self.slot.register(buffer);
    }
}
