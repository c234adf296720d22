// SPDX-License-Identifier: GPL-3.0-only

//! Error types for awareness-buffer processing

use std::fmt;

/// Result type alias using ProcessorError
pub type ProcessorResult<T> = Result<T, ProcessorError>;

/// Errors surfaced by the buffer processor and texture materialization
///
/// Expected per-tick degradations (absent frame, absent camera, failed
/// buffer copy) are logged and skipped rather than reported here; this enum
/// covers the conditions a caller can meaningfully react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessorError {
    /// No awareness buffer has been received yet
    NoBuffer,
    /// A texture store of a different pixel format already exists at the
    /// requested dimensions (format is fixed at first allocation)
    FormatConflict {
        /// Width of the existing store
        width: u32,
        /// Height of the existing store
        height: u32,
        /// Format of the existing store
        existing: &'static str,
        /// Format the operation asked for
        requested: &'static str,
    },
}

impl fmt::Display for ProcessorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessorError::NoBuffer => write!(f, "No awareness buffer received yet"),
            ProcessorError::FormatConflict {
                width,
                height,
                existing,
                requested,
            } => write!(
                f,
                "Texture format conflict at {}x{}: existing store is {}, requested {}",
                width, height, existing, requested
            ),
        }
    }
}

impl std::error::Error for ProcessorError {}
