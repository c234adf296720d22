// SPDX-License-Identifier: GPL-3.0-only

//! CPU texture materialization
//!
//! Turns the current awareness buffer into a display-oriented pixel store:
//! a 4-channel RGBA image or a single-channel f32 image. The caller
//! supplies the per-pixel sampling function; this module owns container
//! sizing, store allocation, and the sampling loop.

use image::{ImageBuffer, Luma, RgbaImage};
use tracing::{debug, error};

use crate::errors::{ProcessorError, ProcessorResult};
use crate::geometry::{Orientation, Resolution};

/// Single-channel f32 image store
pub type ScalarImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Compute the output container's resolution for a buffer materialized at
/// the requested orientation
///
/// The sampled image is produced pre-rotated into container space: when the
/// buffer's natural orientation class (landscape iff width > height)
/// disagrees with the requested orientation's class, width and height are
/// swapped; otherwise the buffer dimensions pass through unchanged.
pub fn container_resolution(buffer: Resolution, orientation: Orientation) -> Resolution {
    if buffer.is_landscape() != orientation.is_landscape() {
        buffer.swapped()
    } else {
        buffer
    }
}

/// Backing pixel store, fixed to one format at first allocation
enum TextureStore {
    Color(RgbaImage),
    Scalar(ScalarImage),
}

impl TextureStore {
    fn format_name(&self) -> &'static str {
        match self {
            TextureStore::Color(_) => "rgba8",
            TextureStore::Scalar(_) => "r32f",
        }
    }

    fn resolution(&self) -> Resolution {
        match self {
            TextureStore::Color(img) => Resolution::new(img.width(), img.height()),
            TextureStore::Scalar(img) => Resolution::new(img.width(), img.height()),
        }
    }
}

/// A reusable materialization target
///
/// Holds the backing pixel store plus a pre-sized intermediate sample
/// buffer, so steady-state materialization performs no allocation. One
/// target serves one output texture; the pixel format is fixed by the
/// first materialization call.
#[derive(Default)]
pub struct TextureTarget {
    store: Option<TextureStore>,
    scratch_color: Vec<u8>,
    scratch_scalar: Vec<f32>,
}

impl TextureTarget {
    /// Create an empty target; the store is allocated on first use
    pub fn new() -> Self {
        Self::default()
    }

    /// Dimensions of the allocated store, if any
    pub fn resolution(&self) -> Option<Resolution> {
        self.store.as_ref().map(TextureStore::resolution)
    }

    /// The color store, if this target materializes color output
    pub fn color_image(&self) -> Option<&RgbaImage> {
        match &self.store {
            Some(TextureStore::Color(img)) => Some(img),
            _ => None,
        }
    }

    /// The scalar store, if this target materializes scalar output
    pub fn scalar_image(&self) -> Option<&ScalarImage> {
        match &self.store {
            Some(TextureStore::Scalar(img)) => Some(img),
            _ => None,
        }
    }

    /// Raw bytes of the scalar store, for handing to a GPU upload path
    pub fn scalar_bytes(&self) -> Option<&[u8]> {
        self.scalar_image()
            .map(|img| bytemuck::cast_slice(img.as_raw().as_slice()))
    }

    /// Materialize 4-channel color output at the given container
    /// resolution
    ///
    /// `sample` receives normalized pixel-center coordinates in [0, 1] and
    /// returns an RGBA value. Fails with
    /// [`ProcessorError::FormatConflict`] if this target already holds a
    /// scalar store.
    pub fn fill_color<S>(&mut self, resolution: Resolution, mut sample: S) -> ProcessorResult<()>
    where
        S: FnMut(f32, f32) -> [u8; 4],
    {
        self.ensure_color_store(resolution)?;

        let w = resolution.width as usize;
        let h = resolution.height as usize;
        self.scratch_color.resize(w * h * 4, 0);

        let inv_w = 1.0 / w as f32;
        let inv_h = 1.0 / h as f32;
        for (i, out) in self.scratch_color.chunks_exact_mut(4).enumerate() {
            let u = ((i % w) as f32 + 0.5) * inv_w;
            let v = ((i / w) as f32 + 0.5) * inv_h;
            out.copy_from_slice(&sample(u, v));
        }

        // Single-copy upload into the store, one mip level
        if let Some(TextureStore::Color(img)) = &mut self.store {
            img.copy_from_slice(&self.scratch_color);
        }
        Ok(())
    }

    /// Materialize single-channel scalar output at the given container
    /// resolution
    ///
    /// `sample` receives normalized pixel-center coordinates in [0, 1] and
    /// returns the scalar value. Fails with
    /// [`ProcessorError::FormatConflict`] if this target already holds a
    /// color store.
    pub fn fill_scalar<S>(&mut self, resolution: Resolution, mut sample: S) -> ProcessorResult<()>
    where
        S: FnMut(f32, f32) -> f32,
    {
        self.ensure_scalar_store(resolution)?;

        let w = resolution.width as usize;
        let h = resolution.height as usize;
        self.scratch_scalar.resize(w * h, 0.0);

        let inv_w = 1.0 / w as f32;
        let inv_h = 1.0 / h as f32;
        for (i, out) in self.scratch_scalar.iter_mut().enumerate() {
            let u = ((i % w) as f32 + 0.5) * inv_w;
            let v = ((i / w) as f32 + 0.5) * inv_h;
            *out = sample(u, v);
        }

        if let Some(TextureStore::Scalar(img)) = &mut self.store {
            img.copy_from_slice(&self.scratch_scalar);
        }
        Ok(())
    }

    fn ensure_color_store(&mut self, resolution: Resolution) -> ProcessorResult<()> {
        match &self.store {
            Some(store @ TextureStore::Scalar(_)) => Err(Self::conflict(store, "rgba8")),
            Some(TextureStore::Color(img))
                if img.width() == resolution.width && img.height() == resolution.height =>
            {
                Ok(())
            }
            existing => {
                if existing.is_some() {
                    debug!(new = %resolution, "Reallocating color store for new dimensions");
                }
                self.store = Some(TextureStore::Color(RgbaImage::new(
                    resolution.width,
                    resolution.height,
                )));
                Ok(())
            }
        }
    }

    fn ensure_scalar_store(&mut self, resolution: Resolution) -> ProcessorResult<()> {
        match &self.store {
            Some(store @ TextureStore::Color(_)) => Err(Self::conflict(store, "r32f")),
            Some(TextureStore::Scalar(img))
                if img.width() == resolution.width && img.height() == resolution.height =>
            {
                Ok(())
            }
            existing => {
                if existing.is_some() {
                    debug!(new = %resolution, "Reallocating scalar store for new dimensions");
                }
                self.store = Some(TextureStore::Scalar(ScalarImage::new(
                    resolution.width,
                    resolution.height,
                )));
                Ok(())
            }
        }
    }

    fn conflict(store: &TextureStore, requested: &'static str) -> ProcessorError {
        let res = store.resolution();
        let existing = store.format_name();
        error!(
            existing,
            requested,
            resolution = %res,
            "Texture store format conflict; leaving existing store untouched"
        );
        ProcessorError::FormatConflict {
            width: res.width,
            height: res.height,
            existing,
            requested,
        }
    }
}
