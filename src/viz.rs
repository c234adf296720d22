// SPDX-License-Identifier: GPL-3.0-only

//! Depth visualization samplers
//!
//! Stock per-pixel sampling functions for color materialization:
//! - Turbo colormap (blue=near, red=far)
//! - Grayscale (bright=near, dark=far)
//! Invalid depth (zero or negative) renders black.

use crate::geometry::Resolution;

/// Bands used when quantizing the colormap
pub const COLORMAP_BANDS: f32 = 32.0;

/// Turbo colormap: perceptually uniform rainbow (blue=near, red=far)
///
/// Based on: https://ai.googleblog.com/2019/08/turbo-improved-rainbow-colormap-for.html
/// Simplified version with polynomial approximation.
#[inline]
pub fn turbo(t: f32) -> [u8; 4] {
    let r = (0.13572138
        + t * (4.6153926 + t * (-42.66032 + t * (132.13108 + t * (-152.54825 + t * 59.28144)))))
        .clamp(0.0, 1.0);
    let g = (0.09140261
        + t * (2.19418 + t * (4.84296 + t * (-14.18503 + t * (4.27805 + t * 2.53377)))))
        .clamp(0.0, 1.0);
    let b = (0.1066733
        + t * (12.64194 + t * (-60.58204 + t * (109.99648 + t * (-82.52904 + t * 20.43388)))))
        .clamp(0.0, 1.0);
    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8, 255]
}

/// Grayscale depth shading: near=bright, far=dark
#[inline]
pub fn grayscale(t: f32) -> [u8; 4] {
    let gray = ((1.0 - t.clamp(0.0, 1.0)) * 255.0) as u8;
    [gray, gray, gray, 255]
}

/// Visualization style for [`depth_color`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DepthStyle {
    /// Turbo colormap
    #[default]
    Turbo,
    /// Grayscale, near=bright
    Grayscale,
}

/// Map a single depth value to an RGBA color
///
/// Depth at or below zero is invalid and renders black. Values are
/// normalized into `[near, far]`; `quantize` snaps the result to
/// [`COLORMAP_BANDS`] bands for smoother large-area visualization.
pub fn depth_color(depth: f32, near: f32, far: f32, style: DepthStyle, quantize: bool) -> [u8; 4] {
    if depth <= 0.0 {
        return [0, 0, 0, 255];
    }
    let mut t = ((depth - near) / (far - near)).clamp(0.0, 1.0);
    if quantize {
        t = (t * COLORMAP_BANDS).floor() / COLORMAP_BANDS;
    }
    match style {
        DepthStyle::Turbo => turbo(t),
        DepthStyle::Grayscale => grayscale(t),
    }
}

/// Build a color sampling function over a row-major depth grid
///
/// The returned closure samples the grid nearest-neighbor at normalized
/// coordinates, then colors the value with [`depth_color`]. Suitable for
/// passing directly to color materialization.
pub fn depth_grid_sampler(
    depth: &[f32],
    resolution: Resolution,
    near: f32,
    far: f32,
    style: DepthStyle,
) -> impl FnMut(f32, f32) -> [u8; 4] + '_ {
    let w = resolution.width;
    let h = resolution.height;
    move |u: f32, v: f32| {
        let x = ((u * w as f32) as u32).min(w.saturating_sub(1));
        let y = ((v * h as f32) as u32).min(h.saturating_sub(1));
        let d = depth
            .get((y * w + x) as usize)
            .copied()
            .unwrap_or(0.0);
        depth_color(d, near, far, style, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_invalid_is_black() {
        assert_eq!(depth_color(0.0, 0.4, 4.0, DepthStyle::Turbo, false), [0, 0, 0, 255]);
        assert_eq!(
            depth_color(-1.0, 0.4, 4.0, DepthStyle::Grayscale, false),
            [0, 0, 0, 255]
        );
    }

    #[test]
    fn test_depth_grayscale_near_bright() {
        let near = depth_color(0.4, 0.4, 4.0, DepthStyle::Grayscale, false);
        let far = depth_color(4.0, 0.4, 4.0, DepthStyle::Grayscale, false);
        assert!(near[0] > 200);
        assert!(far[0] < 50);
    }

    #[test]
    fn test_turbo_endpoints() {
        // Near end is blue-dominant, far end is red-dominant. The
        // polynomial is a loose fit at exactly 0, so sample just inside.
        let near = turbo(0.05);
        let far = turbo(0.95);
        assert!(near[2] > near[0]);
        assert!(far[0] > far[2]);
    }

    #[test]
    fn test_quantize_bands() {
        // Two nearby values inside the same band quantize identically
        let a = depth_color(2.00, 0.0, 4.0, DepthStyle::Turbo, true);
        let b = depth_color(2.05, 0.0, 4.0, DepthStyle::Turbo, true);
        assert_eq!(a, b);
    }

    #[test]
    fn test_grid_sampler_nearest() {
        let depth = vec![1.0, 2.0, 3.0, 4.0];
        let res = Resolution::new(2, 2);
        let mut sample = depth_grid_sampler(&depth, res, 0.0, 4.0, DepthStyle::Grayscale);
        // Center of the top-left cell reads the 1.0 entry (bright),
        // bottom-right reads the 4.0 entry (dark)
        let tl = sample(0.25, 0.25);
        let br = sample(0.75, 0.75);
        assert!(tl[0] > br[0]);
    }
}
