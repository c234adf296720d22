// SPDX-License-Identifier: GPL-3.0-only

//! 4x4 affine matrix used for all sampling transforms
//!
//! Column-major, `#[repr(C)]` and `Pod` so a host can copy it straight into
//! a uniform buffer. Only the operations the processor needs are
//! implemented: composition, affine inversion, and point transform.

use bytemuck::{Pod, Zeroable};
use std::ops::Mul;

/// Column-major 4x4 matrix
///
/// `cols[c][r]` is row `r` of column `c`. All transforms produced by the
/// processor are affine: the bottom row is `(0, 0, 0, 1)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Mat4 {
    /// The four columns
    pub cols: [[f32; 4]; 4],
}

impl Mat4 {
    /// The identity transform
    pub const IDENTITY: Mat4 = Mat4 {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Build from column arrays
    pub fn from_cols(cols: [[f32; 4]; 4]) -> Self {
        Self { cols }
    }

    /// Axis-aligned scale
    pub fn from_scale(sx: f32, sy: f32, sz: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[0][0] = sx;
        m.cols[1][1] = sy;
        m.cols[2][2] = sz;
        m
    }

    /// Pure translation
    pub fn from_translation(tx: f32, ty: f32, tz: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[3][0] = tx;
        m.cols[3][1] = ty;
        m.cols[3][2] = tz;
        m
    }

    /// Apply the transform to a point, treating it as `(x, y, z, 1)`
    pub fn transform_point(&self, p: [f32; 3]) -> [f32; 3] {
        let c = &self.cols;
        [
            c[0][0] * p[0] + c[1][0] * p[1] + c[2][0] * p[2] + c[3][0],
            c[0][1] * p[0] + c[1][1] * p[1] + c[2][1] * p[2] + c[3][1],
            c[0][2] * p[0] + c[1][2] * p[1] + c[2][2] * p[2] + c[3][2],
        ]
    }

    /// Invert an affine transform (bottom row `(0, 0, 0, 1)`)
    ///
    /// Returns `None` when the upper-left 3x3 block is singular. The bottom
    /// row of the input is not inspected; callers only ever pass affine
    /// matrices.
    pub fn inverse_affine(&self) -> Option<Mat4> {
        let c = &self.cols;
        // Upper-left 3x3 in row-major form for the cofactor expansion
        let m = [
            [c[0][0], c[1][0], c[2][0]],
            [c[0][1], c[1][1], c[2][1]],
            [c[0][2], c[1][2], c[2][2]],
        ];

        let cof00 = m[1][1] * m[2][2] - m[1][2] * m[2][1];
        let cof01 = m[1][2] * m[2][0] - m[1][0] * m[2][2];
        let cof02 = m[1][0] * m[2][1] - m[1][1] * m[2][0];

        let det = m[0][0] * cof00 + m[0][1] * cof01 + m[0][2] * cof02;
        if det.abs() < f32::EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        // Inverse of the linear block: adjugate / det
        let r = [
            [
                cof00 * inv_det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
            ],
            [
                cof01 * inv_det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
            ],
            [
                cof02 * inv_det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
            ],
        ];

        // t' = -R^{-1} * t
        let t = [c[3][0], c[3][1], c[3][2]];
        let tx = -(r[0][0] * t[0] + r[0][1] * t[1] + r[0][2] * t[2]);
        let ty = -(r[1][0] * t[0] + r[1][1] * t[1] + r[1][2] * t[2]);
        let tz = -(r[2][0] * t[0] + r[2][1] * t[1] + r[2][2] * t[2]);

        Some(Mat4::from_cols([
            [r[0][0], r[1][0], r[2][0], 0.0],
            [r[0][1], r[1][1], r[2][1], 0.0],
            [r[0][2], r[1][2], r[2][2], 0.0],
            [tx, ty, tz, 1.0],
        ]))
    }

    /// Element-wise comparison within `eps`
    pub fn approx_eq(&self, other: &Mat4, eps: f32) -> bool {
        self.cols
            .iter()
            .flatten()
            .zip(other.cols.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut out = [[0.0f32; 4]; 4];
        for c in 0..4 {
            for r in 0..4 {
                let mut acc = 0.0;
                for k in 0..4 {
                    acc += self.cols[k][r] * rhs.cols[c][k];
                }
                out[c][r] = acc;
            }
        }
        Mat4::from_cols(out)
    }
}
