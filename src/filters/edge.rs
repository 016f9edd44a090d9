//! Sobel gradient edge detection with a fixed L1 magnitude threshold.
//!
//! For every interior pixel the horizontal and vertical Sobel responses are
//! accumulated in `i32`, combined as `|gx| + |gy|` and compared against the
//! threshold. Neither component can exceed `4 * 255` in absolute value and
//! their L1 sum peaks at `6 * 255 = 1530`, far inside `i32`.
//!
//! Pixels on the outer border have no full 3x3 neighbourhood and are always
//! written as `0`.

use crate::error::Result;
use crate::frame::{EdgeMap, Frame};

// ============================================================================
// Kernels and constants
// ============================================================================

pub const SOBEL_KERNEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
pub const SOBEL_KERNEL_Y: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

/// Magnitude a pixel must exceed to be marked as an edge.
pub const EDGE_THRESHOLD: i32 = 128;

/// Largest L1 magnitude any 8-bit neighbourhood can produce.
pub const MAX_MAGNITUDE: i32 = 1530;

pub const EDGE: u8 = 255;
pub const NOT_EDGE: u8 = 0;

/// Horizontal and vertical intensity change at one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GradientVector {
    pub gx: i32,
    pub gy: i32,
}

impl GradientVector {
    /// L1 approximation of the gradient magnitude.
    #[inline]
    pub fn magnitude(&self) -> i32 {
        self.gx.abs() + self.gy.abs()
    }
}

#[inline]
fn convolve3(rows: [&[u8]; 3], x: usize, kernel: &[[i32; 3]; 3]) -> i32 {
    let mut acc = 0i32;
    for (ky, row) in rows.iter().enumerate() {
        for kx in 0..3 {
            let weight = kernel[ky][kx];
            if weight != 0 {
                acc += weight * row[x + kx - 1] as i32;
            }
        }
    }
    acc
}

#[inline]
fn gradient_from_rows(rows: [&[u8]; 3], x: usize) -> GradientVector {
    GradientVector {
        gx: convolve3(rows, x, &SOBEL_KERNEL_X),
        gy: convolve3(rows, x, &SOBEL_KERNEL_Y),
    }
}

/// Sobel gradient at an interior pixel, `None` on the border or outside.
pub fn sobel_gradient(frame: &Frame<'_>, x: usize, y: usize) -> Option<GradientVector> {
    let (width, height) = (frame.width(), frame.height());
    if x == 0 || y == 0 || x + 1 >= width || y + 1 >= height {
        return None;
    }
    let rows = [frame.row(y - 1), frame.row(y), frame.row(y + 1)];
    Some(gradient_from_rows(rows, x))
}

// ============================================================================
// Thresholded edge map
// ============================================================================

/// Classify every interior pixel of `frame` as edge (`255`) or not (`0`).
///
/// # Arguments
/// * `frame` - Validated grayscale frame
/// * `threshold` - Magnitude that must be strictly exceeded
///
/// # Returns
/// Edge map of identical dimensions, or `AllocationFailure`
pub fn sobel_threshold_u8(frame: &Frame<'_>, threshold: i32) -> Result<EdgeMap> {
    let (width, height) = (frame.width(), frame.height());
    let mut output = EdgeMap::zeroed_like(frame)?;

    if width < 3 || height < 3 {
        return Ok(output);
    }

    for y in 1..height - 1 {
        let rows = [frame.row(y - 1), frame.row(y), frame.row(y + 1)];
        let out_row = output.row_mut(y);
        for x in 1..width - 1 {
            let magnitude = gradient_from_rows(rows, x).magnitude();
            out_row[x] = if magnitude > threshold { EDGE } else { NOT_EDGE };
        }
    }

    Ok(output)
}
