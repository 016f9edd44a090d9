//! Grayscale frame views and binary edge maps.
//!
//! ## Layout
//! A frame is a flat, row-major buffer of single-channel `u8` samples: the
//! sample at `(x, y)` lives at `y * width + x`. Dimensions always travel
//! alongside the buffer and are checked against its length before any
//! pixel is touched.
//!
//! `Frame` borrows the caller's bytes; `EdgeMap` owns a freshly allocated
//! buffer of the same shape.

use ndarray::ArrayView2;

use crate::error::{EdgeError, Result};

/// Borrowed, validated view over one grayscale frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> Frame<'a> {
    /// Validate `data` against the signed dimensions handed over by a host.
    ///
    /// Fails with `InvalidInput` when either dimension is below 1 or when
    /// `width * height` differs from `data.len()`.
    pub fn new(data: &'a [u8], width: i32, height: i32) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(EdgeError::invalid(format!(
                "dimensions must be positive, got {width}x{height}"
            )));
        }
        // Positive i32 values always fit in usize on supported targets.
        let (w, h) = (width as usize, height as usize);
        Self::from_parts(data, w, h)
    }

    /// Build a frame from a standard-layout `(height, width)` array view.
    pub fn from_array(view: ArrayView2<'a, u8>) -> Result<Self> {
        let (height, width) = view.dim();
        let data = view
            .to_slice()
            .ok_or_else(|| EdgeError::invalid("array view is not contiguous row-major"))?;
        Self::from_parts(data, width, height)
    }

    fn from_parts(data: &'a [u8], width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(EdgeError::invalid(format!(
                "dimensions must be positive, got {width}x{height}"
            )));
        }
        let expected = width
            .checked_mul(height)
            .ok_or_else(|| EdgeError::invalid(format!("{width}x{height} overflows")))?;
        if data.len() != expected {
            return Err(EdgeError::invalid(format!(
                "buffer holds {} bytes, {width}x{height} needs {expected}",
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false for a validated frame.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    /// Samples of row `y`.
    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    pub fn as_array(&self) -> ArrayView2<'a, u8> {
        // Shape was checked against the buffer length at construction.
        ArrayView2::from_shape((self.height, self.width), self.data)
            .unwrap_or_else(|_| unreachable!("frame shape validated at construction"))
    }
}

/// Empty vector with room for exactly `bytes` samples.
pub(crate) fn try_alloc(bytes: usize) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    data.try_reserve_exact(bytes)
        .map_err(|_| EdgeError::AllocationFailure { bytes })?;
    Ok(data)
}

/// Binary output of a detector: every sample is `0` or `255`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMap {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl EdgeMap {
    /// Allocate an all-zero map shaped like `frame`.
    ///
    /// Reports `AllocationFailure` instead of aborting the process.
    pub fn zeroed_like(frame: &Frame<'_>) -> Result<Self> {
        let mut data = try_alloc(frame.len())?;
        data.resize(frame.len(), 0);
        Ok(Self {
            data,
            width: frame.width(),
            height: frame.height(),
        })
    }

    /// Wrap a buffer produced elsewhere, checking its length.
    pub fn from_vec(data: Vec<u8>, width: usize, height: usize) -> Result<Self> {
        if width.checked_mul(height) != Some(data.len()) {
            return Err(EdgeError::invalid(format!(
                "edge buffer holds {} bytes, expected {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.width;
        &mut self.data[start..start + self.width]
    }

    pub fn as_array(&self) -> ArrayView2<'_, u8> {
        ArrayView2::from_shape((self.height, self.width), &self.data)
            .unwrap_or_else(|_| unreachable!("edge map shape fixed at construction"))
    }

    /// Number of pixels marked as edges.
    pub fn edge_count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}
