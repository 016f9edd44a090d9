//! Delegated edge pipeline backed by `imageproc`.
//!
//! The pipeline smooths the frame with a Gaussian (sigma 1.4) and runs
//! Canny hysteresis with fixed low/high thresholds of 50/150. It is only
//! compiled with the `delegated` feature; `imageproc::edges::canny` performs
//! both the smoothing and the hysteresis step.
//!
//! Its output differs from the gradient detector on some pixels. The two are
//! interchangeable at the `detect` boundary, not equivalent.

use crate::error::{EdgeError, Result};

/// Sigma of the Gaussian that `imageproc::edges::canny` applies internally.
/// Informational only: changing it does not change the blur.
pub const SMOOTHING_SIGMA: f32 = 1.4;
pub const HYSTERESIS_LOW: f32 = 50.0;
pub const HYSTERESIS_HIGH: f32 = 150.0;

/// Collapse a collaborator buffer to one byte per pixel in `{0, 255}`.
///
/// Libraries may pack several bytes per pixel; a pixel counts as an edge
/// when any of its bytes is non-zero.
///
/// # Arguments
/// * `raw` - Buffer as returned by the library
/// * `pixel_count` - `width * height` of the frame
/// * `bytes_per_pixel` - Packing of `raw`
pub fn normalize_edge_bytes(
    raw: &[u8],
    pixel_count: usize,
    bytes_per_pixel: usize,
) -> Result<Vec<u8>> {
    if bytes_per_pixel == 0 {
        return Err(EdgeError::invalid("bytes_per_pixel must be at least 1"));
    }
    if pixel_count.checked_mul(bytes_per_pixel) != Some(raw.len()) {
        return Err(EdgeError::invalid(format!(
            "collaborator returned {} bytes for {pixel_count} pixels at {bytes_per_pixel} each",
            raw.len()
        )));
    }

    let mut out = crate::frame::try_alloc(pixel_count)?;
    out.extend(
        raw.chunks_exact(bytes_per_pixel)
            .map(|px| if px.iter().any(|&b| b != 0) { 255 } else { 0 }),
    );
    Ok(out)
}

#[cfg(feature = "delegated")]
pub use pipeline::DelegatedEdgePipeline;

#[cfg(feature = "delegated")]
mod pipeline {
    use image::GrayImage;
    use imageproc::edges::canny;
    use log::debug;

    use super::{normalize_edge_bytes, HYSTERESIS_HIGH, HYSTERESIS_LOW, SMOOTHING_SIGMA};
    use crate::detector::EdgeDetector;
    use crate::error::{EdgeError, Result};
    use crate::frame::{try_alloc, EdgeMap, Frame};

    /// Gaussian smoothing + Canny hysteresis from `imageproc`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct DelegatedEdgePipeline;

    impl DelegatedEdgePipeline {
        /// The library is linked whenever this type exists.
        pub fn probe() -> Option<Self> {
            Some(Self)
        }
    }

    impl EdgeDetector for DelegatedEdgePipeline {
        fn detect(&self, frame: &Frame<'_>) -> Result<EdgeMap> {
            let (width, height) = (frame.width(), frame.height());
            let w = u32::try_from(width)
                .map_err(|_| EdgeError::invalid(format!("width {width} exceeds u32")))?;
            let h = u32::try_from(height)
                .map_err(|_| EdgeError::invalid(format!("height {height} exceeds u32")))?;

            let mut pixels = try_alloc(frame.len())?;
            pixels.extend_from_slice(frame.as_slice());
            let image = GrayImage::from_raw(w, h, pixels)
                .ok_or_else(|| EdgeError::invalid("buffer does not match image dimensions"))?;

            let edges = canny(&image, HYSTERESIS_LOW, HYSTERESIS_HIGH);
            let data = normalize_edge_bytes(edges.as_raw(), frame.len(), 1)?;

            debug!("Processed frame with imageproc Canny: {width}x{height}");
            EdgeMap::from_vec(data, width, height)
        }

        fn version(&self) -> String {
            format!(
                "imageproc Canny (sigma {}, hysteresis {}/{})",
                SMOOTHING_SIGMA, HYSTERESIS_LOW, HYSTERESIS_HIGH
            )
        }
    }
}
