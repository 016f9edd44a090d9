//! EdgeCam Rust Core
//!
//! Binary edge maps for grayscale camera frames, with a C ABI for native
//! hosts, Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Frame Format
//! - **Grayscale**: flat row-major `u8` buffer, `width * height` bytes
//! - **Edge map**: same shape, every sample `0` (no edge) or `255` (edge)
//!
//! Dimensions always travel alongside the buffer and are validated before
//! any pixel is read; a mismatch is an `InvalidInput` error, never a
//! partially filled map.
//!
//! ## Detectors
//! Two interchangeable implementations sit behind [`EdgeDetector`]:
//! - [`GradientEdgeDetector`]: 3x3 Sobel gradients, L1 magnitude, threshold 128
//! - `DelegatedEdgePipeline`: Gaussian smoothing + Canny hysteresis from
//!   `imageproc` (feature `delegated`)
//!
//! [`select_detector`] picks one at runtime from a [`DetectorConfig`].

pub mod config;
pub mod delegated;
pub mod detector;
pub mod error;
pub mod ffi;
pub mod filters;
pub mod frame;
pub mod stats;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{Backend, DetectorConfig};
pub use detector::{
    active_detector, detect_batch, detect_bytes, select_detector, version, EdgeDetector,
    GradientEdgeDetector,
};
pub use error::{EdgeError, Result};
pub use frame::{EdgeMap, Frame};
pub use stats::{FpsCounter, FrameStats, ProcessingMonitor};

#[cfg(feature = "delegated")]
pub use delegated::DelegatedEdgePipeline;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
    use pyo3::exceptions::{PyMemoryError, PyValueError};
    use pyo3::prelude::*;
    use pyo3::types::PyBytes;

    use crate::detector::{active_detector, detect_bytes};
    use crate::error::EdgeError;
    use crate::frame::Frame;

    fn to_py_err(err: EdgeError) -> PyErr {
        match err {
            EdgeError::AllocationFailure { .. } => PyMemoryError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }

    // ========================================================================
    // Edge Detection
    // ========================================================================

    /// Detect edges in a 2D grayscale u8 image.
    ///
    /// Input must be C-contiguous with shape (height, width). Output has the
    /// same shape with values 0 or 255.
    #[pyfunction]
    pub fn detect_edges<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let frame = Frame::from_array(image.as_array()).map_err(to_py_err)?;
        let edges = active_detector().detect(&frame).map_err(to_py_err)?;
        Ok(edges.as_array().to_owned().into_pyarray(py))
    }

    /// Detect edges in a raw grayscale buffer of `width * height` bytes.
    #[pyfunction]
    pub fn detect_edges_bytes<'py>(
        py: Python<'py>,
        data: &[u8],
        width: i32,
        height: i32,
    ) -> PyResult<Bound<'py, PyBytes>> {
        let edges = detect_bytes(active_detector(), data, width, height).map_err(to_py_err)?;
        Ok(PyBytes::new(py, &edges))
    }

    /// Name of the active edge detection backend.
    #[pyfunction]
    pub fn edge_version() -> String {
        active_detector().version()
    }

    /// EdgeCam Rust extension module
    #[pymodule]
    pub fn edgecam(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(detect_edges, m)?)?;
        m.add_function(wrap_pyfunction!(detect_edges_bytes, m)?)?;
        m.add_function(wrap_pyfunction!(edge_version, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::edgecam;
