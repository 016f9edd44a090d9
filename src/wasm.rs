//! WebAssembly exports for the edge detector.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Frames cross
//! the boundary as flat `Uint8Array`s of `width * height` grayscale bytes.

use wasm_bindgen::prelude::*;

use crate::detector::{active_detector, detect_bytes};

// ============================================================================
// Edge Detection
// ============================================================================

/// Detect edges in a grayscale frame.
///
/// # Arguments
/// * `data` - Flat array of grayscale bytes (length = width * height)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Returns
/// Flat array of edge bytes (0 or 255), or an error for mismatched sizes
#[wasm_bindgen]
pub fn detect_edges_wasm(data: &[u8], width: i32, height: i32) -> Result<Vec<u8>, JsValue> {
    detect_bytes(active_detector(), data, width, height)
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

// ============================================================================
// Capability Query
// ============================================================================

/// Name of the active edge detection backend.
#[wasm_bindgen]
pub fn edge_version_wasm() -> String {
    active_detector().version()
}
