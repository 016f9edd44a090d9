//! Filter modules for grayscale frame processing.
//!
//! ## Supported Formats
//!
//! | Format | Layout | Type | Description |
//! |--------|--------|------|-------------|
//! | Grayscale8 | (H, W) row-major | u8 | Single luminance channel, 0-255 |
//! | Edge map | (H, W) row-major | u8 | 0 (no edge) or 255 (edge) |
//!
//! ## Filter Categories
//!
//! - **Edge detection**: Sobel gradient + L1 magnitude threshold

pub mod edge;
