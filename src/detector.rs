//! Edge detector strategies and runtime backend selection.
//!
//! Every implementation exposes the same call surface: a validated
//! [`Frame`] in, a freshly owned [`EdgeMap`] out. Which one runs is decided
//! at runtime from a [`DetectorConfig`], probing for the delegated pipeline
//! when the host asks for it.

use std::sync::OnceLock;

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::config::{Backend, DetectorConfig};
use crate::error::{EdgeError, Result};
use crate::filters::edge::{sobel_threshold_u8, EDGE_THRESHOLD};
use crate::frame::{EdgeMap, Frame};

/// A stateless frame-to-edge-map transform.
///
/// Implementations must be pure: identical frames give identical maps and
/// no state is shared between calls.
pub trait EdgeDetector: Send + Sync {
    fn detect(&self, frame: &Frame<'_>) -> Result<EdgeMap>;

    /// Human-readable name of the active implementation.
    fn version(&self) -> String;
}

/// Sobel gradients, L1 magnitude, single fixed threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientEdgeDetector {
    threshold: i32,
}

impl Default for GradientEdgeDetector {
    fn default() -> Self {
        Self {
            threshold: EDGE_THRESHOLD,
        }
    }
}

impl GradientEdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(threshold: i32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> i32 {
        self.threshold
    }
}

impl EdgeDetector for GradientEdgeDetector {
    fn detect(&self, frame: &Frame<'_>) -> Result<EdgeMap> {
        let map = sobel_threshold_u8(frame, self.threshold)?;
        debug!(
            "Processed frame with fallback edge detection: {}x{}",
            frame.width(),
            frame.height()
        );
        Ok(map)
    }

    fn version(&self) -> String {
        format!("Fallback (Sobel L1, threshold {})", self.threshold)
    }
}

fn probe_delegated() -> Option<Box<dyn EdgeDetector>> {
    #[cfg(feature = "delegated")]
    {
        crate::delegated::DelegatedEdgePipeline::probe()
            .map(|pipeline| Box::new(pipeline) as Box<dyn EdgeDetector>)
    }
    #[cfg(not(feature = "delegated"))]
    {
        None
    }
}

/// Pick the detector described by `config`.
///
/// `Auto` prefers the delegated pipeline and falls back to the gradient
/// detector; `Delegated` fails with `BackendUnavailable` when the pipeline
/// cannot be probed.
pub fn select_detector(config: &DetectorConfig) -> Result<Box<dyn EdgeDetector>> {
    config.validate()?;
    debug!("Selecting {} edge backend", config.backend);
    let gradient = || {
        Box::new(GradientEdgeDetector::with_threshold(config.threshold)) as Box<dyn EdgeDetector>
    };

    match config.backend {
        Backend::Gradient => Ok(gradient()),
        Backend::Delegated => probe_delegated().ok_or(EdgeError::BackendUnavailable(
            "delegated pipeline not compiled in",
        )),
        Backend::Auto => Ok(probe_delegated().unwrap_or_else(|| {
            debug!("Delegated pipeline unavailable, using gradient fallback");
            gradient()
        })),
    }
}

/// Version string of the detector the default configuration selects.
pub fn version() -> String {
    match select_detector(&DetectorConfig::default()) {
        Ok(detector) => detector.version(),
        Err(err) => format!("unavailable ({err})"),
    }
}

static ACTIVE: OnceLock<Box<dyn EdgeDetector>> = OnceLock::new();

/// Process-wide detector used by the foreign boundaries.
///
/// Selected once from [`DetectorConfig::from_env`]; a bad environment falls
/// back to the default gradient detector. Immutable afterwards.
pub fn active_detector() -> &'static dyn EdgeDetector {
    ACTIVE
        .get_or_init(|| {
            let selected = DetectorConfig::from_env().and_then(|config| select_detector(&config));
            let detector = selected.unwrap_or_else(|err| {
                warn!("Edge backend selection failed ({err}), using gradient fallback");
                Box::new(GradientEdgeDetector::new())
            });
            info!("Edge backend: {}", detector.version());
            detector
        })
        .as_ref()
}

/// Boundary call: borrowed bytes and host dimensions in, owned bytes out.
///
/// # Arguments
/// * `data` - Row-major grayscale samples, `width * height` bytes
/// * `width` - Frame width in pixels
/// * `height` - Frame height in pixels
///
/// # Returns
/// Edge bytes of the same length, or the detector's error
pub fn detect_bytes(
    detector: &dyn EdgeDetector,
    data: &[u8],
    width: i32,
    height: i32,
) -> Result<Vec<u8>> {
    let frame = Frame::new(data, width, height).inspect_err(|err| {
        warn!("Rejected frame {width}x{height} ({} bytes): {err}", data.len());
    })?;
    Ok(detector.detect(&frame)?.into_vec())
}

/// Run `detector` over independent frames in parallel.
///
/// Each frame is still processed by one single-threaded call; results keep
/// the input order and a failing frame only fails its own slot.
pub fn detect_batch(detector: &dyn EdgeDetector, frames: &[Frame<'_>]) -> Vec<Result<EdgeMap>> {
    frames.par_iter().map(|frame| detector.detect(frame)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(width: usize, height: usize) -> Vec<u8> {
        (0..width * height)
            .map(|i| if i % width < width / 2 { 0 } else { 255 })
            .collect()
    }

    #[test]
    fn test_gradient_detector_defaults() {
        let detector = GradientEdgeDetector::new();
        assert_eq!(detector.threshold(), 128);
        assert!(detector.version().starts_with("Fallback"));
    }

    #[test]
    fn test_detect_bytes_rejects_bad_size() {
        let detector = GradientEdgeDetector::new();
        let err = detect_bytes(&detector, &[0u8; 10], 4, 4).unwrap_err();
        assert!(matches!(err, EdgeError::InvalidInput { .. }));
        assert!(detect_bytes(&detector, &[], 0, 0).is_err());
        assert!(detect_bytes(&detector, &[0u8; 4], -2, -2).is_err());
    }

    #[test]
    fn test_detect_bytes_keeps_length() {
        let detector = GradientEdgeDetector::new();
        for (w, h) in [(1usize, 1usize), (3, 3), (8, 5), (31, 17)] {
            let data = step(w, h);
            let out = detect_bytes(&detector, &data, w as i32, h as i32).unwrap();
            assert_eq!(out.len(), w * h);
        }
    }

    #[test]
    fn test_higher_threshold_suppresses_weak_edges() {
        // Step of 100 gives |gx| = 400 at the boundary.
        let (w, h) = (6usize, 5usize);
        let data: Vec<u8> = (0..w * h).map(|i| if i % w < w / 2 { 50 } else { 150 }).collect();

        let default = GradientEdgeDetector::new();
        let out = detect_bytes(&default, &data, w as i32, h as i32).unwrap();
        assert!(out.iter().any(|&v| v == 255));

        let strict = GradientEdgeDetector::with_threshold(400);
        let out = detect_bytes(&strict, &data, w as i32, h as i32).unwrap();
        assert!(out.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_select_gradient_backend() {
        let config = DetectorConfig {
            backend: Backend::Gradient,
            threshold: 90,
        };
        let detector = select_detector(&config).unwrap();
        assert_eq!(detector.version(), "Fallback (Sobel L1, threshold 90)");
    }

    #[test]
    fn test_select_rejects_invalid_threshold() {
        let config = DetectorConfig {
            backend: Backend::Gradient,
            threshold: -5,
        };
        assert!(matches!(select_detector(&config), Err(EdgeError::Config(_))));
    }

    #[cfg(not(feature = "delegated"))]
    #[test]
    fn test_auto_falls_back_without_delegated() {
        let detector = select_detector(&DetectorConfig::default()).unwrap();
        assert!(detector.version().starts_with("Fallback"));
        assert!(version().starts_with("Fallback"));

        let config = DetectorConfig {
            backend: Backend::Delegated,
            ..DetectorConfig::default()
        };
        assert!(matches!(
            select_detector(&config),
            Err(EdgeError::BackendUnavailable(_))
        ));
    }

    #[cfg(feature = "delegated")]
    #[test]
    fn test_auto_prefers_delegated() {
        let detector = select_detector(&DetectorConfig::default()).unwrap();
        assert!(detector.version().starts_with("imageproc"));
    }

    #[test]
    fn test_batch_preserves_order_and_isolates_failures() {
        let detector = GradientEdgeDetector::new();
        let uniform = vec![100u8; 25];
        let edged = step(5, 5);
        let frames = vec![
            Frame::new(&uniform, 5, 5).unwrap(),
            Frame::new(&edged, 5, 5).unwrap(),
        ];

        let results = detect_batch(&detector, &frames);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().edge_count(), 0);
        assert!(results[1].as_ref().unwrap().edge_count() > 0);

        for (frame, result) in frames.iter().zip(&results) {
            assert_eq!(result.as_ref().unwrap(), &detector.detect(frame).unwrap());
        }
    }

    #[test]
    fn test_detector_is_shareable_across_threads() {
        let detector: Box<dyn EdgeDetector> = Box::new(GradientEdgeDetector::new());
        let data = step(16, 16);
        let expected = detect_bytes(detector.as_ref(), &data, 16, 16).unwrap();

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    let out = detect_bytes(detector.as_ref(), &data, 16, 16).unwrap();
                    assert_eq!(out, expected);
                });
            }
        });
    }
}
