//! Detector configuration.
//!
//! Hosts either build a [`DetectorConfig`] directly, deserialize one from
//! their own settings document, or read it from the environment:
//!
//! | Variable | Values | Default |
//! |----------|--------|---------|
//! | `EDGECAM_BACKEND` | `auto`, `gradient`/`sobel`/`fallback`, `delegated`/`canny` | `auto` |
//! | `EDGECAM_THRESHOLD` | integer in `0..=1530` | `128` |

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{EdgeError, Result};
use crate::filters::edge::{EDGE_THRESHOLD, MAX_MAGNITUDE};

pub const BACKEND_ENV: &str = "EDGECAM_BACKEND";
pub const THRESHOLD_ENV: &str = "EDGECAM_THRESHOLD";

/// Which edge detector implementation a host wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Delegated pipeline when it can be probed, gradient fallback otherwise.
    #[default]
    Auto,
    #[serde(alias = "sobel", alias = "fallback")]
    Gradient,
    #[serde(alias = "canny")]
    Delegated,
}

impl FromStr for Backend {
    type Err = EdgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "gradient" | "sobel" | "fallback" => Ok(Self::Gradient),
            "delegated" | "canny" => Ok(Self::Delegated),
            other => Err(EdgeError::Config(format!("unknown backend '{other}'"))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Gradient => "gradient",
            Self::Delegated => "delegated",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub backend: Backend,
    /// Magnitude threshold of the gradient detector. Ignored by the
    /// delegated pipeline, which has its own fixed hysteresis thresholds.
    pub threshold: i32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Auto,
            threshold: EDGE_THRESHOLD,
        }
    }
}

impl DetectorConfig {
    /// Read the configuration from `EDGECAM_BACKEND` / `EDGECAM_THRESHOLD`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(value) = lookup(BACKEND_ENV) {
            config.backend = value.parse()?;
        }
        if let Some(value) = lookup(THRESHOLD_ENV) {
            config.threshold = value.trim().parse().map_err(|_| {
                EdgeError::Config(format!("{THRESHOLD_ENV}='{value}' is not an integer"))
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0..=MAX_MAGNITUDE).contains(&self.threshold) {
            return Err(EdgeError::Config(format!(
                "threshold {} outside 0..={MAX_MAGNITUDE}",
                self.threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DetectorConfig::default();
        assert_eq!(config.backend, Backend::Auto);
        assert_eq!(config.threshold, 128);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_backend_parsing() {
        assert_eq!("AUTO".parse::<Backend>().unwrap(), Backend::Auto);
        assert_eq!(" sobel ".parse::<Backend>().unwrap(), Backend::Gradient);
        assert_eq!("fallback".parse::<Backend>().unwrap(), Backend::Gradient);
        assert_eq!("Canny".parse::<Backend>().unwrap(), Backend::Delegated);
        assert!(matches!("opencv".parse::<Backend>(), Err(EdgeError::Config(_))));
    }

    #[test]
    fn test_backend_display_parses_back() {
        for backend in [Backend::Auto, Backend::Gradient, Backend::Delegated] {
            assert_eq!(backend.to_string().parse::<Backend>().unwrap(), backend);
        }
        assert_eq!(Backend::Gradient.to_string(), "gradient");
    }

    #[test]
    fn test_from_lookup() {
        let env = lookup(&[(BACKEND_ENV, "gradient"), (THRESHOLD_ENV, "200")]);
        let config = DetectorConfig::from_lookup(env).unwrap();
        assert_eq!(config.backend, Backend::Gradient);
        assert_eq!(config.threshold, 200);

        let config = DetectorConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, DetectorConfig::default());
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        assert!(DetectorConfig::from_lookup(lookup(&[(THRESHOLD_ENV, "high")])).is_err());
        assert!(DetectorConfig::from_lookup(lookup(&[(THRESHOLD_ENV, "-1")])).is_err());
        assert!(DetectorConfig::from_lookup(lookup(&[(THRESHOLD_ENV, "1531")])).is_err());
        assert!(DetectorConfig::from_lookup(lookup(&[(BACKEND_ENV, "gpu")])).is_err());
    }

    #[test]
    fn test_deserialize_partial_document() {
        let config: DetectorConfig = serde_json::from_str(r#"{"backend": "sobel"}"#).unwrap();
        assert_eq!(config.backend, Backend::Gradient);
        assert_eq!(config.threshold, EDGE_THRESHOLD);

        let config: DetectorConfig = serde_json::from_str(r#"{"threshold": 64}"#).unwrap();
        assert_eq!(config.backend, Backend::Auto);
        assert_eq!(config.threshold, 64);
    }
}
