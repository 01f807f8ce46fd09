//! Configuration for extraction and zoom resolution
//!
//! Everything here has a default matching the live intel site, so an empty
//! JSON object (or no config file at all) is a valid configuration.

use crate::{
    constants::{MAX_DATA_ZOOM, MIN_ZOOM, VERSION_TOKEN_LEN},
    IntelError, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntelConfig {
    /// Floor of the data zoom collapse.
    pub min_zoom: u32,
    /// Ceiling applied to display zooms before resolving a data zoom.
    /// May be lowered, never raised past the site's deepest data zoom.
    pub max_data_zoom: u32,
    /// Version token to use when none can be found in the host code.
    pub version_override: Option<String>,
}

impl Default for IntelConfig {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_data_zoom: MAX_DATA_ZOOM,
            version_override: None,
        }
    }
}

impl IntelConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn with_min_zoom(mut self, min_zoom: u32) -> Self {
        self.min_zoom = min_zoom;
        self
    }

    pub fn with_version_override(mut self, token: impl Into<String>) -> Self {
        self.version_override = Some(token.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_data_zoom > MAX_DATA_ZOOM {
            return Err(IntelError::Config(format!(
                "max_data_zoom {} is above {}",
                self.max_data_zoom, MAX_DATA_ZOOM
            )));
        }
        if self.min_zoom > self.max_data_zoom {
            return Err(IntelError::Config(format!(
                "min_zoom {} is above max_data_zoom {}",
                self.min_zoom, self.max_data_zoom
            )));
        }
        if let Some(token) = &self.version_override {
            if !is_version_token(token) {
                return Err(IntelError::InvalidVersionToken(token.clone()));
            }
        }
        Ok(())
    }
}

/// A version token is 40 lowercase hex digits.
pub fn is_version_token(token: &str) -> bool {
    token.len() == VERSION_TOKEN_LEN
        && token
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
