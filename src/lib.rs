//! # intelmap
//!
//! Tile addressing and runtime parameter extraction for the Ingress Intel map.
//!
//! The crate recovers the undocumented parameters of the intel site from a
//! snapshot of its minified globals, derives the tiling tables from them and
//! exposes the pure functions needed to address map data tiles: coordinate to
//! tile conversions, display zoom to data zoom collapsing and tile ids.
//! A small hook bus lets plugins observe the map data lifecycle.

pub mod core;
pub mod extract;
pub mod notify;
pub mod plugins;
pub mod prelude;
pub mod tiles;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::IntelConfig,
    geo::{LatLng, LatLngBounds},
    builder::SessionBuilder,
    session::Session,
};

pub use extract::{
    extractor::{extract_parameters, RuntimeParameters},
    symbols::{Symbol, SymbolTable},
};

pub use notify::{LogNotifier, Notification, Notifier, RecordingNotifier, Severity};

pub use plugins::{base::PluginTrait, hooks::HookBus};

pub use tiles::{
    params::{TileParams, ZoomTileParameters},
    projection::{lat_to_tile, lng_to_tile, point_to_tile_id, tile_to_lat, tile_to_lng, DataTile},
    resolver::{MapView, TileResolver},
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, IntelError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum IntelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The version token could not be located; startup cannot continue.
    #[error("failed to extract CURRENT_VERSION string - cannot continue")]
    MissingVersionToken,

    #[error("Invalid version token: {0:?}")]
    InvalidVersionToken(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Plugin error: {0}")]
    Plugin(String),

    #[error("{count} data tiles cover the view, the limit is {limit}")]
    TooManyTiles { count: u64, limit: u64 },

    #[error("Host error: {0}")]
    Host(String),
}

impl IntelError {
    /// True for errors that must halt startup.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MissingVersionToken | Self::InvalidVersionToken(_)
        )
    }
}

/// Error type alias for convenience
pub type Error = IntelError;
