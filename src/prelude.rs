//! Prelude module for common intelmap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use intelmap::prelude::*;`

pub use crate::core::{
    builder::SessionBuilder,
    config::IntelConfig,
    geo::{LatLng, LatLngBounds},
    session::Session,
};

pub use crate::extract::{extract_parameters, RuntimeParameters, Symbol, SymbolTable};

pub use crate::tiles::{
    lat_to_tile, lng_to_tile, point_to_tile_id, tile_bounds, tile_to_lat, tile_to_lng,
    tiles_for_bounds, DataTile, MapView, TileRange, TileParams, TileResolver, ZoomTileParameters,
};

pub use crate::plugins::{events, HookBus, HookId, PluginTrait};

pub use crate::notify::{LogNotifier, Notification, Notifier, RecordingNotifier, Severity};

pub use crate::{Error as IntelError, Result};

pub use std::sync::Arc;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
