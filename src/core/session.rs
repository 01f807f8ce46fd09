use crate::{
    constants::MAX_VIEW_TILES,
    core::{builder::SessionBuilder, config::IntelConfig, geo::LatLngBounds},
    extract::{extract_parameters, RuntimeParameters, SymbolTable},
    notify::Notifier,
    plugins::{HookBus, PluginTrait},
    tiles::{DataTile, MapView, TileParams, TileRange, TileResolver, ZoomTileParameters},
    IntelError, Result,
};
use std::sync::Arc;

/// A started session: the extracted parameters, the resolver built from
/// them and the hooks plugins listen on.
pub struct Session {
    config: IntelConfig,
    runtime: RuntimeParameters,
    resolver: TileResolver,
    hooks: HookBus,
    plugins: Vec<Box<dyn PluginTrait>>,
    notifier: Arc<dyn Notifier>,
}

impl Session {
    pub(crate) fn new(
        config: IntelConfig,
        runtime: RuntimeParameters,
        resolver: TileResolver,
        hooks: HookBus,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            runtime,
            resolver,
            hooks,
            plugins: Vec::new(),
            notifier,
        }
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn config(&self) -> &IntelConfig {
        &self.config
    }

    pub fn runtime(&self) -> &RuntimeParameters {
        &self.runtime
    }

    pub fn resolver(&self) -> &TileResolver {
        &self.resolver
    }

    pub fn tile_params(&self) -> &TileParams {
        self.resolver.params()
    }

    pub fn hooks(&self) -> &HookBus {
        &self.hooks
    }

    pub fn add_plugin(&mut self, plugin: Box<dyn PluginTrait>) -> Result<()> {
        if self.plugins.iter().any(|p| p.name() == plugin.name()) {
            return Err(IntelError::Plugin(format!(
                "plugin {} is already loaded",
                plugin.name()
            )));
        }
        plugin.on_add(&self.hooks)?;
        log::debug!("loaded plugin {}", plugin.name());
        self.plugins.push(plugin);
        Ok(())
    }

    /// Returns false if no plugin of that name is loaded.
    pub fn remove_plugin(&mut self, name: &str) -> Result<bool> {
        let Some(index) = self.plugins.iter().position(|p| p.name() == name) else {
            return Ok(false);
        };
        let plugin = self.plugins.remove(index);
        plugin.on_remove(&self.hooks)?;
        Ok(true)
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Extracts again, e.g. after the host page reloaded its code.
    ///
    /// Only the runtime parameters are replaced. The resolver keeps the old
    /// tables until [`Session::reinitialize_tile_params`] is called.
    pub fn reextract(&mut self, symbols: &SymbolTable) -> Result<()> {
        self.runtime = extract_parameters(symbols, &self.config, self.notifier.as_ref())?;
        Ok(())
    }

    /// Rebuilds the tile tables from the current runtime parameters,
    /// overwriting the previous ones.
    pub fn reinitialize_tile_params(&mut self) {
        let params = TileParams::initialize(&self.runtime, self.notifier.as_ref());
        self.resolver.set_params(params);
        self.resolver.log_zoom_parameters();
    }

    pub fn data_zoom_tile_parameters(
        &self,
        zoom: Option<u32>,
        view: &dyn MapView,
    ) -> ZoomTileParameters {
        self.resolver.data_zoom_tile_parameters(zoom, view)
    }

    /// The data tiles to request for a view of `bounds` at display `zoom`.
    ///
    /// Fails without allocating when the view spans more than
    /// [`MAX_VIEW_TILES`] tiles.
    pub fn data_tiles(&self, bounds: &LatLngBounds, zoom: u32) -> Result<Vec<DataTile>> {
        let params = self.resolver.data_zoom_tile_parameters(Some(zoom), &zoom);
        let range = TileRange::for_bounds(bounds, &params);
        let count = range.len();
        if count > MAX_VIEW_TILES {
            return Err(IntelError::TooManyTiles {
                count,
                limit: MAX_VIEW_TILES,
            });
        }
        Ok(range.tiles(&params).collect())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("runtime", &self.runtime)
            .field("resolver", &self.resolver)
            .field("hooks", &self.hooks)
            .field("plugins", &self.plugin_names())
            .finish()
    }
}
