use crate::{plugins::hooks::HookBus, Result};

/// A third-party extension. Plugins do their work through the hooks they
/// register when added.
pub trait PluginTrait: Send + Sync {
    fn name(&self) -> &str;
    fn on_add(&self, _hooks: &HookBus) -> Result<()> {
        Ok(())
    }
    fn on_remove(&self, _hooks: &HookBus) -> Result<()> {
        Ok(())
    }
}
