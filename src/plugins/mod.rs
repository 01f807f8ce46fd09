pub mod base;
pub mod hooks;

pub use base::PluginTrait;
pub use hooks::{events, HookBus, HookCallback, HookId};
