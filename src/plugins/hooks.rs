//! Plugin hooks
//!
//! Plugins listen to any number of events by name. Callbacks run
//! synchronously in registration order and receive the event's data as a
//! JSON value. A callback returning `Ok(false)` stops the remaining
//! callbacks of that dispatch; a callback returning an error is logged and
//! the dispatch carries on.

use crate::Result;
use fxhash::FxHashMap;
use serde_json::Value;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, MutexGuard,
};

/// Names of the events the map data lifecycle fires.
pub mod events {
    /// A portal on the map was selected or unselected.
    pub const PORTAL_SELECTED: &str = "portalSelected";
    pub const MAP_DATA_REFRESH_START: &str = "mapDataRefreshStart";
    /// Rendering is about to start; cached entities can be injected.
    pub const MAP_DATA_ENTITY_INJECT: &str = "mapDataEntityInject";
    pub const MAP_DATA_REFRESH_END: &str = "mapDataRefreshEnd";
    /// A portal is about to be added to its layer group.
    pub const PORTAL_ADDED: &str = "portalAdded";
    pub const LINK_ADDED: &str = "linkAdded";
    pub const FIELD_ADDED: &str = "fieldAdded";
    pub const PORTAL_REMOVED: &str = "portalRemoved";
    pub const LINK_REMOVED: &str = "linkRemoved";
    pub const FIELD_REMOVED: &str = "fieldRemoved";
    pub const PORTAL_DETAILS_UPDATED: &str = "portalDetailsUpdated";
    pub const PORTAL_DETAIL_LOADED: &str = "portalDetailLoaded";
    pub const PUBLIC_CHAT_DATA_AVAILABLE: &str = "publicChatDataAvailable";
    pub const FACTION_CHAT_DATA_AVAILABLE: &str = "factionChatDataAvailable";
    pub const ARTIFACTS_UPDATED: &str = "artifactsUpdated";
    pub const PANE_CHANGED: &str = "paneChanged";
    /// Startup and all plugins finished loading.
    pub const IITC_LOADED: &str = "iitcLoaded";
}

pub type HookCallback = Arc<dyn Fn(&Value) -> Result<bool> + Send + Sync>;

/// Handle returned by [`HookBus::add_hook`], used to remove the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

#[derive(Default)]
pub struct HookBus {
    hooks: Mutex<FxHashMap<String, Vec<(HookId, HookCallback)>>>,
    next_id: AtomicU64,
}

impl HookBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn hooks(&self) -> MutexGuard<'_, FxHashMap<String, Vec<(HookId, HookCallback)>>> {
        // a panicking callback never runs under the lock
        self.hooks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_hook<F>(&self, event: &str, callback: F) -> HookId
    where
        F: Fn(&Value) -> Result<bool> + Send + Sync + 'static,
    {
        let id = HookId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.hooks()
            .entry(event.to_string())
            .or_default()
            .push((id, Arc::new(callback)));
        id
    }

    /// Returns whether the callback was registered for `event`.
    pub fn remove_hook(&self, event: &str, id: HookId) -> bool {
        let mut hooks = self.hooks();
        let Some(listeners) = hooks.get_mut(event) else {
            log::warn!("no callbacks registered for event {}", event);
            return false;
        };
        match listeners.iter().position(|(hook_id, _)| *hook_id == id) {
            Some(index) => {
                listeners.remove(index);
                true
            }
            None => {
                log::warn!("callback {:?} wasn't registered for event {}", id, event);
                false
            }
        }
    }

    pub fn hook_count(&self, event: &str) -> usize {
        self.hooks().get(event).map_or(0, Vec::len)
    }

    /// Runs the callbacks of `event`. Returns false if one interrupted the chain.
    ///
    /// Dispatch works on a copy of the callback list, so callbacks may add or
    /// remove hooks; the change applies from the next dispatch on.
    pub fn run_hooks(&self, event: &str, data: &Value) -> bool {
        let listeners: Vec<HookCallback> = match self.hooks().get(event) {
            Some(listeners) => listeners.iter().map(|(_, cb)| Arc::clone(cb)).collect(),
            None => return true,
        };

        for callback in listeners {
            match callback(data) {
                Ok(true) => {}
                Ok(false) => return false,
                Err(e) => log::error!("error running hook {}, error: {}", event, e),
            }
        }
        true
    }
}

impl std::fmt::Debug for HookBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hooks = self.hooks();
        let mut counts: Vec<_> = hooks.iter().map(|(event, l)| (event.clone(), l.len())).collect();
        counts.sort();
        f.debug_struct("HookBus").field("hooks", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IntelError;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_runs_in_order_with_data() {
        let bus = HookBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second"] {
            let seen = seen.clone();
            bus.add_hook(events::PORTAL_ADDED, move |data| {
                seen.lock().unwrap().push(format!("{tag}:{}", data["guid"]));
                Ok(true)
            });
        }

        assert!(bus.run_hooks(events::PORTAL_ADDED, &json!({"guid": "abc"})));
        assert_eq!(*seen.lock().unwrap(), [r#"first:"abc""#, r#"second:"abc""#]);
    }

    #[test]
    fn test_unknown_event_runs_nothing() {
        let bus = HookBus::new();
        assert!(bus.run_hooks("nothing", &Value::Null));
        assert_eq!(bus.hook_count("nothing"), 0);
    }

    #[test]
    fn test_false_interrupts() {
        let bus = HookBus::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let c = calls.clone();
        bus.add_hook(events::MAP_DATA_REFRESH_START, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(false)
        });
        let c = calls.clone();
        bus.add_hook(events::MAP_DATA_REFRESH_START, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        });

        assert!(!bus.run_hooks(events::MAP_DATA_REFRESH_START, &Value::Null));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_errors_do_not_stop_dispatch() {
        let bus = HookBus::new();
        let calls = Arc::new(AtomicUsize::new(0));

        bus.add_hook(events::LINK_ADDED, |_| Err(IntelError::Plugin("broken".into())));
        let c = calls.clone();
        bus.add_hook(events::LINK_ADDED, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        });

        assert!(bus.run_hooks(events::LINK_ADDED, &Value::Null));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_remove_hook() {
        let bus = HookBus::new();
        let keep = bus.add_hook(events::FIELD_ADDED, |_| Ok(true));
        let stop = bus.add_hook(events::FIELD_ADDED, |_| Ok(false));

        assert!(!bus.run_hooks(events::FIELD_ADDED, &Value::Null));
        assert!(bus.remove_hook(events::FIELD_ADDED, stop));
        assert!(!bus.remove_hook(events::FIELD_ADDED, stop));
        assert!(!bus.remove_hook(events::FIELD_REMOVED, keep));
        assert_eq!(bus.hook_count(events::FIELD_ADDED), 1);
        assert!(bus.run_hooks(events::FIELD_ADDED, &Value::Null));
    }

    #[test]
    fn test_removal_during_dispatch_applies_next_time() {
        let bus = Arc::new(HookBus::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let c = calls.clone();
        let later = bus.add_hook(events::PANE_CHANGED, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        });
        let weak = Arc::downgrade(&bus);
        bus.add_hook(events::PANE_CHANGED, move |_| {
            if let Some(bus) = weak.upgrade() {
                bus.remove_hook(events::PANE_CHANGED, later);
            }
            Ok(true)
        });

        // `later` runs first, then is removed
        assert!(bus.run_hooks(events::PANE_CHANGED, &Value::Null));
        assert!(bus.run_hooks(events::PANE_CHANGED, &Value::Null));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(bus.hook_count(events::PANE_CHANGED), 1);
    }
}
