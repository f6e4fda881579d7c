//! Event hub for settings lifecycle notifications.
//!
//! Two notifications are broadcast, each carrying a reference to the
//! settings document:
//!
//! - **settings-loaded** — after a successful load. Subscribers that attach
//!   late are immediately replayed the most recently loaded document, so
//!   dependent components can populate themselves regardless of startup
//!   order.
//! - **save-requested** — before a flush. Listeners may answer with
//!   `Some(true)` / `Some(false)`; `None` means no opinion. The dispatch
//!   outcome is the last explicit answer, mirroring the host bus where the
//!   handler's return value was the dispatch result. Which paths honor the
//!   outcome (and with which polarity) is decided by the controller.
//!
//! The hub is `Clone` and thread-safe so shell components can hold it, but
//! dispatch itself happens on the single event-processing thread.

use std::mem;
use std::sync::Arc;

use nimbus_settings_model::SettingsDocument;
use parking_lot::Mutex;

/// A listener for a settings notification.
///
/// The return value only matters for save-requested dispatches.
pub type Listener = Box<dyn FnMut(&SettingsDocument) -> Option<bool> + Send>;

/// Handle for removing a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Aggregated result of a save-requested dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    last: Option<bool>,
}

impl DispatchOutcome {
    /// A listener explicitly approved the save (`Some(true)` won).
    pub fn approved(&self) -> bool {
        self.last == Some(true)
    }

    /// A listener explicitly vetoed the save (`Some(false)` won).
    pub fn vetoed(&self) -> bool {
        self.last == Some(false)
    }

    /// The winning explicit answer, if any listener gave one.
    pub fn explicit(&self) -> Option<bool> {
        self.last
    }
}

#[derive(Default)]
struct HubInner {
    next_id: u64,
    loaded: Vec<(SubscriptionId, Listener)>,
    save_requested: Vec<(SubscriptionId, Listener)>,
    /// Snapshot of the most recently loaded document, used to replay the
    /// loaded notification to late subscribers.
    last_loaded: Option<SettingsDocument>,
}

impl HubInner {
    fn alloc_id(&mut self) -> SubscriptionId {
        self.next_id += 1;
        SubscriptionId(self.next_id)
    }
}

/// Cloneable registry of settings lifecycle listeners.
#[derive(Clone, Default)]
pub struct EventHub {
    inner: Arc<Mutex<HubInner>>,
}

impl EventHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to settings-loaded notifications.
    ///
    /// If a document has already been loaded, the listener is invoked
    /// immediately with a snapshot of it before being registered.
    pub fn subscribe_loaded<F>(&self, mut listener: F) -> SubscriptionId
    where
        F: FnMut(&SettingsDocument) -> Option<bool> + Send + 'static,
    {
        let replay = self.inner.lock().last_loaded.clone();
        if let Some(doc) = replay {
            let _ = listener(&doc);
        }
        let mut inner = self.inner.lock();
        let id = inner.alloc_id();
        inner.loaded.push((id, Box::new(listener)));
        id
    }

    /// Subscribe to save-requested notifications.
    pub fn subscribe_save_requested<F>(&self, listener: F) -> SubscriptionId
    where
        F: FnMut(&SettingsDocument) -> Option<bool> + Send + 'static,
    {
        let mut inner = self.inner.lock();
        let id = inner.alloc_id();
        inner.save_requested.push((id, Box::new(listener)));
        id
    }

    /// Remove a subscription. Returns `true` if it was still registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.loaded.len() + inner.save_requested.len();
        inner.loaded.retain(|(sid, _)| *sid != id);
        inner.save_requested.retain(|(sid, _)| *sid != id);
        before != inner.loaded.len() + inner.save_requested.len()
    }

    /// Broadcast that a document finished loading.
    pub fn dispatch_loaded(&self, document: &SettingsDocument) {
        let mut listeners = {
            let mut inner = self.inner.lock();
            inner.last_loaded = Some(document.clone());
            mem::take(&mut inner.loaded)
        };
        for (_, listener) in &mut listeners {
            let _ = listener(document);
        }
        // Put the listeners back, keeping any added while the dispatch ran.
        let mut inner = self.inner.lock();
        let added_during_dispatch = mem::take(&mut inner.loaded);
        listeners.extend(added_during_dispatch);
        inner.loaded = listeners;
    }

    /// Broadcast that a save is about to happen and collect the outcome.
    pub fn dispatch_save_requested(&self, document: &SettingsDocument) -> DispatchOutcome {
        let mut listeners = {
            let mut inner = self.inner.lock();
            mem::take(&mut inner.save_requested)
        };
        let mut outcome = DispatchOutcome::default();
        for (_, listener) in &mut listeners {
            if let Some(answer) = listener(document) {
                outcome.last = Some(answer);
            }
        }
        let mut inner = self.inner.lock();
        let added_during_dispatch = mem::take(&mut inner.save_requested);
        listeners.extend(added_during_dispatch);
        inner.save_requested = listeners;
        outcome
    }
}
