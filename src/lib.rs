//! Settings persistence subsystem for the Nimbus web IDE shell.
//!
//! This crate implements the preferences panel lifecycle: it owns the
//! settings document, loads it from the backing service with transparent
//! fallback to a built-in template, debounces rapid saves, runs a periodic
//! autosave, and drains the panel's pending edits on explicit save. The
//! widget toolkit and the socket transport stay behind the [`UiHost`] and
//! [`HostChannel`] seams; the shell implements both.
//!
//! Everything runs on the shell's single event-processing thread: inbound
//! frames go to [`SettingsController::handle_host_event`], and the event
//! loop pumps [`SettingsController::tick`] with the current time.

pub mod controller;
pub mod events;
pub mod panel;
pub mod session;

// Member crates, re-exported so integration code needs a single dependency.
pub use nimbus_settings_model as model;
pub use nimbus_settings_protocol as protocol;

// Re-export main types for convenience
pub use controller::{
    AUTOSAVE_PERIOD, DocumentSource, FlushSchedule, HostChannel, SAVE_DEBOUNCE, SettingsController,
};
pub use events::{DispatchOutcome, EventHub, SubscriptionId};
pub use panel::{ExtensionInfo, SHOW_SETTINGS_COMMAND, SettingsPage, UiHost, extension_info};
pub use session::SessionContext;
