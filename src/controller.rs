//! The settings controller: load/save lifecycle over the host channel.
//!
//! [`SettingsController`] exclusively owns the settings document for the
//! lifetime of the session. It mediates loading against the backing service
//! (with transparent fallback to the built-in template), debounces rapid
//! saves, runs a periodic autosave, and drains the panel's pending edits on
//! explicit save.
//!
//! Everything is single-threaded and cooperative: the shell's event loop
//! feeds inbound frames to [`SettingsController::handle_host_event`] and
//! pumps [`SettingsController::tick`] with the current `Instant`. The two
//! timer deadlines (debounce and autosave) are plain `Option<Instant>`
//! fields; no timer thread exists.

use std::time::{Duration, Instant};

use nimbus_settings_model::{SettingsDocument, default_template, default_template_text};
use nimbus_settings_protocol::{ClientMessage, DEFAULTS_SENTINEL, HostMessage, SettingsPayload};

use crate::events::{DispatchOutcome, EventHub};
use crate::panel::UiHost;
use crate::session::SessionContext;

/// Quiet period after the last `save()` call before a flush fires.
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(100);

/// Period of the recurring autosave check.
pub const AUTOSAVE_PERIOD: Duration = Duration::from_secs(60);

/// Transport to the backing service.
///
/// Implemented by the shell over its socket. Sends are fire-and-forget at
/// this layer: the controller logs failures and never retries or surfaces
/// them.
pub trait HostChannel {
    /// Send one outbound frame.
    fn send(&mut self, message: &ClientMessage) -> anyhow::Result<()>;
}

/// Where the current document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSource {
    /// No document yet (nothing received, or still waiting for the host).
    Unloaded,
    /// Parsed from a blob delivered by the backing service.
    Remote,
    /// The built-in default template (sentinel answer or parse fallback).
    Template,
}

/// Timer configuration. Defaults match the host shell's historical values;
/// tests shrink them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushSchedule {
    /// Debounce window for [`SettingsController::save`].
    pub debounce: Duration,
    /// Period of the recurring autosave check.
    pub autosave_period: Duration,
}

impl Default for FlushSchedule {
    fn default() -> Self {
        Self {
            debounce: SAVE_DEBOUNCE,
            autosave_period: AUTOSAVE_PERIOD,
        }
    }
}

/// Controller gluing the settings document to the host persistence channel
/// and the settings window.
pub struct SettingsController {
    session: SessionContext,
    channel: Box<dyn HostChannel>,
    ui: Box<dyn UiHost>,
    hub: EventHub,
    schedule: FlushSchedule,

    document: Option<SettingsDocument>,
    source: DocumentSource,

    /// One-shot wait for an inbound settings message, armed by `load()` when
    /// no blob is available and consumed by the first matching frame.
    awaiting_remote: bool,
    /// Whether the current session blob is the built-in template rather than
    /// remote data.
    template_blob: bool,

    /// Deadline of the debounced flush, overwritten on every `save()`.
    pending_flush: Option<Instant>,
    /// Deadline of the next autosave check; armed once a document is loaded.
    autosave_due: Option<Instant>,
}

impl SettingsController {
    /// Create a controller over the given collaborators.
    pub fn new(
        session: SessionContext,
        channel: Box<dyn HostChannel>,
        ui: Box<dyn UiHost>,
        hub: EventHub,
    ) -> Self {
        Self {
            session,
            channel,
            ui,
            hub,
            schedule: FlushSchedule::default(),
            document: None,
            source: DocumentSource::Unloaded,
            awaiting_remote: false,
            template_blob: false,
            pending_flush: None,
            autosave_due: None,
        }
    }

    /// Override the timer configuration.
    pub fn with_schedule(mut self, schedule: FlushSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// The loaded document, if any.
    pub fn document(&self) -> Option<&SettingsDocument> {
        self.document.as_ref()
    }

    /// Where the current document came from.
    pub fn source(&self) -> DocumentSource {
        self.source
    }

    /// The session context.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// A handle to the event hub.
    pub fn hub(&self) -> EventHub {
        self.hub.clone()
    }

    /// Whether the controller is waiting for an inbound settings message.
    pub fn is_waiting_for_remote(&self) -> bool {
        self.awaiting_remote
    }

    /// Load the settings document from the session blob.
    ///
    /// When the blob is the `"defaults"` sentinel it is substituted with the
    /// built-in template. When no blob is available at all, a one-shot wait
    /// for an inbound settings message is armed and, if the connection is
    /// online, a `get` request is sent; the load completes later through
    /// [`SettingsController::handle_host_event`].
    ///
    /// A blob that fails to parse is replaced by the default template; the
    /// error is logged, never propagated. On success a settings-loaded
    /// notification is emitted and the recurring autosave is armed.
    pub fn load(&mut self, now: Instant) {
        if self.session.blob() == Some(DEFAULTS_SENTINEL) {
            log::info!("stored settings are the defaults sentinel; using built-in template");
            self.session.set_blob(default_template_text());
            self.template_blob = true;
        }

        let Some(blob) = self.session.blob().map(str::to_owned) else {
            self.awaiting_remote = true;
            if self.session.online() {
                log::debug!("no settings blob yet; requesting from backing service");
                self.send(&ClientMessage::get());
            } else {
                log::debug!("no settings blob and offline; waiting for inbound settings");
            }
            return;
        };

        let (document, source) = match SettingsDocument::parse(&blob) {
            Ok(doc) => {
                let source = if self.template_blob {
                    DocumentSource::Template
                } else {
                    DocumentSource::Remote
                };
                (doc, source)
            }
            Err(err) => {
                log::warn!("settings blob failed to parse ({err}); falling back to the template");
                (default_template(), DocumentSource::Template)
            }
        };

        self.document = Some(document);
        self.source = source;
        self.awaiting_remote = false;
        log::info!("settings loaded ({:?})", self.source);

        if let Some(doc) = &self.document {
            self.hub.dispatch_loaded(doc);
        }
        self.autosave_due = Some(now + self.schedule.autosave_period);
    }

    /// Feed one inbound frame from the backing service.
    ///
    /// A settings frame is consumed exactly once while the one-shot wait is
    /// armed; later settings frames are ignored, preventing duplicate loads.
    /// Connectivity frames update the session, and coming online retries the
    /// load while the document is still unloaded.
    pub fn handle_host_event(&mut self, message: HostMessage, now: Instant) {
        match message {
            HostMessage::Settings { settings } => {
                if !self.awaiting_remote {
                    log::debug!("ignoring settings frame; no load pending");
                    return;
                }
                self.awaiting_remote = false;
                match SettingsPayload::from_wire(settings) {
                    SettingsPayload::Defaults => {
                        self.session.set_blob(default_template_text());
                        self.template_blob = true;
                    }
                    SettingsPayload::Document(text) => {
                        self.session.set_blob(text);
                        self.template_blob = false;
                    }
                }
                self.load(now);
            }
            HostMessage::Online => {
                self.session.mark_online();
                if self.source == DocumentSource::Unloaded {
                    self.load(now);
                }
            }
            HostMessage::Offline => {
                self.session.mark_offline();
            }
        }
    }

    /// Request a debounced save.
    ///
    /// Overwrites any pending flush deadline with `now + debounce`, so a
    /// burst of rapid edits coalesces into a single flush that reads the
    /// then-current document, not a snapshot from this call.
    pub fn save(&mut self, now: Instant) {
        self.pending_flush = Some(now + self.schedule.debounce);
    }

    /// Pump due timers. Call from the shell's event loop.
    ///
    /// The debounced flush broadcasts save-requested and then flushes
    /// unconditionally; the autosave broadcasts and flushes only when a
    /// listener explicitly approved. The two deadlines are independent.
    pub fn tick(&mut self, now: Instant) {
        if let Some(due) = self.pending_flush
            && due <= now
        {
            self.pending_flush = None;
            if let Some(doc) = &self.document {
                let _ = self.hub.dispatch_save_requested(doc);
            }
            self.flush();
        }

        if let Some(due) = self.autosave_due
            && due <= now
        {
            self.autosave_due = Some(now + self.schedule.autosave_period);
            if self.broadcast_save_requested().approved() {
                log::debug!("autosave approved by a listener; flushing");
                self.flush();
            }
        }
    }

    /// Commit all pending panel edits, then save.
    ///
    /// Every page with a non-empty undo log is committed into the document.
    /// The flush is immediate (no debounce) and happens when no listener
    /// vetoed the save, or unconditionally when any page had changes.
    pub fn save_settings_panel(&mut self) {
        let mut changed = false;
        if let Some(doc) = &mut self.document {
            for page in self.ui.pages_mut() {
                if page.undo_depth() > 0 {
                    log::debug!("committing pending edits for page '{}'", page.id());
                    page.commit(doc);
                    changed = true;
                }
            }
        }

        if !self.broadcast_save_requested().vetoed() || changed {
            self.flush();
        } else {
            log::debug!("panel save vetoed with no pending edits; skipping flush");
        }
    }

    /// Hide the settings window and commit-and-save its pending edits.
    pub fn save_settings(&mut self) {
        self.ui.hide_window();
        self.ui.set_button_active(false);
        self.save_settings_panel();
    }

    /// Commit-and-save without closing the window ("Apply").
    pub fn apply_settings(&mut self) {
        self.save_settings_panel();
    }

    /// Hide the settings window and discard all uncommitted edits.
    pub fn cancel_settings(&mut self) {
        self.ui.hide_window();
        self.ui.set_button_active(false);
        for page in self.ui.pages_mut() {
            page.rollback();
        }
    }

    /// Show the settings window. This is the `"showsettings"` command.
    pub fn show_settings(&mut self) {
        self.ui.show_window();
        self.ui.set_button_active(true);
    }

    /// Ensure a section with the given tag exists under `path_prefix`.
    ///
    /// Idempotent; a no-op when the section already exists or no document is
    /// loaded yet.
    pub fn add_section(&mut self, tag: &str, name: &str, path_prefix: &str) {
        let Some(doc) = &mut self.document else {
            log::warn!("add_section('{tag}') before settings loaded; ignoring");
            return;
        };
        match doc.ensure_section(path_prefix, tag, Some(name)) {
            Ok(true) => log::debug!("created settings section '{tag}' under '{path_prefix}'"),
            Ok(false) => {}
            Err(err) => log::warn!("add_section('{tag}') failed: {err}"),
        }
    }

    /// Flush-on-exit hook: persist the document if a listener approves.
    ///
    /// Same opt-in polarity as the autosave path. Also disarms both timers.
    pub fn shutdown(&mut self) {
        self.pending_flush = None;
        self.autosave_due = None;
        if self.broadcast_save_requested().approved() {
            log::info!("flushing settings on shutdown");
            self.flush();
        }
    }

    /// Serialize the document and send it to the backing service.
    ///
    /// Sends an empty string when no document is loaded. Fire-and-forget:
    /// failures are logged and dropped.
    pub fn flush(&mut self) {
        let text = match &self.document {
            Some(doc) => match doc.to_text() {
                Ok(text) => text,
                Err(err) => {
                    log::error!("settings serialize failed: {err}");
                    return;
                }
            },
            None => String::new(),
        };
        self.send(&ClientMessage::set(text));
    }

    /// Dispatch save-requested with the current document, or report a
    /// no-opinion outcome when nothing is loaded.
    fn broadcast_save_requested(&self) -> DispatchOutcome {
        match &self.document {
            Some(doc) => self.hub.dispatch_save_requested(doc),
            None => DispatchOutcome::default(),
        }
    }

    fn send(&mut self, message: &ClientMessage) {
        if let Err(err) = self.channel.send(message) {
            log::error!("settings channel send failed: {err:#}");
        }
    }
}
