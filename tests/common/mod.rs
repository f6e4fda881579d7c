//! Shared integration test helpers for nimbus-settings.
//!
//! Provides the test doubles for the controller's collaborator seams: a
//! recording host channel, scripted settings pages, and a stub UI host.
//!
//! Note: Rust integration tests use `mod common;` (not `use`) to bring in
//! helpers from `tests/common/mod.rs`. The `#[allow(dead_code)]` attribute
//! suppresses warnings when only a subset of helpers are used per file.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Instant;

use nimbus_settings::model::SettingsDocument;
use nimbus_settings::protocol::{ClientMessage, SettingsAction};
use nimbus_settings::{
    EventHub, HostChannel, SessionContext, SettingsController, SettingsPage, UiHost,
};
use parking_lot::Mutex;

/// Host channel double that records every outbound frame.
pub struct RecordingChannel {
    sent: Arc<Mutex<Vec<ClientMessage>>>,
}

impl RecordingChannel {
    pub fn new() -> (Self, Arc<Mutex<Vec<ClientMessage>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        (Self { sent: Arc::clone(&sent) }, sent)
    }
}

impl HostChannel for RecordingChannel {
    fn send(&mut self, message: &ClientMessage) -> anyhow::Result<()> {
        self.sent.lock().push(message.clone());
        Ok(())
    }
}

/// Shared view into a [`FakePage`]'s state.
#[derive(Clone)]
pub struct PageProbe {
    pending: Arc<Mutex<Vec<(String, String, String)>>>,
    rollbacks: Arc<Mutex<usize>>,
}

impl PageProbe {
    /// Number of uncommitted edits left on the page.
    pub fn pending_edits(&self) -> usize {
        self.pending.lock().len()
    }

    /// How many times a non-empty undo log was discarded.
    pub fn rollbacks(&self) -> usize {
        *self.rollbacks.lock()
    }
}

/// Settings page double with a scripted undo log of `(path, key, value)`
/// edits. Commit writes them into the document; rollback discards them.
pub struct FakePage {
    id: String,
    pending: Arc<Mutex<Vec<(String, String, String)>>>,
    rollbacks: Arc<Mutex<usize>>,
}

impl FakePage {
    pub fn new(id: &str, edits: &[(&str, &str, &str)]) -> (Self, PageProbe) {
        let pending = Arc::new(Mutex::new(
            edits
                .iter()
                .map(|(p, k, v)| (p.to_string(), k.to_string(), v.to_string()))
                .collect::<Vec<_>>(),
        ));
        let rollbacks = Arc::new(Mutex::new(0));
        let probe = PageProbe {
            pending: Arc::clone(&pending),
            rollbacks: Arc::clone(&rollbacks),
        };
        (
            Self {
                id: id.to_string(),
                pending,
                rollbacks,
            },
            probe,
        )
    }
}

impl SettingsPage for FakePage {
    fn id(&self) -> &str {
        &self.id
    }

    fn undo_depth(&self) -> usize {
        self.pending.lock().len()
    }

    fn commit(&mut self, document: &mut SettingsDocument) {
        for (path, key, value) in self.pending.lock().drain(..) {
            document
                .set_value(&path, key, value)
                .expect("test edit targets an existing section");
        }
    }

    fn rollback(&mut self) {
        let mut pending = self.pending.lock();
        if !pending.is_empty() {
            pending.clear();
            *self.rollbacks.lock() += 1;
        }
    }
}

/// Shared view into the [`StubUi`]'s window state.
#[derive(Clone)]
pub struct UiProbe {
    visible: Arc<Mutex<bool>>,
    button_active: Arc<Mutex<bool>>,
}

impl UiProbe {
    pub fn window_visible(&self) -> bool {
        *self.visible.lock()
    }

    pub fn button_active(&self) -> bool {
        *self.button_active.lock()
    }
}

/// UI host double holding the scripted pages.
pub struct StubUi {
    pages: Vec<Box<dyn SettingsPage>>,
    visible: Arc<Mutex<bool>>,
    button_active: Arc<Mutex<bool>>,
}

impl StubUi {
    pub fn new(pages: Vec<Box<dyn SettingsPage>>) -> (Self, UiProbe) {
        let visible = Arc::new(Mutex::new(false));
        let button_active = Arc::new(Mutex::new(false));
        let probe = UiProbe {
            visible: Arc::clone(&visible),
            button_active: Arc::clone(&button_active),
        };
        (
            Self {
                pages,
                visible,
                button_active,
            },
            probe,
        )
    }
}

impl UiHost for StubUi {
    fn pages_mut(&mut self) -> &mut [Box<dyn SettingsPage>] {
        &mut self.pages
    }

    fn show_window(&mut self) {
        *self.visible.lock() = true;
    }

    fn hide_window(&mut self) {
        *self.visible.lock() = false;
    }

    fn set_button_active(&mut self, active: bool) {
        *self.button_active.lock() = active;
    }
}

/// Build a controller over recording doubles.
pub fn controller_with(
    session: SessionContext,
    pages: Vec<Box<dyn SettingsPage>>,
) -> (
    SettingsController,
    Arc<Mutex<Vec<ClientMessage>>>,
    UiProbe,
) {
    let (channel, sent) = RecordingChannel::new();
    let (ui, probe) = StubUi::new(pages);
    let controller =
        SettingsController::new(session, Box::new(channel), Box::new(ui), EventHub::new());
    (controller, sent, probe)
}

/// Controller with no pages, for lifecycle-only tests.
pub fn bare_controller(
    session: SessionContext,
) -> (SettingsController, Arc<Mutex<Vec<ClientMessage>>>) {
    let (controller, sent, _) = controller_with(session, Vec::new());
    (controller, sent)
}

/// Payloads of all recorded `set` frames, in send order.
pub fn persisted_texts(sent: &Arc<Mutex<Vec<ClientMessage>>>) -> Vec<String> {
    sent.lock()
        .iter()
        .filter_map(|m| match m {
            ClientMessage::Settings(SettingsAction::Set { settings }) => Some(settings.clone()),
            _ => None,
        })
        .collect()
}

/// Number of recorded `get` frames.
pub fn get_requests(sent: &Arc<Mutex<Vec<ClientMessage>>>) -> usize {
    sent.lock()
        .iter()
        .filter(|m| matches!(m, ClientMessage::Settings(SettingsAction::Get)))
        .count()
}

/// A fixed point in time for driving the controller's timers.
pub fn epoch() -> Instant {
    Instant::now()
}
