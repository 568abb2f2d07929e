//! Shared recording collaborators for dispatcher integration tests.
#![allow(dead_code)]

use core_dispatch::{Interpreter, KeyDisposition, MotionConfig};
use core_host::{
    Host, HostError, InputSink, MenuAction, MenuActionInvoker, ModeIndicator, PrimitiveKey,
    SearchOverlay, WordModifier,
};
use core_keys::{KeyInput, ModMask, NamedKey};
use core_state::Mode;
use std::time::Duration;

/// Records every primitive key event in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub sent: Vec<(PrimitiveKey, ModMask)>,
}

impl InputSink for RecordingSink {
    fn send(&mut self, key: PrimitiveKey, mods: ModMask) {
        self.sent.push((key, mods));
    }
}

/// Records menu invocations; optionally fails every call.
#[derive(Debug, Default)]
pub struct RecordingMenu {
    pub invoked: Vec<MenuAction>,
    pub fail: bool,
}

impl MenuActionInvoker for RecordingMenu {
    fn invoke(&mut self, action: MenuAction) -> Result<(), HostError> {
        self.invoked.push(action);
        if self.fail {
            Err(HostError::MenuItemNotFound(action.name()))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingIndicator {
    pub shown: Vec<Mode>,
}

impl ModeIndicator for RecordingIndicator {
    fn show(&mut self, mode: Mode) {
        self.shown.push(mode);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayBehavior {
    Succeed,
    Fail,
    Hang,
}

/// Search overlay stub with selectable outcome.
#[derive(Debug)]
pub struct StubOverlay {
    pub queries: Vec<String>,
    pub behavior: OverlayBehavior,
}

impl StubOverlay {
    pub fn new(behavior: OverlayBehavior) -> Self {
        Self {
            queries: Vec::new(),
            behavior,
        }
    }
}

impl SearchOverlay for StubOverlay {
    async fn submit(&mut self, query: &str) -> Result<(), HostError> {
        self.queries.push(query.to_string());
        match self.behavior {
            OverlayBehavior::Succeed => Ok(()),
            OverlayBehavior::Fail => Err(HostError::OverlayUnavailable),
            OverlayBehavior::Hang => std::future::pending().await,
        }
    }
}

pub type TestHost = Host<RecordingSink, RecordingMenu, RecordingIndicator>;

pub fn host() -> TestHost {
    Host::new(
        RecordingSink::default(),
        RecordingMenu::default(),
        RecordingIndicator::default(),
    )
}

/// Interpreter pinned to the Control word modifier so expected
/// sequences are platform-independent.
pub fn interpreter() -> Interpreter {
    Interpreter::with_options(
        MotionConfig {
            word: WordModifier::Control,
        },
        'o',
        Duration::from_millis(200),
    )
}

pub fn ch(c: char) -> KeyInput {
    KeyInput::ch(c)
}

pub fn esc() -> KeyInput {
    KeyInput::named(NamedKey::Escape)
}

/// Feed a run of plain character keys, discarding dispositions.
pub fn feed(interp: &mut Interpreter, host: &mut TestHost, keys: &str) {
    for c in keys.chars() {
        interp.handle_key(ch(c), host);
    }
}

/// Feed keys and return the last disposition.
pub fn feed_last(interp: &mut Interpreter, host: &mut TestHost, keys: &str) -> KeyDisposition {
    let mut last = KeyDisposition::Handled;
    for c in keys.chars() {
        last = interp.handle_key(ch(c), host);
    }
    last
}

pub const NONE: ModMask = ModMask::empty();
pub const SHIFT: ModMask = ModMask::SHIFT;
pub const CTRL: ModMask = ModMask::CTRL;
pub const CTRL_SHIFT: ModMask = ModMask::CTRL.union(ModMask::SHIFT);
