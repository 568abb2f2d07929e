//! Capability traits for the host-editor collaborators.
//!
//! The dispatcher never touches the host UI directly; it speaks four
//! narrow interfaces: a key-event sink, a menu-action invoker, an async
//! search overlay, and an observational mode indicator. Implementations
//! (browser glue, a scripted harness, test doubles) live outside the
//! core. Nothing behind these traits may panic into the dispatcher:
//! fallible operations return [`HostError`] and the call site converts
//! failures to the log-and-continue policy.

use std::time::Duration;

use core_keys::{ModMask, NamedKey};
use core_state::Mode;
use thiserror::Error;
use tracing::{debug, warn};

/// Primitive keys the interpreter synthesizes toward the host editor.
/// The host only honors events whose numeric code matches the native
/// one, so each variant maps onto a [`NamedKey`] wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKey {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Backspace,
    Enter,
    Delete,
}

impl PrimitiveKey {
    pub fn named(&self) -> NamedKey {
        match self {
            PrimitiveKey::Left => NamedKey::Left,
            PrimitiveKey::Right => NamedKey::Right,
            PrimitiveKey::Up => NamedKey::Up,
            PrimitiveKey::Down => NamedKey::Down,
            PrimitiveKey::Home => NamedKey::Home,
            PrimitiveKey::End => NamedKey::End,
            PrimitiveKey::Backspace => NamedKey::Backspace,
            PrimitiveKey::Enter => NamedKey::Enter,
            PrimitiveKey::Delete => NamedKey::Delete,
        }
    }

    /// Numeric code placed on the synthetic-event wire.
    pub fn wire_code(&self) -> u8 {
        self.named()
            .wire_code()
            .expect("every primitive key has a wire code")
    }
}

/// Document-editing actions performed through host UI automation
/// (menu clicking) rather than key synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    Copy,
    Cut,
    Paste,
    Undo,
    Redo,
    OpenFind,
}

impl MenuAction {
    /// Stable identifier for logging.
    pub fn name(&self) -> &'static str {
        match self {
            MenuAction::Copy => "copy",
            MenuAction::Cut => "cut",
            MenuAction::Paste => "paste",
            MenuAction::Undo => "undo",
            MenuAction::Redo => "redo",
            MenuAction::OpenFind => "open-find",
        }
    }
}

/// Which modifier the host platform uses for word/paragraph-unit
/// navigation. Resolved once at startup from configuration and baked
/// into the motion table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordModifier {
    Control,
    Alt,
}

impl WordModifier {
    pub fn mask(&self) -> ModMask {
        match self {
            WordModifier::Control => ModMask::CTRL,
            WordModifier::Alt => ModMask::ALT,
        }
    }
}

/// Failures surfaced by host collaborators. None are fatal to the
/// interpreter; call sites log and proceed as if the action completed.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("menu item not found: {0}")]
    MenuItemNotFound(&'static str),
    #[error("search overlay unavailable")]
    OverlayUnavailable,
    #[error("probe did not succeed within {attempts} attempts")]
    ProbeTimeout { attempts: u32 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Emits one primitive key event (with modifiers) to the host editor's
/// focused element. Infallible by contract: an implementation that can
/// lose events must log, not error, so the interpreter state never
/// diverges from what it believes it sent.
pub trait InputSink {
    fn send(&mut self, key: PrimitiveKey, mods: ModMask);
}

/// Performs a document-editing action via host UI automation. May fail
/// when the target control cannot be located; the interpreter treats a
/// failure as a completed no-op.
pub trait MenuActionInvoker {
    fn invoke(&mut self, action: MenuAction) -> Result<(), HostError>;
}

/// Opens the host's find overlay, sets the query, dismisses the
/// overlay, and restores editor focus. Must terminate (success or
/// failure) so the interpreter can unconditionally restore Normal mode.
pub trait SearchOverlay {
    fn submit(&mut self, query: &str) -> impl Future<Output = Result<(), HostError>> + Send;
}

/// Side-channel mode display. Purely observational: no feedback path
/// into the state machine.
pub trait ModeIndicator {
    fn show(&mut self, mode: Mode);
}

/// The synchronous collaborators bundled for a dispatch call. The
/// search overlay stays separate: it is only touched by the async
/// finalize step.
#[derive(Debug)]
pub struct Host<I, M, D> {
    pub sink: I,
    pub menu: M,
    pub indicator: D,
}

impl<I, M, D> Host<I, M, D>
where
    I: InputSink,
    M: MenuActionInvoker,
    D: ModeIndicator,
{
    pub fn new(sink: I, menu: M, indicator: D) -> Self {
        Self {
            sink,
            menu,
            indicator,
        }
    }

    /// Invoke a menu action under the log-and-continue policy: a
    /// missing affordance must never wedge the interpreter.
    pub fn invoke_menu(&mut self, action: MenuAction) {
        if let Err(e) = self.menu.invoke(action) {
            warn!(target: "host.menu", action = action.name(), error = %e, "menu_invoke_failed");
        }
    }
}

/// Bounded retry probe: run `probe` up to `attempts` times, sleeping
/// `interval` between attempts, until it returns `Some`. Fails closed
/// with [`HostError::ProbeTimeout`]. Overlay implementations use this
/// to wait for the find overlay's input element to appear.
pub async fn poll_until<T, F>(
    attempts: u32,
    interval: Duration,
    mut probe: F,
) -> Result<T, HostError>
where
    F: FnMut() -> Option<T>,
{
    for attempt in 0..attempts.max(1) {
        if let Some(v) = probe() {
            debug!(target: "host.poll", attempt, "probe_succeeded");
            return Ok(v);
        }
        tokio::time::sleep(interval).await;
    }
    warn!(target: "host.poll", attempts, "probe_timeout");
    Err(HostError::ProbeTimeout { attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn primitive_wire_codes_round_trip_named_keys() {
        assert_eq!(PrimitiveKey::Backspace.wire_code(), 8);
        assert_eq!(PrimitiveKey::Enter.wire_code(), 13);
        assert_eq!(PrimitiveKey::End.wire_code(), 35);
        assert_eq!(PrimitiveKey::Home.wire_code(), 36);
        assert_eq!(PrimitiveKey::Left.wire_code(), 37);
        assert_eq!(PrimitiveKey::Up.wire_code(), 38);
        assert_eq!(PrimitiveKey::Right.wire_code(), 39);
        assert_eq!(PrimitiveKey::Down.wire_code(), 40);
        assert_eq!(PrimitiveKey::Delete.wire_code(), 46);
    }

    #[test]
    fn word_modifier_masks() {
        assert_eq!(WordModifier::Control.mask(), ModMask::CTRL);
        assert_eq!(WordModifier::Alt.mask(), ModMask::ALT);
    }

    #[derive(Default)]
    struct FailingMenu;
    impl MenuActionInvoker for FailingMenu {
        fn invoke(&mut self, action: MenuAction) -> Result<(), HostError> {
            Err(HostError::MenuItemNotFound(action.name()))
        }
    }

    #[derive(Default)]
    struct NullSink;
    impl InputSink for NullSink {
        fn send(&mut self, _key: PrimitiveKey, _mods: ModMask) {}
    }

    #[derive(Default)]
    struct NullIndicator;
    impl ModeIndicator for NullIndicator {
        fn show(&mut self, _mode: Mode) {}
    }

    #[test]
    fn menu_failure_is_swallowed() {
        let mut host = Host::new(NullSink, FailingMenu, NullIndicator);
        // Must not panic or propagate.
        host.invoke_menu(MenuAction::Cut);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_until_succeeds_after_retries() {
        let mut remaining = 3u32;
        let res = poll_until(10, Duration::from_millis(50), || {
            if remaining == 0 {
                Some(42)
            } else {
                remaining -= 1;
                None
            }
        })
        .await;
        assert_eq!(res.unwrap(), 42);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_until_fails_closed() {
        let res: Result<(), _> = poll_until(4, Duration::from_millis(10), || None).await;
        match res {
            Err(HostError::ProbeTimeout { attempts }) => assert_eq!(attempts, 4),
            other => panic!("expected probe timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn poll_until_floors_zero_attempts() {
        let res = poll_until(0, Duration::from_millis(1), || Some(1)).await;
        assert_eq!(res.unwrap(), 1);
    }
}
