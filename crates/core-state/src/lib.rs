//! Interpreter state: mode cell plus pending-command accumulators.
//!
//! The dispatcher in `core-dispatch` is the only mutator. State is an
//! owned value (no globals) so tests can drive the machine
//! deterministically. Payloads for the transient modes live in
//! [`PendingState`] next to a flat [`Mode`] enum; coherence between the
//! two (e.g. a pending operator exists exactly while an operator mode
//! is active) is a dispatcher invariant checked in debug builds.

use std::fmt;

/// Interpretation context for incoming keys. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Normal,
    Insert,
    Visual,
    VisualLine,
    /// Operator captured, awaiting a motion, the operator's own key
    /// (line-wise trigger), or `i`/`a` (text-object prefix).
    OperatorPending,
    /// Operator plus `i`/`a` seen; awaiting `w` or `p`.
    ObjectPending,
    /// Visual-mode `i`/`a` seen; awaiting `w` or `p`.
    VisualObjectPending,
    /// `f`/`s` seen; collecting the literal search characters.
    CharTargetPending,
    /// Digit prefix accumulating; resumes into the remembered mode.
    CountPending,
    /// A search submission is in flight; keystrokes are swallowed
    /// until the finalize step restores Normal.
    SearchDispatched,
}

impl Mode {
    /// Modes with in-flight pending commands. Any transition out of
    /// these (other than their own resolution) aborts the pending
    /// command.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Mode::OperatorPending
                | Mode::ObjectPending
                | Mode::VisualObjectPending
                | Mode::CharTargetPending
                | Mode::CountPending
        )
    }

    pub fn is_visual(&self) -> bool {
        matches!(self, Mode::Visual | Mode::VisualLine)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Normal => "normal",
            Mode::Insert => "insert",
            Mode::Visual => "visual",
            Mode::VisualLine => "visual-line",
            Mode::OperatorPending => "operator-pending",
            Mode::ObjectPending => "object-pending",
            Mode::VisualObjectPending => "visual-object-pending",
            Mode::CharTargetPending => "char-target-pending",
            Mode::CountPending => "count-pending",
            Mode::SearchDispatched => "search-dispatched",
        };
        f.write_str(name)
    }
}

/// Semantic action consuming a subsequently resolved selection.
/// `DocTop` is the virtual operator behind `gg`: it shares the
/// pending/resolution machinery but moves instead of selecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Change,
    Delete,
    Yank,
    Paste,
    DocTop,
}

impl OperatorKind {
    /// Operator keys recognized in Normal mode. `Paste` is not listed:
    /// it only runs as an operator from Visual mode, where `p` acts on
    /// the live selection.
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            'c' => Some(OperatorKind::Change),
            'd' => Some(OperatorKind::Delete),
            'y' => Some(OperatorKind::Yank),
            'g' => Some(OperatorKind::DocTop),
            _ => None,
        }
    }
}

/// Which character-search command is collecting input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharTargetKind {
    /// `f`: one character completes the query.
    Find,
    /// `s`: first of two characters.
    SneakFirst,
    /// `s`: second of two characters; completion submits both.
    SneakSecond,
}

/// In-flight character-search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharTarget {
    pub kind: CharTargetKind,
    pub collected: String,
}

impl CharTarget {
    pub fn find() -> Self {
        Self {
            kind: CharTargetKind::Find,
            collected: String::new(),
        }
    }

    pub fn sneak() -> Self {
        Self {
            kind: CharTargetKind::SneakFirst,
            collected: String::new(),
        }
    }
}

/// Count prefixes saturate here; anything larger is operator error.
pub const COUNT_MAX: u32 = 999_999;

/// Accumulators mutated only by the dispatcher. At most one of
/// `operator` / `char_target` is non-empty at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingState {
    /// Digit prefix; 0 means unset (execute once).
    pub count: u32,
    /// Mode to resume into once the count is consumed.
    pub count_resume: Option<Mode>,
    pub operator: Option<OperatorKind>,
    pub char_target: Option<CharTarget>,
    /// Insert suspended for one Normal command via the Ctrl chord.
    pub temp_normal: bool,
}

impl PendingState {
    /// Abort semantics: drop every in-flight pending command. The
    /// temp-normal flag survives; it is consumed only by a completed
    /// Normal command.
    pub fn clear(&mut self) {
        if !self.is_empty() {
            tracing::trace!(
                target: "dispatch.state",
                count = self.count,
                operator = ?self.operator,
                char_target = ?self.char_target.as_ref().map(|t| t.kind),
                "pending_cleared"
            );
        }
        self.count = 0;
        self.count_resume = None;
        self.operator = None;
        self.char_target = None;
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
            && self.count_resume.is_none()
            && self.operator.is_none()
            && self.char_target.is_none()
    }

    /// Append a digit to the count, saturating at [`COUNT_MAX`].
    pub fn push_count_digit(&mut self, digit: u32) {
        debug_assert!(digit < 10);
        self.count = self
            .count
            .saturating_mul(10)
            .saturating_add(digit)
            .min(COUNT_MAX);
    }

    /// Consume the count with the execute-once floor.
    pub fn take_count(&mut self) -> u32 {
        let n = self.count.max(1);
        self.count = 0;
        n
    }
}

/// The whole interpreter state: one mode cell plus accumulators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterState {
    pub mode: Mode,
    pub pending: PendingState,
}

impl Default for InterpreterState {
    fn default() -> Self {
        Self::new()
    }
}

impl InterpreterState {
    /// Interpreter start: Normal with all accumulators empty.
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            pending: PendingState::default(),
        }
    }

    /// Debug-only coherence check between the mode cell and the
    /// pending payloads.
    pub fn debug_assert_coherent(&self) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(
                !(self.pending.operator.is_some() && self.pending.char_target.is_some()),
                "operator and char target pending simultaneously"
            );
            match self.mode {
                Mode::OperatorPending | Mode::ObjectPending => {
                    debug_assert!(self.pending.operator.is_some(), "operator mode without kind")
                }
                Mode::CharTargetPending => {
                    debug_assert!(self.pending.char_target.is_some(), "char mode without target")
                }
                Mode::CountPending => {
                    debug_assert!(self.pending.count_resume.is_some(), "count mode without resume")
                }
                Mode::Normal => {
                    debug_assert!(
                        self.pending.is_empty(),
                        "normal mode with pending state: {:?}",
                        self.pending
                    )
                }
                _ => {}
            }
        }
    }
}
