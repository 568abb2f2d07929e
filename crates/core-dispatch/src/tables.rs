//! Per-mode command tables.
//!
//! Each mode owns a static key-to-command mapping consumed by the
//! interpreter; the tables are pure (no state, no side effects) so the
//! dispatch rules stay in one place and the bindings in another. The
//! line-wise trigger (`dd`, `yy`, `cc`, `gg`) is an explicit
//! [`OperatorResolve::SameOperator`] case matched on operator kind, not
//! on the raw key, so extending the command set cannot alias it by
//! accident.

use crate::motion::MotionKind;
use core_host::MenuAction;
use core_state::OperatorKind;

/// Where the caret goes before entering Insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InsertEntry {
    /// `i`: insert at the caret.
    Here,
    /// `a`: append after the caret.
    After,
    /// `I`: insert at line start.
    LineStart,
    /// `A`: append at line end.
    LineEnd,
}

/// Which character-search command a key starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CharSearch {
    /// `f`: one target character.
    Find,
    /// `s`: two target characters (sneak).
    Sneak,
}

/// Normal-mode commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NormalCmd {
    Motion(MotionKind),
    Operator(OperatorKind),
    Menu(MenuAction),
    /// `x`: delete the character under the caret.
    DeleteUnder,
    EnterInsert(InsertEntry),
    EnterVisual,
    EnterVisualLine,
    /// `o`: open a line below and insert.
    OpenLineBelow,
    /// `O`: open a line above and insert.
    OpenLineAbove,
    CharSearch(CharSearch),
}

pub(crate) fn normal_binding(key: char) -> Option<NormalCmd> {
    let cmd = match key {
        'h' => NormalCmd::Motion(MotionKind::Left),
        'j' => NormalCmd::Motion(MotionKind::Down),
        'k' => NormalCmd::Motion(MotionKind::Up),
        'l' => NormalCmd::Motion(MotionKind::Right),
        'b' => NormalCmd::Motion(MotionKind::WordStart),
        'w' | 'e' => NormalCmd::Motion(MotionKind::WordEnd),
        '{' => NormalCmd::Motion(MotionKind::ParaUp),
        '}' => NormalCmd::Motion(MotionKind::ParaDownEnd),
        '0' | '^' | '_' => NormalCmd::Motion(MotionKind::LineStart),
        '$' => NormalCmd::Motion(MotionKind::LineEnd),
        'G' => NormalCmd::Motion(MotionKind::DocBottom),
        'c' => NormalCmd::Operator(OperatorKind::Change),
        'd' => NormalCmd::Operator(OperatorKind::Delete),
        'y' => NormalCmd::Operator(OperatorKind::Yank),
        'g' => NormalCmd::Operator(OperatorKind::DocTop),
        'p' => NormalCmd::Menu(MenuAction::Paste),
        'u' => NormalCmd::Menu(MenuAction::Undo),
        'r' => NormalCmd::Menu(MenuAction::Redo),
        '/' => NormalCmd::Menu(MenuAction::OpenFind),
        'x' => NormalCmd::DeleteUnder,
        'i' => NormalCmd::EnterInsert(InsertEntry::Here),
        'a' => NormalCmd::EnterInsert(InsertEntry::After),
        'I' => NormalCmd::EnterInsert(InsertEntry::LineStart),
        'A' => NormalCmd::EnterInsert(InsertEntry::LineEnd),
        'v' => NormalCmd::EnterVisual,
        'V' => NormalCmd::EnterVisualLine,
        'o' => NormalCmd::OpenLineBelow,
        'O' => NormalCmd::OpenLineAbove,
        'f' => NormalCmd::CharSearch(CharSearch::Find),
        's' => NormalCmd::CharSearch(CharSearch::Sneak),
        _ => return None,
    };
    Some(cmd)
}

/// Visual / VisualLine commands. Motions extend the selection; `c d y
/// p` act on the live selection immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VisualCmd {
    Motion(MotionKind),
    RunOperator(OperatorKind),
    /// `i` / `a`: select a text object around the caret.
    TextObject,
}

pub(crate) fn visual_binding(key: char) -> Option<VisualCmd> {
    let cmd = match key {
        'h' => VisualCmd::Motion(MotionKind::Left),
        'j' => VisualCmd::Motion(MotionKind::Down),
        'k' => VisualCmd::Motion(MotionKind::Up),
        'l' => VisualCmd::Motion(MotionKind::Right),
        'b' => VisualCmd::Motion(MotionKind::WordStart),
        'w' | 'e' => VisualCmd::Motion(MotionKind::WordEnd),
        '{' => VisualCmd::Motion(MotionKind::ParaUp),
        '}' => VisualCmd::Motion(MotionKind::ParaDownEnd),
        '0' | '^' | '_' => VisualCmd::Motion(MotionKind::LineStart),
        '$' => VisualCmd::Motion(MotionKind::LineEnd),
        'g' => VisualCmd::Motion(MotionKind::DocTop),
        'G' => VisualCmd::Motion(MotionKind::DocBottom),
        'c' => VisualCmd::RunOperator(OperatorKind::Change),
        'd' => VisualCmd::RunOperator(OperatorKind::Delete),
        'y' => VisualCmd::RunOperator(OperatorKind::Yank),
        'p' => VisualCmd::RunOperator(OperatorKind::Paste),
        'i' | 'a' => VisualCmd::TextObject,
        _ => return None,
    };
    Some(cmd)
}

/// How a key resolves a pending `c`/`d`/`y` operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OperatorResolve {
    /// Shift-extended motion from the caret; the operator runs on the
    /// resulting selection.
    SelectMotion(MotionKind),
    /// The operator's own key repeated: select the whole line first.
    SameOperator,
    /// `i` / `a`: await a text-object key.
    ObjectPrefix,
}

pub(crate) fn operator_binding(key: char, pending: OperatorKind) -> Option<OperatorResolve> {
    if OperatorKind::from_key(key) == Some(pending) {
        return Some(OperatorResolve::SameOperator);
    }
    let resolve = match key {
        'i' | 'a' => OperatorResolve::ObjectPrefix,
        'w' | 'e' => OperatorResolve::SelectMotion(MotionKind::WordEnd),
        'p' => OperatorResolve::SelectMotion(MotionKind::ParaDown),
        '0' | '^' | '_' => OperatorResolve::SelectMotion(MotionKind::LineStart),
        '$' => OperatorResolve::SelectMotion(MotionKind::LineEnd),
        _ => return None,
    };
    Some(resolve)
}

/// Inner text objects reachable from `i`/`a` in operator or visual
/// context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextObjectKind {
    Word,
    Paragraph,
}

pub(crate) fn object_binding(key: char) -> Option<TextObjectKind> {
    match key {
        'w' => Some(TextObjectKind::Word),
        'p' => Some(TextObjectKind::Paragraph),
        _ => None,
    }
}
