//! Motion emission: each motion kind expands to one or two primitive
//! key events against the host editor.
//!
//! Word and paragraph units ride modified arrow keys; which modifier
//! carries the unit is platform-dependent and resolved once at startup
//! into [`MotionConfig`]. The `select` flavor ORs shift into every step
//! so the same table serves cursor movement and selection extension.

use core_keys::ModMask;
use core_host::{InputSink, PrimitiveKey, WordModifier};
use smallvec::SmallVec;

/// Primitive or composite cursor/selection movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionKind {
    Left,
    Right,
    Up,
    Down,
    /// Back to the previous word boundary (`b`).
    WordStart,
    /// Forward to the next word boundary (`w`, `e`).
    WordEnd,
    /// To the start of the paragraph (`{`).
    ParaUp,
    /// To the end of the paragraph (bare step, used by operators).
    ParaDown,
    /// Paragraph end plus one step right (`}`), landing after the
    /// paragraph break the way the host's native navigation does.
    ParaDownEnd,
    /// `0`, `^`, `_`.
    LineStart,
    /// `$`.
    LineEnd,
    /// `gg`.
    DocTop,
    /// `G`.
    DocBottom,
}

/// Motion-table configuration, fixed at interpreter construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionConfig {
    pub word: WordModifier,
}

type Steps = SmallVec<[(PrimitiveKey, ModMask); 2]>;

/// Expand a motion into its primitive steps. `select` extends the
/// selection instead of moving the caret.
pub(crate) fn steps(kind: MotionKind, select: bool, cfg: &MotionConfig) -> Steps {
    let word = cfg.word.mask();
    let none = ModMask::empty();
    let mut out: Steps = match kind {
        MotionKind::Left => smallvec::smallvec![(PrimitiveKey::Left, none)],
        MotionKind::Right => smallvec::smallvec![(PrimitiveKey::Right, none)],
        MotionKind::Up => smallvec::smallvec![(PrimitiveKey::Up, none)],
        MotionKind::Down => smallvec::smallvec![(PrimitiveKey::Down, none)],
        MotionKind::WordStart => smallvec::smallvec![(PrimitiveKey::Left, word)],
        MotionKind::WordEnd => smallvec::smallvec![(PrimitiveKey::Right, word)],
        MotionKind::ParaUp => smallvec::smallvec![(PrimitiveKey::Up, word)],
        MotionKind::ParaDown => smallvec::smallvec![(PrimitiveKey::Down, word)],
        MotionKind::ParaDownEnd => {
            smallvec::smallvec![(PrimitiveKey::Down, word), (PrimitiveKey::Right, none)]
        }
        MotionKind::LineStart => smallvec::smallvec![(PrimitiveKey::Home, none)],
        MotionKind::LineEnd => smallvec::smallvec![(PrimitiveKey::End, none)],
        MotionKind::DocTop => smallvec::smallvec![(PrimitiveKey::Home, word)],
        MotionKind::DocBottom => smallvec::smallvec![(PrimitiveKey::End, word)],
    };
    if select {
        for (_, mods) in out.iter_mut() {
            *mods |= ModMask::SHIFT;
        }
    }
    out
}

/// Emit a motion to the sink.
pub(crate) fn emit<I: InputSink>(sink: &mut I, kind: MotionKind, select: bool, cfg: &MotionConfig) {
    for (key, mods) in steps(kind, select, cfg) {
        sink.send(key, mods);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cfg() -> MotionConfig {
        MotionConfig {
            word: WordModifier::Control,
        }
    }

    #[test]
    fn plain_arrows_have_no_mods() {
        let s = steps(MotionKind::Left, false, &cfg());
        assert_eq!(s.as_slice(), &[(PrimitiveKey::Left, ModMask::empty())]);
    }

    #[test]
    fn word_motions_carry_configured_modifier() {
        let s = steps(MotionKind::WordEnd, false, &cfg());
        assert_eq!(s.as_slice(), &[(PrimitiveKey::Right, ModMask::CTRL)]);

        let alt_cfg = MotionConfig {
            word: WordModifier::Alt,
        };
        let s = steps(MotionKind::WordStart, false, &alt_cfg);
        assert_eq!(s.as_slice(), &[(PrimitiveKey::Left, ModMask::ALT)]);
    }

    #[test]
    fn select_flavor_adds_shift_to_every_step() {
        let s = steps(MotionKind::ParaDownEnd, true, &cfg());
        assert_eq!(
            s.as_slice(),
            &[
                (PrimitiveKey::Down, ModMask::CTRL | ModMask::SHIFT),
                (PrimitiveKey::Right, ModMask::SHIFT),
            ]
        );
    }

    #[test]
    fn paragraph_end_motion_steps_past_the_break() {
        let s = steps(MotionKind::ParaDownEnd, false, &cfg());
        assert_eq!(
            s.as_slice(),
            &[
                (PrimitiveKey::Down, ModMask::CTRL),
                (PrimitiveKey::Right, ModMask::empty()),
            ]
        );
        // The bare operator flavor stops at the paragraph boundary.
        let s = steps(MotionKind::ParaDown, true, &cfg());
        assert_eq!(
            s.as_slice(),
            &[(PrimitiveKey::Down, ModMask::CTRL | ModMask::SHIFT)]
        );
    }

    #[test]
    fn document_boundaries_use_word_modifier_on_home_end() {
        let s = steps(MotionKind::DocTop, false, &cfg());
        assert_eq!(s.as_slice(), &[(PrimitiveKey::Home, ModMask::CTRL)]);
        let s = steps(MotionKind::DocBottom, true, &cfg());
        assert_eq!(
            s.as_slice(),
            &[(PrimitiveKey::End, ModMask::CTRL | ModMask::SHIFT)]
        );
    }
}
