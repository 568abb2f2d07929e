//! Modal key dispatch: the interpreter state machine, its motion
//! vocabulary, and the per-mode command tables.

mod interpreter;
mod motion;
mod tables;

pub use interpreter::{Interpreter, KeyDisposition};
pub use motion::{MotionConfig, MotionKind};
