//! The modal key dispatcher.
//!
//! One [`Interpreter`] instance owns the whole interpreter state (mode
//! cell plus pending accumulators) and is the only mutator of it. Each
//! host keystroke becomes exactly one [`Interpreter::handle_key`] call,
//! which runs to completion and reports whether the host should
//! suppress the key's default handling. The single asynchronous step is
//! search submission: `handle_key` parks the machine in
//! `SearchDispatched` and returns the query; the runtime then drives
//! [`Interpreter::finish_search`], whose finalization restores Normal
//! on every path (success, overlay error, timeout).
//!
//! Failure policy: nothing here returns an error. Unrecognized keys and
//! abandoned multi-key sequences are silent no-ops; collaborator
//! failures are logged at the call site and treated as completed.

use std::time::{Duration, Instant};

use core_config::Config;
use core_host::{
    Host, InputSink, MenuAction, MenuActionInvoker, ModeIndicator, PrimitiveKey, SearchOverlay,
};
use core_keys::{KeyInput, KeyToken, ModMask};
use core_state::{CharTarget, CharTargetKind, InterpreterState, Mode, OperatorKind};
use tracing::{debug, trace, warn};

use crate::motion::{self, MotionConfig, MotionKind};
use crate::tables::{
    self, CharSearch, InsertEntry, NormalCmd, OperatorResolve, TextObjectKind, VisualCmd,
};

/// What the host glue should do with the keystroke it just delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyDisposition {
    /// The interpreter did not claim the key; the host editor handles
    /// it natively.
    PassThrough,
    /// The key was claimed; suppress the host's default handling.
    Handled,
    /// The key completed a character-search command. The machine is in
    /// `SearchDispatched`; the runtime must drive `finish_search` with
    /// this query to reach the terminal transition.
    SearchStarted(String),
}

/// The modal key-interpretation state machine.
#[derive(Debug)]
pub struct Interpreter {
    state: InterpreterState,
    motion: MotionConfig,
    temp_normal_chord: char,
    search_budget: Duration,
}

impl Interpreter {
    /// Build from loaded configuration, resolving the platform word
    /// modifier once.
    pub fn new(cfg: &Config) -> Self {
        Self::with_options(
            MotionConfig {
                word: cfg.resolve_word_modifier(),
            },
            cfg.file.input.temp_normal_chord,
            cfg.file.search.submit_budget(),
        )
    }

    pub fn with_options(
        motion: MotionConfig,
        temp_normal_chord: char,
        search_budget: Duration,
    ) -> Self {
        Self {
            state: InterpreterState::new(),
            motion,
            temp_normal_chord,
            search_budget,
        }
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    /// Read-only view of the full interpreter state (test and status
    /// introspection).
    pub fn state(&self) -> &InterpreterState {
        &self.state
    }

    // ---------------------------------------------------------------------------------------------
    // Dispatch entry
    // ---------------------------------------------------------------------------------------------

    /// Interpret one keystroke. Short-circuits, in order: bare modifier
    /// keystrokes, in-flight search swallow, the temporary-normal
    /// chord, arbitrary modified chords, Escape, Insert pass-through,
    /// then the per-mode tables.
    pub fn handle_key<I, M, D>(
        &mut self,
        input: KeyInput,
        host: &mut Host<I, M, D>,
    ) -> KeyDisposition
    where
        I: InputSink,
        M: MenuActionInvoker,
        D: ModeIndicator,
    {
        self.state.debug_assert_coherent();

        if input.is_bare_modifier() {
            return KeyDisposition::PassThrough;
        }

        if self.state.mode == Mode::SearchDispatched {
            trace!(target: "dispatch", key = %input, "swallowed_during_search");
            return KeyDisposition::Handled;
        }

        if self.state.mode == Mode::Insert
            && input.mods.contains(ModMask::CTRL)
            && input.token == KeyToken::Char(self.temp_normal_chord)
        {
            debug!(target: "dispatch", "temp_normal_suspend");
            self.state.mode = Mode::Normal;
            self.state.pending.temp_normal = true;
            host.indicator.show(Mode::Normal);
            return KeyDisposition::Handled;
        }

        if input.has_chord_modifier() {
            return KeyDisposition::PassThrough;
        }

        if input.token == KeyToken::Named(core_keys::NamedKey::Escape) {
            if self.state.mode.is_visual() {
                host.sink.send(PrimitiveKey::Right, ModMask::empty());
            }
            self.enter_normal(host);
            return KeyDisposition::Handled;
        }

        if self.state.mode == Mode::Insert {
            return KeyDisposition::PassThrough;
        }

        let disposition = self.dispatch_in_mode(input, host);
        self.state.debug_assert_coherent();
        disposition
    }

    fn dispatch_in_mode<I, M, D>(
        &mut self,
        input: KeyInput,
        host: &mut Host<I, M, D>,
    ) -> KeyDisposition
    where
        I: InputSink,
        M: MenuActionInvoker,
        D: ModeIndicator,
    {
        match self.state.mode {
            Mode::Normal => self.normal_key(input, host),
            Mode::Visual | Mode::VisualLine => self.visual_key(input, host),
            Mode::OperatorPending => self.operator_key(input, host),
            Mode::ObjectPending => self.object_key(input, host),
            Mode::VisualObjectPending => self.visual_object_key(input, host),
            Mode::CharTargetPending => self.char_target_key(input, host),
            Mode::CountPending => self.count_key(input, host),
            // Both are filtered out before per-mode dispatch.
            Mode::Insert | Mode::SearchDispatched => KeyDisposition::Handled,
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Normal mode
    // ---------------------------------------------------------------------------------------------

    fn normal_key<I, M, D>(&mut self, input: KeyInput, host: &mut Host<I, M, D>) -> KeyDisposition
    where
        I: InputSink,
        M: MenuActionInvoker,
        D: ModeIndicator,
    {
        let KeyToken::Char(c) = input.token else {
            trace!(target: "dispatch", key = %input, mode = %Mode::Normal, "unbound_key");
            return KeyDisposition::Handled;
        };

        // A leading non-zero digit starts count accumulation; a leading
        // zero is the line-start motion (a count never begins with 0).
        if let Some(d) = c.to_digit(10)
            && d != 0
        {
            self.begin_count(d, Mode::Normal, host);
            return KeyDisposition::Handled;
        }

        let Some(cmd) = tables::normal_binding(c) else {
            trace!(target: "dispatch", key = %c, mode = %Mode::Normal, "unbound_key");
            return KeyDisposition::Handled;
        };
        let disposition = self.exec_normal(cmd, host);
        self.after_command(host);
        disposition
    }

    fn exec_normal<I, M, D>(&mut self, cmd: NormalCmd, host: &mut Host<I, M, D>) -> KeyDisposition
    where
        I: InputSink,
        M: MenuActionInvoker,
        D: ModeIndicator,
    {
        match cmd {
            NormalCmd::Motion(kind) => motion::emit(&mut host.sink, kind, false, &self.motion),
            NormalCmd::Operator(op) => {
                debug!(target: "dispatch.operator", operator = ?op, "operator_pending");
                self.state.pending.operator = Some(op);
                self.state.mode = Mode::OperatorPending;
                host.indicator.show(Mode::OperatorPending);
            }
            NormalCmd::Menu(action) => host.invoke_menu(action),
            NormalCmd::DeleteUnder => host.sink.send(PrimitiveKey::Delete, ModMask::empty()),
            NormalCmd::EnterInsert(entry) => {
                match entry {
                    InsertEntry::Here => {}
                    InsertEntry::After => host.sink.send(PrimitiveKey::Right, ModMask::empty()),
                    InsertEntry::LineStart => host.sink.send(PrimitiveKey::Home, ModMask::empty()),
                    InsertEntry::LineEnd => host.sink.send(PrimitiveKey::End, ModMask::empty()),
                }
                self.enter_insert(host);
            }
            NormalCmd::EnterVisual => self.enter_visual(host),
            NormalCmd::EnterVisualLine => self.enter_visual_line(host),
            NormalCmd::OpenLineBelow => {
                host.sink.send(PrimitiveKey::End, ModMask::empty());
                host.sink.send(PrimitiveKey::Enter, ModMask::SHIFT);
                self.enter_insert(host);
            }
            NormalCmd::OpenLineAbove => {
                host.sink.send(PrimitiveKey::Home, ModMask::empty());
                host.sink.send(PrimitiveKey::Enter, ModMask::SHIFT);
                host.sink.send(PrimitiveKey::Up, ModMask::empty());
                self.enter_insert(host);
            }
            NormalCmd::CharSearch(kind) => {
                self.state.pending.char_target = Some(match kind {
                    CharSearch::Find => CharTarget::find(),
                    CharSearch::Sneak => CharTarget::sneak(),
                });
                self.state.mode = Mode::CharTargetPending;
                host.indicator.show(Mode::CharTargetPending);
            }
        }
        KeyDisposition::Handled
    }

    // ---------------------------------------------------------------------------------------------
    // Visual modes
    // ---------------------------------------------------------------------------------------------

    fn visual_key<I, M, D>(&mut self, input: KeyInput, host: &mut Host<I, M, D>) -> KeyDisposition
    where
        I: InputSink,
        M: MenuActionInvoker,
        D: ModeIndicator,
    {
        let KeyToken::Char(c) = input.token else {
            trace!(target: "dispatch", key = %input, mode = %self.state.mode, "unbound_key");
            return KeyDisposition::Handled;
        };

        if let Some(d) = c.to_digit(10)
            && d != 0
        {
            self.begin_count(d, self.state.mode, host);
            return KeyDisposition::Handled;
        }

        match tables::visual_binding(c) {
            Some(VisualCmd::Motion(kind)) => motion::emit(&mut host.sink, kind, true, &self.motion),
            Some(VisualCmd::RunOperator(op)) => self.run_operator(op, host),
            Some(VisualCmd::TextObject) => {
                self.state.mode = Mode::VisualObjectPending;
                host.indicator.show(Mode::VisualObjectPending);
            }
            None => {
                trace!(target: "dispatch", key = %c, mode = %self.state.mode, "unbound_key");
            }
        }
        KeyDisposition::Handled
    }

    fn visual_object_key<I, M, D>(
        &mut self,
        input: KeyInput,
        host: &mut Host<I, M, D>,
    ) -> KeyDisposition
    where
        I: InputSink,
        M: MenuActionInvoker,
        D: ModeIndicator,
    {
        if let KeyToken::Char(c) = input.token {
            match tables::object_binding(c) {
                Some(TextObjectKind::Word) => {
                    // Two word-lefts: the first collapses the live
                    // selection, the second reaches the word start.
                    motion::emit(&mut host.sink, MotionKind::WordStart, false, &self.motion);
                    motion::emit(&mut host.sink, MotionKind::WordStart, false, &self.motion);
                    motion::emit(&mut host.sink, MotionKind::WordEnd, true, &self.motion);
                }
                Some(TextObjectKind::Paragraph) => {
                    motion::emit(&mut host.sink, MotionKind::ParaUp, false, &self.motion);
                    motion::emit(&mut host.sink, MotionKind::ParaDownEnd, true, &self.motion);
                }
                None => {
                    trace!(target: "dispatch", key = %c, mode = %self.state.mode, "unbound_key");
                }
            }
        }
        // Table exception to the abort-to-Normal default: the visual
        // object sub-state always lands in VisualLine.
        self.state.mode = Mode::VisualLine;
        host.indicator.show(Mode::VisualLine);
        KeyDisposition::Handled
    }

    // ---------------------------------------------------------------------------------------------
    // Operator pending / text objects
    // ---------------------------------------------------------------------------------------------

    fn operator_key<I, M, D>(&mut self, input: KeyInput, host: &mut Host<I, M, D>) -> KeyDisposition
    where
        I: InputSink,
        M: MenuActionInvoker,
        D: ModeIndicator,
    {
        let Some(op) = self.state.pending.operator else {
            self.enter_normal(host);
            return KeyDisposition::Handled;
        };
        let KeyToken::Char(c) = input.token else {
            self.enter_normal(host);
            return KeyDisposition::Handled;
        };

        match tables::operator_binding(c, op) {
            Some(OperatorResolve::SameOperator) => {
                if op == OperatorKind::DocTop {
                    // `gg`: jump, no selection.
                    motion::emit(&mut host.sink, MotionKind::DocTop, false, &self.motion);
                    self.enter_normal_resolved(host);
                } else {
                    motion::emit(&mut host.sink, MotionKind::LineStart, false, &self.motion);
                    motion::emit(&mut host.sink, MotionKind::LineEnd, true, &self.motion);
                    self.run_operator(op, host);
                }
                self.after_command(host);
            }
            Some(_) if op == OperatorKind::DocTop => {
                // `g` composes with nothing but its own key.
                self.enter_normal(host);
            }
            Some(OperatorResolve::SelectMotion(kind)) => {
                motion::emit(&mut host.sink, kind, true, &self.motion);
                self.run_operator(op, host);
                self.after_command(host);
            }
            Some(OperatorResolve::ObjectPrefix) => {
                self.state.mode = Mode::ObjectPending;
                host.indicator.show(Mode::ObjectPending);
            }
            None => {
                debug!(target: "dispatch.operator", operator = ?op, key = %c, "operator_aborted");
                self.enter_normal(host);
            }
        }
        KeyDisposition::Handled
    }

    fn object_key<I, M, D>(&mut self, input: KeyInput, host: &mut Host<I, M, D>) -> KeyDisposition
    where
        I: InputSink,
        M: MenuActionInvoker,
        D: ModeIndicator,
    {
        let Some(op) = self.state.pending.operator else {
            self.enter_normal(host);
            return KeyDisposition::Handled;
        };
        let object = match input.token {
            KeyToken::Char(c) => tables::object_binding(c),
            _ => None,
        };
        match object {
            Some(TextObjectKind::Word) => {
                motion::emit(&mut host.sink, MotionKind::WordStart, false, &self.motion);
                motion::emit(&mut host.sink, MotionKind::WordEnd, true, &self.motion);
                self.run_operator(op, host);
                self.after_command(host);
            }
            Some(TextObjectKind::Paragraph) => {
                motion::emit(&mut host.sink, MotionKind::ParaUp, false, &self.motion);
                motion::emit(&mut host.sink, MotionKind::ParaDown, true, &self.motion);
                self.run_operator(op, host);
                self.after_command(host);
            }
            None => {
                debug!(target: "dispatch.operator", operator = ?op, "text_object_aborted");
                self.enter_normal(host);
            }
        }
        KeyDisposition::Handled
    }

    /// Execute a resolved operator against the current selection.
    fn run_operator<I, M, D>(&mut self, op: OperatorKind, host: &mut Host<I, M, D>)
    where
        I: InputSink,
        M: MenuActionInvoker,
        D: ModeIndicator,
    {
        debug!(
            target: "dispatch.operator",
            operator = ?op,
            from = %self.state.mode,
            "run_operator"
        );
        match op {
            OperatorKind::Change => {
                host.invoke_menu(MenuAction::Cut);
                self.enter_insert(host);
            }
            OperatorKind::Delete => {
                host.invoke_menu(MenuAction::Cut);
                host.sink.send(PrimitiveKey::Backspace, ModMask::empty());
                self.enter_normal_resolved(host);
            }
            OperatorKind::Yank => {
                host.invoke_menu(MenuAction::Copy);
                self.enter_normal(host);
            }
            OperatorKind::Paste => {
                host.invoke_menu(MenuAction::Paste);
                self.enter_normal(host);
            }
            OperatorKind::DocTop => {
                motion::emit(&mut host.sink, MotionKind::DocTop, false, &self.motion);
                self.enter_normal_resolved(host);
            }
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Character search
    // ---------------------------------------------------------------------------------------------

    fn char_target_key<I, M, D>(
        &mut self,
        input: KeyInput,
        host: &mut Host<I, M, D>,
    ) -> KeyDisposition
    where
        I: InputSink,
        M: MenuActionInvoker,
        D: ModeIndicator,
    {
        let Some(target) = self.state.pending.char_target.as_mut() else {
            self.enter_normal(host);
            return KeyDisposition::Handled;
        };
        let KeyToken::Char(c) = input.token else {
            // Only literal characters extend a target; anything else
            // aborts without searching.
            self.enter_normal(host);
            return KeyDisposition::Handled;
        };
        match target.kind {
            CharTargetKind::Find => {
                let query = c.to_string();
                self.start_search(query, host)
            }
            CharTargetKind::SneakFirst => {
                target.collected.push(c);
                target.kind = CharTargetKind::SneakSecond;
                KeyDisposition::Handled
            }
            CharTargetKind::SneakSecond => {
                target.collected.push(c);
                let query = std::mem::take(&mut target.collected);
                self.start_search(query, host)
            }
        }
    }

    fn start_search<I, M, D>(&mut self, query: String, host: &mut Host<I, M, D>) -> KeyDisposition
    where
        I: InputSink,
        M: MenuActionInvoker,
        D: ModeIndicator,
    {
        debug!(target: "dispatch.search", query_len = query.len(), "search_dispatched");
        self.state.pending.char_target = None;
        self.state.mode = Mode::SearchDispatched;
        host.indicator.show(Mode::SearchDispatched);
        KeyDisposition::SearchStarted(query)
    }

    /// Drive the in-flight search to its terminal transition. Success,
    /// overlay failure, and timeout all converge here on exactly one
    /// transition back to Normal.
    pub async fn finish_search<S, I, M, D>(
        &mut self,
        overlay: &mut S,
        host: &mut Host<I, M, D>,
        query: &str,
    ) where
        S: SearchOverlay,
        I: InputSink,
        M: MenuActionInvoker,
        D: ModeIndicator,
    {
        debug_assert_eq!(self.state.mode, Mode::SearchDispatched);
        let started = Instant::now();
        match tokio::time::timeout(self.search_budget, overlay.submit(query)).await {
            Ok(Ok(())) => debug!(
                target: "dispatch.search",
                query_len = query.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "search_submitted"
            ),
            Ok(Err(e)) => warn!(target: "dispatch.search", error = %e, "search_submit_failed"),
            Err(_) => warn!(
                target: "dispatch.search",
                budget_ms = self.search_budget.as_millis() as u64,
                "search_submit_timed_out"
            ),
        }
        // Guaranteed finalization: the one terminal transition.
        self.state.pending.clear();
        self.state.mode = Mode::Normal;
        host.indicator.show(Mode::Normal);
        self.after_command(host);
    }

    // ---------------------------------------------------------------------------------------------
    // Counts
    // ---------------------------------------------------------------------------------------------

    fn begin_count<I, M, D>(&mut self, digit: u32, resume: Mode, host: &mut Host<I, M, D>)
    where
        I: InputSink,
        M: MenuActionInvoker,
        D: ModeIndicator,
    {
        self.state.pending.push_count_digit(digit);
        self.state.pending.count_resume = Some(resume);
        self.state.mode = Mode::CountPending;
        host.indicator.show(Mode::CountPending);
    }

    fn count_key<I, M, D>(&mut self, input: KeyInput, host: &mut Host<I, M, D>) -> KeyDisposition
    where
        I: InputSink,
        M: MenuActionInvoker,
        D: ModeIndicator,
    {
        if let KeyToken::Char(c) = input.token
            && let Some(d) = c.to_digit(10)
        {
            self.state.pending.push_count_digit(d);
            return KeyDisposition::Handled;
        }

        let resume = self.state.pending.count_resume.take().unwrap_or(Mode::Normal);
        self.state.mode = resume;
        host.indicator.show(resume);

        // Character-search commands do not take counts: discard.
        if matches!(input.token, KeyToken::Char('f') | KeyToken::Char('s')) {
            let dropped = std::mem::take(&mut self.state.pending.count);
            debug!(target: "dispatch.count", dropped, "count_dropped_char_search");
            return self.dispatch_in_mode(input, host);
        }

        // Counts repeat motions and the stateless commands (delete
        // under cursor, menu actions). Mode switches and operator
        // prefixes run once with the count discarded.
        if resume == Mode::Normal
            && let KeyToken::Char(c) = input.token
            && let Some(cmd) = tables::normal_binding(c)
        {
            match cmd {
                NormalCmd::Motion(kind) => {
                    let times = self.state.pending.take_count();
                    debug!(target: "dispatch.count", times, motion = ?kind, "count_motion");
                    for _ in 0..times {
                        motion::emit(&mut host.sink, kind, false, &self.motion);
                    }
                    self.after_command(host);
                    return KeyDisposition::Handled;
                }
                NormalCmd::DeleteUnder | NormalCmd::Menu(_) => {
                    let times = self.state.pending.take_count();
                    debug!(target: "dispatch.count", times, key = %c, "count_command");
                    for _ in 0..times {
                        self.exec_normal(cmd, host);
                    }
                    self.after_command(host);
                    return KeyDisposition::Handled;
                }
                _ => {}
            }
        }
        if resume.is_visual()
            && let KeyToken::Char(c) = input.token
            && let Some(VisualCmd::Motion(kind)) = tables::visual_binding(c)
        {
            let times = self.state.pending.take_count();
            debug!(target: "dispatch.count", times, motion = ?kind, "count_motion");
            for _ in 0..times {
                motion::emit(&mut host.sink, kind, true, &self.motion);
            }
            self.after_command(host);
            return KeyDisposition::Handled;
        }

        let dropped = std::mem::take(&mut self.state.pending.count);
        if dropped > 1 {
            debug!(target: "dispatch.count", dropped, "count_dropped_non_repeatable");
        }
        self.dispatch_in_mode(input, host)
    }

    // ---------------------------------------------------------------------------------------------
    // Mode transitions (entry side effects live here)
    // ---------------------------------------------------------------------------------------------

    /// Enter Normal with abort semantics. Leaving VisualLine or an
    /// unresolved operator issues one compensating Left (the trailing
    /// selection extension those states carry).
    fn enter_normal<I, M, D>(&mut self, host: &mut Host<I, M, D>)
    where
        I: InputSink,
        M: MenuActionInvoker,
        D: ModeIndicator,
    {
        let compensate = matches!(self.state.mode, Mode::VisualLine | Mode::OperatorPending);
        if compensate {
            host.sink.send(PrimitiveKey::Left, ModMask::empty());
        }
        self.enter_normal_resolved(host);
    }

    /// Enter Normal without compensation (delete already consumed the
    /// selection, or the motion left none behind).
    fn enter_normal_resolved<I, M, D>(&mut self, host: &mut Host<I, M, D>)
    where
        I: InputSink,
        M: MenuActionInvoker,
        D: ModeIndicator,
    {
        self.state.pending.clear();
        self.state.mode = Mode::Normal;
        host.indicator.show(Mode::Normal);
    }

    fn enter_insert<I, M, D>(&mut self, host: &mut Host<I, M, D>)
    where
        I: InputSink,
        M: MenuActionInvoker,
        D: ModeIndicator,
    {
        self.state.pending.clear();
        self.state.mode = Mode::Insert;
        host.indicator.show(Mode::Insert);
    }

    /// A visual selection must never start empty: extend right by one
    /// immediately.
    fn enter_visual<I, M, D>(&mut self, host: &mut Host<I, M, D>)
    where
        I: InputSink,
        M: MenuActionInvoker,
        D: ModeIndicator,
    {
        self.state.mode = Mode::Visual;
        host.indicator.show(Mode::Visual);
        host.sink.send(PrimitiveKey::Right, ModMask::SHIFT);
    }

    fn enter_visual_line<I, M, D>(&mut self, host: &mut Host<I, M, D>)
    where
        I: InputSink,
        M: MenuActionInvoker,
        D: ModeIndicator,
    {
        self.state.mode = Mode::VisualLine;
        host.indicator.show(Mode::VisualLine);
        host.sink.send(PrimitiveKey::Home, ModMask::empty());
        host.sink.send(PrimitiveKey::Down, ModMask::SHIFT);
    }

    /// Temporary-normal epilogue: once the suspended command has
    /// completed, return to Insert, unless the command itself entered
    /// a visual mode (or Insert already). A command that left a
    /// transient pending state keeps the flag until it resolves.
    fn after_command<I, M, D>(&mut self, host: &mut Host<I, M, D>)
    where
        I: InputSink,
        M: MenuActionInvoker,
        D: ModeIndicator,
    {
        if !self.state.pending.temp_normal {
            return;
        }
        match self.state.mode {
            Mode::Normal => {
                self.state.pending.temp_normal = false;
                debug!(target: "dispatch", "temp_normal_resume_insert");
                self.enter_insert(host);
            }
            Mode::Visual | Mode::VisualLine | Mode::Insert => {
                self.state.pending.temp_normal = false;
            }
            _ => {}
        }
    }
}
