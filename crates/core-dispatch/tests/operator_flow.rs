mod common;

use common::*;
use core_host::{MenuAction, PrimitiveKey};
use core_state::Mode;
use pretty_assertions::assert_eq;

#[test]
fn delete_word_selects_then_cuts() {
    let mut interp = interpreter();
    let mut host = host();
    feed(&mut interp, &mut host, "dw");
    assert_eq!(
        host.sink.sent,
        vec![
            (PrimitiveKey::Right, CTRL_SHIFT),
            (PrimitiveKey::Backspace, NONE),
        ]
    );
    assert_eq!(host.menu.invoked, vec![MenuAction::Cut]);
    assert_eq!(interp.mode(), Mode::Normal);
}

#[test]
fn delete_line_selects_the_whole_line() {
    let mut interp = interpreter();
    let mut host = host();
    feed(&mut interp, &mut host, "dd");
    assert_eq!(
        host.sink.sent,
        vec![
            (PrimitiveKey::Home, NONE),
            (PrimitiveKey::End, SHIFT),
            (PrimitiveKey::Backspace, NONE),
        ]
    );
    assert_eq!(host.menu.invoked, vec![MenuAction::Cut]);
    assert_eq!(interp.mode(), Mode::Normal);
}

#[test]
fn delete_to_line_end() {
    let mut interp = interpreter();
    let mut host = host();
    feed(&mut interp, &mut host, "d$");
    assert_eq!(
        host.sink.sent,
        vec![(PrimitiveKey::End, SHIFT), (PrimitiveKey::Backspace, NONE)]
    );
}

#[test]
fn delete_to_line_start() {
    let mut interp = interpreter();
    let mut host = host();
    feed(&mut interp, &mut host, "d0");
    assert_eq!(
        host.sink.sent,
        vec![(PrimitiveKey::Home, SHIFT), (PrimitiveKey::Backspace, NONE)]
    );
}

#[test]
fn change_word_cuts_and_enters_insert() {
    let mut interp = interpreter();
    let mut host = host();
    feed(&mut interp, &mut host, "cw");
    assert_eq!(host.sink.sent, vec![(PrimitiveKey::Right, CTRL_SHIFT)]);
    assert_eq!(host.menu.invoked, vec![MenuAction::Cut]);
    assert_eq!(interp.mode(), Mode::Insert);
}

#[test]
fn yank_line_compensates_the_selection_remnant() {
    let mut interp = interpreter();
    let mut host = host();
    feed(&mut interp, &mut host, "yy");
    assert_eq!(
        host.sink.sent,
        vec![
            (PrimitiveKey::Home, NONE),
            (PrimitiveKey::End, SHIFT),
            (PrimitiveKey::Left, NONE),
        ]
    );
    assert_eq!(host.menu.invoked, vec![MenuAction::Copy]);
    assert_eq!(interp.mode(), Mode::Normal);
}

#[test]
fn inner_word_object_selects_the_word_under_the_cursor() {
    let mut interp = interpreter();
    let mut host = host();
    feed(&mut interp, &mut host, "ciw");
    assert_eq!(
        host.sink.sent,
        vec![(PrimitiveKey::Left, CTRL), (PrimitiveKey::Right, CTRL_SHIFT)]
    );
    assert_eq!(host.menu.invoked, vec![MenuAction::Cut]);
    assert_eq!(interp.mode(), Mode::Insert);
}

#[test]
fn yank_inner_word_exits_without_compensation() {
    let mut interp = interpreter();
    let mut host = host();
    feed(&mut interp, &mut host, "yiw");
    assert_eq!(
        host.sink.sent,
        vec![(PrimitiveKey::Left, CTRL), (PrimitiveKey::Right, CTRL_SHIFT)]
    );
    assert_eq!(host.menu.invoked, vec![MenuAction::Copy]);
    assert_eq!(interp.mode(), Mode::Normal);
}

#[test]
fn inner_paragraph_object() {
    let mut interp = interpreter();
    let mut host = host();
    feed(&mut interp, &mut host, "dip");
    assert_eq!(
        host.sink.sent,
        vec![
            (PrimitiveKey::Up, CTRL),
            (PrimitiveKey::Down, CTRL_SHIFT),
            (PrimitiveKey::Backspace, NONE),
        ]
    );
    assert_eq!(host.menu.invoked, vec![MenuAction::Cut]);
}

#[test]
fn around_objects_behave_like_inner_objects() {
    let mut inner = interpreter();
    let mut inner_host = host();
    feed(&mut inner, &mut inner_host, "diw");

    let mut around = interpreter();
    let mut around_host = host();
    feed(&mut around, &mut around_host, "daw");

    assert_eq!(inner_host.sink.sent, around_host.sink.sent);
    assert_eq!(inner_host.menu.invoked, around_host.menu.invoked);
}

#[test]
fn double_g_jumps_to_document_top() {
    let mut interp = interpreter();
    let mut host = host();
    feed(&mut interp, &mut host, "gg");
    assert_eq!(host.sink.sent, vec![(PrimitiveKey::Home, CTRL)]);
    assert_eq!(interp.mode(), Mode::Normal);
}

#[test]
fn g_composes_with_nothing_else() {
    let mut interp = interpreter();
    let mut host = host();
    feed(&mut interp, &mut host, "gw");
    // Abort path: one compensating Left, no word motion.
    assert_eq!(host.sink.sent, vec![(PrimitiveKey::Left, NONE)]);
    assert_eq!(interp.mode(), Mode::Normal);
}

#[test]
fn unbound_key_aborts_a_pending_operator() {
    let mut interp = interpreter();
    let mut host = host();
    feed(&mut interp, &mut host, "dz");
    assert_eq!(host.sink.sent, vec![(PrimitiveKey::Left, NONE)]);
    assert!(host.menu.invoked.is_empty());
    assert_eq!(interp.mode(), Mode::Normal);
}

#[test]
fn escape_aborts_a_pending_operator() {
    let mut interp = interpreter();
    let mut host = host();
    interp.handle_key(ch('d'), &mut host);
    assert_eq!(interp.mode(), Mode::OperatorPending);
    interp.handle_key(esc(), &mut host);
    assert_eq!(host.sink.sent, vec![(PrimitiveKey::Left, NONE)]);
    assert_eq!(interp.mode(), Mode::Normal);
}

#[test]
fn unbound_object_key_aborts_without_running_the_operator() {
    let mut interp = interpreter();
    let mut host = host();
    feed(&mut interp, &mut host, "diq");
    assert!(host.menu.invoked.is_empty());
    assert_eq!(interp.mode(), Mode::Normal);
}

#[test]
fn aborted_operator_leaves_no_residue() {
    let mut interp = interpreter();
    let mut host = host();
    feed(&mut interp, &mut host, "dz");
    assert!(interp.state().pending.is_empty());
    // The next command behaves as if the abort never happened.
    host.sink.sent.clear();
    feed(&mut interp, &mut host, "dw");
    assert_eq!(
        host.sink.sent,
        vec![
            (PrimitiveKey::Right, CTRL_SHIFT),
            (PrimitiveKey::Backspace, NONE),
        ]
    );
}
