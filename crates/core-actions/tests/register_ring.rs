mod common;
use common::*;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

proptest! {
    #[test]
    fn repeated_line_deletes_fill_numbered_ring(n in 1usize..16) {
        let mut s = Session::new(&numbered_lines(20));
        for _ in 0..n {
            s.keys("dd");
        }
        for slot in 1..=n.min(9) {
            let name = char::from_digit(slot as u32, 10).unwrap();
            let reg = s.register(name);
            prop_assert_eq!(reg.text, format!("{}\n", n + 1 - slot));
            prop_assert!(reg.line_wise);
        }
        for slot in (n + 1)..=9 {
            let name = char::from_digit(slot as u32, 10).unwrap();
            prop_assert!(s.register(name).is_empty());
        }
    }
}

#[test]
fn named_register_append() {
    let mut s = Session::new("x\ny\n");
    s.keys("\"ayyj\"Ayy");
    let reg = s.register('a');
    assert_eq!(reg.text, "x\ny\n");
    assert!(reg.line_wise);
    assert_eq!(s.register('"').text, "y\n");
}

#[test]
fn yank_writes_yank_register_and_leaves_ring() {
    let mut s = Session::new("alpha beta\n");
    s.keys("yw");
    assert_eq!(s.register('0').text, "alpha ");
    assert_eq!(s.register('"').text, "alpha ");
    assert!(s.register('1').is_empty());
}

#[test]
fn numbered_register_paste() {
    let mut s = Session::new("one\ntwo\nthree\n");
    s.keys("dddd");
    assert_eq!(s.text(), "three\n");
    s.keys("\"2p");
    assert_eq!(s.text(), "three\none\n");
    assert_eq!(s.cursor(), 6);
}

#[test]
fn black_hole_keeps_unnamed_register() {
    let mut s = Session::new("keep\ndrop\nend\n");
    s.keys("yyj\"_dd");
    assert_eq!(s.text(), "keep\nend\n");
    assert_eq!(s.register('"').text, "keep\n");
    assert!(s.register('1').is_empty());
    s.keys("p");
    assert_eq!(s.text(), "keep\nend\nkeep\n");
}

#[test]
fn paste_from_empty_register_does_nothing() {
    let mut s = Session::new("abc\n");
    s.keys("\"qp");
    assert_eq!(s.text(), "abc\n");
    assert_eq!(s.editor.command_text(), "");
}
