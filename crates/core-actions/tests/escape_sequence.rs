mod common;
use common::*;

use core_actions::EditorEvent;
use core_config::{InsertConfig, load_from};
use core_state::Mode;
use pretty_assertions::assert_eq;
use std::io::Write;

#[test]
fn quick_pair_leaves_insert_without_typing() {
    let mut s = Session::new("");
    s.keys("iab").keys("j").wait(100).keys("k");
    assert_eq!(s.mode(), Mode::Normal);
    assert_eq!(s.text(), "ab");
    assert_eq!(s.cursor(), 1);
}

#[test]
fn slow_pair_is_typed() {
    let mut s = Session::new("");
    s.keys("ij").wait(250).keys("k");
    assert_eq!(s.mode(), Mode::Insert);
    assert_eq!(s.text(), "jk");
}

#[test]
fn withheld_key_typed_before_other_text() {
    let mut s = Session::new("");
    s.keys("ijx<Esc>");
    assert_eq!(s.text(), "jx");
    assert_eq!(s.mode(), Mode::Normal);
}

#[test]
fn escape_pair_only_applies_in_insert() {
    let mut s = Session::new("a\nb\nc\n");
    s.keys("jk");
    assert_eq!(s.mode(), Mode::Normal);
    assert_eq!(s.cursor(), 0);
}

#[test]
fn focus_change_after_timeout_types_withheld_key() {
    let mut s = Session::new("abc\n");
    let other = {
        let model = s.editor.model_mut();
        let index = model
            .state_mut()
            .add_buffer(core_text::Buffer::from_str("other", "xyz\n").unwrap());
        model.add_view(index).unwrap()
    };
    s.keys("ij").wait(300);
    assert!(s.editor.set_focus_changed(other));
    assert_eq!(s.editor.model().state().buffers[0].text(), "jabc\n");
    assert_eq!(s.mode(), Mode::Insert);
    s.keys("k<Esc>");
    assert_eq!(s.editor.model().state().buffers[1].text(), "kxyz\n");
    assert!(s.events().contains(&EditorEvent::FocusChanged(other)));
}

#[test]
fn configured_sequence_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vimodal.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        "[insert]\nescape_sequence = \"jj\"\nescape_timeout_ms = 500\ntab_expansion = \"\\t\""
    )
    .unwrap();
    let config = load_from(Some(path)).unwrap();
    assert_eq!(config.file.insert.escape_pair(), Some(('j', 'j')));

    let mut s = Session::with_config("", &config.file.insert);
    s.keys("i<Tab>").keys("j").wait(400).keys("j");
    assert_eq!(s.mode(), Mode::Normal);
    assert_eq!(s.text(), "\t");
}

#[test]
fn disabled_sequence_types_everything() {
    let config = InsertConfig {
        escape_sequence: String::new(),
        ..InsertConfig::default()
    };
    let mut s = Session::with_config("", &config);
    s.keys("ijk");
    assert_eq!(s.mode(), Mode::Insert);
    assert_eq!(s.text(), "jk");
}
