#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{EditorEvent, ManualClock, ModalEditor};
use core_config::InsertConfig;
use core_events::parse_keys;
use core_model::EditorModel;
use core_state::{EditorState, Mode, Register};
use core_text::Buffer;
use std::time::Duration;

/// A `ModalEditor` over one buffer driven by a manual clock.
pub struct Session {
    pub editor: ModalEditor,
    pub clock: ManualClock,
}

impl Session {
    pub fn new(text: &str) -> Self {
        Self::with_config(text, &InsertConfig::default())
    }

    pub fn with_config(text: &str, config: &InsertConfig) -> Self {
        let state = EditorState::new(Buffer::from_str("test", text).unwrap());
        let model = EditorModel::new(state, 20);
        let clock = ManualClock::new();
        let editor = ModalEditor::new(model, config, Box::new(clock.clone()));
        Self { editor, clock }
    }

    /// Feed keys in `<Esc>` / `<C-r>` notation.
    pub fn keys(&mut self, notation: &str) -> &mut Self {
        self.editor.add_keys(parse_keys(notation).unwrap());
        self
    }

    pub fn wait(&mut self, millis: u64) -> &mut Self {
        self.clock.advance(Duration::from_millis(millis));
        self
    }

    pub fn text(&self) -> String {
        self.editor.model().state().active_buffer().text()
    }

    pub fn cursor(&self) -> usize {
        let model = self.editor.model();
        model.active_view().cursor_offset(model.state().active_buffer())
    }

    pub fn mode(&self) -> Mode {
        self.editor.mode()
    }

    pub fn register(&self, name: char) -> Register {
        self.editor.model().state().registers.read(Some(name))
    }

    pub fn bar(&self) -> String {
        self.editor.model().state().command_line.text().to_string()
    }

    pub fn events(&mut self) -> Vec<EditorEvent> {
        self.editor.take_events()
    }
}

pub fn numbered_lines(n: usize) -> String {
    (1..=n).map(|i| format!("{i}\n")).collect()
}
