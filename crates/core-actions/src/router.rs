//! Key event router: the single ingestion point for keystrokes.
//!
//! Normal / Visual: keys accumulate in the command buffer, which is parsed
//! and dispatched after every key. A complete command is applied (repeated
//! for its count unless the handler consumed it, stopping early once an edit
//! finds nothing to change), recorded for dot-repeat
//! when it changed text or entered Insert, and the buffer is cleared. A
//! prefix (`d`, `"a`, `g`) keeps accumulating; anything unrecognised clears
//! the buffer, except a `:` command still being typed.
//!
//! Insert: keys go to the `InsertModeController`. Pack keys come back as
//! commands and are dispatched in Insert mode.
//!
//! Commands emitted by one invocation (a count above one, a dot-repeated
//! change plus its replayed insert) are bracketed in one undo group.

use crate::clock::{Clock, SystemClock};
use crate::dispatcher::{self, CommandResult, ExCommandHook};
use crate::grammar::{self, ParsedCommand};
use crate::insert::{InsertModeController, InsertStep};
use crate::span_resolver::VisualSelection;
use core_config::InsertConfig;
use core_events::{KeyCode, KeyEvent};
use core_model::{EditorModel, ViewId};
use core_state::{Mode, UndoCommand};
use core_text::motion;
use tracing::{debug, trace};

/// Host-facing notifications, drained with `ModalEditor::take_events`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    ModeChanged(Mode),
    /// The command bar text changed (empty when it was cleared).
    CommandBar(String),
    FocusChanged(ViewId),
}

pub struct ModalEditor {
    model: EditorModel,
    mode: Mode,
    command: String,
    last_command: String,
    last_count: usize,
    visual: VisualSelection,
    insert: InsertModeController,
    hooks: Vec<Box<dyn ExCommandHook>>,
    clock: Box<dyn Clock>,
    events: Vec<EditorEvent>,
}

impl ModalEditor {
    pub fn new(model: EditorModel, config: &InsertConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            model,
            mode: Mode::Normal,
            command: String::new(),
            last_command: String::new(),
            last_count: 0,
            visual: VisualSelection::default(),
            insert: InsertModeController::new(config),
            hooks: Vec::new(),
            clock,
            events: Vec::new(),
        }
    }

    pub fn with_system_clock(model: EditorModel, config: &InsertConfig) -> Self {
        Self::new(model, config, Box::new(SystemClock::new()))
    }

    /// Reset the session: Normal mode, empty command buffer, no selection.
    pub fn begin(&mut self) {
        if self.mode == Mode::Insert {
            let (state, view) = self.model.split_state_and_active_view();
            self.insert.pack(state, view);
        }
        self.command.clear();
        self.visual = VisualSelection::default();
        self.insert.begin(0);
        self.switch_mode(Mode::Normal);
        self.model.state_mut().mode = Mode::Normal;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn model(&self) -> &EditorModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut EditorModel {
        &mut self.model
    }

    /// Pending command text (count, register prefix, operator, `:` command).
    pub fn command_text(&self) -> &str {
        &self.command
    }

    pub fn visual_selection(&self) -> &VisualSelection {
        &self.visual
    }

    pub fn register_hook(&mut self, hook: Box<dyn ExCommandHook>) {
        self.hooks.push(hook);
    }

    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Move focus to another view. An Insert session is packed onto the old
    /// buffer's history first and continues in the new view.
    pub fn set_focus_changed(&mut self, id: ViewId) -> bool {
        if self.mode == Mode::Insert {
            let now = self.clock.now();
            let (state, view) = self.model.split_state_and_active_view();
            self.insert.focus_changed(state, view, now);
            self.insert.pack(state, view);
        }
        if !self.model.focus(id) {
            return false;
        }
        let cursor = self.cursor_offset();
        self.insert.rebase(cursor);
        debug!(target: "actions.router", view = id.0, "focus_changed");
        self.events.push(EditorEvent::FocusChanged(id));
        true
    }

    pub fn add_keys(&mut self, keys: impl IntoIterator<Item = KeyEvent>) {
        for key in keys {
            self.add_key(key);
        }
    }

    pub fn add_key(&mut self, key: KeyEvent) {
        trace!(target: "actions.router", key = %key, mode = ?self.mode, "key");
        let bar_before = self.model.state().command_line.text().to_string();
        self.model.state_mut().command_line.clear();
        match self.mode {
            Mode::Insert => self.insert_key(key),
            _ => self.command_key(key),
        }
        self.after_key(&bar_before);
    }

    fn command_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.command.clear();
            self.switch_mode(Mode::Normal);
            return;
        }
        if key.code == KeyCode::Backspace && self.command.starts_with(':') {
            self.command.pop();
            self.echo_command();
            return;
        }
        if let KeyCode::Char(c) = key.code {
            self.command.push(c);
            self.echo_command();
        }

        let parsed = grammar::parse(&self.command, &self.last_command, self.last_count);
        let result = dispatcher::dispatch(
            &parsed,
            &key,
            self.mode,
            &mut self.model,
            &mut self.visual,
            &self.hooks,
        );
        match result {
            Some(result) if result.needs_more() => {}
            Some(result) => self.complete(&parsed, &key, result),
            None => {
                trace!(target: "actions.router", command = %self.command, "command_failed");
                if !self.command.starts_with(':') || key.code == KeyCode::Enter {
                    self.command.clear();
                }
            }
        }
    }

    fn complete(&mut self, parsed: &ParsedCommand, key: &KeyEvent, first: CommandResult) {
        let is_dot = key.printable() == Some('.');
        let enters_insert = first.mode_switch == Some(Mode::Insert);
        if !is_dot && (first.undo.is_some() || enters_insert) {
            self.last_command = parsed.command.clone();
            self.last_count = parsed.count;
            self.insert.clear_last_insert();
        }
        let replay_insert = is_dot && enters_insert;
        let repeat = !first.count_handled();
        let grouped = replay_insert || (parsed.count > 1 && repeat);
        if grouped {
            self.model.state_mut().begin_undo_group();
        }

        // An edit that changed nothing leaves nothing for a repeat to change.
        let mut stalled = first.is_edit() && first.undo.is_none();
        self.apply(first.undo);
        if repeat {
            for _ in 1..parsed.count {
                if stalled {
                    trace!(
                        target: "actions.router",
                        command = %parsed.command,
                        "repeat_stalled"
                    );
                    break;
                }
                let Some(next) = dispatcher::dispatch(
                    parsed,
                    key,
                    self.mode,
                    &mut self.model,
                    &mut self.visual,
                    &self.hooks,
                ) else {
                    break;
                };
                stalled = next.is_edit() && next.undo.is_none();
                self.apply(next.undo);
            }
        }
        self.command.clear();

        if replay_insert {
            self.replay_last_insert();
            self.model.state_mut().end_undo_group();
            return;
        }
        if grouped {
            self.model.state_mut().end_undo_group();
        }
        if let Some(mode) = first.mode_switch {
            self.switch_mode(mode);
        }
    }

    // Dot-repeat of an Insert-entering command types the last inserted text
    // and stays in Normal.
    fn replay_last_insert(&mut self) {
        let text = self.insert.last_insert().to_string();
        let (state, view) = self.model.split_state_and_active_view();
        if !text.is_empty() {
            let at = view.cursor_offset(state.active_buffer());
            let end = at + text.len();
            let cursor = state.apply(UndoCommand::insert(at, text, at, end));
            view.set_cursor_offset(state.active_buffer(), cursor);
        }
        if view.cursor.byte > 0 {
            motion::left(state.active_buffer(), &mut view.cursor);
            view.sticky_col = None;
        }
    }

    fn insert_key(&mut self, key: KeyEvent) {
        let now = self.clock.now();
        let (state, view) = self.model.split_state_and_active_view();
        match self.insert.handle_key(&key, state, view, now) {
            InsertStep::Continue => {}
            InsertStep::Escape => self.switch_mode(Mode::Normal),
            InsertStep::Forward(key) => {
                let parsed = ParsedCommand::new("", 1);
                let result = dispatcher::dispatch(
                    &parsed,
                    &key,
                    Mode::Insert,
                    &mut self.model,
                    &mut self.visual,
                    &self.hooks,
                );
                if let Some(result) = result {
                    self.apply(result.undo);
                }
                let cursor = self.cursor_offset();
                self.insert.begin(cursor);
            }
        }
        self.command.clear();
    }

    fn apply(&mut self, undo: Option<UndoCommand>) {
        let Some(undo) = undo else {
            return;
        };
        let (state, view) = self.model.split_state_and_active_view();
        let cursor = state.apply(undo);
        view.set_cursor_offset(state.active_buffer(), cursor);
    }

    fn switch_mode(&mut self, mode: Mode) {
        if mode == Mode::None || mode == self.mode {
            return;
        }
        let from = self.mode;
        self.mode = mode;
        if mode == Mode::Insert {
            let cursor = self.cursor_offset();
            self.insert.begin(cursor);
        }
        self.model.state_mut().mode = mode;
        debug!(target: "actions.router", ?from, to = ?mode, "mode_switch");
        self.events.push(EditorEvent::ModeChanged(mode));
    }

    fn echo_command(&mut self) {
        if self.command.starts_with(':') {
            let text = self.command.clone();
            self.model.state_mut().command_line.set(text);
        }
    }

    fn after_key(&mut self, bar_before: &str) {
        let mode = self.mode;
        let (state, view) = self.model.split_state_and_active_view();
        if mode == Mode::Normal {
            motion::normalize_normal_mode_position(state.active_buffer(), &mut view.cursor);
        }
        view.auto_scroll(0);
        state.mode = mode;
        if state.command_line.text() != bar_before {
            self.events
                .push(EditorEvent::CommandBar(state.command_line.text().to_string()));
        }
    }

    fn cursor_offset(&self) -> usize {
        let state = self.model.state();
        let view = self.model.active_view();
        view.cursor_offset(&state.buffers[view.buffer_index])
    }
}
