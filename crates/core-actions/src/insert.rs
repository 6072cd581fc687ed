//! Insert-mode key handling.
//!
//! Typed text goes straight into the buffer without touching the undo stack.
//! When a "pack" key arrives (Esc, Backspace, Delete, arrows, page keys) the
//! text typed since `insert_begin` is taken back out and re-applied as a
//! single `UndoCommand`, so one Insert session undoes in one step. The packed
//! text is kept as `last_insert` for dot-repeat.
//!
//! The configurable two-key escape (`jk` by default) withholds its first key
//! with a timestamp. The second key arriving within the timeout leaves Insert
//! without inserting either; anything else (or the second key arriving late)
//! inserts the withheld key first.

use core_config::InsertConfig;
use core_events::{KeyCode, KeyEvent};
use core_model::View;
use core_state::{EditorState, UndoCommand};
use core_text::motion;
use std::time::Duration;

/// What the router should do after a key was fed to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertStep {
    Continue,
    /// Leave Insert for Normal.
    Escape,
    /// Typed text was packed; run this key as a command and stay in Insert.
    Forward(KeyEvent),
}

#[derive(Debug, Clone)]
pub struct InsertModeController {
    insert_begin: usize,
    /// Time the withheld escape key arrived.
    pending_escape: Option<Duration>,
    last_insert: String,
    escape_pair: Option<(char, char)>,
    escape_timeout: Duration,
    tab_expansion: String,
}

impl Default for InsertModeController {
    fn default() -> Self {
        Self::new(&InsertConfig::default())
    }
}

impl InsertModeController {
    pub fn new(config: &InsertConfig) -> Self {
        Self {
            insert_begin: 0,
            pending_escape: None,
            last_insert: String::new(),
            escape_pair: config.escape_pair(),
            escape_timeout: config.escape_timeout(),
            tab_expansion: config.tab_expansion.clone(),
        }
    }

    /// Start a session with the cursor at `offset`.
    pub fn begin(&mut self, offset: usize) {
        self.insert_begin = offset;
        self.pending_escape = None;
    }

    /// Move the session origin without dropping a withheld escape key.
    pub fn rebase(&mut self, offset: usize) {
        self.insert_begin = offset;
    }

    pub fn insert_begin(&self) -> usize {
        self.insert_begin
    }

    pub fn last_insert(&self) -> &str {
        &self.last_insert
    }

    pub fn clear_last_insert(&mut self) {
        self.last_insert.clear();
    }

    pub fn has_pending_escape(&self) -> bool {
        self.pending_escape.is_some()
    }

    pub fn handle_key(
        &mut self,
        key: &KeyEvent,
        state: &mut EditorState,
        view: &mut View,
        now: Duration,
    ) -> InsertStep {
        if let Some(since) = self.pending_escape.take()
            && let Some((first, second)) = self.escape_pair
        {
            let elapsed = now.saturating_sub(since);
            if key.printable() == Some(second) && elapsed < self.escape_timeout {
                tracing::trace!(
                    target: "actions.insert",
                    elapsed_ms = elapsed.as_millis() as u64,
                    "escape_sequence"
                );
                self.leave(state, view);
                return InsertStep::Escape;
            }
            self.type_text(state, view, first.encode_utf8(&mut [0; 4]));
        }

        match key.code {
            KeyCode::Esc => {
                self.leave(state, view);
                InsertStep::Escape
            }
            KeyCode::Backspace
            | KeyCode::Delete
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::PageUp
            | KeyCode::PageDown => {
                self.pack(state, view);
                InsertStep::Forward(*key)
            }
            KeyCode::Enter => {
                self.type_text(state, view, "\n");
                InsertStep::Continue
            }
            KeyCode::Tab => {
                let expansion = self.tab_expansion.clone();
                self.type_text(state, view, &expansion);
                InsertStep::Continue
            }
            KeyCode::Char(_) => {
                match key.printable() {
                    Some(c) if self.escape_pair.is_some_and(|(first, _)| first == c) => {
                        self.pending_escape = Some(now);
                    }
                    Some(c) => self.type_text(state, view, c.encode_utf8(&mut [0; 4])),
                    None => {
                        tracing::trace!(target: "actions.insert", key = %key, "insert_key_ignored");
                    }
                }
                InsertStep::Continue
            }
        }
    }

    /// Focus moved away. A withheld escape key older than the timeout is typed.
    pub fn focus_changed(&mut self, state: &mut EditorState, view: &mut View, now: Duration) {
        if let Some(since) = self.pending_escape
            && now.saturating_sub(since) >= self.escape_timeout
        {
            self.flush_pending(state, view);
        }
    }

    /// Type a withheld escape key, if any.
    pub fn flush_pending(&mut self, state: &mut EditorState, view: &mut View) {
        if self.pending_escape.take().is_some()
            && let Some((first, _)) = self.escape_pair
        {
            self.type_text(state, view, first.encode_utf8(&mut [0; 4]));
        }
    }

    /// Move `[insert_begin, cursor)` onto the undo stack as one insert.
    pub fn pack(&mut self, state: &mut EditorState, view: &mut View) {
        let cursor = view.cursor_offset(state.active_buffer());
        let begin = self.insert_begin;
        if cursor <= begin {
            self.insert_begin = cursor;
            return;
        }
        let text = state.active_buffer_mut().delete_bytes(begin, cursor);
        let after = state.apply(UndoCommand::insert(begin, text.clone(), begin, cursor));
        view.set_cursor_offset(state.active_buffer(), after);
        tracing::trace!(target: "actions.insert", begin, len = text.len(), "insert_packed");
        self.last_insert = text;
        self.insert_begin = after;
    }

    fn leave(&mut self, state: &mut EditorState, view: &mut View) {
        self.pack(state, view);
        if view.cursor.byte > 0 {
            motion::left(state.active_buffer(), &mut view.cursor);
            view.sticky_col = None;
        }
    }

    fn type_text(&mut self, state: &mut EditorState, view: &mut View, text: &str) {
        let at = view.cursor_offset(state.active_buffer());
        let after = state.active_buffer_mut().insert(at, text);
        view.set_cursor_offset(state.active_buffer(), after);
    }
}
