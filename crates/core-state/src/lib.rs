//! Editor state: buffer collection, mode, registers, per-buffer undo history
//! and the command bar.
//!
//! Views (cursor, sticky column, visible lines) live in `core-model`; this
//! crate stays buffer-centric. `active` names the buffer the focused view is
//! editing and is kept in sync by the model before every dispatch.
//!
//! Undo is command based: every mutation is an `UndoCommand` applied through
//! the active buffer's `UndoStack`, so undo replays inverse edits instead of
//! restoring snapshots. Grouping is explicit (`begin_undo_group` /
//! `end_undo_group`) and driven by the key router.

use core_text::Buffer;

pub mod registers;
pub mod undo;

pub use registers::{Register, RegisterStore, RegisterTargets};
pub use undo::{Edit, UNDO_HISTORY_MAX, UndoCommand, UndoStack};

/// Current editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Command/navigation mode; keys accumulate into a command buffer.
    #[default]
    Normal,
    /// Text entry at the cursor.
    Insert,
    /// Selection between an anchor and the cursor (charwise or linewise).
    Visual,
    Command,
    /// "No change" when used as a switch target.
    None,
}

/// Command bar contents shown by the host under the text area.
///
/// Holds the `:` command while it is typed and the output of ex commands
/// (`:reg`, `:ls`, errors). Every keystroke resets it before dispatch.
#[derive(Debug, Default, Clone)]
pub struct CommandLineState {
    buf: String,
}

impl CommandLineState {
    /// Returns true if an ex command is being entered (buffer starts with ':').
    pub fn is_active(&self) -> bool {
        self.buf.starts_with(':')
    }
    pub fn text(&self) -> &str {
        &self.buf
    }
    pub fn set(&mut self, text: impl Into<String>) {
        self.buf = text.into();
    }
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

/// Top-level editor state container.
pub struct EditorState {
    pub buffers: Vec<Buffer>,
    /// Parallel to `buffers`.
    undo: Vec<UndoStack>,
    pub active: usize,
    pub mode: Mode,
    pub registers: RegisterStore,
    pub command_line: CommandLineState,
}

impl EditorState {
    /// Create a new state with a single active buffer.
    pub fn new(buffer: Buffer) -> Self {
        Self {
            buffers: vec![buffer],
            undo: vec![UndoStack::new()],
            active: 0,
            mode: Mode::Normal,
            registers: RegisterStore::new(),
            command_line: CommandLineState::default(),
        }
    }

    /// Append a buffer; returns its index.
    pub fn add_buffer(&mut self, buffer: Buffer) -> usize {
        self.buffers.push(buffer);
        self.undo.push(UndoStack::new());
        self.buffers.len() - 1
    }

    /// Make `index` the active buffer. Out-of-range indices are ignored.
    pub fn set_active(&mut self, index: usize) -> bool {
        if index < self.buffers.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    /// Borrow the currently active buffer.
    pub fn active_buffer(&self) -> &Buffer {
        &self.buffers[self.active]
    }

    /// Direct buffer access bypasses undo; used by insert-mode typing which is
    /// packaged into an undo command when the run ends.
    pub fn active_buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffers[self.active]
    }

    /// Apply an undoable edit to the active buffer. Returns the cursor offset after it.
    pub fn apply(&mut self, command: UndoCommand) -> usize {
        let (buffer, stack) = self.active_pair();
        stack.apply(command, buffer)
    }

    pub fn undo(&mut self) -> Option<usize> {
        let (buffer, stack) = self.active_pair();
        stack.undo(buffer)
    }

    pub fn redo(&mut self) -> Option<usize> {
        let (buffer, stack) = self.active_pair();
        stack.redo(buffer)
    }

    pub fn begin_undo_group(&mut self) {
        self.undo[self.active].begin_group();
    }

    pub fn end_undo_group(&mut self) {
        self.undo[self.active].end_group();
    }

    pub fn undo_depth(&self) -> usize {
        self.undo[self.active].undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.undo[self.active].redo_depth()
    }

    fn active_pair(&mut self) -> (&mut Buffer, &mut UndoStack) {
        (&mut self.buffers[self.active], &mut self.undo[self.active])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_and_undo_on_active_buffer() {
        let mut st = EditorState::new(Buffer::from_str("a", "abc\n").unwrap());
        let cursor = st.apply(UndoCommand::insert(3, "d", 2, 3));
        assert_eq!(cursor, 3);
        assert_eq!(st.active_buffer().text(), "abcd\n");
        assert_eq!(st.undo(), Some(2));
        assert_eq!(st.active_buffer().text(), "abc\n");
        assert_eq!(st.redo_depth(), 1);
    }

    #[test]
    fn undo_history_is_per_buffer() {
        let mut st = EditorState::new(Buffer::from_str("a", "one").unwrap());
        let second = st.add_buffer(Buffer::from_str("b", "two").unwrap());
        st.apply(UndoCommand::delete(0, 1, 0, 0));
        assert!(st.set_active(second));
        assert_eq!(st.undo(), None);
        assert_eq!(st.active_buffer().text(), "two");
        st.set_active(0);
        assert_eq!(st.undo(), Some(0));
        assert_eq!(st.active_buffer().text(), "one");
    }

    #[test]
    fn set_active_rejects_out_of_range() {
        let mut st = EditorState::new(Buffer::from_str("a", "").unwrap());
        assert!(!st.set_active(3));
        assert_eq!(st.active, 0);
    }

    #[test]
    fn command_line_activity_follows_colon_prefix() {
        let mut cl = CommandLineState::default();
        assert!(!cl.is_active());
        cl.set(":reg");
        assert!(cl.is_active());
        assert_eq!(cl.text(), ":reg");
        cl.set("Not a command");
        assert!(!cl.is_active());
        cl.clear();
        assert_eq!(cl.text(), "");
    }
}
