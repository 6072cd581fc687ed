use core_text::Buffer;
use tracing::trace;

/// Maximum number of entries (commands plus group markers) retained in undo history.
pub const UNDO_HISTORY_MAX: usize = 1000;

/// A replayable buffer mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Insert { at: usize, text: String },
    /// `removed` is filled in when the range is first deleted.
    DeleteRange {
        begin: usize,
        end: usize,
        removed: String,
    },
}

/// One undoable edit with the cursor offsets to restore on either side of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoCommand {
    pub edit: Edit,
    pub cursor_before: usize,
    pub cursor_after: usize,
}

impl UndoCommand {
    pub fn insert(at: usize, text: impl Into<String>, cursor_before: usize, cursor_after: usize) -> Self {
        Self {
            edit: Edit::Insert {
                at,
                text: text.into(),
            },
            cursor_before,
            cursor_after,
        }
    }

    pub fn delete(begin: usize, end: usize, cursor_before: usize, cursor_after: usize) -> Self {
        Self {
            edit: Edit::DeleteRange {
                begin,
                end,
                removed: String::new(),
            },
            cursor_before,
            cursor_after,
        }
    }

    /// Apply the edit. Returns the cursor offset to place afterwards.
    pub fn redo(&mut self, buffer: &mut Buffer) -> usize {
        match &mut self.edit {
            Edit::Insert { at, text } => {
                buffer.insert(*at, text);
            }
            Edit::DeleteRange {
                begin,
                end,
                removed,
            } => {
                *removed = buffer.delete_bytes(*begin, *end);
            }
        }
        self.cursor_after
    }

    /// Revert the edit. Returns the cursor offset that preceded it.
    pub fn undo(&self, buffer: &mut Buffer) -> usize {
        match &self.edit {
            Edit::Insert { at, text } => {
                buffer.delete_bytes(*at, *at + text.len());
            }
            Edit::DeleteRange { begin, removed, .. } => {
                buffer.insert(*begin, removed);
            }
        }
        self.cursor_before
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Command(UndoCommand),
    GroupBegin,
    GroupEnd,
}

/// Linear undo/redo history for one buffer.
///
/// Commands emitted by a single keystroke (a counted command, a dot repeat
/// with its replayed insert) are bracketed by `GroupBegin`/`GroupEnd` markers
/// and undone or redone as one unit.
#[derive(Debug, Default, Clone)]
pub struct UndoStack {
    undo: Vec<Entry>,
    redo: Vec<Entry>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `command` to `buffer` and record it. Clears the redo history.
    pub fn apply(&mut self, mut command: UndoCommand, buffer: &mut Buffer) -> usize {
        let cursor = command.redo(buffer);
        self.undo.push(Entry::Command(command));
        self.redo.clear();
        trace!(target: "state.undo", undo_depth = self.undo.len(), "apply");
        self.trim();
        cursor
    }

    pub fn begin_group(&mut self) {
        self.undo.push(Entry::GroupBegin);
    }

    /// Close the innermost group. A group that recorded nothing is dropped.
    pub fn end_group(&mut self) {
        if self.undo.last() == Some(&Entry::GroupBegin) {
            self.undo.pop();
        } else {
            self.undo.push(Entry::GroupEnd);
        }
    }

    /// Undo the most recent command or group. Returns the cursor to restore.
    pub fn undo(&mut self, buffer: &mut Buffer) -> Option<usize> {
        let cursor = Self::transfer(&mut self.undo, &mut self.redo, buffer, true);
        trace!(target: "state.undo", undo_depth = self.undo.len(), redo_depth = self.redo.len(), "undo_pop");
        cursor
    }

    /// Redo the most recently undone command or group.
    pub fn redo(&mut self, buffer: &mut Buffer) -> Option<usize> {
        let cursor = Self::transfer(&mut self.redo, &mut self.undo, buffer, false);
        trace!(target: "state.undo", undo_depth = self.undo.len(), redo_depth = self.redo.len(), "redo_pop");
        cursor
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    // Undo pops a group from its `GroupEnd`, redo from its `GroupBegin`.
    fn transfer(from: &mut Vec<Entry>, to: &mut Vec<Entry>, buffer: &mut Buffer, undoing: bool) -> Option<usize> {
        let (open, close) = if undoing {
            (Entry::GroupEnd, Entry::GroupBegin)
        } else {
            (Entry::GroupBegin, Entry::GroupEnd)
        };
        let mut depth = 0usize;
        let mut cursor = None;
        while let Some(mut entry) = from.pop() {
            match &mut entry {
                Entry::Command(command) => {
                    cursor = Some(if undoing {
                        command.undo(buffer)
                    } else {
                        command.redo(buffer)
                    });
                }
                marker if *marker == open => depth += 1,
                _ => depth = depth.saturating_sub(1),
            }
            let done = depth == 0 && entry != open;
            let is_close = entry == close;
            to.push(entry);
            if done && (cursor.is_some() || is_close) {
                break;
            }
        }
        cursor
    }

    fn trim(&mut self) {
        while self.undo.len() > UNDO_HISTORY_MAX {
            let mut depth = 0usize;
            let mut cut = 0;
            for (idx, entry) in self.undo.iter().enumerate() {
                match entry {
                    Entry::GroupBegin => depth += 1,
                    Entry::GroupEnd => depth = depth.saturating_sub(1),
                    Entry::Command(_) => {}
                }
                if depth == 0 {
                    cut = idx + 1;
                    break;
                }
            }
            if cut == 0 {
                break;
            }
            self.undo.drain(..cut);
            trace!(target: "state.undo", "undo_stack_trimmed");
        }
    }
}
