//! Dispatcher executing a parsed command against the editor model.
//!
//! The dispatcher is split by concern:
//! * `motion`  - cursor movement
//! * `edit`    - operators, paste, open line, join, character deletes
//! * `mode`    - Insert entry and Visual toggling
//! * `undo`    - undo / redo
//! * `ex`      - ex commands (`:reg`, `:ls`, `:bu N`) and host hooks
//!
//! Edits are not applied here. Each handler returns the `UndoCommand` it
//! wants applied and the mode to switch to; the key router applies the
//! command through the buffer's undo stack, which lets it group the commands
//! of a counted or dot-repeated invocation. Motions, undo/redo and ex
//! commands act on the state directly.

use crate::command::{self, Command, Parse};
use crate::grammar::ParsedCommand;
use crate::span_resolver::{Span, VisualSelection};
use core_events::KeyEvent;
use core_model::{EditorModel, View};
use core_state::{EditorState, Mode, UndoCommand};
use core_text::Buffer;

mod command_parser;
mod edit;
mod ex;
mod mode;
mod motion;
mod undo;

pub use ex::ExCommandHook;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CommandFlags: u8 {
        /// The handler consumed the count itself; the router must not repeat it.
        const HANDLED_COUNT = 0b01;
        /// The command buffer is a valid prefix; keep accumulating keys.
        const NEED_MORE_CHARS = 0b10;
        /// The command edits text, whether or not it found anything to change.
        const EDIT = 0b100;
    }
}

/// Outcome of dispatching one command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandResult {
    pub undo: Option<UndoCommand>,
    pub mode_switch: Option<Mode>,
    pub flags: CommandFlags,
}

impl CommandResult {
    pub fn done() -> Self {
        Self::default()
    }
    pub fn edit(undo: UndoCommand) -> Self {
        Self {
            undo: Some(undo),
            flags: CommandFlags::EDIT,
            ..Self::default()
        }
    }
    /// An edit whose range was empty.
    pub fn unchanged() -> Self {
        Self {
            flags: CommandFlags::EDIT,
            ..Self::default()
        }
    }
    pub fn switch(mode: Mode) -> Self {
        Self {
            mode_switch: Some(mode),
            ..Self::default()
        }
    }
    pub fn need_more() -> Self {
        Self {
            flags: CommandFlags::NEED_MORE_CHARS,
            ..Self::default()
        }
    }
    pub(crate) fn with_switch(mut self, mode: Option<Mode>) -> Self {
        if mode.is_some() {
            self.mode_switch = mode;
        }
        self
    }
    pub(crate) fn handled_count(mut self) -> Self {
        self.flags |= CommandFlags::HANDLED_COUNT;
        self
    }
    pub fn needs_more(&self) -> bool {
        self.flags.contains(CommandFlags::NEED_MORE_CHARS)
    }
    pub fn count_handled(&self) -> bool {
        self.flags.contains(CommandFlags::HANDLED_COUNT)
    }
    pub fn is_edit(&self) -> bool {
        self.flags.contains(CommandFlags::EDIT)
    }
}

/// Everything a handler may read or mutate for one invocation.
pub(crate) struct Context<'a> {
    pub state: &'a mut EditorState,
    pub view: &'a mut View,
    pub visual: &'a mut VisualSelection,
    pub mode: Mode,
    pub count: usize,
    pub explicit_count: bool,
    pub register: Option<char>,
}

impl Context<'_> {
    pub fn buffer(&self) -> &Buffer {
        self.state.active_buffer()
    }

    pub fn cursor(&self) -> usize {
        self.view.cursor_offset(self.state.active_buffer())
    }

    pub fn set_cursor(&mut self, offset: usize) {
        self.view.set_cursor_offset(self.state.active_buffer(), offset);
    }

    /// The visual span, only while Visual mode is active.
    pub fn visual_span(&self) -> Option<Span> {
        (self.mode == Mode::Visual).then(|| self.visual.span(self.buffer(), self.cursor()))
    }
}

/// Run one command. `None` means the command is unknown or could not run
/// (nothing to paste, `x` on an empty line, an unknown ex command).
pub fn dispatch(
    parsed: &ParsedCommand,
    key: &KeyEvent,
    mode: Mode,
    model: &mut EditorModel,
    visual: &mut VisualSelection,
    hooks: &[Box<dyn ExCommandHook>],
) -> Option<CommandResult> {
    let invocation = match command::parse(&parsed.command, key, mode) {
        Parse::Complete(invocation) => invocation,
        Parse::Incomplete => return Some(CommandResult::need_more()),
        Parse::Unknown => {
            tracing::trace!(target: "actions.dispatch", command = %parsed.command, key = %key, "unknown_command");
            return None;
        }
    };

    let (state, view) = model.split_state_and_active_view();
    let mut ctx = Context {
        state,
        view,
        visual,
        mode,
        count: parsed.count.max(1),
        explicit_count: parsed.explicit_count,
        register: invocation.register,
    };

    tracing::trace!(
        target: "actions.dispatch",
        command = ?invocation.command,
        count = ctx.count,
        register = ?ctx.register,
        ?mode,
        "dispatch"
    );

    match invocation.command {
        Command::Motion(kind) => Some(motion::handle_motion(kind, &mut ctx)),
        Command::Delete(target) => edit::handle_delete(target, &mut ctx),
        Command::DeleteChar { within_line } => edit::handle_delete_char(within_line, &mut ctx),
        Command::Change(target) => edit::handle_change(target, &mut ctx),
        Command::Yank(target) => edit::handle_yank(target, &mut ctx),
        Command::Paste { before } => edit::handle_paste(before, &mut ctx),
        Command::OpenLine { above } => Some(edit::handle_open_line(above, &mut ctx)),
        Command::Join => edit::handle_join(&mut ctx),
        Command::InsertBackspace => edit::handle_insert_backspace(&mut ctx),
        Command::EnterInsert(entry) => Some(mode::handle_enter_insert(entry, &mut ctx)),
        Command::ToggleVisual { line_wise } => {
            Some(mode::handle_toggle_visual(line_wise, &mut ctx))
        }
        Command::Undo => undo::handle_undo(&mut ctx),
        Command::Redo => undo::handle_redo(&mut ctx),
        Command::Ex(raw) => ex::handle_ex(&raw, &mut ctx, hooks),
    }
}
