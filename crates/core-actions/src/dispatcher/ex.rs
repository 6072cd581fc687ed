//! Ex command execution (`:reg`, `:ls`, `:bu N`).
//!
//! Hosts may register `ExCommandHook`s; they see the raw command first and
//! a hook returning `true` consumes it. Output goes to the command bar.

use super::command_parser::{ExCommand, ExCommandParser};
use super::{CommandResult, Context};
use core_state::EditorState;
use core_text::Position;
use std::fmt::Write as _;

/// Host extension point for ex commands.
pub trait ExCommandHook {
    /// Return `true` when the command was handled.
    fn handle(&self, command: &str, state: &mut EditorState) -> bool;
}

pub(crate) fn handle_ex(
    raw: &str,
    ctx: &mut Context<'_>,
    hooks: &[Box<dyn ExCommandHook>],
) -> Option<CommandResult> {
    if hooks.iter().any(|hook| hook.handle(raw, ctx.state)) {
        tracing::debug!(target: "actions.ex", command = raw, "ex_hook_handled");
        return Some(CommandResult::done().handled_count());
    }
    match ExCommandParser::parse(raw) {
        ExCommand::Registers => {
            let dump = ctx.state.registers.dump();
            ctx.state.command_line.set(dump);
        }
        ExCommand::Buffers => {
            let listing = list_buffers(ctx.state);
            ctx.state.command_line.set(listing);
        }
        ExCommand::Buffer(Some(index)) => {
            if ctx.state.set_active(index) {
                ctx.view.buffer_index = index;
                ctx.view.cursor = Position::origin();
                ctx.view.sticky_col = None;
                ctx.view.viewport_first_line = 0;
                tracing::debug!(target: "actions.ex", index, "buffer_switch");
            } else {
                tracing::debug!(target: "actions.ex", index, "buffer_switch_out_of_range");
            }
        }
        ExCommand::Buffer(None) => {
            tracing::debug!(target: "actions.ex", command = raw, "buffer_switch_bad_argument");
        }
        ExCommand::Unknown(body) => {
            tracing::debug!(target: "actions.ex", command = %body, "ex_unknown");
            ctx.state.command_line.set("Not a command");
            return None;
        }
    }
    Some(CommandResult::done().handled_count())
}

fn list_buffers(state: &EditorState) -> String {
    let mut out = String::from("--- Buffers ---\n");
    for (index, buffer) in state.buffers.iter().enumerate() {
        if buffer.name.is_empty() {
            continue;
        }
        let marker = if index == state.active { '*' } else { ' ' };
        let _ = writeln!(out, "{marker}{index} : {}", buffer.name);
    }
    out
}
