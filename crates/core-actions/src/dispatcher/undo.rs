//! Undo / Redo dispatch.
//!
//! Both walk the active buffer's undo stack one entry or group per count and
//! restore the cursor recorded with the last command replayed.

use super::{CommandResult, Context};
use core_state::EditorState;

pub(crate) fn handle_undo(ctx: &mut Context<'_>) -> Option<CommandResult> {
    replay(ctx, "undo", EditorState::undo)
}

pub(crate) fn handle_redo(ctx: &mut Context<'_>) -> Option<CommandResult> {
    replay(ctx, "redo", EditorState::redo)
}

fn replay(
    ctx: &mut Context<'_>,
    op: &str,
    step: fn(&mut EditorState) -> Option<usize>,
) -> Option<CommandResult> {
    let mut cursor = None;
    for _ in 0..ctx.count {
        match step(ctx.state) {
            Some(offset) => cursor = Some(offset),
            None => break,
        }
    }
    tracing::trace!(target: "actions.dispatch", op, applied = cursor.is_some(), "undo_dispatch");
    let cursor = cursor?;
    ctx.set_cursor(cursor);
    Some(CommandResult::done().handled_count())
}
