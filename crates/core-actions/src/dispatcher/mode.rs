//! Mode transition handling (Insert entry, Visual toggling).
//!
//! Handlers only position the cursor and request the switch; the router
//! performs the switch itself so Insert sessions and mode events start in
//! one place.

use super::{CommandResult, Context};
use crate::command::InsertEntry;
use core_state::Mode;
use core_text::LineLocation;

pub(crate) fn handle_enter_insert(entry: InsertEntry, ctx: &mut Context<'_>) -> CommandResult {
    let buffer = ctx.buffer();
    let cursor = ctx.cursor();
    let target = match entry {
        InsertEntry::AtCursor => cursor,
        InsertEntry::AfterCursor => buffer
            .offset_by_chars(cursor, 1)
            .min(buffer.location_at(cursor, LineLocation::LineCrBegin)),
        InsertEntry::LineEnd => buffer.location_at(cursor, LineLocation::LineCrBegin),
        InsertEntry::FirstNonBlank => buffer.location_at(cursor, LineLocation::LineFirstGraphChar),
    };
    if target != cursor {
        ctx.set_cursor(target);
    }
    CommandResult::switch(Mode::Insert)
}

/// `v` / `V`. The same key leaves Visual; the other one switches the selection kind.
pub(crate) fn handle_toggle_visual(line_wise: bool, ctx: &mut Context<'_>) -> CommandResult {
    if ctx.mode == Mode::Visual {
        if ctx.visual.line_wise == line_wise {
            return CommandResult::switch(Mode::Normal);
        }
        ctx.visual.line_wise = line_wise;
        return CommandResult::done();
    }
    ctx.visual.anchor = ctx.cursor();
    ctx.visual.line_wise = line_wise;
    CommandResult::switch(Mode::Visual)
}
