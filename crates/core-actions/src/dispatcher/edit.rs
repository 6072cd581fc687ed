//! Operators and direct edits.
//!
//! Handlers resolve their range, write the registers and hand back an
//! `UndoCommand` for the router to apply. An empty range produces no undo
//! command and leaves the registers alone, but any mode switch still
//! happens (`cw` on the last column still enters Insert). Such a result is
//! still marked as an edit so a counted run stops there.
//!
//! Register writes: deletes and changes write the unnamed register plus the
//! `"x` target, `d` additionally rotates the numbered ring, yanks also write
//! `0`. Nothing is written while Insert mode forwards `<Del>` / `<BS>`.

use super::{CommandResult, Context};
use crate::span_resolver::{self, Range, Target};
use core_state::registers::YANK;
use core_state::{Mode, Register, RegisterStore, UndoCommand};
use core_text::LineLocation;

pub(crate) fn handle_delete(target: Target, ctx: &mut Context<'_>) -> Option<CommandResult> {
    let range = resolve(target, ctx)?;
    let switch = (ctx.mode == Mode::Visual).then_some(Mode::Normal);
    if range.is_empty() {
        return Some(CommandResult::unchanged().with_switch(switch));
    }
    let targets = RegisterStore::resolve(ctx.register).to_vec();
    capture(ctx, &range, targets, true);
    let undo = UndoCommand::delete(range.begin, range.end, ctx.cursor(), range.cursor_after);
    trace_edit("delete", &range);
    Some(CommandResult::edit(undo).with_switch(switch))
}

pub(crate) fn handle_change(target: Target, ctx: &mut Context<'_>) -> Option<CommandResult> {
    let range = resolve(target, ctx)?;
    if range.is_empty() {
        return Some(CommandResult::unchanged().with_switch(Some(Mode::Insert)));
    }
    let targets = RegisterStore::resolve(ctx.register).to_vec();
    capture(ctx, &range, targets, false);
    let undo = UndoCommand::delete(range.begin, range.end, ctx.cursor(), range.cursor_after);
    trace_edit("change", &range);
    Some(CommandResult::edit(undo).with_switch(Some(Mode::Insert)))
}

pub(crate) fn handle_yank(target: Target, ctx: &mut Context<'_>) -> Option<CommandResult> {
    let range = resolve(target, ctx)?;
    let visual = ctx.mode == Mode::Visual;
    if !range.is_empty() {
        let mut targets = RegisterStore::resolve(ctx.register).to_vec();
        targets.push(YANK);
        capture(ctx, &range, targets, false);
        trace_edit("yank", &range);
    }
    if visual || !range.line_wise {
        ctx.set_cursor(range.begin);
    }
    Some(CommandResult::done().with_switch(visual.then_some(Mode::Normal)))
}

/// `x` (`within_line`) and `<Del>`. Consumes the count.
pub(crate) fn handle_delete_char(
    within_line: bool,
    ctx: &mut Context<'_>,
) -> Option<CommandResult> {
    let buffer = ctx.buffer();
    let cursor = ctx.cursor();
    let limit = if within_line {
        buffer.location_at(cursor, LineLocation::LineCrBegin)
    } else {
        buffer.len_bytes()
    };
    let end = buffer.offset_by_chars(cursor, ctx.count as isize).min(limit);
    if end <= cursor {
        return None;
    }
    let range = Range {
        begin: cursor,
        end,
        cursor_after: cursor,
        line_wise: false,
    };
    let targets = RegisterStore::resolve(ctx.register).to_vec();
    capture(ctx, &range, targets, false);
    trace_edit("delete_char", &range);
    let undo = UndoCommand::delete(range.begin, range.end, cursor, cursor);
    Some(CommandResult::edit(undo).handled_count())
}

/// Delete the character before the cursor (Insert-mode `<BS>`).
pub(crate) fn handle_insert_backspace(ctx: &mut Context<'_>) -> Option<CommandResult> {
    let cursor = ctx.cursor();
    if cursor == 0 {
        return None;
    }
    let prev = ctx.buffer().offset_by_chars(cursor, -1);
    Some(CommandResult::edit(UndoCommand::delete(prev, cursor, cursor, prev)))
}

pub(crate) fn handle_paste(before: bool, ctx: &mut Context<'_>) -> Option<CommandResult> {
    let register = ctx.state.registers.read(ctx.register);
    if register.is_empty() {
        tracing::trace!(target: "actions.dispatch", register = ?ctx.register, "paste_empty_register");
        return None;
    }
    let buffer = ctx.buffer();
    let cursor = ctx.cursor();
    let (at, text, cursor_after) = if register.line_wise {
        if before {
            let at = buffer.location_at(cursor, LineLocation::LineBegin);
            (at, register.text, at)
        } else {
            let at = buffer.location_at(cursor, LineLocation::LineEnd);
            if at == buffer.location_at(cursor, LineLocation::LineCrBegin) {
                // Unterminated last line: open it first.
                let body = register.text.strip_suffix('\n').unwrap_or(&register.text);
                (at, format!("\n{body}"), at + 1)
            } else {
                (at, register.text, at)
            }
        }
    } else {
        let at = match buffer.char_at(cursor) {
            Some(c) if !before && c != '\n' => cursor + c.len_utf8(),
            _ => cursor,
        };
        let last_len = register.text.chars().last().map_or(0, char::len_utf8);
        let cursor_after = at + register.text.len() - last_len;
        (at, register.text, cursor_after)
    };
    tracing::trace!(target: "actions.dispatch", at, len = text.len(), line_wise = register.line_wise, "paste");
    Some(CommandResult::edit(UndoCommand::insert(at, text, cursor, cursor_after)))
}

/// `o` / `O`: open a line and enter Insert on it.
pub(crate) fn handle_open_line(above: bool, ctx: &mut Context<'_>) -> CommandResult {
    let buffer = ctx.buffer();
    let cursor = ctx.cursor();
    let (at, cursor_after) = if above {
        let begin = buffer.location_at(cursor, LineLocation::LineBegin);
        (begin, begin)
    } else {
        let cr = buffer.location_at(cursor, LineLocation::LineCrBegin);
        (cr, cr + 1)
    };
    CommandResult::edit(UndoCommand::insert(at, "\n", cursor, cursor_after))
        .with_switch(Some(Mode::Insert))
}

/// `J`: remove the terminator of the cursor line.
pub(crate) fn handle_join(ctx: &mut Context<'_>) -> Option<CommandResult> {
    let buffer = ctx.buffer();
    let cursor = ctx.cursor();
    let cr = buffer.location_at(cursor, LineLocation::LineCrBegin);
    let end = buffer.location_at(cursor, LineLocation::LineEnd);
    if end == cr || end >= buffer.len_bytes() {
        return None;
    }
    Some(CommandResult::edit(UndoCommand::delete(cr, end, cursor, cursor)))
}

fn resolve(target: Target, ctx: &Context<'_>) -> Option<Range> {
    span_resolver::resolve(target, ctx.buffer(), ctx.cursor(), ctx.visual_span())
}

// Linewise text always ends in a newline, even when taken from an unterminated last line.
fn capture(ctx: &mut Context<'_>, range: &Range, targets: Vec<char>, shift_ring: bool) {
    if ctx.mode == Mode::Insert || targets.is_empty() {
        return;
    }
    let mut text = ctx.buffer().slice_bytes(range.begin, range.end);
    if range.line_wise && !text.ends_with('\n') {
        text.push('\n');
    }
    let register = Register::new(text, range.line_wise);
    if shift_ring {
        ctx.state.registers.shift_numbered(register.clone());
    }
    ctx.state.registers.record(&targets, &register);
}

fn trace_edit(op: &str, range: &Range) {
    tracing::trace!(
        target: "actions.dispatch",
        op,
        begin = range.begin,
        end = range.end,
        line_wise = range.line_wise,
        "edit"
    );
}
