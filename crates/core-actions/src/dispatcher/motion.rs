//! Motion sub-dispatch (cursor movement).
//!
//! Every motion consumes its own count. Horizontal motions stay on the line;
//! vertical ones go through the view's sticky column. Word motions use the
//! block arithmetic shared with the operator span resolver.

use super::{CommandResult, Context};
use crate::command::Motion;
use crate::span_resolver::{word_end_motion, word_motion};
use core_state::Mode;
use core_text::{Direction, LineLocation, motion};

pub(crate) fn handle_motion(kind: Motion, ctx: &mut Context<'_>) -> CommandResult {
    let before = ctx.view.cursor;
    let count = ctx.count;
    match kind {
        Motion::Left => repeat_horizontal(ctx, motion::left),
        Motion::Right if ctx.mode == Mode::Insert => repeat_horizontal(ctx, motion::right_insert),
        Motion::Right => repeat_horizontal(ctx, motion::right),
        Motion::Up => repeat_vertical(ctx, count, motion::up),
        Motion::Down => repeat_vertical(ctx, count, motion::down),
        Motion::PageDown => repeat_vertical(ctx, page(ctx) * count, motion::down),
        Motion::PageUp => repeat_vertical(ctx, page(ctx) * count, motion::up),
        Motion::HalfPageDown => repeat_vertical(ctx, half_page(ctx) * count, motion::down),
        Motion::HalfPageUp => repeat_vertical(ctx, half_page(ctx) * count, motion::up),
        Motion::LineBegin => jump(ctx, LineLocation::LineBegin),
        Motion::LineEnd => jump(ctx, LineLocation::LineCrBegin),
        Motion::FirstNonBlank => jump(ctx, LineLocation::LineFirstGraphChar),
        Motion::WordForward(k) => {
            repeat_offset(ctx, |b, pos| word_motion(b, k, pos, Direction::Forward))
        }
        Motion::WordBackward(k) => {
            repeat_offset(ctx, |b, pos| word_motion(b, k, pos, Direction::Backward))
        }
        Motion::WordEnd(k) => {
            repeat_offset(ctx, |b, pos| word_end_motion(b, k, pos, Direction::Forward))
        }
        Motion::WordEndBackward(k) => {
            repeat_offset(ctx, |b, pos| word_end_motion(b, k, pos, Direction::Backward))
        }
        Motion::CharBackward => repeat_offset(ctx, |b, pos| b.offset_by_chars(pos, -1)),
        Motion::BufferStart => ctx.set_cursor(0),
        Motion::BufferEnd => {
            let buffer = ctx.buffer();
            let last = buffer.line_count().saturating_sub(1);
            let line = if ctx.explicit_count {
                (count - 1).min(last)
            } else {
                last
            };
            let offset = buffer.line_location(line, LineLocation::LineFirstGraphChar);
            ctx.set_cursor(offset);
        }
        Motion::ParagraphForward => {
            for _ in 0..count {
                if !motion::paragraph_forward(ctx.state.active_buffer(), &mut ctx.view.cursor) {
                    break;
                }
            }
            ctx.view.sticky_col = None;
        }
        Motion::ParagraphBackward => {
            for _ in 0..count {
                if !motion::paragraph_backward(ctx.state.active_buffer(), &mut ctx.view.cursor) {
                    break;
                }
            }
            ctx.view.sticky_col = None;
        }
    }
    if before != ctx.view.cursor {
        tracing::trace!(
            target: "actions.dispatch",
            motion = ?kind,
            line = before.line,
            byte = before.byte,
            to_line = ctx.view.cursor.line,
            to_byte = ctx.view.cursor.byte,
            "motion"
        );
    }
    CommandResult::done().handled_count()
}

fn page(ctx: &Context<'_>) -> usize {
    ctx.view.visible_lines.saturating_sub(2).max(1)
}

fn half_page(ctx: &Context<'_>) -> usize {
    (ctx.view.visible_lines / 2).max(1)
}

fn jump(ctx: &mut Context<'_>, loc: LineLocation) {
    let offset = ctx.buffer().location_at(ctx.cursor(), loc);
    ctx.set_cursor(offset);
}

fn repeat_horizontal(
    ctx: &mut Context<'_>,
    step: fn(&core_text::Buffer, &mut core_text::Position) -> bool,
) {
    for _ in 0..ctx.count {
        if !step(ctx.state.active_buffer(), &mut ctx.view.cursor) {
            break;
        }
    }
    ctx.view.sticky_col = None;
}

fn repeat_vertical(
    ctx: &mut Context<'_>,
    lines: usize,
    step: fn(&core_text::Buffer, &mut core_text::Position, Option<usize>) -> Option<usize>,
) {
    let buffer = ctx.state.active_buffer();
    let mut sticky = ctx.view.sticky_col;
    for _ in 0..lines {
        let line = ctx.view.cursor.line;
        sticky = step(buffer, &mut ctx.view.cursor, sticky);
        if ctx.view.cursor.line == line {
            break;
        }
    }
    ctx.view.sticky_col = sticky;
}

fn repeat_offset(ctx: &mut Context<'_>, step: impl Fn(&core_text::Buffer, usize) -> usize) {
    let mut offset = ctx.cursor();
    for _ in 0..ctx.count {
        let next = step(ctx.buffer(), offset);
        if next == offset {
            break;
        }
        offset = next;
    }
    ctx.set_cursor(offset);
}

#[cfg(test)]
mod tests {
    use crate::dispatcher::tests::Fixture;
    use core_events::{KeyCode, KeyEvent};
    use core_state::Mode;
    use pretty_assertions::assert_eq;

    #[test]
    fn horizontal_counts_stop_at_line_edges() {
        let mut fx = Fixture::new("abcdef\nxyz\n").at(1);
        fx.run("3l", Mode::Normal);
        assert_eq!(fx.cursor(), 4);
        fx.run("9l", Mode::Normal);
        assert_eq!(fx.cursor(), 5);
        fx.run("9h", Mode::Normal);
        assert_eq!(fx.cursor(), 0);
    }

    #[test]
    fn insert_mode_right_reaches_terminator() {
        let mut fx = Fixture::new("ab\n").at(1);
        fx.run_key("", KeyEvent::named(KeyCode::Right), Mode::Insert);
        assert_eq!(fx.cursor(), 2);
    }

    #[test]
    fn vertical_keeps_column() {
        let mut fx = Fixture::new("abcd\nx\nabcd\n").at(3);
        fx.run("j", Mode::Normal);
        assert_eq!(fx.cursor(), 5);
        fx.run("j", Mode::Normal);
        assert_eq!(fx.cursor(), 10);
        fx.run("2k", Mode::Normal);
        assert_eq!(fx.cursor(), 3);
    }

    #[test]
    fn line_positions() {
        let mut fx = Fixture::new("  abc\n").at(3);
        fx.run("0", Mode::Normal);
        assert_eq!(fx.cursor(), 0);
        fx.run("^", Mode::Normal);
        assert_eq!(fx.cursor(), 2);
        fx.run("$", Mode::Normal);
        assert_eq!(fx.cursor(), 5);
    }

    #[test]
    fn word_motions_with_counts() {
        let mut fx = Fixture::new("one two three four");
        fx.run("2w", Mode::Normal);
        assert_eq!(fx.cursor(), 8);
        fx.run("b", Mode::Normal);
        assert_eq!(fx.cursor(), 4);
        fx.run("e", Mode::Normal);
        assert_eq!(fx.cursor(), 6);
        fx.run("ge", Mode::Normal);
        assert_eq!(fx.cursor(), 2);
    }

    #[test]
    fn buffer_jumps() {
        let mut fx = Fixture::new("a\n  b\nc\nd").at(2);
        fx.run("G", Mode::Normal);
        assert_eq!(fx.cursor(), 8);
        fx.run("2G", Mode::Normal);
        assert_eq!(fx.cursor(), 4);
        fx.run("gg", Mode::Normal);
        assert_eq!(fx.cursor(), 0);
        fx.run("99G", Mode::Normal);
        assert_eq!(fx.cursor(), 8);
    }

    #[test]
    fn page_motions_scale_with_visible_lines() {
        let text: String = (0..30).map(|i| format!("{i}\n")).collect();
        let mut fx = Fixture::new(&text);
        // Ten visible lines: a page is eight lines, half a page five.
        fx.run_key("f", KeyEvent::ctrl('f'), Mode::Normal);
        assert_eq!(fx.model.active_view().cursor.line, 8);
        fx.run_key("d", KeyEvent::ctrl('d'), Mode::Normal);
        assert_eq!(fx.model.active_view().cursor.line, 13);
        fx.run_key("2u", KeyEvent::ctrl('u'), Mode::Normal);
        assert_eq!(fx.model.active_view().cursor.line, 3);
    }

    #[test]
    fn backspace_wraps_to_previous_line() {
        let mut fx = Fixture::new("ab\ncd").at(3);
        fx.run_key("", KeyEvent::named(KeyCode::Backspace), Mode::Normal);
        assert_eq!(fx.cursor(), 2);
    }

    #[test]
    fn paragraphs() {
        let mut fx = Fixture::new("a\nb\n\nc\n\nd");
        fx.run("2}", Mode::Normal);
        assert_eq!(fx.model.active_view().cursor.line, 4);
        fx.run("{", Mode::Normal);
        assert_eq!(fx.model.active_view().cursor.line, 2);
    }
}
