//! Cursor motion helpers.
//!
//! These operate purely on a `Buffer` + `Position` pair and are free of global editor state.
//! Word motions are not here: they are derived from `Buffer::get_block` by the command layer.

use crate::{Buffer, Position, grapheme};
use unicode_segmentation::UnicodeSegmentation;

/// Normalize a position for Vim Normal-mode semantics:
/// a cursor at or past end-of-line on a non-empty line is pulled back onto the
/// last grapheme cluster so it rests on a real character cell. Empty lines are untouched.
pub fn normalize_normal_mode_position(buf: &Buffer, pos: &mut Position) {
    if pos.line >= buf.line_count() {
        return;
    }
    let content = line_content(buf, pos.line);
    if !content.is_empty() && pos.byte >= content.len() {
        pos.byte = grapheme::prev_boundary(&content, content.len());
    }
}

/// Move left one grapheme boundary. Never leaves the line.
pub fn left(buf: &Buffer, pos: &mut Position) -> bool {
    if pos.byte == 0 {
        return false;
    }
    let content = line_content(buf, pos.line);
    pos.byte = grapheme::prev_boundary(&content, pos.byte);
    true
}

/// Move right one grapheme boundary, stopping on the last cluster of the line.
pub fn right(buf: &Buffer, pos: &mut Position) -> bool {
    let content = line_content(buf, pos.line);
    let next = grapheme::next_boundary(&content, pos.byte);
    if next > pos.byte && next < content.len() {
        pos.byte = next;
        return true;
    }
    false
}

/// Insert-mode variant of `right`: may step onto the line terminator.
pub fn right_insert(buf: &Buffer, pos: &mut Position) -> bool {
    let content = line_content(buf, pos.line);
    let next = grapheme::next_boundary(&content, pos.byte);
    if next > pos.byte {
        pos.byte = next;
        return true;
    }
    false
}

/// Move up one line preserving a target visual column (sticky). Returns the updated sticky column.
/// Caller should maintain the returned sticky column across successive vertical motions. If `sticky_col`
/// is `None`, it will be computed from the current position's visual column.
pub fn up(buf: &Buffer, pos: &mut Position, mut sticky_col: Option<usize>) -> Option<usize> {
    if pos.line == 0 {
        return sticky_col;
    }
    let content = line_content(buf, pos.line);
    let col = *sticky_col.get_or_insert_with(|| grapheme::visual_col(&content, pos.byte));
    pos.line -= 1;
    pos.byte = byte_for_visual_col(buf, pos.line, col);
    sticky_col
}

/// Move down one line preserving sticky visual column.
pub fn down(buf: &Buffer, pos: &mut Position, mut sticky_col: Option<usize>) -> Option<usize> {
    if pos.line + 1 >= buf.line_count() {
        return sticky_col;
    }
    let content = line_content(buf, pos.line);
    let col = *sticky_col.get_or_insert_with(|| grapheme::visual_col(&content, pos.byte));
    pos.line += 1;
    pos.byte = byte_for_visual_col(buf, pos.line, col);
    sticky_col
}

/// Convert a target visual column into a byte offset on a given line, clamping to the last cluster.
fn byte_for_visual_col(buf: &Buffer, line: usize, target_col: usize) -> usize {
    let content = line_content(buf, line);
    let mut col = 0;
    let mut last_start = 0;
    for (b, g) in content.grapheme_indices(true) {
        let w = grapheme::cluster_width(g);
        if col + w > target_col {
            return b;
        }
        col += w;
        last_start = b;
    }
    last_start
}

/// Move to the first non-blank grapheme of the line (or line end when blank).
pub fn first_non_blank(buf: &Buffer, pos: &mut Position) {
    let content = line_content(buf, pos.line);
    pos.byte = content
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(i, _)| i)
        .unwrap_or(content.len());
}

/// Move to the next blank line below the cursor (or the last line). Returns false when no move happened.
pub fn paragraph_forward(buf: &Buffer, pos: &mut Position) -> bool {
    let last = buf.line_count().saturating_sub(1);
    if pos.line >= last {
        return false;
    }
    let mut line = pos.line;
    while line < last && is_blank(buf, line) {
        line += 1;
    }
    while line < last && !is_blank(buf, line) {
        line += 1;
    }
    pos.line = line;
    pos.byte = if is_blank(buf, line) {
        0
    } else {
        buf.line_byte_len(line)
    };
    true
}

/// Move to the previous blank line above the cursor (or the first line).
pub fn paragraph_backward(buf: &Buffer, pos: &mut Position) -> bool {
    if pos.line == 0 {
        if pos.byte == 0 {
            return false;
        }
        pos.byte = 0;
        return true;
    }
    let mut line = pos.line;
    while line > 0 && is_blank(buf, line) {
        line -= 1;
    }
    while line > 0 && !is_blank(buf, line) {
        line -= 1;
    }
    pos.line = line;
    pos.byte = 0;
    true
}

fn is_blank(buf: &Buffer, line: usize) -> bool {
    line_content(buf, line).trim().is_empty()
}

fn line_content(buf: &Buffer, line: usize) -> String {
    let mut s = buf.line(line).unwrap_or_default();
    if s.ends_with('\n') {
        s.pop();
    }
    s
}
