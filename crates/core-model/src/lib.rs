//! High-level editor model: views over the buffers held in `EditorState`.
//!
//! A `View` owns presentation state the interpreter needs but the buffer does
//! not: the cursor, the sticky column used by vertical motions, the number of
//! visible text lines (page and half-page motions scale by it) and the first
//! visible line. Several views may exist; exactly one has focus and key input
//! is interpreted against it.
//!
//! Core invariants (must hold after every public call):
//! * `views` is never empty.
//! * `active < views.len()`.
//! * `views[i].buffer_index` always names an existing buffer inside
//!   `EditorState` (`EditorState` is the source of truth for buffer storage).
//! * `split_state_and_active_view` makes the focused view's buffer the state's
//!   active buffer, so edits and undo always target the buffer being viewed.

use core_state::EditorState;
use core_text::{Buffer, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Stable identifier for a `View` (index into the manager; views are never closed).
pub struct ViewId(pub usize);

#[derive(Debug, Clone)]
pub struct View {
    pub id: ViewId,
    pub buffer_index: usize,
    pub cursor: Position,
    /// Visual column remembered across `j`/`k`; cleared by any other cursor move.
    pub sticky_col: Option<usize>,
    pub viewport_first_line: usize,
    pub visible_lines: usize,
}

impl View {
    pub fn new(id: ViewId, buffer_index: usize, cursor: Position, visible_lines: usize) -> Self {
        Self {
            id,
            buffer_index,
            cursor,
            sticky_col: None,
            viewport_first_line: 0,
            visible_lines,
        }
    }

    /// Cursor as an absolute byte offset into `buffer`.
    pub fn cursor_offset(&self, buffer: &Buffer) -> usize {
        buffer.offset_of(self.cursor)
    }

    /// Place the cursor at an absolute byte offset (clamped) and forget the sticky column.
    pub fn set_cursor_offset(&mut self, buffer: &Buffer, offset: usize) {
        self.cursor = buffer.position_of(offset);
        self.sticky_col = None;
    }

    /// Keep the cursor inside the viewport. Returns true if the first visible line changed.
    pub fn auto_scroll(&mut self, margin: usize) -> bool {
        match compute_scroll_intent(
            self.viewport_first_line,
            self.cursor.line,
            self.visible_lines,
            margin,
        ) {
            Some(new_first) => {
                self.viewport_first_line = new_first;
                true
            }
            None => false,
        }
    }
}

/// Owns the view collection and which one has focus.
#[derive(Debug)]
pub struct ViewManager {
    views: Vec<View>,
    active: usize,
}

impl ViewManager {
    pub fn new_single(initial: View) -> Self {
        Self {
            views: vec![initial],
            active: 0,
        }
    }
    pub fn active_view(&self) -> &View {
        &self.views[self.active]
    }
    pub fn active_view_mut(&mut self) -> &mut View {
        &mut self.views[self.active]
    }
    pub fn views(&self) -> &[View] {
        &self.views
    }
    /// Create a view onto `buffer_index` with the cursor at the origin. Focus is unchanged.
    pub fn add_view(&mut self, buffer_index: usize, visible_lines: usize) -> ViewId {
        let id = ViewId(self.views.len());
        self.views
            .push(View::new(id, buffer_index, Position::origin(), visible_lines));
        id
    }
    /// Move focus; unknown ids are ignored.
    pub fn focus(&mut self, id: ViewId) -> bool {
        if id.0 < self.views.len() {
            self.active = id.0;
            true
        } else {
            false
        }
    }
    pub fn active_id(&self) -> ViewId {
        self.views[self.active].id
    }
}

pub struct EditorModel {
    state: EditorState,
    view_mgr: ViewManager,
}

impl EditorModel {
    pub fn new(state: EditorState, visible_lines: usize) -> Self {
        let v = View::new(ViewId(0), state.active, Position::origin(), visible_lines);
        Self {
            state,
            view_mgr: ViewManager::new_single(v),
        }
    }
    pub fn state(&self) -> &EditorState {
        &self.state
    }
    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }
    pub fn active_view(&self) -> &View {
        self.view_mgr.active_view()
    }
    pub fn active_view_mut(&mut self) -> &mut View {
        self.view_mgr.active_view_mut()
    }
    pub fn views(&self) -> &[View] {
        self.view_mgr.views()
    }
    pub fn active_view_id(&self) -> ViewId {
        self.view_mgr.active_id()
    }

    /// Open another view onto an existing buffer. `None` when the buffer does not exist.
    pub fn add_view(&mut self, buffer_index: usize) -> Option<ViewId> {
        if buffer_index >= self.state.buffers.len() {
            return None;
        }
        let visible = self.view_mgr.active_view().visible_lines;
        Some(self.view_mgr.add_view(buffer_index, visible))
    }

    pub fn focus(&mut self, id: ViewId) -> bool {
        let focused = self.view_mgr.focus(id);
        if focused {
            let buffer_index = self.view_mgr.active_view().buffer_index;
            self.state.set_active(buffer_index);
        }
        focused
    }

    /// Mutable access to the state and the focused view at once. The state's
    /// active buffer is synced to the view first.
    pub fn split_state_and_active_view(&mut self) -> (&mut EditorState, &mut View) {
        let view = self.view_mgr.active_view_mut();
        self.state.set_active(view.buffer_index);
        (&mut self.state, view)
    }
}

/// Compute the desired new first visible line to keep the cursor within the
/// vertical viewport subject to a top/bottom margin.
///
/// Inputs:
/// - first: current first visible line (top of viewport)
/// - cursor_line: current cursor line (0-based)
/// - text_height: number of text rows available
/// - margin: desired margin in rows (clamped to at most text_height/2)
///
/// Returns Some(new_first) if a scroll is needed, else None when the cursor is
/// already within the permitted band.
pub fn compute_scroll_intent(
    first: usize,
    cursor_line: usize,
    text_height: usize,
    margin: usize,
) -> Option<usize> {
    if text_height == 0 {
        return None;
    }
    let m = margin.min(text_height / 2);
    let top = first;
    let bottom = first + text_height;
    if cursor_line < top + m {
        let new_first = cursor_line.saturating_sub(m);
        if new_first != first {
            return Some(new_first);
        }
    } else if cursor_line + m >= bottom {
        let new_first = cursor_line + m + 1 - text_height;
        if new_first != first {
            return Some(new_first);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::EditorState;
    use core_text::Buffer;

    fn model(text: &str) -> EditorModel {
        EditorModel::new(
            EditorState::new(Buffer::from_str("test", text).unwrap()),
            24,
        )
    }

    #[test]
    fn single_view_initialized() {
        let model = model("hello\n");
        let v = model.active_view();
        assert_eq!(v.id, ViewId(0));
        assert_eq!(v.buffer_index, 0);
        assert_eq!(v.viewport_first_line, 0);
        assert_eq!(v.visible_lines, 24);
    }

    #[test]
    fn split_borrow_syncs_active_buffer() {
        let mut model = model("abc\n");
        let second = model
            .state_mut()
            .add_buffer(Buffer::from_str("other", "xyz").unwrap());
        model.active_view_mut().buffer_index = second;
        let (state, view) = model.split_state_and_active_view();
        assert_eq!(state.active, view.buffer_index);
        assert_eq!(state.active_buffer().text(), "xyz");
    }

    #[test]
    fn add_view_and_focus() {
        let mut model = model("one");
        let b = model
            .state_mut()
            .add_buffer(Buffer::from_str("two", "two").unwrap());
        let id = model.add_view(b).unwrap();
        assert_eq!(model.views().len(), 2);
        assert_eq!(model.active_view_id(), ViewId(0));
        assert!(model.focus(id));
        assert_eq!(model.state().active, b);
        assert!(!model.focus(ViewId(9)));
        assert!(model.add_view(7).is_none());
    }

    #[test]
    fn cursor_offset_round_trip_clears_sticky() {
        let mut model = model("ab\ncd\n");
        let (state, view) = model.split_state_and_active_view();
        view.sticky_col = Some(4);
        view.set_cursor_offset(state.active_buffer(), 4);
        assert_eq!(view.cursor, Position::new(1, 1));
        assert_eq!(view.sticky_col, None);
        assert_eq!(view.cursor_offset(state.active_buffer()), 4);
    }

    #[test]
    fn auto_scroll_down_and_up() {
        let mut v = View::new(ViewId(0), 0, Position::origin(), 5);
        assert!(!v.auto_scroll(0));
        v.cursor.line = 4;
        assert!(!v.auto_scroll(0));
        v.cursor.line = 5;
        assert!(v.auto_scroll(0));
        assert_eq!(v.viewport_first_line, 1);
        v.cursor.line = 9;
        assert!(v.auto_scroll(0));
        assert_eq!(v.viewport_first_line, 5);
        v.cursor.line = 3;
        assert!(v.auto_scroll(0));
        assert_eq!(v.viewport_first_line, 3);
    }

    #[test]
    fn compute_scroll_intent_scrolls_down_when_below_bottom_margin() {
        assert_eq!(compute_scroll_intent(0, 3, 5, 1), None);
        assert_eq!(compute_scroll_intent(0, 4, 5, 1), Some(1));
        assert_eq!(compute_scroll_intent(1, 4, 5, 1), None);
    }

    #[test]
    fn compute_scroll_intent_clamps_margin_to_half_height() {
        assert_eq!(compute_scroll_intent(0, 2, 4, 10), Some(1));
    }
}
