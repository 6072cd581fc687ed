//! Modal command interpreter.
//!
//! Keys enter through `ModalEditor::add_key`. In Normal and Visual mode they
//! build a command buffer (`"a3dw`) that `grammar` splits into count and
//! command, `command` classifies, and the `dispatcher` runs against the
//! `EditorModel`. Operator ranges come from `span_resolver`. Insert mode is
//! owned by `insert::InsertModeController`, which batches typed text into one
//! undo step and recognises the two-key escape sequence.

pub mod clock;
pub mod command;
pub mod dispatcher;
pub mod grammar;
pub mod insert;
pub mod router;
pub mod span_resolver;

pub use clock::{Clock, ManualClock, SystemClock};
pub use command::{Command, InsertEntry, Motion};
pub use dispatcher::{CommandFlags, CommandResult, ExCommandHook, dispatch};
pub use grammar::ParsedCommand;
pub use insert::{InsertModeController, InsertStep};
pub use router::{EditorEvent, ModalEditor};
pub use span_resolver::{Range, Span, Target, VisualSelection};
