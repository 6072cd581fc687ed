//! Closed command vocabulary.
//!
//! `parse` classifies a count-free command string (see `grammar`) together
//! with the key that completed it into a `Command`. Classification is pure:
//! whether a command can actually run (an operator with no visual selection,
//! a paste from an empty register) is decided by the dispatcher.

use crate::span_resolver::Target;
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_state::Mode;
use core_text::BlockKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineBegin,
    LineEnd,
    FirstNonBlank,
    WordForward(BlockKind),
    WordBackward(BlockKind),
    WordEnd(BlockKind),
    WordEndBackward(BlockKind),
    BufferStart,
    BufferEnd,
    PageDown,
    PageUp,
    HalfPageDown,
    HalfPageUp,
    ParagraphForward,
    ParagraphBackward,
    /// Normal-mode Backspace: one character back, wrapping to the previous line.
    CharBackward,
}

/// Where `i`/`a`/`A`/`I` place the cursor before entering Insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertEntry {
    AtCursor,
    AfterCursor,
    LineEnd,
    FirstNonBlank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Motion(Motion),
    Delete(Target),
    /// `x` (refuses the line terminator) and `<Del>` (does not).
    DeleteChar { within_line: bool },
    Change(Target),
    Yank(Target),
    Paste { before: bool },
    OpenLine { above: bool },
    Join,
    EnterInsert(InsertEntry),
    ToggleVisual { line_wise: bool },
    Undo,
    Redo,
    InsertBackspace,
    Ex(String),
}

/// A command plus the `"x` register prefix it was typed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub register: Option<char>,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parse {
    Complete(Invocation),
    /// Valid prefix of a longer command.
    Incomplete,
    Unknown,
}

impl Parse {
    fn complete(register: Option<char>, command: Command) -> Self {
        Parse::Complete(Invocation { register, command })
    }
}

pub fn parse(raw: &str, key: &KeyEvent, mode: Mode) -> Parse {
    let (register, rest) = match raw.strip_prefix('"') {
        Some(tail) => {
            let mut chars = tail.chars();
            match (chars.next(), chars.as_str()) {
                (Some(name), body) if !body.is_empty() => (Some(name), body),
                _ => return Parse::Incomplete,
            }
        }
        None => (None, raw),
    };

    if let Some(command) = parse_extended(rest, key, mode) {
        return match command {
            Some(command) => Parse::complete(register, command),
            None => Parse::Unknown,
        };
    }

    if key.mods.contains(KeyModifiers::CTRL) {
        let command = match rest {
            "r" => Command::Redo,
            "f" => Command::Motion(Motion::PageDown),
            "b" => Command::Motion(Motion::PageUp),
            "d" => Command::Motion(Motion::HalfPageDown),
            "u" => Command::Motion(Motion::HalfPageUp),
            _ => return Parse::Unknown,
        };
        return Parse::complete(register, command);
    }

    let visual = mode == Mode::Visual;
    let command = match rest {
        "$" => Command::Motion(Motion::LineEnd),
        "0" => Command::Motion(Motion::LineBegin),
        "^" => Command::Motion(Motion::FirstNonBlank),
        "j" | "+" => Command::Motion(Motion::Down),
        "k" | "-" => Command::Motion(Motion::Up),
        "l" => Command::Motion(Motion::Right),
        "h" => Command::Motion(Motion::Left),
        "w" => Command::Motion(Motion::WordForward(BlockKind::Word)),
        "W" => Command::Motion(Motion::WordForward(BlockKind::BigWord)),
        "b" => Command::Motion(Motion::WordBackward(BlockKind::Word)),
        "B" => Command::Motion(Motion::WordBackward(BlockKind::BigWord)),
        "e" => Command::Motion(Motion::WordEnd(BlockKind::Word)),
        "E" => Command::Motion(Motion::WordEnd(BlockKind::BigWord)),
        "ge" => Command::Motion(Motion::WordEndBackward(BlockKind::Word)),
        "gE" => Command::Motion(Motion::WordEndBackward(BlockKind::BigWord)),
        "gg" => Command::Motion(Motion::BufferStart),
        "g" => return Parse::Incomplete,
        "G" => Command::Motion(Motion::BufferEnd),
        "}" => Command::Motion(Motion::ParagraphForward),
        "{" => Command::Motion(Motion::ParagraphBackward),
        "J" => Command::Join,
        "v" => Command::ToggleVisual { line_wise: false },
        "V" => Command::ToggleVisual { line_wise: true },
        "x" if visual => Command::Delete(Target::Visual),
        "x" => Command::DeleteChar { within_line: true },
        "o" => Command::OpenLine { above: false },
        "O" => Command::OpenLine { above: true },
        "d" if visual => Command::Delete(Target::Visual),
        "dd" => Command::Delete(Target::Line),
        "d$" | "D" => Command::Delete(Target::ToLineEnd),
        "S" => Command::Change(Target::LineContent),
        "s" if visual => Command::Change(Target::Visual),
        "s" => Command::Change(Target::Cursor),
        "c" if visual => Command::Change(Target::Visual),
        "cc" => Command::Change(Target::Line),
        "c$" | "C" => Command::Change(Target::ToLineEnd),
        "y" if visual => Command::Yank(Target::Visual),
        "yy" | "Y" => Command::Yank(Target::Line),
        "y$" => Command::Yank(Target::ToLineEnd),
        "p" => Command::Paste { before: false },
        "P" => Command::Paste { before: true },
        "u" => Command::Undo,
        "i" => Command::EnterInsert(InsertEntry::AtCursor),
        "a" => Command::EnterInsert(InsertEntry::AfterCursor),
        "A" => Command::EnterInsert(InsertEntry::LineEnd),
        "I" => Command::EnterInsert(InsertEntry::FirstNonBlank),
        // A bare count, or an operator waiting for its motion.
        "" | "d" | "c" | "y" | "da" | "di" | "ca" | "ci" | "ya" | "yi" => {
            return Parse::Incomplete;
        }
        _ => match word_operator(rest) {
            Some(command) => command,
            None => return Parse::Unknown,
        },
    };
    Parse::complete(register, command)
}

// `Some(None)` means the key decided the outcome and it is unknown.
fn parse_extended(rest: &str, key: &KeyEvent, mode: Mode) -> Option<Option<Command>> {
    let command = match key.code {
        KeyCode::Char(_) | KeyCode::Esc | KeyCode::Tab => return None,
        KeyCode::Enter => {
            if rest.starts_with(':') {
                Command::Ex(rest.to_string())
            } else {
                return Some(None);
            }
        }
        KeyCode::Backspace if mode == Mode::Insert => Command::InsertBackspace,
        KeyCode::Backspace => Command::Motion(Motion::CharBackward),
        KeyCode::Delete if mode == Mode::Visual => Command::Delete(Target::Visual),
        KeyCode::Delete => Command::DeleteChar { within_line: false },
        KeyCode::Up => Command::Motion(Motion::Up),
        KeyCode::Down => Command::Motion(Motion::Down),
        KeyCode::Left => Command::Motion(Motion::Left),
        KeyCode::Right => Command::Motion(Motion::Right),
        KeyCode::PageUp => Command::Motion(Motion::PageUp),
        KeyCode::PageDown => Command::Motion(Motion::PageDown),
    };
    Some(Some(command))
}

// d/c/y followed by a word motion or word object.
fn word_operator(rest: &str) -> Option<Command> {
    let mut chars = rest.chars();
    let op = chars.next()?;
    let target = match chars.as_str() {
        "w" if op == 'c' => Target::ChangeWord(BlockKind::Word),
        "W" if op == 'c' => Target::ChangeWord(BlockKind::BigWord),
        "w" => Target::Word(BlockKind::Word),
        "W" => Target::Word(BlockKind::BigWord),
        "aw" => Target::AroundWord(BlockKind::Word),
        "aW" => Target::AroundWord(BlockKind::BigWord),
        "iw" => Target::InnerWord(BlockKind::Word),
        "iW" => Target::InnerWord(BlockKind::BigWord),
        _ => return None,
    };
    match op {
        'd' => Some(Command::Delete(target)),
        'c' => Some(Command::Change(target)),
        'y' => Some(Command::Yank(target)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn normal(raw: &str) -> Parse {
        let last = raw.chars().last().unwrap_or(' ');
        parse(raw, &KeyEvent::char(last), Mode::Normal)
    }

    fn complete(command: Command) -> Parse {
        Parse::complete(None, command)
    }

    #[test]
    fn operator_prefixes_need_more() {
        for raw in ["", "d", "c", "y", "da", "di", "ca", "ci", "g", "\"", "\"a"] {
            assert_eq!(normal(raw), Parse::Incomplete, "{raw}");
        }
    }

    #[test]
    fn visual_operators_complete_immediately() {
        let key = KeyEvent::char('d');
        assert_eq!(
            parse("d", &key, Mode::Visual),
            complete(Command::Delete(Target::Visual))
        );
        let key = KeyEvent::char('y');
        assert_eq!(
            parse("y", &key, Mode::Visual),
            complete(Command::Yank(Target::Visual))
        );
    }

    #[test]
    fn visual_x_and_del_delete_the_selection() {
        assert_eq!(
            parse("x", &KeyEvent::char('x'), Mode::Visual),
            complete(Command::Delete(Target::Visual))
        );
        let del = KeyEvent::named(KeyCode::Delete);
        assert_eq!(
            parse("", &del, Mode::Visual),
            complete(Command::Delete(Target::Visual))
        );
        assert_eq!(
            parse("", &del, Mode::Normal),
            complete(Command::DeleteChar { within_line: false })
        );
    }

    #[test]
    fn change_line_is_linewise() {
        assert_eq!(normal("cc"), complete(Command::Change(Target::Line)));
        assert_eq!(normal("S"), complete(Command::Change(Target::LineContent)));
    }

    #[test]
    fn word_objects() {
        assert_eq!(
            normal("dw"),
            complete(Command::Delete(Target::Word(BlockKind::Word)))
        );
        assert_eq!(
            normal("cW"),
            complete(Command::Change(Target::ChangeWord(BlockKind::BigWord)))
        );
        assert_eq!(
            normal("ciw"),
            complete(Command::Change(Target::InnerWord(BlockKind::Word)))
        );
        assert_eq!(
            normal("yaW"),
            complete(Command::Yank(Target::AroundWord(BlockKind::BigWord)))
        );
        assert_eq!(normal("dq"), Parse::Unknown);
    }

    #[test]
    fn register_prefix_is_split_off() {
        assert_eq!(
            normal("\"Ayy"),
            Parse::complete(Some('A'), Command::Yank(Target::Line))
        );
        assert_eq!(
            normal("\"_dd"),
            Parse::complete(Some('_'), Command::Delete(Target::Line))
        );
    }

    #[test]
    fn ctrl_chords() {
        assert_eq!(
            parse("r", &KeyEvent::ctrl('r'), Mode::Normal),
            complete(Command::Redo)
        );
        assert_eq!(
            parse("f", &KeyEvent::ctrl('f'), Mode::Normal),
            complete(Command::Motion(Motion::PageDown))
        );
        assert_eq!(
            parse("x", &KeyEvent::ctrl('x'), Mode::Normal),
            Parse::Unknown
        );
    }

    #[test]
    fn extended_keys_decide_regardless_of_buffer() {
        let down = KeyEvent::named(KeyCode::Down);
        assert_eq!(
            parse("", &down, Mode::Normal),
            complete(Command::Motion(Motion::Down))
        );
        let bs = KeyEvent::named(KeyCode::Backspace);
        assert_eq!(
            parse("", &bs, Mode::Insert),
            complete(Command::InsertBackspace)
        );
        assert_eq!(
            parse("", &bs, Mode::Normal),
            complete(Command::Motion(Motion::CharBackward))
        );
        let enter = KeyEvent::named(KeyCode::Enter);
        assert_eq!(
            parse(":reg", &enter, Mode::Normal),
            complete(Command::Ex(":reg".to_string()))
        );
        assert_eq!(parse("d", &enter, Mode::Normal), Parse::Unknown);
    }

    #[test]
    fn ex_text_without_return_is_unknown() {
        assert_eq!(normal(":re"), Parse::Unknown);
    }
}
