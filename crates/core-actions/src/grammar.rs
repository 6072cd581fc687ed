//! Count / command grammar for Normal and Visual mode input.
//!
//! A command buffer has the shape `[count1] command1 [count2] command2`:
//! `2d3d` reads as count 2, `d`, count 3, `d` and resolves to `dd` six
//! times. Register prefixes (`"a`) and ex commands (`:bu 1`) keep their
//! digits in the command text. A count of zero is the `0` motion, and `.`
//! replays the last recorded command.
//!
//! Counts multiply. A product or a run too large for `usize` falls back to a
//! count of 1 for the whole command.

/// A command string with its repeat count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub count: usize,
    pub command: String,
    /// A digit run was present (as opposed to the implied count of 1).
    pub explicit_count: bool,
}

impl ParsedCommand {
    pub fn new(command: impl Into<String>, count: usize) -> Self {
        Self {
            count,
            command: command.into(),
            explicit_count: false,
        }
    }
}

/// Split `raw` into count and command, substituting the last command for `.`.
pub fn parse(raw: &str, last_command: &str, last_count: usize) -> ParsedCommand {
    let mut rest = raw;
    let count1 = take_while(&mut rest, |c| c.is_ascii_digit());
    let command1 = take_while(&mut rest, |c| c.is_ascii_graphic() && !c.is_ascii_digit());
    let count2 = if command1.starts_with(['"', ':']) {
        ""
    } else {
        take_while(&mut rest, |c| c.is_ascii_digit())
    };
    let command2 = take_while(&mut rest, |c| c.is_ascii_graphic() || c == ' ');

    let explicit_count = !count1.is_empty() || !count2.is_empty();
    let count = match (digits(count1), digits(count2)) {
        (Some(a), Some(b)) => a.checked_mul(b).unwrap_or(1),
        _ => 1,
    };
    let command = format!("{command1}{command2}");

    if count == 0 {
        return ParsedCommand {
            count: 1,
            command: "0".to_string(),
            explicit_count: false,
        };
    }

    // With nothing recorded the bare `.` stays, which no command matches.
    if command == "." && !last_command.is_empty() {
        return ParsedCommand {
            count: if explicit_count {
                count
            } else {
                last_count.max(1)
            },
            command: last_command.to_string(),
            explicit_count,
        };
    }

    ParsedCommand {
        count,
        command,
        explicit_count,
    }
}

// An absent run counts as 1; an overflowing one is rejected.
fn digits(run: &str) -> Option<usize> {
    if run.is_empty() {
        Some(1)
    } else {
        run.parse().ok()
    }
}

fn take_while<'a>(rest: &mut &'a str, pred: impl Fn(char) -> bool) -> &'a str {
    let end = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
    let (head, tail) = rest.split_at(end);
    *rest = tail;
    head
}
