//! Structured ex command parsing.
//!
//! Converts the raw command buffer (always beginning with ':') into an
//! `ExCommand`. Pure classification: no side effects, unknown input is
//! reported as `ExCommand::Unknown` and turned into a message by the caller.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExCommand {
    /// `:reg` / `:registers`
    Registers,
    /// `:ls` / `:buffers`
    Buffers,
    /// `:bu N`. `None` when the argument is missing or not a number.
    Buffer(Option<usize>),
    Unknown(String),
}

pub struct ExCommandParser;

impl ExCommandParser {
    pub fn parse(raw: &str) -> ExCommand {
        let s = raw.trim();
        let Some(body) = s.strip_prefix(':') else {
            return ExCommand::Unknown(s.to_string());
        };
        let mut words = body.split_whitespace();
        let name = words.next().unwrap_or_default();
        match name {
            "reg" | "registers" => ExCommand::Registers,
            "ls" | "buffers" => ExCommand::Buffers,
            _ if name.len() >= 2 && "buffer".starts_with(name) => {
                ExCommand::Buffer(words.next().and_then(|arg| arg.parse().ok()))
            }
            _ => ExCommand::Unknown(body.to_string()),
        }
    }
}
