//! Vim key notation.
//!
//! Format: plain characters stand for themselves; `<...>` encloses a named key
//! (`<Esc>`, `<CR>`/`<Enter>`, `<BS>`, `<Del>`, `<Tab>`, `<Up>`, `<Down>`,
//! `<Left>`, `<Right>`, `<PageUp>`, `<PageDown>`, `<Space>`, `<lt>`) optionally
//! prefixed by modifiers (`<C-r>`, `<A-x>`, `<S-Tab>`). A `<` that does not
//! open a recognised group is an error rather than a literal, use `<lt>`.

use crate::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("unterminated key group starting at byte {0}")]
    Unterminated(usize),
    #[error("invalid key name: {0}")]
    InvalidKeyName(String),
    #[error("invalid modifier: {0}")]
    InvalidModifier(String),
}

/// Parse a notation string into a key sequence.
pub fn parse_keys(input: &str) -> Result<Vec<KeyEvent>, KeyParseError> {
    let mut keys = Vec::new();
    let mut rest = input;
    let mut consumed = 0usize;
    while let Some(c) = rest.chars().next() {
        if c == '<' {
            let close = rest
                .find('>')
                .ok_or(KeyParseError::Unterminated(consumed))?;
            keys.push(parse_group(&rest[1..close])?);
            consumed += close + 1;
            rest = &rest[close + 1..];
        } else {
            keys.push(KeyEvent::char(c));
            consumed += c.len_utf8();
            rest = &rest[c.len_utf8()..];
        }
    }
    Ok(keys)
}

fn parse_group(group: &str) -> Result<KeyEvent, KeyParseError> {
    let mut mods = KeyModifiers::empty();
    let mut name = group;
    // Modifier prefixes are single letters followed by '-', the key itself may be '-'.
    while name.len() > 2 && name.as_bytes()[1] == b'-' {
        let flag = match name.as_bytes()[0].to_ascii_uppercase() {
            b'C' => KeyModifiers::CTRL,
            b'A' | b'M' => KeyModifiers::ALT,
            b'S' => KeyModifiers::SHIFT,
            _ => return Err(KeyParseError::InvalidModifier(name[..1].to_string())),
        };
        mods |= flag;
        name = &name[2..];
    }
    let code = parse_key_name(name)?;
    Ok(KeyEvent::new(code, mods))
}

fn parse_key_name(name: &str) -> Result<KeyCode, KeyParseError> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }
    let code = match name.to_ascii_lowercase().as_str() {
        "esc" | "escape" => KeyCode::Esc,
        "cr" | "enter" | "return" => KeyCode::Enter,
        "bs" | "backspace" => KeyCode::Backspace,
        "del" | "delete" => KeyCode::Delete,
        "tab" => KeyCode::Tab,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "space" => KeyCode::Char(' '),
        "lt" => KeyCode::Char('<'),
        _ => return Err(KeyParseError::InvalidKeyName(name.to_string())),
    };
    Ok(code)
}

/// Render a key back into notation (inverse of `parse_keys` for a single key).
pub fn format_key(key: &KeyEvent) -> String {
    let name = match key.code {
        KeyCode::Char('<') => "lt".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "CR".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Backspace => "BS".to_string(),
        KeyCode::Delete => "Del".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
    };
    let mut prefix = String::new();
    if key.mods.contains(KeyModifiers::CTRL) {
        prefix.push_str("C-");
    }
    if key.mods.contains(KeyModifiers::ALT) {
        prefix.push_str("A-");
    }
    if key.mods.contains(KeyModifiers::SHIFT) {
        prefix.push_str("S-");
    }
    match key.code {
        KeyCode::Char(c) if prefix.is_empty() && c != '<' => name,
        _ => format!("<{prefix}{name}>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_characters_map_one_to_one() {
        let keys = parse_keys("d2w").unwrap();
        assert_eq!(
            keys,
            vec![KeyEvent::char('d'), KeyEvent::char('2'), KeyEvent::char('w')]
        );
    }

    #[test]
    fn named_and_modified_groups() {
        let keys = parse_keys("ix<Esc><C-r><CR><S-Tab><lt>").unwrap();
        assert_eq!(
            keys,
            vec![
                KeyEvent::char('i'),
                KeyEvent::char('x'),
                KeyEvent::named(KeyCode::Esc),
                KeyEvent::ctrl('r'),
                KeyEvent::named(KeyCode::Enter),
                KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT),
                KeyEvent::char('<'),
            ]
        );
    }

    #[test]
    fn ctrl_dash_is_a_chord_on_dash() {
        assert_eq!(parse_keys("<C-->").unwrap(), vec![KeyEvent::ctrl('-')]);
    }

    #[test]
    fn errors_are_reported() {
        assert_eq!(parse_keys("ab<Esc"), Err(KeyParseError::Unterminated(2)));
        assert_eq!(
            parse_keys("<Bogus>"),
            Err(KeyParseError::InvalidKeyName("Bogus".to_string()))
        );
        assert_eq!(
            parse_keys("<X-a>"),
            Err(KeyParseError::InvalidModifier("X".to_string()))
        );
    }

    #[test]
    fn format_round_trips_through_parse() {
        let source = "<C-d>x<BS><lt>";
        let keys = parse_keys(source).unwrap();
        let rendered: String = keys.iter().map(format_key).collect();
        assert_eq!(rendered, source);
    }
}
