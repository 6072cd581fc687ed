//! Register store.
//!
//! Slots: unnamed `"`, yank `0`, numbered ring `1`-`9`, named `a`-`z`. Uppercase
//! names alias the lowercase slot and append on write; `_` is the black hole
//! (writes vanish, reads are empty). Operators compute their write targets up
//! front with [`RegisterStore::resolve`] and hand them to
//! [`RegisterStore::record`] once the affected text is known.

use smallvec::SmallVec;
use tracing::trace;

pub const UNNAMED: char = '"';
pub const YANK: char = '0';
pub const BLACK_HOLE: char = '_';

/// Write targets for one operation, consumed in order.
pub type RegisterTargets = SmallVec<[char; 4]>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Register {
    pub text: String,
    /// Pasted as whole lines (`p` opens below, `P` above) rather than inline.
    pub line_wise: bool,
}

impl Register {
    pub fn new(text: impl Into<String>, line_wise: bool) -> Self {
        Self {
            text: text.into(),
            line_wise,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterStore {
    unnamed: Register,
    yank: Register,
    numbered: [Register; 9],
    named: [Register; 26],
}

impl RegisterStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, name: char) -> Option<&Register> {
        match name {
            UNNAMED => Some(&self.unnamed),
            YANK => Some(&self.yank),
            '1'..='9' => Some(&self.numbered[(name as u8 - b'1') as usize]),
            'a'..='z' => Some(&self.named[(name as u8 - b'a') as usize]),
            'A'..='Z' => Some(&self.named[(name as u8 - b'A') as usize]),
            _ => None,
        }
    }

    fn slot_mut(&mut self, name: char) -> Option<&mut Register> {
        match name {
            UNNAMED => Some(&mut self.unnamed),
            YANK => Some(&mut self.yank),
            '1'..='9' => Some(&mut self.numbered[(name as u8 - b'1') as usize]),
            'a'..='z' => Some(&mut self.named[(name as u8 - b'a') as usize]),
            'A'..='Z' => Some(&mut self.named[(name as u8 - b'A') as usize]),
            _ => None,
        }
    }

    /// Register contents by name (uppercase reads the lowercase slot). `None` for
    /// names that are not registers, including `_`.
    pub fn get(&self, name: char) -> Option<&Register> {
        self.slot(name)
    }

    /// Source register for a paste: the prefixed register, or the unnamed one.
    /// Unknown or never-written registers read as empty.
    pub fn read(&self, prefix: Option<char>) -> Register {
        let name = prefix.unwrap_or(UNNAMED);
        self.slot(name).cloned().unwrap_or_default()
    }

    /// Write one register. Uppercase appends to the lowercase slot and takes the
    /// new linewise flag; `_` and unknown names are ignored.
    pub fn set(&mut self, name: char, register: Register) {
        if name == BLACK_HOLE {
            return;
        }
        let append = name.is_ascii_uppercase();
        let Some(slot) = self.slot_mut(name) else {
            trace!(target: "state.registers", register = %name, "unknown_register_ignored");
            return;
        };
        if append {
            slot.text.push_str(&register.text);
            slot.line_wise = register.line_wise;
        } else {
            *slot = register;
        }
        trace!(
            target: "state.registers",
            register = %name,
            append,
            len = slot.text.len(),
            line_wise = slot.line_wise,
            "register_write"
        );
    }

    /// Targets written by an operation carrying an optional `"x` prefix.
    /// No prefix writes the unnamed register; `_` writes nothing; any other
    /// name writes that register and the unnamed one.
    pub fn resolve(prefix: Option<char>) -> RegisterTargets {
        let mut targets = RegisterTargets::new();
        match prefix {
            None => targets.push(UNNAMED),
            Some(BLACK_HOLE) => {}
            Some(name) => {
                targets.push(UNNAMED);
                targets.push(name);
            }
        }
        targets
    }

    /// Write the same payload to every target.
    pub fn record(&mut self, targets: &[char], register: &Register) {
        for &name in targets {
            self.set(name, register.clone());
        }
    }

    /// Rotate the delete ring (`9` drops, `1` receives `register`).
    pub fn shift_numbered(&mut self, register: Register) {
        self.numbered.rotate_right(1);
        self.numbered[0] = register;
        trace!(target: "state.registers", len = self.numbered[0].text.len(), "numbered_ring_shift");
    }

    /// Non-empty registers in display order (`"`, `0`-`9`, `a`-`z`).
    pub fn non_empty(&self) -> Vec<(char, &Register)> {
        std::iter::once(UNNAMED)
            .chain('0'..='9')
            .chain('a'..='z')
            .filter_map(|name| self.slot(name).map(|reg| (name, reg)))
            .filter(|(_, reg)| !reg.is_empty())
            .collect()
    }

    /// Text for the `:reg` listing. Newlines render as `^J`.
    pub fn dump(&self) -> String {
        let mut out = String::from("--- Registers ---\n");
        for (name, reg) in self.non_empty() {
            out.push('"');
            out.push(name);
            out.push_str("   ");
            out.push_str(&reg.text.replace('\n', "^J"));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn resolve_targets() {
        assert_eq!(RegisterStore::resolve(None).as_slice(), &['"']);
        assert!(RegisterStore::resolve(Some('_')).is_empty());
        assert_eq!(RegisterStore::resolve(Some('a')).as_slice(), &['"', 'a']);
    }

    #[test]
    fn uppercase_appends_and_takes_linewise_flag() {
        let mut regs = RegisterStore::new();
        regs.set('a', Register::new("x\n", true));
        regs.set('A', Register::new("tail", false));
        assert_eq!(regs.get('a'), Some(&Register::new("x\ntail", false)));
        assert_eq!(regs.get('A'), regs.get('a'));
    }

    #[test]
    fn black_hole_and_unknown_names_are_ignored() {
        let mut regs = RegisterStore::new();
        regs.set('_', Register::new("gone", false));
        regs.set('#', Register::new("gone", false));
        assert!(regs.get('_').is_none());
        assert!(regs.non_empty().is_empty());
        assert_eq!(regs.read(Some('_')), Register::default());
    }

    #[test]
    fn read_defaults_to_unnamed() {
        let mut regs = RegisterStore::new();
        regs.record(&RegisterStore::resolve(None), &Register::new("abc", false));
        assert_eq!(regs.read(None).text, "abc");
        assert_eq!(regs.read(Some('q')).text, "");
    }

    #[test]
    fn dump_lists_in_stable_order_with_newline_escape() {
        let mut regs = RegisterStore::new();
        regs.set('b', Register::new("bee", false));
        regs.set('0', Register::new("line\n", true));
        regs.set('"', Register::new("line\n", true));
        assert_eq!(
            regs.dump(),
            "--- Registers ---\n\"\"   line^J\n\"0   line^J\n\"b   bee\n"
        );
    }

    proptest! {
        #[test]
        fn numbered_ring_keeps_most_recent_first(n in 1usize..20) {
            let mut regs = RegisterStore::new();
            for i in 0..n {
                regs.shift_numbered(Register::new(format!("{i}\n"), true));
            }
            for slot in 1..=n.min(9) {
                let name = char::from_digit(slot as u32, 10).unwrap();
                let expected = format!("{}\n", n - slot);
                prop_assert_eq!(&regs.get(name).unwrap().text, &expected);
            }
        }
    }
}
