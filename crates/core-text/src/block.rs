//! Word / space block search.
//!
//! `Buffer::get_block` scans from an offset in one direction and reports the
//! first two blocks (runs of same-class non-space characters) it meets along
//! with the non-block boundaries that follow each of them. Every field is an
//! absolute byte offset; a backward scan that runs off the start of the buffer
//! reports `-1`, so fields are signed and consumers clamp.

use crate::Buffer;

/// Which characters form a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Vim `word`: runs of alphanumerics/underscore, or runs of other punctuation.
    Word,
    /// Vim `WORD`: any run of non-whitespace.
    BigWord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// Result of a block search.
///
/// Forward: `first_block` is the start of the token under (or after) the search
/// position, `first_non_block` one past its end, then `second_block` /
/// `second_non_block` describe the token after that. Backward: `first_block`
/// is the nearest non-space character at or before the search position and
/// `first_non_block` the position just before its token starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferBlock {
    pub block_search_pos: isize,
    pub first_block: isize,
    pub second_block: isize,
    pub first_non_block: isize,
    pub second_non_block: isize,
    pub space_before: bool,
    pub space_before_start: isize,
    pub direction: isize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Space,
    Word,
    Punct,
}

struct Scanner<'a> {
    buffer: &'a Buffer,
    kind: BlockKind,
    len_chars: isize,
}

impl Scanner<'_> {
    fn char_at(&self, idx: isize) -> Option<char> {
        if idx < 0 || idx >= self.len_chars {
            return None;
        }
        Some(self.buffer.rope().char(idx as usize))
    }

    fn class(&self, idx: isize) -> CharClass {
        match self.char_at(idx) {
            None => CharClass::Space,
            Some(c) if c.is_whitespace() => CharClass::Space,
            Some(_) if self.kind == BlockKind::BigWord => CharClass::Word,
            Some(c) if c == '_' || c.is_alphanumeric() => CharClass::Word,
            Some(_) => CharClass::Punct,
        }
    }

    fn is_inline_space(&self, idx: isize) -> bool {
        matches!(self.char_at(idx), Some(c) if c.is_whitespace() && c != '\n')
    }

    fn skip_space_forward(&self, mut idx: isize) -> isize {
        while idx < self.len_chars && self.class(idx) == CharClass::Space {
            idx += 1;
        }
        idx.min(self.len_chars)
    }

    fn run_end_forward(&self, idx: isize) -> isize {
        if idx >= self.len_chars {
            return self.len_chars;
        }
        let class = self.class(idx);
        let mut end = idx;
        while end < self.len_chars && self.class(end) == class {
            end += 1;
        }
        end
    }

    fn skip_space_backward(&self, mut idx: isize) -> isize {
        while idx >= 0 && self.class(idx) == CharClass::Space {
            idx -= 1;
        }
        idx
    }

    fn run_start_backward(&self, idx: isize) -> isize {
        if idx < 0 {
            return -1;
        }
        let class = self.class(idx);
        let mut start = idx;
        while start >= 0 && self.class(start) == class {
            start -= 1;
        }
        start
    }

    fn to_byte(&self, idx: isize) -> isize {
        if idx < 0 {
            return -1;
        }
        let idx = idx.min(self.len_chars) as usize;
        self.buffer.rope().char_to_byte(idx) as isize
    }
}

impl Buffer {
    /// Find the word/space block structure around `offset` scanning in `direction`.
    pub fn get_block(&self, kind: BlockKind, offset: usize, direction: Direction) -> BufferBlock {
        let scanner = Scanner {
            buffer: self,
            kind,
            len_chars: self.rope().len_chars() as isize,
        };
        let start = self.rope().byte_to_char(offset.min(self.len_bytes())) as isize;
        let space_before = scanner.class(start) == CharClass::Space;

        let (space_before_start, first_block, first_non_block, second_block, second_non_block) =
            match direction {
                Direction::Forward => {
                    let (space_before_start, first_block) = if space_before {
                        let mut s = start;
                        while s > 0 && scanner.is_inline_space(s - 1) {
                            s -= 1;
                        }
                        (s, scanner.skip_space_forward(start))
                    } else {
                        let class = scanner.class(start);
                        let mut s = start;
                        while s > 0 && scanner.class(s - 1) == class {
                            s -= 1;
                        }
                        (start, s)
                    };
                    let first_non_block = scanner.run_end_forward(first_block);
                    let second_block = scanner.skip_space_forward(first_non_block);
                    let second_non_block = scanner.run_end_forward(second_block);
                    (
                        space_before_start,
                        first_block,
                        first_non_block,
                        second_block,
                        second_non_block,
                    )
                }
                Direction::Backward => {
                    let first_block = scanner.skip_space_backward(start);
                    let first_non_block = scanner.run_start_backward(first_block);
                    let second_block = scanner.skip_space_backward(first_non_block);
                    let second_non_block = scanner.run_start_backward(second_block);
                    (
                        start,
                        first_block,
                        first_non_block,
                        second_block,
                        second_non_block,
                    )
                }
            };

        BufferBlock {
            block_search_pos: scanner.to_byte(start),
            first_block: scanner.to_byte(first_block),
            second_block: scanner.to_byte(second_block),
            first_non_block: scanner.to_byte(first_non_block),
            second_non_block: scanner.to_byte(second_non_block),
            space_before,
            space_before_start: scanner.to_byte(space_before_start),
            direction: direction.step(),
        }
    }
}
