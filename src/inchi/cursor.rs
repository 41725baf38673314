use crate::inchi::error::{Layer, ParseError};

/// Largest count any layer may state: atoms of one element, hydrogens on an
/// atom group, or repeats of a component.
pub(crate) const MAX_COUNT: usize = u16::MAX as usize;

/// Parses a decimal count no larger than [`MAX_COUNT`].
pub(crate) fn parse_count(text: &str) -> Result<usize, ParseError> {
    text.parse::<usize>()
        .ok()
        .filter(|&n| n <= MAX_COUNT)
        .ok_or_else(|| ParseError::InvalidCount {
            text: text.to_string(),
        })
}

/// Character cursor shared by the layer readers.
pub(crate) struct Cursor {
    chars: Vec<char>,
    pos: usize,
    layer: Layer,
}

impl Cursor {
    pub(crate) fn new(input: &str, layer: Layer) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            layer,
        }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    pub(crate) fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    pub(crate) fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    pub(crate) fn at_digit(&self) -> bool {
        self.peek().is_some_and(|c| c.is_ascii_digit())
    }

    /// Reads a run of ASCII digits, if any. Values above [`MAX_COUNT`] are
    /// rejected.
    pub(crate) fn number(&mut self) -> Result<Option<usize>, ParseError> {
        let start = self.pos;
        while self.at_digit() {
            self.pos += 1;
        }
        if start == self.pos {
            return Ok(None);
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        parse_count(&text).map(Some)
    }

    /// Reads a 1-based atom number and checks it against `atom_count`.
    pub(crate) fn atom_number(&mut self, atom_count: usize) -> Result<usize, ParseError> {
        match self.number()? {
            Some(0) => Err(ParseError::AtomIndexZero { layer: self.layer }),
            Some(index) if index > atom_count => Err(ParseError::AtomOutOfRange {
                layer: self.layer,
                index,
                atom_count,
            }),
            Some(index) => Ok(index),
            None => Err(self.unexpected()),
        }
    }

    /// Error for whatever sits under the cursor.
    pub(crate) fn unexpected(&self) -> ParseError {
        match self.peek() {
            Some(';') => ParseError::MultipleComponents,
            Some(ch) => ParseError::UnexpectedChar {
                layer: self.layer,
                pos: self.pos,
                ch,
            },
            None => ParseError::UnexpectedEnd { layer: self.layer },
        }
    }
}
