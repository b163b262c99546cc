use super::error::{Location, ParseError, ParseErrorContext, ParseErrorKind};

/// A character-at-a-time reader over rule source text.
///
/// Positions handed out by the scanner are indices into the source's
/// characters; [`Scanner::error`] turns one back into a line and a UTF-16
/// column for reporting.
pub(super) struct Scanner {
    chars: Vec<char>,
    /// UTF-16 offset of each character, plus the length of the whole
    /// source as the final entry.
    units: Vec<usize>,
    pos: usize,
}

impl Scanner {
    pub fn new(source: &str) -> Self {
        let chars: Vec<char> = source.chars().collect();
        let mut units = Vec::with_capacity(chars.len() + 1);
        let mut offset = 0;
        for c in &chars {
            units.push(offset);
            offset += c.len_utf16();
        }
        units.push(offset);
        Self {
            chars,
            units,
            pos: 0,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn reset(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn peek(&self) -> Option<char> {
        self.peek_nth(0)
    }

    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn consume_while(&mut self, mut pred: impl FnMut(char) -> bool) -> String {
        let mut taken = String::new();
        while let Some(c) = self.peek().filter(|&c| pred(c)) {
            taken.push(c);
            self.pos += 1;
        }
        taken
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Skips whitespace and `#` comments, which run to the end of the line.
    pub fn skip_trivia(&mut self) {
        loop {
            self.skip_whitespace();
            if self.peek() != Some('#') {
                return;
            }
            while self.peek().is_some_and(|c| !matches!(c, '\n' | '\r')) {
                self.pos += 1;
            }
        }
    }

    /// Builds an error pointing at the character at index `at`.
    pub fn error(&self, kind: ParseErrorKind, at: usize) -> ParseError {
        let at = at.min(self.chars.len());
        let line_start = self.chars[..at]
            .iter()
            .rposition(|&c| c == '\n')
            .map_or(0, |newline| newline + 1);
        let line = 1 + self.chars[..at].iter().filter(|&&c| c == '\n').count();
        let column = self.units[at] - self.units[line_start] + 1;

        let limit = ParseErrorContext::CONTEXT_LEN;
        let mut from = at;
        while from > 0 && self.units[at] - self.units[from - 1] <= limit {
            from -= 1;
        }
        let mut to = at;
        while to < self.chars.len() && self.units[to + 1] - self.units[at] <= limit {
            to += 1;
        }

        ParseError {
            kind,
            context: ParseErrorContext {
                location: Location::LineAndColumn { line, column },
                pre_context: self.chars[from..at].iter().collect(),
                post_context: self.chars[at..to].iter().collect(),
            },
        }
    }
}
