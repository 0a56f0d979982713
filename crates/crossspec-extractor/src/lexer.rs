//! Lexical skip-state machine
//!
//! A forward-only [`Cursor`] walks the source once and groups bytes into
//! coarse [`Token`]s. Its [`LexState`] records whether the cursor is inside
//! a comment, string or character literal, so delimiters appearing there
//! never reach the scanners: a `{` inside `"..."` is part of a
//! [`TokenKind::Str`] token, not a [`TokenKind::Punct`].
//!
//! Every token boundary falls on a UTF-8 character boundary.

use crate::language::Syntax;

/// Lexical context of the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexState {
    /// Ordinary code
    Normal,
    /// Inside `// ...` or `# ...` (also preprocessor lines)
    LineComment,
    /// Inside `/* ... */`
    BlockComment,
    /// Inside a string literal
    Str {
        /// Opening quote byte
        quote: u8,
        /// Triple-quoted (may span lines)
        triple: bool,
    },
    /// Inside a C++ raw string literal `R"delim( ... )delim"`
    RawStr,
    /// Inside a character literal
    Char,
}

/// Coarse token classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword
    Ident,
    /// Numeric literal
    Number,
    /// String literal, quotes included
    Str,
    /// Character literal, quotes included
    Char,
    /// Comment
    Comment,
    /// Preprocessor line, continuations included
    Directive,
    /// End of a physical line
    Newline,
    /// Backslash-newline outside literals
    Continuation,
    /// `::`
    PathSep,
    /// Any other single byte
    Punct(u8),
}

/// A token and its byte span `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Token class
    pub kind: TokenKind,
    /// Start byte offset
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Token {
    /// Source text of the token
    pub fn text<'s>(&self, src: &'s str) -> &'s str {
        src.get(self.start..self.end).unwrap_or_default()
    }

    /// Whether the token is the given punctuation byte
    pub fn is_punct(&self, byte: u8) -> bool {
        self.kind == TokenKind::Punct(byte)
    }

    /// Whether the token carries code (not a comment, newline or continuation)
    pub fn is_significant(&self) -> bool {
        !matches!(
            self.kind,
            TokenKind::Comment | TokenKind::Newline | TokenKind::Continuation
        )
    }
}

/// Forward-only tokenizer driven by [`LexState`]
pub struct Cursor<'a> {
    src: &'a [u8],
    pos: usize,
    state: LexState,
    syntax: Syntax,
    line_has_code: bool,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of `src`
    pub fn new(src: &'a str, syntax: Syntax) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
            state: LexState::Normal,
            syntax,
            line_has_code: false,
        }
    }

    /// Current lexical state
    ///
    /// After the last token this is `Normal` unless the input ended inside
    /// an unterminated block comment, raw string or triple-quoted string.
    pub fn state(&self) -> LexState {
        self.state
    }

    /// Current byte offset
    pub fn position(&self) -> usize {
        self.pos
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.src.get(self.pos + ahead).copied()
    }

    fn starts_with(&self, pattern: &[u8]) -> bool {
        self.src[self.pos..].starts_with(pattern)
    }

    /// Length of a backslash-newline at the cursor, if any
    fn continuation_len(&self) -> Option<usize> {
        match (self.peek(0), self.peek(1), self.peek(2)) {
            (Some(b'\\'), Some(b'\n'), _) => Some(2),
            (Some(b'\\'), Some(b'\r'), Some(b'\n')) => Some(3),
            _ => None,
        }
    }

    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.src.len());
    }

    /// Produce the next token, or `None` at end of input
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            let start = self.pos;
            let byte = self.peek(0)?;
            match byte {
                b'\n' => {
                    self.advance(1);
                    self.line_has_code = false;
                    return Some(self.token(TokenKind::Newline, start));
                }
                b' ' | b'\t' | b'\r' | 0x0b | 0x0c => {
                    self.advance(1);
                    continue;
                }
                b'\\' => {
                    if let Some(len) = self.continuation_len() {
                        self.advance(len);
                        return Some(self.token(TokenKind::Continuation, start));
                    }
                }
                _ => {}
            }

            let kind = match self.syntax {
                Syntax::CLike => self.lex_c_like(byte),
                Syntax::Dynamic => self.lex_dynamic(byte),
            };
            if !matches!(kind, TokenKind::Comment) {
                self.line_has_code = true;
            }
            return Some(self.token(kind, start));
        }
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            start,
            end: self.pos,
        }
    }

    fn lex_c_like(&mut self, byte: u8) -> TokenKind {
        match byte {
            b'/' if self.peek(1) == Some(b'/') => {
                self.advance(2);
                self.line_comment(true);
                TokenKind::Comment
            }
            b'/' if self.peek(1) == Some(b'*') => {
                self.block_comment();
                TokenKind::Comment
            }
            b'#' if !self.line_has_code => {
                self.directive();
                TokenKind::Directive
            }
            b'"' => {
                self.string(b'"', false);
                TokenKind::Str
            }
            b'\'' => {
                self.char_literal();
                TokenKind::Char
            }
            b':' if self.peek(1) == Some(b':') => {
                self.advance(2);
                TokenKind::PathSep
            }
            _ => {
                let start = self.pos;
                let kind = self.lex_common(byte);
                if kind == TokenKind::Ident
                    && self.peek(0) == Some(b'"')
                    && is_raw_prefix(&self.src[start..self.pos])
                    && self.raw_string()
                {
                    return TokenKind::Str;
                }
                kind
            }
        }
    }

    fn lex_dynamic(&mut self, byte: u8) -> TokenKind {
        match byte {
            b'#' => {
                self.advance(1);
                self.line_comment(false);
                TokenKind::Comment
            }
            b'"' | b'\'' => {
                let triple = self.peek(1) == Some(byte) && self.peek(2) == Some(byte);
                self.string(byte, triple);
                TokenKind::Str
            }
            _ => self.lex_common(byte),
        }
    }

    fn lex_common(&mut self, byte: u8) -> TokenKind {
        if is_ident_start(byte) {
            while self.peek(0).is_some_and(is_ident_continue) {
                self.advance(1);
            }
            TokenKind::Ident
        } else if byte.is_ascii_digit() {
            let separator = matches!(self.syntax, Syntax::CLike);
            while let Some(b) = self.peek(0) {
                let digit_sep = separator && b == b'\'' && self.peek(1).is_some_and(|n| n.is_ascii_alphanumeric());
                if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' || digit_sep {
                    self.advance(1);
                } else {
                    break;
                }
            }
            TokenKind::Number
        } else {
            self.advance(1);
            TokenKind::Punct(byte)
        }
    }

    /// Consume to end of line (newline not consumed)
    fn line_comment(&mut self, honor_continuation: bool) {
        self.state = LexState::LineComment;
        while let Some(b) = self.peek(0) {
            if honor_continuation {
                if let Some(len) = self.continuation_len() {
                    self.advance(len);
                    continue;
                }
            }
            if b == b'\n' {
                break;
            }
            self.advance(1);
        }
        self.state = LexState::Normal;
    }

    fn block_comment(&mut self) {
        self.state = LexState::BlockComment;
        self.advance(2);
        while self.peek(0).is_some() {
            if self.starts_with(b"*/") {
                self.advance(2);
                self.state = LexState::Normal;
                return;
            }
            self.advance(1);
        }
    }

    fn directive(&mut self) {
        self.state = LexState::LineComment;
        while let Some(b) = self.peek(0) {
            if let Some(len) = self.continuation_len() {
                self.advance(len);
                continue;
            }
            match b {
                b'\n' => break,
                b'/' if self.peek(1) == Some(b'*') => {
                    self.block_comment();
                    self.state = LexState::LineComment;
                }
                b'"' | b'\'' => {
                    self.string(b, false);
                    self.state = LexState::LineComment;
                }
                _ => self.advance(1),
            }
        }
        self.state = LexState::Normal;
    }

    fn string(&mut self, quote: u8, triple: bool) {
        self.state = LexState::Str { quote, triple };
        self.advance(if triple { 3 } else { 1 });
        while let Some(b) = self.peek(0) {
            if b == b'\\' {
                self.advance(2);
                continue;
            }
            if triple {
                if self.starts_with(&[quote, quote, quote]) {
                    self.advance(3);
                    self.state = LexState::Normal;
                    return;
                }
            } else if b == quote {
                self.advance(1);
                self.state = LexState::Normal;
                return;
            } else if b == b'\n' {
                // unterminated single-line literal: resynchronise at the newline
                self.state = LexState::Normal;
                return;
            }
            self.advance(1);
        }
        if !triple {
            self.state = LexState::Normal;
        }
    }

    /// Consume `"delim( ... )delim"` with the cursor on the opening quote.
    ///
    /// Returns false, consuming nothing, when no valid delimiter follows.
    fn raw_string(&mut self) -> bool {
        let open = self.pos + 1;
        let Some(paren) = self.src[open..]
            .iter()
            .take(MAX_RAW_DELIMITER + 1)
            .position(|&b| b == b'(')
        else {
            return false;
        };
        let delim = &self.src[open..open + paren];
        if delim
            .iter()
            .any(|b| matches!(b, b' ' | b')' | b'\\' | b'\t' | b'\n' | b'\r' | b'"'))
        {
            return false;
        }

        let mut close = Vec::with_capacity(delim.len() + 2);
        close.push(b')');
        close.extend_from_slice(delim);
        close.push(b'"');

        self.state = LexState::RawStr;
        self.pos = open + paren + 1;
        while self.peek(0).is_some() {
            if self.starts_with(&close) {
                self.advance(close.len());
                self.state = LexState::Normal;
                return true;
            }
            self.advance(1);
        }
        true
    }

    fn char_literal(&mut self) {
        self.state = LexState::Char;
        self.advance(1);
        while let Some(b) = self.peek(0) {
            match b {
                b'\\' => self.advance(2),
                b'\'' => {
                    self.advance(1);
                    break;
                }
                b'\n' => break,
                _ => self.advance(1),
            }
        }
        self.state = LexState::Normal;
    }
}

impl Iterator for Cursor<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Longest delimiter a raw string literal may carry
const MAX_RAW_DELIMITER: usize = 16;

/// Encoding prefixes that introduce a raw string literal
fn is_raw_prefix(ident: &[u8]) -> bool {
    matches!(ident, b"R" | b"u8R" | b"uR" | b"UR" | b"LR")
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}
