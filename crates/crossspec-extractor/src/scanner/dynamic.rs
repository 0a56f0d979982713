//! Indentation-structured scanning for Python-like sources
//!
//! Works on logical lines: a physical line continues while brackets are
//! open or after a trailing backslash, and triple-quoted strings never
//! produce line breaks. Blank and comment-only lines do not affect nesting.

use super::{PartialUnit, ScanOutput, Unit};
use crate::language::{Language, Syntax};
use crate::lexer::{Cursor, LexState, Token, TokenKind};
use crossspec_domain::UnitKind;

const TAB_WIDTH: usize = 8;

struct LogicalLine {
    start: usize,
    indent: usize,
    head: Vec<Token>,
    content_end: usize,
}

struct LineBuilder {
    start: usize,
    indent: usize,
    head: Vec<Token>,
    content_end: Option<usize>,
}

impl LineBuilder {
    fn finish(self) -> Option<LogicalLine> {
        let content_end = self.content_end?;
        Some(LogicalLine {
            start: self.start,
            indent: self.indent,
            head: self.head,
            content_end,
        })
    }
}

pub(super) fn scan(text: &str, language: Language) -> ScanOutput {
    let (lines, unterminated) = logical_lines(text);
    let mut units: Vec<Unit> = Vec::new();
    let mut open: Vec<(usize, usize)> = Vec::new();
    let mut decorators: Option<(usize, usize)> = None;
    let mut last_content_end = 0;

    for line in &lines {
        while let Some(&(indent, idx)) = open.last() {
            if line.indent > indent {
                break;
            }
            close(&mut units[idx], last_content_end);
            open.pop();
        }

        if line.head.first().is_some_and(|t| t.is_punct(b'@')) {
            match decorators {
                Some((indent, _)) if indent == line.indent => {}
                _ => decorators = Some((line.indent, line.start)),
            }
        } else if let Some((kind, name)) = header(text, &line.head) {
            let start = match decorators {
                Some((indent, start)) if indent == line.indent => start,
                _ => line.start,
            };
            let parent = open.last().map(|&(_, idx)| idx);
            let qualified_name = match parent.and_then(|idx| units[idx].qualified_name.as_deref()) {
                Some(prefix) => format!("{}.{}", prefix, name),
                None => name.to_string(),
            };
            units.push(Unit {
                kind,
                name: Some(name.to_string()),
                qualified_name: Some(qualified_name),
                range: start..line.content_end,
                depth: open.len(),
                parent,
                language,
            });
            open.push((line.indent, units.len() - 1));
            decorators = None;
        } else {
            decorators = None;
        }
        last_content_end = line.content_end;
    }

    let mut partial = Vec::new();
    for &(_, idx) in &open {
        if unterminated {
            units[idx].range.end = text.len();
            partial.push(PartialUnit {
                name: units[idx].name.clone(),
                start: units[idx].range.start,
            });
        } else {
            close(&mut units[idx], last_content_end);
        }
    }

    ScanOutput { units, partial }
}

fn close(unit: &mut Unit, end: usize) {
    unit.range.end = end.max(unit.range.start);
}

/// Recognise `def name`, `async def name` and `class name`
fn header<'s>(text: &'s str, head: &[Token]) -> Option<(UnitKind, &'s str)> {
    let words: Vec<&str> = head
        .iter()
        .take_while(|t| t.kind == TokenKind::Ident)
        .map(|t| t.text(text))
        .collect();
    match words.as_slice() {
        ["def", name, ..] | ["async", "def", name, ..] => Some((UnitKind::Function, *name)),
        ["class", name, ..] => Some((UnitKind::Class, *name)),
        _ => None,
    }
}

/// Split `text` into non-blank logical lines; the flag reports input
/// ending inside an open bracket or string
fn logical_lines(text: &str) -> (Vec<LogicalLine>, bool) {
    let mut cursor = Cursor::new(text, Syntax::Dynamic);
    let mut lines = Vec::new();
    let mut current: Option<LineBuilder> = None;
    let mut brackets: usize = 0;
    let mut continued = false;

    while let Some(token) = cursor.next_token() {
        match token.kind {
            TokenKind::Newline => {
                if brackets == 0 && !continued {
                    if let Some(line) = current.take().and_then(LineBuilder::finish) {
                        lines.push(line);
                    }
                }
                continued = false;
                continue;
            }
            TokenKind::Continuation => {
                continued = true;
                continue;
            }
            _ => {}
        }

        let builder = current.get_or_insert_with(|| {
            let start = text[..token.start].rfind('\n').map_or(0, |i| i + 1);
            LineBuilder {
                start,
                indent: indentation(&text[start..token.start]),
                head: Vec::new(),
                content_end: None,
            }
        });

        if token.kind == TokenKind::Comment {
            if builder.content_end.is_some() {
                builder.content_end = Some(token.end);
            }
            continue;
        }

        match token.kind {
            TokenKind::Punct(b'(' | b'[' | b'{') => brackets += 1,
            TokenKind::Punct(b')' | b']' | b'}') => brackets = brackets.saturating_sub(1),
            _ => {}
        }
        if builder.head.len() < 3 {
            builder.head.push(token);
        }
        builder.content_end = Some(token.end);
    }

    if let Some(line) = current.and_then(LineBuilder::finish) {
        lines.push(line);
    }
    let unterminated = brackets > 0 || cursor.state() != LexState::Normal;
    (lines, unterminated)
}

/// Column of the first character, tabs advancing to the next multiple of 8
fn indentation(prefix: &str) -> usize {
    prefix.bytes().fold(0, |col, b| match b {
        b'\t' => (col / TAB_WIDTH + 1) * TAB_WIDTH,
        0x0c => 0,
        _ => col + 1,
    })
}
