//! Brace-structured scanning for C and C++
//!
//! A per-statement signature tracker watches declaration scopes (file,
//! class bodies, `namespace` and `extern "C"` blocks). A `{` opens a
//! function when the statement had a top-level parameter list preceded by
//! a name and no top-level `=`; it opens a class when the statement began
//! with `class`/`struct`/`union` and a name. Function bodies are opaque:
//! only their brace depth is followed.

use super::{line_start_if_blank_prefix, PartialUnit, ScanOutput, Unit};
use crate::language::{Language, Syntax};
use crate::lexer::{Cursor, Token, TokenKind};
use crossspec_domain::UnitKind;

const CONTROL_KEYWORDS: &[&str] = &["if", "for", "while", "switch", "catch", "return", "sizeof"];

/// Identifiers followed by parentheses that never name a function
const NON_NAMES: &[&str] = &[
    "__attribute__",
    "__declspec",
    "alignas",
    "asm",
    "__asm__",
    "decltype",
    "noexcept",
    "requires",
    "throw",
];

const ACCESS_LABELS: &[&str] = &["public", "private", "protected", "signals", "slots"];

enum Scope {
    /// Declarations continue inside (`namespace`, `extern "C"`)
    Transparent(Option<String>),
    Class(usize),
    Function(usize),
    /// Any other brace pair; `resumes` when it belongs to a pending signature
    Block { resumes: bool },
}

#[derive(Default)]
struct Signature {
    start: Option<usize>,
    tokens: usize,
    last: Option<TokenKind>,
    paren_depth: usize,
    chain: String,
    tilde: bool,
    name: Option<String>,
    has_params: bool,
    control: bool,
    assignment: bool,
    init_list: bool,
    operator: bool,
    operator_call: bool,
    class_keyword: bool,
    enum_keyword: bool,
    awaiting_class_name: bool,
    class_name: Option<String>,
    namespace: bool,
    namespace_name: Option<String>,
    saw_extern: bool,
    extern_block: bool,
}

struct Scanner<'a> {
    text: &'a str,
    language: Language,
    units: Vec<Unit>,
    scopes: Vec<Scope>,
    sig: Signature,
}

pub(super) fn scan(text: &str, language: Language) -> ScanOutput {
    let mut scanner = Scanner {
        text,
        language,
        units: Vec::new(),
        scopes: Vec::new(),
        sig: Signature::default(),
    };
    for token in Cursor::new(text, Syntax::CLike) {
        if !token.is_significant() || token.kind == TokenKind::Directive {
            continue;
        }
        if scanner.in_body() {
            scanner.body_token(token);
        } else {
            scanner.declaration_token(token);
        }
    }
    scanner.finish()
}

impl Scanner<'_> {
    fn in_body(&self) -> bool {
        matches!(self.scopes.last(), Some(Scope::Function(_) | Scope::Block { .. }))
    }

    fn reset(&mut self) {
        self.sig = Signature::default();
    }

    fn body_token(&mut self, token: Token) {
        match token.kind {
            TokenKind::Punct(b'{') => self.scopes.push(Scope::Block { resumes: false }),
            TokenKind::Punct(b'}') => {
                let popped = self.close_scope(token.end);
                if !self.in_body() {
                    if matches!(popped, Some(Scope::Block { resumes: true })) {
                        self.sig.last = Some(TokenKind::Punct(b'}'));
                    } else {
                        self.reset();
                    }
                }
            }
            _ => {}
        }
    }

    fn close_scope(&mut self, end: usize) -> Option<Scope> {
        let scope = self.scopes.pop()?;
        if let Scope::Class(idx) | Scope::Function(idx) = scope {
            if let Some(unit) = self.units.get_mut(idx) {
                unit.range.end = end;
            }
        }
        Some(scope)
    }

    fn declaration_token(&mut self, token: Token) {
        match token.kind {
            TokenKind::Punct(b';') if self.sig.paren_depth == 0 => {
                self.reset();
                return;
            }
            TokenKind::Punct(b'{') => {
                self.open_brace(token);
                return;
            }
            TokenKind::Punct(b'}') if self.sig.paren_depth == 0 => {
                self.close_scope(token.end);
                self.reset();
                return;
            }
            _ => {}
        }

        if self.sig.start.is_none() {
            self.sig.start = Some(token.start);
        }
        let text = token.text(self.text);
        let top_level = self.sig.paren_depth == 0;

        match token.kind {
            TokenKind::Punct(b'(') => self.open_paren(),
            TokenKind::Punct(b')') => {
                if self.sig.operator_call {
                    self.sig.chain.push(')');
                    self.sig.operator_call = false;
                } else {
                    self.sig.paren_depth = self.sig.paren_depth.saturating_sub(1);
                }
            }
            TokenKind::Punct(b':') if top_level => {
                if self.sig.has_params {
                    self.sig.init_list = true;
                } else if self.sig.tokens == 1
                    && self.sig.last == Some(TokenKind::Ident)
                    && ACCESS_LABELS.contains(&self.sig.chain.as_str())
                {
                    self.reset();
                    return;
                }
            }
            TokenKind::Punct(byte) if top_level && self.sig.operator && !self.sig.has_params => {
                self.sig.chain.push(byte as char);
            }
            TokenKind::Punct(b'=') if top_level => self.sig.assignment = true,
            TokenKind::Punct(b'~') => self.sig.tilde = true,
            TokenKind::Ident if top_level && self.sig.operator && !self.sig.has_params => {
                self.sig.chain.push(' ');
                self.sig.chain.push_str(text);
            }
            TokenKind::Ident => self.ident(text, top_level),
            TokenKind::PathSep => self.sig.chain.push_str("::"),
            TokenKind::Str if top_level && self.sig.saw_extern => self.sig.extern_block = true,
            _ => {}
        }

        self.sig.last = Some(token.kind);
        self.sig.tokens += 1;
    }

    fn ident(&mut self, text: &str, top_level: bool) {
        if top_level {
            match text {
                "class" | "struct" | "union" => {
                    self.sig.class_keyword = true;
                    self.sig.awaiting_class_name = true;
                    self.sig.class_name = None;
                }
                "enum" => self.sig.enum_keyword = true,
                "namespace" => self.sig.namespace = true,
                "extern" => self.sig.saw_extern = true,
                "operator" => {
                    self.sig.operator = true;
                    if self.sig.last != Some(TokenKind::PathSep) {
                        self.sig.chain.clear();
                    }
                    self.sig.chain.push_str("operator");
                    return;
                }
                _ if self.sig.awaiting_class_name && !NON_NAMES.contains(&text) && text != "final" => {
                    self.sig.class_name = Some(text.to_string());
                    self.sig.awaiting_class_name = false;
                }
                _ if self.sig.namespace && self.sig.namespace_name.is_none() => {
                    self.sig.namespace_name = Some(text.to_string());
                }
                _ => {}
            }
        }

        if self.sig.last != Some(TokenKind::PathSep) {
            self.sig.chain.clear();
        }
        if self.sig.tilde {
            self.sig.chain.push('~');
            self.sig.tilde = false;
        }
        self.sig.chain.push_str(text);
    }

    fn open_paren(&mut self) {
        if self.sig.operator && self.sig.chain.ends_with("operator") && !self.sig.has_params {
            // `operator()`: the first pair belongs to the name
            self.sig.chain.push('(');
            self.sig.operator_call = true;
            return;
        }
        if self.sig.paren_depth == 0 && !self.sig.init_list {
            let named = self.sig.last == Some(TokenKind::Ident)
                || (self.sig.operator && !self.sig.has_params);
            if named && !self.sig.chain.is_empty() {
                let last_segment = self
                    .sig
                    .chain
                    .rsplit("::")
                    .next()
                    .unwrap_or_default()
                    .to_string();
                if CONTROL_KEYWORDS.contains(&last_segment.as_str()) {
                    self.sig.control = true;
                } else if !NON_NAMES.contains(&last_segment.as_str()) {
                    self.sig.name = Some(self.sig.chain.clone());
                    self.sig.has_params = true;
                    self.sig.operator = false;
                }
            }
        }
        self.sig.paren_depth += 1;
    }

    fn open_brace(&mut self, token: Token) {
        if self.sig.paren_depth > 0
            || (self.sig.init_list
                && matches!(self.sig.last, Some(TokenKind::Ident | TokenKind::Punct(b'>'))))
        {
            self.scopes.push(Scope::Block { resumes: true });
            return;
        }

        let sig = std::mem::take(&mut self.sig);
        let start = line_start_if_blank_prefix(self.text, sig.start.unwrap_or(token.start));

        if sig.namespace {
            self.scopes.push(Scope::Transparent(sig.namespace_name));
        } else if sig.extern_block && !sig.has_params {
            self.scopes.push(Scope::Transparent(None));
        } else if sig.has_params && !sig.control && !sig.assignment {
            if let Some(name) = sig.name {
                let idx = self.open_unit(UnitKind::Function, name, start);
                self.scopes.push(Scope::Function(idx));
            } else {
                self.scopes.push(Scope::Block { resumes: false });
            }
        } else if sig.class_keyword && !sig.enum_keyword && !sig.assignment && !sig.has_params {
            match sig.class_name {
                Some(name) => {
                    let idx = self.open_unit(UnitKind::Class, name, start);
                    self.scopes.push(Scope::Class(idx));
                }
                None => self.scopes.push(Scope::Block { resumes: false }),
            }
        } else {
            self.scopes.push(Scope::Block { resumes: false });
        }
    }

    fn open_unit(&mut self, kind: UnitKind, name: String, start: usize) -> usize {
        let mut path: Vec<&str> = Vec::new();
        let mut parent = None;
        let mut depth = 0;
        for scope in &self.scopes {
            match scope {
                Scope::Transparent(Some(ns)) => path.push(ns),
                Scope::Class(idx) | Scope::Function(idx) => {
                    if let Some(name) = self.units.get(*idx).and_then(|u| u.name.as_deref()) {
                        path.push(name);
                    }
                    parent = Some(*idx);
                    depth += 1;
                }
                _ => {}
            }
        }
        path.push(&name);
        let qualified_name = path.join("::");

        self.units.push(Unit {
            kind,
            name: Some(name),
            qualified_name: Some(qualified_name),
            range: start..start,
            depth,
            parent,
            language: self.language,
        });
        self.units.len() - 1
    }

    fn finish(mut self) -> ScanOutput {
        let len = self.text.len();
        let mut partial = Vec::new();
        while let Some(scope) = self.scopes.pop() {
            if let Scope::Class(idx) | Scope::Function(idx) = scope {
                if let Some(unit) = self.units.get_mut(idx) {
                    unit.range.end = len;
                    partial.push(PartialUnit {
                        name: unit.name.clone(),
                        start: unit.range.start,
                    });
                }
            }
        }
        partial.reverse();
        ScanOutput {
            units: self.units,
            partial,
        }
    }
}
