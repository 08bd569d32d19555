#![allow(missing_docs, dead_code)]

//! A miniature template host: just enough of a FreeMarker tokenizer to drive
//! the scanner the way a generated parser does.

use ftlscan::{LexCursor, Scanner, SourceCursor, TokenKind, TokenSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Text,
    Directive,
    Interpolation,
}

impl Mode {
    pub fn accepted(self) -> TokenSet {
        match self {
            Mode::Text => TokenSet::COMMENT,
            Mode::Directive => TokenSet::all(),
            Mode::Interpolation => TokenSet::all().difference(TokenSet::DIRECTIVE_CLOSE_TAG),
        }
    }
}

pub struct Host<'src> {
    pub src: &'src str,
    pub cursor: SourceCursor<'src>,
    pub scanner: Scanner,
    pub mode: Mode,
    pub lines: Vec<String>,
}

impl<'src> Host<'src> {
    pub fn new(src: &'src str) -> Self {
        Self::resume(src, Scanner::new(), Mode::Text)
    }

    pub fn resume(src: &'src str, scanner: Scanner, mode: Mode) -> Self {
        Self {
            src,
            cursor: SourceCursor::new(src),
            scanner,
            mode,
            lines: Vec::new(),
        }
    }

    /// Tokenizes to the end of input.
    pub fn run(mut self) -> Self {
        while self.step() {}
        self
    }

    /// Produces one token; `false` at end of input.
    pub fn step(&mut self) -> bool {
        if let Some(kind) = self.scanner.scan(&mut self.cursor, self.mode.accepted()) {
            let token = self.cursor.take_token().expect("commit records a token");
            self.lines.push(token.describe(self.src));
            if kind == TokenKind::DirectiveCloseTag {
                self.mode = Mode::Text;
            }
            return true;
        }
        if self.cursor.is_eof() {
            return false;
        }
        let label = self.grammar_token();
        let span = self.cursor.commit_span();
        let text = span.slice(self.src).expect("span inside source");
        self.lines.push(format!("{label} {text:?}"));
        true
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.cursor.remaining().starts_with(prefix.as_bytes())
    }

    fn bump(&mut self, n: usize) {
        for _ in 0..n {
            self.cursor.advance();
        }
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.cursor.lookahead().is_some_and(&pred) {
            self.cursor.advance();
        }
    }

    fn grammar_token(&mut self) -> &'static str {
        match self.mode {
            Mode::Text => {
                if self.starts_with("<#") || self.starts_with("</#") {
                    self.bump(if self.starts_with("</#") { 3 } else { 2 });
                    self.bump_while(char::is_alphanumeric);
                    self.mode = Mode::Directive;
                    "Tag"
                } else if self.starts_with("${") {
                    self.bump(2);
                    self.mode = Mode::Interpolation;
                    "Open"
                } else {
                    self.bump(1);
                    self.bump_while(|c| !matches!(c, '<' | '$') && !c.is_whitespace());
                    "Text"
                }
            }
            Mode::Interpolation if self.starts_with("}") => {
                self.bump(1);
                self.mode = Mode::Text;
                "Close"
            }
            Mode::Directive | Mode::Interpolation => {
                const SPECIAL: &[char] = &['(', ')', '<', '>', '=', '}'];
                let first = self.cursor.lookahead();
                self.bump(1);
                if first.is_some_and(|c| SPECIAL.contains(&c)) {
                    "Punct"
                } else {
                    self.bump_while(|c| !SPECIAL.contains(&c) && !c.is_whitespace());
                    "Word"
                }
            }
        }
    }
}

pub fn tokenize(src: &str) -> String {
    Host::new(src).run().render()
}
