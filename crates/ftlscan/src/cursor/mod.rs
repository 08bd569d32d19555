//! Cursor: the host's lexing position as seen by the scanner.
//!
//! Why this exists
//! - The scanner never owns input. The hosting parser owns the text and the
//!   token under construction; the scanner only peeks, consumes and finally
//!   commits or discards. [`LexCursor`] is that seam, borrowed for exactly
//!   one [`Scanner::scan`](crate::Scanner::scan) call.
//!
//! What it does
//! - `lookahead()` peeks the current code point (`None` at end of input).
//! - `advance()` moves past it and includes it in the pending token;
//!   `skip()` moves past it and excludes it (leading whitespace).
//! - `commit(kind)` ends the pending token; `discard()` abandons it and
//!   rewinds to where it began, so a declined scan never leaves consumed
//!   characters behind.
//!
//! [`SourceCursor`] is the in-crate host over a byte slice. It decodes UTF‑8
//! lazily (invalid sequences read as U+FFFD) while maintaining
//! `offset/char/line/column`, and records committed tokens with their spans.
//!
//! Invariants
//! - The pending token starts where the last commit, discard or leading
//!   skip left the cursor; `advance()` never moves the start.
//! - Offsets always land on the boundary of a decoded code point.

use crate::token::{Span, Token, TokenKind};

/// The host's lexing cursor, borrowed for one scanner call.
pub trait LexCursor {
    /// The current code point, or `None` at end of input.
    fn lookahead(&self) -> Option<char>;

    /// Moves past the current code point, including it in the pending token.
    /// No-op at end of input.
    fn advance(&mut self);

    /// Moves past the current code point without including it in the
    /// pending token. No-op at end of input.
    fn skip(&mut self);

    /// Ends the pending token as `kind`.
    fn commit(&mut self, kind: TokenKind);

    /// Abandons the pending token and returns to its start.
    fn discard(&mut self);

    /// Whether the input is exhausted.
    #[inline]
    fn is_eof(&self) -> bool {
        self.lookahead().is_none()
    }
}

impl<C: LexCursor + ?Sized> LexCursor for &mut C {
    #[inline]
    fn lookahead(&self) -> Option<char> {
        (**self).lookahead()
    }

    #[inline]
    fn advance(&mut self) {
        (**self).advance();
    }

    #[inline]
    fn skip(&mut self) {
        (**self).skip();
    }

    #[inline]
    fn commit(&mut self, kind: TokenKind) {
        (**self).commit(kind);
    }

    #[inline]
    fn discard(&mut self) {
        (**self).discard();
    }
}

/// A location in the source. Lines and columns are 1-based and count code
/// points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Byte offset.
    pub offset: usize,
    /// Code point index.
    pub char_idx: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// The start of a source.
    pub const START: Position = Position {
        offset: 0,
        char_idx: 0,
        line: 1,
        column: 1,
    };

    #[inline]
    fn bump(&mut self, ch: char, len: usize) {
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.char_idx += 1;
        self.offset += len;
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

/// One decoded UTF‑8 scalar and its byte length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharInfo {
    pub ch: char,
    /// Number of source bytes the scalar was decoded from (1-4).
    pub len: u8,
}

/// A [`LexCursor`] over an in-memory source.
///
/// Typical host loop:
/// ```rust
/// use ftlscan::{Scanner, SourceCursor, TokenKind, TokenSet};
///
/// let src = "(a > b)";
/// let mut scanner = Scanner::new();
/// let mut cursor = SourceCursor::new(src);
/// let accepted = TokenSet::OPEN_PAREN | TokenSet::GREATER_THAN_OPERATOR;
///
/// assert_eq!(scanner.scan(&mut cursor, accepted), Some(TokenKind::OpenParen));
/// let token = cursor.take_token().unwrap();
/// assert_eq!(token.span.slice(src), Some("("));
/// assert_eq!(scanner.state().depth(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SourceCursor<'src> {
    src: &'src [u8],
    pos: Position,
    token_start: Position,
    last: Option<Token>,
}

impl<'src> SourceCursor<'src> {
    /// A cursor at the start of `src`.
    #[must_use]
    pub fn new(src: &'src str) -> Self {
        Self::from_bytes(src.as_bytes())
    }

    /// A cursor at the start of possibly invalid UTF‑8 input.
    #[must_use]
    pub fn from_bytes(src: &'src [u8]) -> Self {
        Self {
            src,
            pos: Position::START,
            token_start: Position::START,
            last: None,
        }
    }

    /// The current position.
    #[inline]
    #[must_use]
    pub fn position(&self) -> Position {
        self.pos
    }

    /// Where the pending token begins.
    #[inline]
    #[must_use]
    pub fn token_start(&self) -> Position {
        self.token_start
    }

    /// The unread input.
    #[must_use]
    pub fn remaining(&self) -> &'src [u8] {
        self.src.get(self.pos.offset..).unwrap_or_default()
    }

    /// Moves to `pos`, abandoning any pending token.
    ///
    /// `pos` must come from this cursor (or one over the same source);
    /// positions past the end clamp to the end.
    pub fn seek(&mut self, pos: Position) {
        let pos = if pos.offset > self.src.len() {
            self.end_position()
        } else {
            pos
        };
        self.pos = pos;
        self.token_start = pos;
    }

    /// Moves back to the start of the source and forgets the last token.
    pub fn reset(&mut self) {
        self.seek(Position::START);
        self.last = None;
    }

    /// Returns the last committed token, clearing it.
    pub fn take_token(&mut self) -> Option<Token> {
        self.last.take()
    }

    /// The last committed token.
    #[must_use]
    pub fn last_token(&self) -> Option<Token> {
        self.last
    }

    /// Ends the pending token at the current position without an external
    /// kind and returns its span. Hosts use this for tokens their own
    /// tokenizer recognizes after the scanner declined.
    pub fn commit_span(&mut self) -> Span {
        let span = Span::new(self.token_start.offset, self.pos.offset);
        self.token_start = self.pos;
        span
    }

    /// Decodes but does not consume the next code point.
    #[must_use]
    pub fn peek(&self) -> Option<CharInfo> {
        Self::decode_from(self.src, self.pos.offset)
    }

    /// Internal: advance input by one code point.
    #[inline]
    fn step_input(&mut self) -> Option<CharInfo> {
        let info = self.peek()?;
        self.pos.bump(info.ch, usize::from(info.len));
        Some(info)
    }

    // Decode the first UTF-8 scalar of `src` starting at `offset`.
    fn decode_from(src: &[u8], offset: usize) -> Option<CharInfo> {
        let rest = src.get(offset..)?;
        let (ch, len) = bstr::decode_utf8(rest);
        if len == 0 {
            return None;
        }
        // Invalid sequences are at most 3 bytes; valid ones at most 4.
        let len = u8::try_from(len).ok()?;
        Some(CharInfo {
            ch: ch.unwrap_or(char::REPLACEMENT_CHARACTER),
            len,
        })
    }

    fn end_position(&self) -> Position {
        let mut probe = self.clone();
        while probe.step_input().is_some() {}
        probe.pos
    }
}

impl LexCursor for SourceCursor<'_> {
    #[inline]
    fn lookahead(&self) -> Option<char> {
        self.peek().map(|info| info.ch)
    }

    #[inline]
    fn advance(&mut self) {
        let _ = self.step_input();
    }

    #[inline]
    fn skip(&mut self) {
        // Skipping before anything was advanced moves the token start along.
        let leading = self.token_start == self.pos;
        if self.step_input().is_some() && leading {
            self.token_start = self.pos;
        }
    }

    fn commit(&mut self, kind: TokenKind) {
        let span = self.commit_span();
        self.last = Some(Token { kind, span });
    }

    fn discard(&mut self) {
        self.pos = self.token_start;
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.pos.offset >= self.src.len()
    }
}
