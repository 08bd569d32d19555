//! Scanner: context-sensitive decisions the grammar cannot make alone.
//!
//! Overview
//! - The host parser calls [`Scanner::scan`] at every lexical decision point
//!   with its cursor and the set of external tokens the current parse state
//!   accepts. The scanner commits at most one token or declines, in which case
//!   the grammar's own tokenizer reads from the same position.
//! - The only state that outlives a call is [`ScanState`], the count of open
//!   parenthesis groups. A `>` closes a directive tag only at depth zero, so
//!   `<#if (a > b)>` reads its first `>` as a comparison and its second as the
//!   end of the tag.
//!
//! Dispatch, by first non-whitespace code point
//!
//! | char | look-ahead | result                                                    |
//! |------|------------|-----------------------------------------------------------|
//! | `<`  | 2          | `Comment` for `<#--…-->`, else decline                    |
//! | `(`  | 0          | `OpenParen` if accepted; depth + 1                        |
//! | `)`  | 0          | `CloseParen` if accepted; depth - 1, floored at 0         |
//! | `>`  | 1          | `DirectiveCloseTag` if accepted at depth 0, else `>=`/`>` |
//! | `=`  | 1          | `EqualOperator` for `==`, else `DeprecatedEqualOperator`  |
//!
//! Every decline discards what the scanner consumed past the leading
//! whitespace, so the grammar always re-reads from the first significant code
//! point.

mod comment;

use tracing::trace;

use crate::{
    cursor::LexCursor,
    options::ScannerOptions,
    state::ScanState,
    token::{TokenKind, TokenSet},
};

/// The external scanner of one parsing session.
///
/// Create one per session, [`serialize`](Scanner::serialize) its state
/// whenever the host pauses, and [`deserialize`](Scanner::deserialize)
/// before resuming. Dropping it ends the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scanner {
    state: ScanState,
    options: ScannerOptions,
}

impl Scanner {
    /// A scanner with default options and zero state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: ScannerOptions) -> Self {
        Self {
            state: ScanState::new(),
            options,
        }
    }

    #[must_use]
    pub fn options(&self) -> ScannerOptions {
        self.options
    }

    #[must_use]
    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Replaces the scan state, e.g. with one the host kept per position.
    pub fn set_state(&mut self, state: ScanState) {
        self.state = state;
    }

    /// Returns to the zero state.
    pub fn reset(&mut self) {
        self.state.clear();
    }

    /// The persisted form of the current state; always
    /// [`ScanState::SIZE`] bytes.
    #[must_use]
    pub fn serialize(&self) -> [u8; ScanState::SIZE] {
        self.state.to_bytes()
    }

    /// Writes the persisted state into a host buffer, returning the number
    /// of bytes written.
    pub fn serialize_into(&self, buf: &mut [u8]) -> usize {
        self.state.write_to(buf)
    }

    /// Restores a persisted state. Blobs of the wrong length, including the
    /// empty blob hosts pass at the start of a parse, reset to zero.
    pub fn deserialize(&mut self, bytes: &[u8]) {
        self.state = ScanState::from_bytes(bytes);
    }

    /// Commits at most one external token at the cursor.
    ///
    /// Returns the committed kind, or `None` to let the grammar's own
    /// tokenizer read from the cursor. Leading whitespace is skipped either
    /// way; nothing else is consumed on decline.
    pub fn scan<C: LexCursor + ?Sized>(
        &mut self,
        cursor: &mut C,
        accepted: TokenSet,
    ) -> Option<TokenKind> {
        self.skip_whitespace(cursor);
        let Some(ch) = cursor.lookahead() else {
            trace!("end of input");
            return None;
        };

        let decision = match ch {
            '<' => comment::probe_directive_open(cursor),
            '(' => self.open_paren(cursor, accepted),
            ')' => self.close_paren(cursor, accepted),
            '>' => self.greater_than(cursor, accepted),
            '=' => Self::equal(cursor, accepted),
            _ => None,
        };

        #[cfg(any(test, feature = "fuzzing"))]
        if let Some(kind) = decision {
            assert!(
                kind == TokenKind::Comment
                    || accepted.accepts(kind)
                    || (kind == TokenKind::GreaterThanOrEqualOperator
                        && accepted.accepts(TokenKind::GreaterThanOperator)),
                "Internal error: committed {kind} outside the accepted set {accepted:?}"
            );
        }

        match decision {
            Some(kind) => {
                cursor.commit(kind);
                trace!(?kind, depth = self.state.depth(), "commit");
            }
            None => {
                cursor.discard();
                trace!(?ch, depth = self.state.depth(), "decline");
            }
        }
        decision
    }

    fn skip_whitespace<C: LexCursor + ?Sized>(&self, cursor: &mut C) {
        while let Some(ch) = cursor.lookahead() {
            if !self.options.is_whitespace(ch) {
                break;
            }
            cursor.skip();
        }
    }

    // Look-ahead 0. Consumes `(` only when committing.
    fn open_paren<C: LexCursor + ?Sized>(
        &mut self,
        cursor: &mut C,
        accepted: TokenSet,
    ) -> Option<TokenKind> {
        if !accepted.accepts(TokenKind::OpenParen) {
            return None;
        }
        cursor.advance();
        self.state.open_paren();
        Some(TokenKind::OpenParen)
    }

    // Look-ahead 0. Consumes `)` only when committing.
    fn close_paren<C: LexCursor + ?Sized>(
        &mut self,
        cursor: &mut C,
        accepted: TokenSet,
    ) -> Option<TokenKind> {
        if !accepted.accepts(TokenKind::CloseParen) {
            return None;
        }
        cursor.advance();
        self.state.close_paren();
        Some(TokenKind::CloseParen)
    }

    // Look-ahead 1. A tag can only close outside every parenthesis group;
    // inside one, `>` is always a comparison.
    fn greater_than<C: LexCursor + ?Sized>(
        &self,
        cursor: &mut C,
        accepted: TokenSet,
    ) -> Option<TokenKind> {
        if accepted.accepts(TokenKind::DirectiveCloseTag) && !self.state.is_nested() {
            cursor.advance();
            return Some(TokenKind::DirectiveCloseTag);
        }
        if !accepted.accepts(TokenKind::GreaterThanOperator) {
            return None;
        }
        cursor.advance();
        if cursor.lookahead() == Some('=') {
            cursor.advance();
            Some(TokenKind::GreaterThanOrEqualOperator)
        } else {
            Some(TokenKind::GreaterThanOperator)
        }
    }

    // Look-ahead 1. `==` wins when accepted; otherwise a lone `=` is the
    // deprecated equality, leaving any second `=` for the next call.
    fn equal<C: LexCursor + ?Sized>(cursor: &mut C, accepted: TokenSet) -> Option<TokenKind> {
        cursor.advance();
        if cursor.lookahead() == Some('=') && accepted.accepts(TokenKind::EqualOperator) {
            cursor.advance();
            return Some(TokenKind::EqualOperator);
        }
        accepted
            .accepts(TokenKind::DeprecatedEqualOperator)
            .then_some(TokenKind::DeprecatedEqualOperator)
    }
}
