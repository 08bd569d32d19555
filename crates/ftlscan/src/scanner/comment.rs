//! `<#-- ... -->` recognition.
//!
//! Comments are scanned atomically: either the whole construct up to and
//! including the first `-->` after the opening marker becomes one token, or
//! nothing is committed. There is no nesting; an inner `<#--` is content.

use crate::{cursor::LexCursor, token::TokenKind};

/// Probes a `<` for the start of a comment.
///
/// Look-ahead: 2 code points past `<`. Consumes `<`, then `#` if present.
/// Returns `None` for anything other than `<#-`, leaving the caller to
/// discard what was consumed.
pub(super) fn probe_directive_open<C: LexCursor + ?Sized>(cursor: &mut C) -> Option<TokenKind> {
    debug_assert_eq!(cursor.lookahead(), Some('<'));
    cursor.advance();
    if !eat(cursor, '#') || cursor.lookahead() != Some('-') {
        return None;
    }
    scan_comment(cursor)
}

/// Scans from just after `<#` to the end of the closing `-->`.
///
/// Both opening dashes are required. Dashes of the opening marker never
/// count toward the close, so `<#--->` is unterminated while `<#---->` is an
/// empty comment. Returns `None` if input ends first.
pub(super) fn scan_comment<C: LexCursor + ?Sized>(cursor: &mut C) -> Option<TokenKind> {
    if !(eat(cursor, '-') && eat(cursor, '-')) {
        return None;
    }
    let mut dashes = 0usize;
    while let Some(ch) = cursor.lookahead() {
        cursor.advance();
        match ch {
            '-' => dashes += 1,
            '>' if dashes >= 2 => return Some(TokenKind::Comment),
            _ => dashes = 0,
        }
    }
    None
}

#[inline]
fn eat<C: LexCursor + ?Sized>(cursor: &mut C, expected: char) -> bool {
    if cursor.lookahead() == Some(expected) {
        cursor.advance();
        true
    } else {
        false
    }
}
