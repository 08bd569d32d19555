//! Tree-sitter external scanner entry points.
//!
//! A parser generated from the FreeMarker grammar links against these five
//! symbols. Each payload pointer owns one boxed [`Scanner`]; tree-sitter
//! never shares a payload between threads.
//!
//! Tree-sitter rewinds its lexer itself when `scan` returns `false`, so the
//! cursor adapter's `discard` does nothing.

use alloc::boxed::Box;
use core::{
    ffi::{c_char, c_uint, c_void},
    ptr, slice,
};

use crate::{
    cursor::LexCursor,
    scanner::Scanner,
    state::ScanState,
    token::{TokenKind, TokenSet},
};

/// Mirror of tree-sitter's `TSLexer` (`tree_sitter/parser.h`).
///
/// Only `advance`, `eof`, `lookahead` and `result_symbol` are used; the
/// remaining callbacks are kept for layout.
#[repr(C)]
pub struct TSLexer {
    pub lookahead: i32,
    pub result_symbol: u16,
    pub advance: unsafe extern "C" fn(*mut TSLexer, bool),
    pub mark_end: Option<unsafe extern "C" fn(*mut TSLexer)>,
    pub get_column: Option<unsafe extern "C" fn(*mut TSLexer) -> u32>,
    pub is_at_included_range_start: Option<unsafe extern "C" fn(*const TSLexer) -> bool>,
    pub eof: unsafe extern "C" fn(*const TSLexer) -> bool,
    /// Variadic `log` callback; never called.
    pub log: *const c_void,
}

struct TsCursor {
    lexer: *mut TSLexer,
}

impl LexCursor for TsCursor {
    fn lookahead(&self) -> Option<char> {
        // SAFETY: `lexer` is the live lexer tree-sitter passed to `scan`.
        let (eof, lookahead) = unsafe { ((*self.lexer).eof, (*self.lexer).lookahead) };
        // SAFETY: as above; `eof` only reads the lexer.
        if unsafe { eof(self.lexer) } {
            return None;
        }
        Some(
            u32::try_from(lookahead)
                .ok()
                .and_then(char::from_u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER),
        )
    }

    fn advance(&mut self) {
        // SAFETY: `lexer` is the live lexer tree-sitter passed to `scan`.
        unsafe {
            let advance = (*self.lexer).advance;
            advance(self.lexer, false);
        }
    }

    fn skip(&mut self) {
        // SAFETY: `lexer` is the live lexer tree-sitter passed to `scan`.
        unsafe {
            let advance = (*self.lexer).advance;
            advance(self.lexer, true);
        }
    }

    fn commit(&mut self, kind: TokenKind) {
        // SAFETY: `lexer` is the live lexer tree-sitter passed to `scan`.
        unsafe { (*self.lexer).result_symbol = kind.ordinal() };
    }

    fn discard(&mut self) {}
}

/// Allocates a zero-state scanner.
#[unsafe(no_mangle)]
pub extern "C" fn tree_sitter_freemarker_external_scanner_create() -> *mut c_void {
    Box::into_raw(Box::new(Scanner::new())).cast()
}

/// Frees a scanner created by
/// [`tree_sitter_freemarker_external_scanner_create`].
///
/// # Safety
///
/// `payload` must be null or a pointer returned by `create` that has not
/// been destroyed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tree_sitter_freemarker_external_scanner_destroy(payload: *mut c_void) {
    if payload.is_null() {
        return;
    }
    // SAFETY: per the contract, `payload` came from `Box::into_raw`.
    drop(unsafe { Box::from_raw(payload.cast::<Scanner>()) });
}

/// Writes the scan state into `buffer` and returns its length.
///
/// # Safety
///
/// `payload` must be a live scanner and `buffer` must be valid for
/// [`ScanState::SIZE`] bytes of writes (tree-sitter provides 1024).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tree_sitter_freemarker_external_scanner_serialize(
    payload: *mut c_void,
    buffer: *mut c_char,
) -> c_uint {
    // SAFETY: per the contract, `payload` is a live scanner.
    let scanner = unsafe { &*payload.cast::<Scanner>() };
    let bytes = scanner.serialize();
    // SAFETY: per the contract, `buffer` holds at least `bytes.len()` bytes.
    unsafe { ptr::copy_nonoverlapping(bytes.as_ptr(), buffer.cast::<u8>(), bytes.len()) };
    c_uint::try_from(bytes.len()).unwrap_or(0)
}

/// Restores the scan state; any length other than [`ScanState::SIZE`]
/// resets it.
///
/// # Safety
///
/// `payload` must be a live scanner and `buffer` must be valid for `length`
/// bytes of reads (or `length` must be 0).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tree_sitter_freemarker_external_scanner_deserialize(
    payload: *mut c_void,
    buffer: *const c_char,
    length: c_uint,
) {
    // SAFETY: per the contract, `payload` is a live scanner.
    let scanner = unsafe { &mut *payload.cast::<Scanner>() };
    let bytes: &[u8] = if buffer.is_null() || length == 0 {
        &[]
    } else {
        // SAFETY: per the contract, `buffer` holds `length` readable bytes.
        unsafe { slice::from_raw_parts(buffer.cast::<u8>(), length as usize) }
    };
    scanner.deserialize(bytes);
}

/// Runs the scanner at the lexer's position.
///
/// # Safety
///
/// `payload` must be a live scanner, `lexer` a live tree-sitter lexer and
/// `valid_symbols` must point to one `bool` per external token
/// ([`TokenKind::COUNT`]).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tree_sitter_freemarker_external_scanner_scan(
    payload: *mut c_void,
    lexer: *mut TSLexer,
    valid_symbols: *const bool,
) -> bool {
    // SAFETY: per the contract, `payload` is a live scanner.
    let scanner = unsafe { &mut *payload.cast::<Scanner>() };
    // SAFETY: per the contract, `valid_symbols` has one entry per kind.
    let valid = unsafe { slice::from_raw_parts(valid_symbols, TokenKind::COUNT) };
    let mut cursor = TsCursor { lexer };
    scanner
        .scan(&mut cursor, TokenSet::from_valid_symbols(valid))
        .is_some()
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    /// A `TSLexer` over a char vector, laid out so the lexer pointer doubles
    /// as a pointer to the mock.
    #[repr(C)]
    struct MockLexer {
        base: TSLexer,
        input: Vec<char>,
        pos: usize,
        token_start: usize,
    }

    unsafe extern "C" fn mock_advance(lexer: *mut TSLexer, skip: bool) {
        // SAFETY: only ever called with the `base` of a `MockLexer`.
        let mock = unsafe { &mut *lexer.cast::<MockLexer>() };
        if mock.pos < mock.input.len() {
            mock.pos += 1;
            if skip {
                mock.token_start = mock.pos;
            }
        }
        mock.base.lookahead = mock.input.get(mock.pos).map_or(0, |&c| c as i32);
    }

    unsafe extern "C" fn mock_eof(lexer: *const TSLexer) -> bool {
        // SAFETY: only ever called with the `base` of a `MockLexer`.
        let mock = unsafe { &*lexer.cast::<MockLexer>() };
        mock.pos >= mock.input.len()
    }

    impl MockLexer {
        fn new(src: &str) -> Self {
            let input: Vec<char> = src.chars().collect();
            Self {
                base: TSLexer {
                    lookahead: input.first().map_or(0, |&c| c as i32),
                    result_symbol: u16::MAX,
                    advance: mock_advance,
                    mark_end: None,
                    get_column: None,
                    is_at_included_range_start: None,
                    eof: mock_eof,
                    log: ptr::null(),
                },
                input,
                pos: 0,
                token_start: 0,
            }
        }

        fn as_lexer(&mut self) -> *mut TSLexer {
            ptr::from_mut(self).cast()
        }
    }

    fn valid(kinds: &[TokenKind]) -> [bool; TokenKind::COUNT] {
        let mut out = [false; TokenKind::COUNT];
        for kind in kinds {
            out[usize::from(kind.ordinal())] = true;
        }
        out
    }

    #[test]
    fn scan_through_c_abi() {
        let payload = tree_sitter_freemarker_external_scanner_create();
        let mut mock = MockLexer::new("  (a > b)");
        let valid = valid(&[
            TokenKind::OpenParen,
            TokenKind::DirectiveCloseTag,
            TokenKind::GreaterThanOperator,
        ]);

        // SAFETY: live payload, live mock lexer, full valid_symbols array.
        let found = unsafe {
            tree_sitter_freemarker_external_scanner_scan(payload, mock.as_lexer(), valid.as_ptr())
        };
        assert!(found);
        assert_eq!(mock.base.result_symbol, TokenKind::OpenParen.ordinal());
        assert_eq!((mock.token_start, mock.pos), (2, 3));

        // Jump to the `>` the way a host resumes elsewhere.
        mock.pos = 5;
        mock.token_start = 5;
        mock.base.lookahead = '>' as i32;
        // SAFETY: as above.
        let found = unsafe {
            tree_sitter_freemarker_external_scanner_scan(payload, mock.as_lexer(), valid.as_ptr())
        };
        assert!(found);
        assert_eq!(
            mock.base.result_symbol,
            TokenKind::GreaterThanOperator.ordinal()
        );

        // SAFETY: `payload` came from `create`.
        unsafe { tree_sitter_freemarker_external_scanner_destroy(payload) };
    }

    #[test]
    fn serialize_round_trip_through_c_abi() {
        let payload = tree_sitter_freemarker_external_scanner_create();
        let mut mock = MockLexer::new("((");
        let valid = valid(&[TokenKind::OpenParen]);
        for _ in 0..2 {
            // SAFETY: live payload, live mock lexer, full valid_symbols array.
            assert!(unsafe {
                tree_sitter_freemarker_external_scanner_scan(
                    payload,
                    mock.as_lexer(),
                    valid.as_ptr(),
                )
            });
        }

        let mut buffer = [0 as c_char; 1024];
        // SAFETY: live payload, 1024-byte buffer.
        let len = unsafe {
            tree_sitter_freemarker_external_scanner_serialize(payload, buffer.as_mut_ptr())
        };
        assert_eq!(len as usize, ScanState::SIZE);

        let other = tree_sitter_freemarker_external_scanner_create();
        // SAFETY: live payload, `len` readable bytes.
        unsafe { tree_sitter_freemarker_external_scanner_deserialize(other, buffer.as_ptr(), len) };
        // SAFETY: `other` is live and not aliased.
        assert_eq!(unsafe { &*other.cast::<Scanner>() }.state().depth(), 2);

        // SAFETY: a null buffer with zero length resets the state.
        unsafe { tree_sitter_freemarker_external_scanner_deserialize(other, ptr::null(), 0) };
        // SAFETY: as above.
        assert_eq!(unsafe { &*other.cast::<Scanner>() }.state().depth(), 0);

        // SAFETY: both payloads came from `create`.
        unsafe {
            tree_sitter_freemarker_external_scanner_destroy(payload);
            tree_sitter_freemarker_external_scanner_destroy(other);
        }
    }
}
