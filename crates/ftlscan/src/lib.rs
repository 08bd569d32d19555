//! Context-sensitive token disambiguation for FreeMarker template grammars.
//!
//! A context-free grammar cannot tell whether `>` ends a directive tag or
//! compares two values, or whether `=` is the legacy equality or half of
//! `==`. This crate is the external scanner that makes those calls: the host
//! parser hands it a cursor and the set of tokens its current state accepts,
//! and the scanner commits one token or declines.
//!
//! ```rust
//! use ftlscan::{LexCursor, Scanner, SourceCursor, TokenKind, TokenSet};
//!
//! let src = "(x > 1)>";
//! let accepted = TokenSet::OPEN_PAREN
//!     | TokenSet::CLOSE_PAREN
//!     | TokenSet::GREATER_THAN_OPERATOR
//!     | TokenSet::DIRECTIVE_CLOSE_TAG;
//!
//! let mut scanner = Scanner::new();
//! let mut cursor = SourceCursor::new(src);
//! assert_eq!(scanner.scan(&mut cursor, accepted), Some(TokenKind::OpenParen));
//!
//! // `x` is the grammar's business.
//! assert_eq!(scanner.scan(&mut cursor, accepted), None);
//! cursor.advance();
//! cursor.commit_span();
//!
//! // Inside the group, `>` is a comparison...
//! assert_eq!(scanner.scan(&mut cursor, accepted), Some(TokenKind::GreaterThanOperator));
//! assert_eq!(scanner.scan(&mut cursor, accepted), None);
//! cursor.advance();
//! cursor.commit_span();
//! assert_eq!(scanner.scan(&mut cursor, accepted), Some(TokenKind::CloseParen));
//!
//! // ...and outside it, the end of the tag.
//! assert_eq!(scanner.scan(&mut cursor, accepted), Some(TokenKind::DirectiveCloseTag));
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod cursor;
mod error;
mod options;
mod scanner;
mod state;
mod token;

#[cfg(feature = "ffi")]
pub mod ffi;

#[cfg(test)]
mod tests;

pub use cursor::{CharInfo, LexCursor, Position, SourceCursor};
pub use error::{RestoreError, UnknownTokenKind};
pub use options::ScannerOptions;
pub use scanner::Scanner;
pub use state::ScanState;
pub use token::{Span, Token, TokenKind, TokenSet};
