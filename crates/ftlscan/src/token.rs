//! External token kinds and the per-call accepted set.
//!
//! The grammar declares its externally scanned symbols in one fixed order and
//! hands the scanner a positional `bool` vector on every call. `TokenKind`
//! ordinals are that order; reordering either side silently breaks
//! disambiguation.

use alloc::{
    format,
    string::{String, ToString},
};
use core::{fmt, str::FromStr};

use bitflags::bitflags;

use crate::error::UnknownTokenKind;

/// One of the eight tokens this engine disambiguates.
///
/// The discriminant is the token's position in the grammar's `externals`
/// list.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// `>` ending a directive tag such as `<#if x>`.
    DirectiveCloseTag = 0,
    /// `>` used as a comparison.
    GreaterThanOperator = 1,
    /// `(`; opens a group and raises the paren depth.
    OpenParen = 2,
    /// `)`; closes a group and lowers the paren depth.
    CloseParen = 3,
    /// `>=`.
    GreaterThanOrEqualOperator = 4,
    /// A single `=` used as equality, kept for old templates.
    DeprecatedEqualOperator = 5,
    /// `==`.
    EqualOperator = 6,
    /// `<#-- ... -->`.
    Comment = 7,
}

impl TokenKind {
    /// Number of external tokens the grammar declares.
    pub const COUNT: usize = 8;

    /// Every kind, in ordinal order.
    pub const ALL: [TokenKind; Self::COUNT] = [
        TokenKind::DirectiveCloseTag,
        TokenKind::GreaterThanOperator,
        TokenKind::OpenParen,
        TokenKind::CloseParen,
        TokenKind::GreaterThanOrEqualOperator,
        TokenKind::DeprecatedEqualOperator,
        TokenKind::EqualOperator,
        TokenKind::Comment,
    ];

    /// Position of this kind in the grammar's `externals` list.
    #[must_use]
    pub const fn ordinal(self) -> u16 {
        self as u16
    }

    /// Looks a kind up by its `externals` position.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownTokenKind::Ordinal`] for positions past the end of
    /// the list.
    pub fn from_ordinal(ordinal: u16) -> Result<Self, UnknownTokenKind> {
        Self::ALL
            .get(usize::from(ordinal))
            .copied()
            .ok_or(UnknownTokenKind::Ordinal(ordinal))
    }

    /// The symbol name used for this token in the grammar. Hidden symbols
    /// carry a leading underscore.
    #[must_use]
    pub const fn grammar_name(self) -> &'static str {
        match self {
            TokenKind::DirectiveCloseTag => "_directive_close_tag",
            TokenKind::GreaterThanOperator => "_greater_than_operator",
            TokenKind::OpenParen => "_open_paren",
            TokenKind::CloseParen => "_close_paren",
            TokenKind::GreaterThanOrEqualOperator => "_greater_than_equal_operator",
            TokenKind::DeprecatedEqualOperator => "deprecated_equal_operator",
            TokenKind::EqualOperator => "_equal_operator",
            TokenKind::Comment => "comment",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.grammar_name())
    }
}

impl FromStr for TokenKind {
    type Err = UnknownTokenKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.grammar_name() == s)
            .ok_or_else(|| UnknownTokenKind::Name(s.to_string()))
    }
}

impl TryFrom<u16> for TokenKind {
    type Error = UnknownTokenKind;

    fn try_from(ordinal: u16) -> Result<Self, Self::Error> {
        Self::from_ordinal(ordinal)
    }
}

bitflags! {
    /// The token kinds the grammar accepts at the current parse position.
    ///
    /// Bit `n` is the kind with ordinal `n`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TokenSet: u8 {
        const DIRECTIVE_CLOSE_TAG = 1 << 0;
        const GREATER_THAN_OPERATOR = 1 << 1;
        const OPEN_PAREN = 1 << 2;
        const CLOSE_PAREN = 1 << 3;
        const GREATER_THAN_OR_EQUAL_OPERATOR = 1 << 4;
        const DEPRECATED_EQUAL_OPERATOR = 1 << 5;
        const EQUAL_OPERATOR = 1 << 6;
        const COMMENT = 1 << 7;
    }
}

impl TokenSet {
    /// The set holding only `kind`.
    #[must_use]
    pub const fn of(kind: TokenKind) -> Self {
        Self::from_bits_retain(1 << kind.ordinal())
    }

    /// Builds the set from the grammar's positional `valid_symbols` vector.
    ///
    /// Entries past [`TokenKind::COUNT`] are ignored and missing entries
    /// count as not accepted.
    #[must_use]
    pub fn from_valid_symbols(valid: &[bool]) -> Self {
        TokenKind::ALL
            .into_iter()
            .zip(valid)
            .filter(|&(_, &ok)| ok)
            .map(|(kind, _)| kind)
            .collect()
    }

    /// Whether the grammar accepts `kind` here.
    #[inline]
    #[must_use]
    pub const fn accepts(self, kind: TokenKind) -> bool {
        self.contains(Self::of(kind))
    }

    /// Iterates the accepted kinds in ordinal order.
    pub fn kinds(self) -> impl Iterator<Item = TokenKind> {
        TokenKind::ALL
            .into_iter()
            .filter(move |&kind| self.accepts(kind))
    }
}

impl From<TokenKind> for TokenSet {
    fn from(kind: TokenKind) -> Self {
        Self::of(kind)
    }
}

impl FromIterator<TokenKind> for TokenSet {
    fn from_iter<I: IntoIterator<Item = TokenKind>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |set, kind| set | Self::of(kind))
    }
}

/// Half-open byte range into the scanned source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.end <= self.start
    }

    /// The spanned text, or `None` if the span does not fall on char
    /// boundaries of `src`.
    #[must_use]
    pub fn slice(self, src: &str) -> Option<&str> {
        src.get(self.start..self.end)
    }
}

/// A committed external token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Renders the token as `kind "text"` for diagnostics and snapshots.
    #[must_use]
    pub fn describe(&self, src: &str) -> String {
        let text = self.span.slice(src).unwrap_or("<invalid span>");
        format!("{:?} {text:?}", self.kind)
    }
}
