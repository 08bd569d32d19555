/// Configuration options for the external scanner.
///
/// The grammar is compiled against one scanner behavior; these options only
/// exist for hosts that feed the scanner text the grammar treats differently
/// (for example, templates with non-ASCII indentation).
///
/// # Examples
///
/// ```rust
/// use ftlscan::{Scanner, ScannerOptions};
///
/// let options = ScannerOptions {
///     allow_unicode_whitespace: true,
/// };
/// let scanner = Scanner::with_options(options);
/// assert!(scanner.options().allow_unicode_whitespace);
/// ```
///
/// # Default
///
/// All options default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScannerOptions {
    /// Whether to skip any Unicode whitespace before a token.
    ///
    /// By default, the scanner only skips the six ASCII characters of the C
    /// `isspace` class: space (U+0020), horizontal tab (U+0009), line feed
    /// (U+000A), vertical tab (U+000B), form feed (U+000C) and carriage
    /// return (U+000D).
    ///
    /// # Default
    ///
    /// `false`
    pub allow_unicode_whitespace: bool,
}

impl ScannerOptions {
    #[inline]
    pub(crate) fn is_whitespace(self, ch: char) -> bool {
        if self.allow_unicode_whitespace {
            ch.is_whitespace()
        } else {
            matches!(ch, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
        }
    }
}
