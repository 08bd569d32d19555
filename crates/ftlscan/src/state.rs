//! Scan state carried between scanner calls.
//!
//! The host pauses and resumes lexing at arbitrary points (incremental
//! reparses jump the cursor elsewhere), so the only state that survives is
//! what it stores through [`ScanState::to_bytes`] and restores through
//! [`ScanState::from_bytes`].
//!
//! Layout: `parenthesis_depth` as a little-endian `u64`, nothing else. A
//! blob of any other length restores to the zero state; hosts hand over an
//! empty blob at the start of a parse and expect exactly that.

use tracing::debug;

use crate::error::RestoreError;

/// Cross-call lexical state of one parsing session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanState {
    // Overflow needs at least u64::MAX open parens in one file.
    parenthesis_depth: u64,
}

impl ScanState {
    /// Size in bytes of the persisted form.
    pub const SIZE: usize = core::mem::size_of::<u64>();

    /// The zero state a session starts from.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            parenthesis_depth: 0,
        }
    }

    /// A state nested `depth` groups deep.
    #[must_use]
    pub const fn with_depth(depth: u64) -> Self {
        Self {
            parenthesis_depth: depth,
        }
    }

    /// Number of currently open parenthesis groups.
    #[inline]
    #[must_use]
    pub const fn depth(&self) -> u64 {
        self.parenthesis_depth
    }

    /// Whether the scanner sits inside at least one parenthesis group.
    #[inline]
    #[must_use]
    pub const fn is_nested(&self) -> bool {
        self.parenthesis_depth > 0
    }

    #[inline]
    pub(crate) fn open_paren(&mut self) {
        self.parenthesis_depth = self.parenthesis_depth.saturating_add(1);
    }

    /// Lowers the depth; a stray `)` at depth zero leaves it at zero.
    #[inline]
    pub(crate) fn close_paren(&mut self) {
        self.parenthesis_depth = self.parenthesis_depth.saturating_sub(1);
    }

    /// Resets to the zero state.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// The persisted form of this state.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; Self::SIZE] {
        self.parenthesis_depth.to_le_bytes()
    }

    /// Writes the persisted form into the front of `buf` and returns the
    /// number of bytes written.
    ///
    /// Returns 0 and writes nothing when `buf` is shorter than
    /// [`ScanState::SIZE`]; restoring an empty blob yields the zero state.
    pub fn write_to(&self, buf: &mut [u8]) -> usize {
        let Some(dst) = buf.get_mut(..Self::SIZE) else {
            debug!(capacity = buf.len(), "scan state buffer too small");
            return 0;
        };
        dst.copy_from_slice(&self.to_bytes());
        Self::SIZE
    }

    /// Restores a persisted state.
    ///
    /// A blob of the wrong length (including an empty one) produces the
    /// zero state.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match Self::try_from_bytes(bytes) {
            Ok(state) => state,
            Err(err) => {
                if !bytes.is_empty() {
                    debug!(%err, "discarding persisted scan state");
                }
                Self::new()
            }
        }
    }

    /// Restores a persisted state, reporting blobs of the wrong length.
    ///
    /// # Errors
    ///
    /// Returns [`RestoreError::LengthMismatch`] unless `bytes` is exactly
    /// [`ScanState::SIZE`] long.
    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self, RestoreError> {
        let raw: [u8; Self::SIZE] = bytes.try_into().map_err(|_| RestoreError::LengthMismatch {
            expected: Self::SIZE,
            found: bytes.len(),
        })?;
        Ok(Self {
            parenthesis_depth: u64::from_le_bytes(raw),
        })
    }
}
