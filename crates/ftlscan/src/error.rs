use alloc::string::String;

use thiserror::Error;

/// A persisted scan state could not be restored.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreError {
    #[error("persisted scan state is {found} bytes, expected {expected}")]
    LengthMismatch { expected: usize, found: usize },
}

/// A token kind lookup by ordinal or grammar symbol name failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnknownTokenKind {
    #[error("no external token at ordinal {0}")]
    Ordinal(u16),
    #[error("no external token named `{0}`")]
    Name(String),
}
