use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScxError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    OutOfData,
    VersionMismatch,
    FormatViolation,
    DecompressionError,
    Io,
}

#[derive(Debug, Error)]
pub enum ScxError {
    #[error("out of data at offset {offset}: needed {needed} bytes, {available} available")]
    OutOfData {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("unsupported {what} version {found}, expected {expected}")]
    VersionMismatch {
        what: &'static str,
        expected: String,
        found: String,
    },

    #[error("format violation: {0}")]
    FormatViolation(String),

    #[error("deflate stream error: {0}")]
    Decompression(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ScxError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::OutOfData { .. } => ErrorCode::OutOfData,
            Self::VersionMismatch { .. } => ErrorCode::VersionMismatch,
            Self::FormatViolation(_) => ErrorCode::FormatViolation,
            Self::Decompression(_) => ErrorCode::DecompressionError,
            Self::Io(_) => ErrorCode::Io,
        }
    }

    pub(crate) fn violation(message: impl Into<String>) -> Self {
        Self::FormatViolation(message.into())
    }
}
