//! Error taxonomy shared across the container/decryption layer and the asset decoders.
//!
//! Kept as a plain enum with a hand-written `Display`, the same shape the teacher uses
//! for `DecryptionError` — no `thiserror` dependency.

use std::fmt;

/// The kind of failure that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A reader walked past the end of its buffer.
    Truncated,
    /// A section or file tag did not match what was expected.
    BadMagic,
    /// A format variant, common-key index, or codec is not supported.
    UnsupportedFormat,
    /// A compression stream produced fewer or more bytes than declared.
    MalformedStream,
    /// AES/ticket decryption failed or used the wrong key.
    DecryptFailure,
    /// No content in the WAD scored above zero during meta-archive selection.
    NoRenderable,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Truncated => "truncated input",
            ErrorKind::BadMagic => "unexpected magic",
            ErrorKind::UnsupportedFormat => "unsupported format",
            ErrorKind::MalformedStream => "malformed compressed stream",
            ErrorKind::DecryptFailure => "decryption failed",
            ErrorKind::NoRenderable => "no renderable archive found",
        };
        f.write_str(s)
    }
}

/// An error produced by the container/decryption layer or an asset decoder.
#[derive(Debug, Clone)]
pub struct BannerError {
    /// The kind of failure.
    pub kind: ErrorKind,
    /// A short human-readable description, e.g. the section tag or offset involved.
    pub context: String,
}

impl BannerError {
    /// Build a new error of the given kind with a context string.
    pub fn new(kind: ErrorKind, context: impl Into<String>) -> Self {
        Self {
            kind,
            context: context.into(),
        }
    }

    /// Shorthand for [`ErrorKind::Truncated`].
    pub fn truncated(context: impl Into<String>) -> Self {
        Self::new(ErrorKind::Truncated, context)
    }

    /// Shorthand for [`ErrorKind::BadMagic`].
    pub fn bad_magic(context: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadMagic, context)
    }

    /// Shorthand for [`ErrorKind::UnsupportedFormat`].
    pub fn unsupported(context: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedFormat, context)
    }

    /// Shorthand for [`ErrorKind::MalformedStream`].
    pub fn malformed_stream(context: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedStream, context)
    }

    /// Shorthand for [`ErrorKind::DecryptFailure`].
    pub fn decrypt_failure(context: impl Into<String>) -> Self {
        Self::new(ErrorKind::DecryptFailure, context)
    }

    /// Shorthand for [`ErrorKind::NoRenderable`].
    pub fn no_renderable(context: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoRenderable, context)
    }
}

impl fmt::Display for BannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.context)
    }
}

impl std::error::Error for BannerError {}

/// Convenience alias for fallible decode operations.
pub type Result<T> = std::result::Result<T, BannerError>;
