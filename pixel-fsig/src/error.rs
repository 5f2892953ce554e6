//! Error taxonomy for the Pixel forward-secure signature scheme.

/// Errors returned by the public API.
///
/// Signature rejection is never reported through this type — `verify`
/// always returns a plain `bool` (see [`crate::sign::verify`]).
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum PixelError {
    /// The secret key has advanced through every time period it supports
    /// (`keyupdate` was called `2^D - 1` times).
    #[error("key exhausted: no further time period is available")]
    KeyExhausted,

    /// A time period or time vector was out of range, or `keyfupdate` was
    /// asked to move to a time that is not strictly in the future.
    #[error("invalid time: {0}")]
    InvalidTime(String),

    /// The public parameters are malformed or inconsistent with the
    /// requested depth.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// A deserialized group element failed a subgroup-membership check.
    #[error("invalid group element: {0}")]
    InvalidGroupElement(String),
}
