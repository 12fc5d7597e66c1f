//! Error types for the rigid link layer.
//!
//! This module provides a unified error type [`LinkError`] and a convenient [`Result`] alias.

use std::fmt;

/// Main error type for load-time and reconfiguration failures.
///
/// Per-step operations never return this type: lookups yield `Option` and
/// removals of absent entries are no-ops.
#[derive(Debug)]
pub enum LinkError {
    /// Two collisions in the same link share a name.
    DuplicateCollisionName(String),
    /// A description node is missing required data or carries invalid values.
    MalformedDescription(String),
    /// `load` was called on a link that already finished loading.
    AlreadyLoaded(String),
    /// A message addressed a different link.
    IdMismatch { expected: String, found: String },
    /// A message was produced by a newer schema than this crate understands.
    UnsupportedVersion(u32),
    /// The backend does not provide the requested capability.
    Unsupported(&'static str),
    /// Encoding or decoding a message or description failed.
    Codec(serde_json::Error),
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::DuplicateCollisionName(name) => write!(f, "Duplicate collision name: {name}"),
            Self::MalformedDescription(msg) => write!(f, "Malformed description: {msg}"),
            Self::AlreadyLoaded(name) => write!(f, "Link already loaded: {name}"),
            Self::IdMismatch { expected, found } => {
                write!(f, "Message id mismatch: expected {expected}, found {found}")
            }
            Self::UnsupportedVersion(version) => {
                write!(f, "Unsupported message version: {version}")
            }
            Self::Unsupported(capability) => write!(f, "Unsupported capability: {capability}"),
            Self::Codec(err) => write!(f, "Codec error: {err}"),
        }
    }
}

impl std::error::Error for LinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Codec(err) => Some(err),
            _ => None,
        }
    }
}

/// Convenient Result type alias for link operations.
pub type Result<T> = std::result::Result<T, LinkError>;

impl From<serde_json::Error> for LinkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Codec(err)
    }
}
