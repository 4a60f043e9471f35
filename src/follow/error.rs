//! Error types for the follow core

use std::fmt;

use crate::host::{ViewId, ViewKind};

/// A resolver could not map the current item to a source location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveError {
    message: String,
}

impl ResolveError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The cursor is not on an item the resolver understands
    pub fn no_item() -> Self {
        Self::new("no item at point")
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ResolveError {}

/// Errors raised by the follow core
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowError {
    /// No resolver can be determined for the view
    NoResolver {
        view: ViewId,
        kind: Option<ViewKind>,
    },
    /// The resolver failed; always recovered as "no match"
    Resolution(ResolveError),
    /// Mark requested with `begin > end`
    InvalidRange { begin: usize, end: usize },
    /// Post-command callback fired without a preceding pre-command
    OutOfSequence { view: ViewId },
    /// The host does not know this view
    UnknownView(ViewId),
    /// Configuration could not be loaded or parsed
    Config(String),
}

impl fmt::Display for FollowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FollowError::NoResolver {
                view,
                kind: Some(kind),
            } => write!(f, "No resolver for {} (kind '{}')", view, kind),
            FollowError::NoResolver { view, kind: None } => {
                write!(f, "No resolver for {} (no view kind)", view)
            }
            FollowError::Resolution(e) => write!(f, "No match: {}", e),
            FollowError::InvalidRange { begin, end } => {
                write!(f, "Invalid mark range [{}, {})", begin, end)
            }
            FollowError::OutOfSequence { view } => {
                write!(f, "Post-command without pre-command in {}", view)
            }
            FollowError::UnknownView(view) => write!(f, "Unknown view: {}", view),
            FollowError::Config(e) => write!(f, "Config error: {}", e),
        }
    }
}

impl std::error::Error for FollowError {}

impl From<ResolveError> for FollowError {
    fn from(e: ResolveError) -> Self {
        FollowError::Resolution(e)
    }
}
