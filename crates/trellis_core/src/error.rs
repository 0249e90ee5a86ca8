//! Error types for trellis

use thiserror::Error;

/// Errors from structural tree operations
///
/// Producer-side update notification never fails; these only surface from
/// operations a caller can misuse (attaching, detaching, lookups).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Attaching the widget would make it its own ancestor
    #[error("widget {child} cannot be attached beneath {parent}: it is an ancestor of the parent")]
    Cycle {
        /// Widget that was about to become the parent
        parent: u64,
        /// Widget that was about to become the child
        child: u64,
    },

    /// The widget is not a child of the given parent
    #[error("widget {child} is not a child of {parent}")]
    NotAChild {
        /// Parent the caller named
        parent: u64,
        /// Widget the caller expected to find
        child: u64,
    },

    /// No widget with this id is registered in the tree
    #[error("unknown widget: {0}")]
    UnknownWidget(u64),

    /// Child index out of range
    #[error("child index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of children
        len: usize,
    },

    /// The tree has been closed
    #[error("tree is closed")]
    Closed,
}

/// Errors from loading runtime configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for the expected schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of its allowed range
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Result type for structural tree operations
pub type Result<T> = std::result::Result<T, TreeError>;
