//! Error types for the content store

use thiserror::Error;

/// Errors returned by every content store operation
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record backs the slug
    #[error("post not found: {slug}")]
    NotFound { slug: String },

    /// The slug is already taken by another record
    #[error("a post with slug '{slug}' already exists; change the title or pick another slug")]
    Conflict { slug: String },

    /// The slug is empty or not usable as a flat file name
    #[error("invalid slug '{slug}': {reason}")]
    InvalidSlug { slug: String, reason: String },

    /// The record exists but its front-matter cannot be read
    #[error("invalid front matter in '{slug}': {source}")]
    InvalidFrontMatter {
        slug: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Front-matter could not be serialized
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Underlying filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`StoreError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Invalid,
    Storage,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::Conflict { .. } => ErrorKind::Conflict,
            StoreError::InvalidSlug { .. } | StoreError::InvalidFrontMatter { .. } => {
                ErrorKind::Invalid
            }
            StoreError::Yaml(_) | StoreError::Io(_) => ErrorKind::Storage,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
