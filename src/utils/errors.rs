use std::fmt;
use std::error::Error;

/// Represents errors that can occur when querying a Barnes-Hut tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeError {
    /// A required argument was missing or unusable.
    InvalidArgument(String),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TreeError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl Error for TreeError {}
