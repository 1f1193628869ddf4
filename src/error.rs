use thiserror::Error;

/// Error types for skeleton construction and validation
#[derive(Error, Debug)]
pub enum PoseError {
    /// A bone references a parent index outside the bone array
    #[error("bone {bone} references invalid parent index {parent}")]
    InvalidParent { bone: usize, parent: usize },

    /// A bone is its own ancestor
    #[error("bone {bone} is part of a parent cycle")]
    ParentCycle { bone: usize },
}

/// Result type using PoseError
pub type Result<T> = std::result::Result<T, PoseError>;
