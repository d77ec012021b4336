//! Error types for tree resolution.
//!
//! This module defines the structured errors raised while resolving a layered
//! configuration tree: lookups that match no assignment, traversals through
//! undefined data, rejected structural mutation, and guarded reference
//! recursion.

use thiserror::Error;

/// Structured error types for resolution operations.
///
/// Each variant carries the display form of the path it was raised for so
/// callers can report the failing location without threading path state
/// through every layer.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No assignment exists at the queried path, any of its ancestors, or any
    /// of its descendants.
    #[error("no value found at path {path}")]
    NotFound { path: String },

    /// The accumulated result exists but is undefined partway through the
    /// requested path's walk.
    #[error("attempted to read value of undefined at {path}")]
    UndefinedTraversal { path: String },

    /// A caller attempted to mutate the tree structurally through a cursor
    /// instead of layering a new assignment with `set`.
    #[error("cannot mutate {path} directly, layer a new value with set() instead")]
    MutationRejected { path: String },

    /// Cross-reference resolution exceeded the fixed depth bound, which means
    /// an assignment (directly or indirectly) depends on resolving itself.
    #[error("reference resolution exceeded depth {limit} at {path}")]
    RecursionLimit { path: String, limit: usize },
}

impl ResolveError {
    /// Check if this error indicates no assignment matched the queried path.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::NotFound { .. })
    }

    /// Check if this error was raised during the extraction walk.
    pub fn is_undefined_traversal(&self) -> bool {
        matches!(self, ResolveError::UndefinedTraversal { .. })
    }

    /// Check if this error was raised by a rejected structural mutation.
    pub fn is_mutation_rejected(&self) -> bool {
        matches!(self, ResolveError::MutationRejected { .. })
    }

    /// Check if this error was raised by the reference recursion guard.
    pub fn is_recursion_limit(&self) -> bool {
        matches!(self, ResolveError::RecursionLimit { .. })
    }

    /// Get the path this error was raised for.
    pub fn path(&self) -> &str {
        match self {
            ResolveError::NotFound { path }
            | ResolveError::UndefinedTraversal { path }
            | ResolveError::MutationRejected { path }
            | ResolveError::RecursionLimit { path, .. } => path,
        }
    }
}

// Conversion from ResolveError to the main Error type
impl From<ResolveError> for crate::Error {
    fn from(err: ResolveError) -> Self {
        crate::Error::Resolve(err)
    }
}
