//! Strata: a lazy, declarative, layered configuration-tree resolution engine.
//!
//! Callers declare a tree of values across weighted layers: literal values,
//! deferred computations, cross-references into the same or another tree,
//! and conditionally-included overrides. Nothing is computed eagerly: `set`
//! records assignments against paths, and only `get`/`resolve` flattens them
//! into a concrete value.
//!
//! ## Core Concepts
//!
//! * **Tree ([`Tree`])**: one logical configuration document, backed by an
//!   append-only store of leaf-level assignments.
//! * **Assignments**: each `set` call decomposes its structured value into
//!   one record per leaf, tagged with a weight (merge precedence), an
//!   optional force flag (full-result override), and an optional condition.
//! * **Resolution**: `get(path)` collects every assignment relevant to the
//!   path, applies them in weight order, and deep-merges the results: maps
//!   merge key-wise, lists concatenate, scalars are replaced by later
//!   layers. Resolution is async and re-runs from scratch on every call.
//! * **Cursors ([`Cursor`])**: path-bound handles used for navigation and as
//!   the cross-reference type; a stored cursor resolves against the target
//!   tree's *current* state at read time.
//! * **Sources ([`Source`], [`Spec`])**: the tagged sum of what can be
//!   stored (literals, deferred computations, references) and the
//!   structured input accepted by `set`.
//! * **Conditions ([`Condition`], [`Gate`])**: async gates deciding whether
//!   an assignment participates in a given resolution.
//!
//! ## Example
//!
//! ```
//! use strata::{Condition, SetOptions, Tree};
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let tree = Tree::new(serde_json::json!({
//!     "service": {"threads": 4, "features": ["core"]},
//!     "profile": {"production": false},
//! }));
//!
//! // a weighted override and a conditional feature layer
//! tree.set_with("service.threads", 16, SetOptions::weighted(10));
//! tree.set_with(
//!     "service.features",
//!     serde_json::json!(["telemetry"]),
//!     SetOptions::when(Condition::reference(tree.at("profile.production"))),
//! );
//!
//! let service = tree.get("service").await.unwrap().unwrap();
//! // production is off: the telemetry layer is skipped
//! assert_eq!(
//!     service.to_json_string(),
//!     r#"{"features":["core"],"threads":16}"#
//! );
//! # });
//! ```

pub mod cursor;
pub mod errors;
pub mod merge;
pub mod path;
pub mod source;
pub mod store;
pub mod tree;
pub mod value;

pub use cursor::Cursor;
pub use errors::ResolveError;
pub use path::{Key, Path, PathBuf, PathError};
pub use source::{Condition, Gate, Source, Spec};
pub use store::SetOptions;
pub use tree::{MAX_REFERENCE_DEPTH, Tree};
pub use value::Value;

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured resolution errors
    #[error(transparent)]
    Resolve(errors::ResolveError),

    /// Structured path validation errors
    #[error(transparent)]
    Path(path::PathError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Resolve(_) => "resolve",
            Error::Path(_) => "path",
        }
    }

    /// Check if this error indicates no assignment matched the queried path.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Resolve(err) if err.is_not_found())
    }

    /// Check if this error was raised during the extraction walk.
    pub fn is_undefined_traversal(&self) -> bool {
        matches!(self, Error::Resolve(err) if err.is_undefined_traversal())
    }

    /// Check if this error was raised by a rejected structural mutation.
    pub fn is_mutation_rejected(&self) -> bool {
        matches!(self, Error::Resolve(err) if err.is_mutation_rejected())
    }

    /// Check if this error was raised by the reference recursion guard.
    pub fn is_recursion_limit(&self) -> bool {
        matches!(self, Error::Resolve(err) if err.is_recursion_limit())
    }
}
