//! Path-bound handles over a resolution tree.
//!
//! A [`Cursor`] pairs a [`Tree`] with a path into it. Navigating to a child
//! yields a new cursor bound one level deeper; `resolve`/`set` operate at
//! the bound path. Cursors are also the cross-reference type: storing one in
//! a tree (its own or another) records a reference that is re-resolved on
//! every read.
//!
//! Cursors never mutate structure. The only write they offer is layering a
//! new assignment with `set`; direct removal or replacement of existing data
//! is rejected with [`ResolveError::MutationRejected`].

use std::fmt;

use crate::{
    errors::ResolveError,
    merge::deep_merge,
    path::{Path, PathBuf},
    source::{BoxFuture, Spec},
    store::SetOptions,
    tree::Tree,
    value::Value,
};

/// A navigable handle bound to one path of a [`Tree`].
///
/// # Examples
///
/// ```
/// use strata::Tree;
///
/// # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// # rt.block_on(async {
/// let tree = Tree::new(serde_json::json!({"db": {"port": 5432}}));
///
/// let port = tree.root().child("db").child("port");
/// assert_eq!(port.resolve().await.unwrap().unwrap(), 5432);
///
/// // absent paths substitute a fallback instead of failing
/// let timeout = tree.at("db.timeout_ms");
/// assert_eq!(timeout.resolve_or(3_000).await.unwrap(), 3_000);
/// # });
/// ```
#[derive(Clone)]
pub struct Cursor {
    tree: Tree,
    path: PathBuf,
}

impl Cursor {
    pub(crate) fn new(tree: Tree, path: PathBuf) -> Self {
        Self { tree, path }
    }

    /// The tree this cursor is bound to.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The path this cursor is bound to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a cursor bound one or more levels deeper.
    ///
    /// The fragment is parsed as dot notation, so `child("a.b")` equals
    /// `child("a").child("b")`.
    pub fn child(&self, fragment: impl AsRef<str>) -> Cursor {
        Cursor::new(self.tree.clone(), self.path.clone().push(fragment))
    }

    /// Returns a cursor bound to a list element under this path.
    pub fn index(&self, index: usize) -> Cursor {
        Cursor::new(self.tree.clone(), self.path.clone().push_index(index))
    }

    /// Returns a cursor bound to `path` appended under this one.
    pub fn at(&self, path: impl AsRef<Path>) -> Cursor {
        Cursor::new(self.tree.clone(), self.path.clone().join(path))
    }

    /// Resolves the value at the bound path.
    ///
    /// Equivalent to [`Tree::get`] at this cursor's path: `Ok(None)` when
    /// the path resolves to nothing, [`ResolveError::NotFound`] /
    /// [`ResolveError::UndefinedTraversal`] when it cannot be reached.
    pub async fn resolve(&self) -> crate::Result<Option<Value>> {
        self.tree.get(self.path.clone()).await
    }

    /// Resolution at an inherited recursion depth; used when this cursor is
    /// stored as a cross-reference or reference condition.
    pub(crate) fn resolve_at(&self, depth: usize) -> BoxFuture<crate::Result<Option<Value>>> {
        self.tree.get_at(self.path.clone(), depth)
    }

    /// Resolves the value at the bound path, substituting `fallback`.
    ///
    /// - Success with a map fallback: the fallback merges *under* the result
    ///   (the result wins on conflicts).
    /// - Success with nothing resolved: the fallback is returned as-is.
    /// - [`ResolveError::NotFound`] / [`ResolveError::UndefinedTraversal`]:
    ///   swallowed, the fallback is returned.
    /// - Any other failure propagates unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata::Tree;
    ///
    /// # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    /// # rt.block_on(async {
    /// let tree = Tree::new(serde_json::json!({"retries": 2}));
    ///
    /// // map fallbacks fill in what the result does not provide
    /// let merged = tree
    ///     .root()
    ///     .resolve_or(serde_json::json!({"retries": 5, "backoff_ms": 100}))
    ///     .await
    ///     .unwrap();
    /// assert_eq!(merged.to_json_string(), r#"{"backoff_ms":100,"retries":2}"#);
    /// # });
    /// ```
    pub async fn resolve_or(&self, fallback: impl Into<Value>) -> crate::Result<Value> {
        let fallback = fallback.into();
        match self.resolve().await {
            Ok(result) => Ok(match (fallback, result) {
                (fallback @ Value::Map(_), Some(resolved)) => deep_merge(fallback, resolved),
                (fallback, None) => fallback,
                (_, Some(resolved)) => resolved,
            }),
            Err(error) if error.is_not_found() || error.is_undefined_traversal() => Ok(fallback),
            Err(error) => Err(error),
        }
    }

    /// Layers `value` at the bound path with default options.
    pub fn set(&self, value: impl Into<Spec>) {
        self.tree.set(self.path.clone(), value);
    }

    /// Layers `value` at the bound path.
    pub fn set_with(&self, value: impl Into<Spec>, opts: SetOptions) {
        self.tree.set_with(self.path.clone(), value, opts);
    }

    /// Rejects removal of a child entry.
    ///
    /// The store is append-only; there is nothing to delete from. Always
    /// fails with [`ResolveError::MutationRejected`] and leaves the tree
    /// untouched.
    pub fn remove(&self, key: impl AsRef<str>) -> crate::Result<()> {
        Err(ResolveError::MutationRejected {
            path: self.path.clone().push(key).to_string(),
        }
        .into())
    }

    /// Rejects in-place replacement of the value at the bound path.
    ///
    /// Replacement would rewrite history the layered store does not keep.
    /// Always fails with [`ResolveError::MutationRejected`]; layer an
    /// override with [`Cursor::set_with`] and a weight instead.
    pub fn replace(&self, _value: impl Into<Value>) -> crate::Result<()> {
        Err(ResolveError::MutationRejected {
            path: self.path.to_string(),
        }
        .into())
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // the tree is omitted: it may contain cursors back into itself
        f.debug_struct("Cursor")
            .field("path", &self.path.to_string())
            .finish()
    }
}
