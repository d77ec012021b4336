//! The resolution tree: layered declarative `set`, lazy `get`.
//!
//! A [`Tree`] owns an append-only store of weighted assignments and computes
//! nothing until asked. `set` decomposes structured values into leaf records
//! and returns immediately; `get` gathers every record relevant to the
//! queried path, orders them by weight, evaluates conditions and deferred
//! computations, deep-merges the survivors, and extracts the requested
//! subtree. Every `get` re-runs the full pass; results are never cached, so
//! a resolution always reflects the store as it stands.
//!
//! # Usage
//!
//! ```
//! use strata::{SetOptions, Tree};
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let tree = Tree::new(serde_json::json!({
//!     "name": "api",
//!     "limits": {"connections": 64},
//! }));
//!
//! // layer an override on top of the seed
//! tree.set_with("limits.connections", 512, SetOptions::weighted(10));
//!
//! let limits = tree.get("limits").await.unwrap().unwrap();
//! assert_eq!(limits.to_json_string(), r#"{"connections":512}"#);
//! # });
//! ```

use std::{
    fmt,
    sync::{Arc, RwLock},
};

use tracing::{debug, trace};

use crate::{
    cursor::Cursor,
    errors::ResolveError,
    merge::merge_at,
    path::{Path, PathBuf},
    source::{BoxFuture, Condition, Gate, Source, Spec},
    store::{SetOptions, Store},
    value::Value,
};

/// Reference chains longer than this abort resolution with
/// [`ResolveError::RecursionLimit`].
///
/// The guard converts engine-visible self-referential assignments into an
/// error instead of a hang. Cycles routed through opaque user closures that
/// call `resolve` themselves re-enter at depth zero and are not detectable
/// here.
pub const MAX_REFERENCE_DEPTH: usize = 64;

/// A lazy, layered configuration tree.
///
/// `Tree` is a cheaply-clonable shared handle: clones and [`Cursor`]s all
/// address the same append-only assignment store. `set` is synchronous and
/// only appends; `get` is asynchronous, read-only, and safe to run
/// concurrently against the same instance.
///
/// # Examples
///
/// ```
/// use strata::{Condition, SetOptions, Tree};
///
/// # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// # rt.block_on(async {
/// let tree = Tree::new(serde_json::json!({
///     "stuff": ["foo"],
///     "options": {"enable": true},
/// }));
///
/// // list assignments concatenate; this one only applies while
/// // options.enable resolves truthy
/// tree.set_with(
///     "stuff",
///     serde_json::json!(["bar"]),
///     SetOptions::when(Condition::reference(tree.at("options.enable"))),
/// );
///
/// let resolved = tree.get("stuff").await.unwrap().unwrap();
/// assert_eq!(resolved.to_json_string(), r#"["foo","bar"]"#);
/// # });
/// ```
#[derive(Clone)]
pub struct Tree {
    inner: Arc<Inner>,
}

struct Inner {
    store: RwLock<Store>,
}

impl Tree {
    /// Creates a tree seeded with `initial`, decomposed at the root path
    /// with weight 0, no force, and no condition.
    pub fn new(initial: impl Into<Spec>) -> Self {
        let tree = Self {
            inner: Arc::new(Inner {
                store: RwLock::new(Store::new()),
            }),
        };
        tree.set(PathBuf::new(), initial);
        tree
    }

    /// Returns a cursor bound to the root path.
    pub fn root(&self) -> Cursor {
        Cursor::new(self.clone(), PathBuf::new())
    }

    /// Returns a cursor bound to `path`.
    pub fn at(&self, path: impl Into<PathBuf>) -> Cursor {
        Cursor::new(self.clone(), path.into())
    }

    /// Layers `value` at `path` with default options (weight 0, merge, no
    /// condition).
    pub fn set(&self, path: impl Into<PathBuf>, value: impl Into<Spec>) {
        self.set_with(path, value, SetOptions::default());
    }

    /// Layers `value` at `path`.
    ///
    /// The value is decomposed into one assignment per leaf and appended to
    /// the store; nothing is evaluated until a later `get`. Never fails and
    /// never suspends.
    pub fn set_with(&self, path: impl Into<PathBuf>, value: impl Into<Spec>, opts: SetOptions) {
        let path = path.into();
        let mut store = self
            .inner
            .store
            .write()
            .expect("assignment store lock poisoned");
        store.push_spec(path, value.into(), &opts);
    }

    /// Number of assignments recorded over this tree's lifetime.
    ///
    /// The store is append-only, so this only grows; per-`get` cost is
    /// linear in it.
    pub fn assignment_count(&self) -> usize {
        self.inner
            .store
            .read()
            .expect("assignment store lock poisoned")
            .len()
    }

    /// Resolves the value at `path`.
    ///
    /// Returns `Ok(None)` when every relevant assignment was skipped (the
    /// path resolves to nothing), [`ResolveError::NotFound`] when no
    /// assignment exists at the path, its ancestors, or its descendants, and
    /// [`ResolveError::UndefinedTraversal`] when the accumulated result ends
    /// before the path does.
    pub async fn get(&self, path: impl Into<PathBuf>) -> crate::Result<Option<Value>> {
        let path = path.into();
        self.resolve_path(&path, 0).await
    }

    /// Entry point for recursive resolution steps (cross-references and
    /// reference conditions), boxed to break the async cycle.
    pub(crate) fn get_at(
        &self,
        path: PathBuf,
        depth: usize,
    ) -> BoxFuture<crate::Result<Option<Value>>> {
        let tree = self.clone();
        Box::pin(async move { tree.resolve_path(&path, depth).await })
    }

    async fn resolve_path(&self, path: &Path, depth: usize) -> crate::Result<Option<Value>> {
        if depth > MAX_REFERENCE_DEPTH {
            return Err(ResolveError::RecursionLimit {
                path: path.to_string(),
                limit: MAX_REFERENCE_DEPTH,
            }
            .into());
        }

        // Snapshot the relevant records; the guard is released before any
        // await so in-flight resolutions never block writers.
        let mut candidates = {
            let store = self
                .inner
                .store
                .read()
                .expect("assignment store lock poisoned");
            store.candidates(path)
        };

        if candidates.is_empty() {
            return Err(ResolveError::NotFound {
                path: path.to_string(),
            }
            .into());
        }

        // Stable: equal weights keep candidate-selection order.
        candidates.sort_by_key(|record| record.weight);

        debug!(path = %path, candidates = candidates.len(), depth, "resolving path");

        let mut result: Option<Value> = None;
        for record in &candidates {
            if let Some(condition) = &record.condition {
                if !evaluate_condition(condition, depth).await? {
                    trace!(assignment = %record.path, "skipped by condition");
                    continue;
                }
            }

            if record.force {
                // Full accumulator reset: discards everything applied so
                // far and ignores the record's own path.
                trace!(assignment = %record.path, "forced assignment resets accumulator");
                result = evaluate_source(&record.source, depth).await?;
                continue;
            }

            let Some(resolved) = evaluate_source(&record.source, depth).await? else {
                // an undefined contribution merges nothing
                continue;
            };
            result = Some(merge_at(result, &record.path, resolved));
        }

        let Some(result) = result else {
            return Ok(None);
        };

        // Extraction: walk the accumulated result down to the queried path.
        // Running out of data with keys still to consume is the error that
        // distinguishes "path does not exist here" from "resolved to
        // nothing"; coming up empty on the final key is the latter.
        let mut current: Option<&Value> = Some(&result);
        for key in path.keys() {
            let Some(value) = current else {
                return Err(ResolveError::UndefinedTraversal {
                    path: path.to_string(),
                }
                .into());
            };
            current = value.descend(key);
        }
        Ok(current.cloned())
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("assignments", &self.assignment_count())
            .finish()
    }
}

/// Evaluates a source to a concrete value.
///
/// Deferred computations are invoked and awaited; a computation may hand
/// back another deferred stage or a reference, so evaluation loops until a
/// literal or a resolved reference is reached. Reference resolution recurses
/// through the referenced tree's own resolution entry point at `depth + 1`.
async fn evaluate_source(source: &Source, depth: usize) -> crate::Result<Option<Value>> {
    let mut current = source.clone();
    loop {
        match current {
            Source::Literal(value) => return Ok(Some(value)),
            Source::Reference(cursor) => return cursor.resolve_at(depth + 1).await,
            Source::Deferred(thunk) => current = thunk().await?,
        }
    }
}

/// Evaluates a condition to its final boolean.
///
/// Negations unwrap iteratively; the base gate is either an async predicate
/// or a reference whose resolved value gates by truthiness (undefined is
/// false). Failures from predicates or reference resolution propagate
/// unchanged.
async fn evaluate_condition(condition: &Condition, depth: usize) -> crate::Result<bool> {
    let mut negate = false;
    let mut current = condition;
    while let Condition::Not(inner) = current {
        negate = !negate;
        current = inner.as_ref();
    }

    let gate = match current {
        Condition::Predicate(predicate) => predicate().await?,
        Condition::Reference(cursor) => Gate::Reference(cursor.clone()),
        Condition::Not(_) => unreachable!(),
    };

    let outcome = match gate {
        Gate::Bool(value) => value,
        Gate::Reference(cursor) => cursor
            .resolve_at(depth + 1)
            .await?
            .map(|value| value.is_truthy())
            .unwrap_or(false),
    };

    Ok(outcome != negate)
}
