//! Storable sources and the structured input to `set`.
//!
//! Every assignment in the store carries a [`Source`]: a literal value, a
//! deferred computation invoked only during resolution, or a cross-reference
//! into a resolution tree (the same instance or another one). The three forms
//! are a tagged sum checked exhaustively; there is no runtime marker probing
//! to tell a reference apart from plain data.
//!
//! [`Spec`] is the shape callers hand to `set`: a data tree whose branches
//! may contain deferred or reference leaves anywhere. [`Condition`] gates an
//! assignment on an asynchronously-evaluated [`Gate`].

use std::{collections::BTreeMap, fmt, future::Future, pin::Pin, sync::Arc};

use crate::{cursor::Cursor, value::Value};

/// Boxed future type used for deferred computations and condition
/// predicates. Plain `std` types; no executor coupling.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// A zero-argument deferred computation producing a [`Source`].
///
/// Returning a `Source` (rather than a bare value) lets a computation hand
/// back a literal, a cross-reference to resolve further, or even another
/// deferred stage.
pub type Thunk = Arc<dyn Fn() -> BoxFuture<crate::Result<Source>> + Send + Sync>;

/// An async predicate producing a [`Gate`].
pub type Predicate = Arc<dyn Fn() -> BoxFuture<crate::Result<Gate>> + Send + Sync>;

/// What one assignment contributes when it is applied.
#[derive(Clone)]
pub enum Source {
    /// A concrete value, used as-is.
    Literal(Value),
    /// A computation invoked (and awaited) at resolution time.
    Deferred(Thunk),
    /// A handle into a resolution tree, resolved recursively at read time.
    Reference(Cursor),
}

impl Source {
    /// Creates a literal source.
    pub fn literal(value: impl Into<Value>) -> Self {
        Source::Literal(value.into())
    }

    /// Creates a reference source pointing at `cursor`'s path.
    pub fn reference(cursor: Cursor) -> Self {
        Source::Reference(cursor)
    }

    /// Creates a deferred source from an async closure.
    pub fn deferred<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::Result<Source>> + Send + 'static,
    {
        Source::Deferred(Arc::new(move || Box::pin(f())))
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Source::Deferred(_) => f.write_str("Deferred(..)"),
            // print only the target path; the referenced tree may contain
            // cursors back into itself
            Source::Reference(cursor) => {
                f.debug_tuple("Reference").field(&cursor.path()).finish()
            }
        }
    }
}

impl From<Value> for Source {
    fn from(value: Value) -> Self {
        Source::Literal(value)
    }
}

impl From<serde_json::Value> for Source {
    fn from(value: serde_json::Value) -> Self {
        Source::Literal(value.into())
    }
}

impl From<bool> for Source {
    fn from(value: bool) -> Self {
        Source::Literal(value.into())
    }
}

impl From<i64> for Source {
    fn from(value: i64) -> Self {
        Source::Literal(value.into())
    }
}

impl From<i32> for Source {
    fn from(value: i32) -> Self {
        Source::Literal(value.into())
    }
}

impl From<f64> for Source {
    fn from(value: f64) -> Self {
        Source::Literal(value.into())
    }
}

impl From<&str> for Source {
    fn from(value: &str) -> Self {
        Source::Literal(value.into())
    }
}

impl From<String> for Source {
    fn from(value: String) -> Self {
        Source::Literal(value.into())
    }
}

impl From<Cursor> for Source {
    fn from(cursor: Cursor) -> Self {
        Source::Reference(cursor)
    }
}

/// Structured input to `set`.
///
/// A `Spec` is decomposed into one assignment per leaf: non-empty maps and
/// lists recurse, while scalars, empty containers, deferred computations,
/// and references are stored atomically. The [`Spec::Map`]/[`Spec::List`]
/// forms exist so lazy leaves can sit anywhere inside a structured value:
///
/// ```
/// # use strata::{Source, Spec};
/// let spec = Spec::map([
///     ("replicas", Spec::from(3)),
///     ("host", Spec::deferred(|| async { Ok(Source::literal("db-1")) })),
/// ]);
/// ```
#[derive(Clone)]
pub enum Spec {
    /// Plain data; branches decompose like their `Spec` counterparts.
    Value(Value),
    /// A deferred computation leaf.
    Deferred(Thunk),
    /// A cross-reference leaf.
    Reference(Cursor),
    /// A map whose entries may themselves be lazy.
    Map(BTreeMap<String, Spec>),
    /// A list whose elements may themselves be lazy.
    List(Vec<Spec>),
}

impl Spec {
    /// Creates a deferred leaf from an async closure.
    ///
    /// The closure runs once per resolution that applies the assignment;
    /// results are never cached.
    pub fn deferred<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::Result<Source>> + Send + 'static,
    {
        Spec::Deferred(Arc::new(move || Box::pin(f())))
    }

    /// Builds a map spec from key/value pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Spec>,
        I: IntoIterator<Item = (K, V)>,
    {
        Spec::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds a list spec from elements.
    pub fn list<V, I>(items: I) -> Self
    where
        V: Into<Spec>,
        I: IntoIterator<Item = V>,
    {
        Spec::List(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Debug for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spec::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Spec::Deferred(_) => f.write_str("Deferred(..)"),
            Spec::Reference(cursor) => f.debug_tuple("Reference").field(&cursor.path()).finish(),
            Spec::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            Spec::List(items) => f.debug_tuple("List").field(items).finish(),
        }
    }
}

impl From<Value> for Spec {
    fn from(value: Value) -> Self {
        Spec::Value(value)
    }
}

impl From<Source> for Spec {
    fn from(source: Source) -> Self {
        match source {
            Source::Literal(value) => Spec::Value(value),
            Source::Deferred(thunk) => Spec::Deferred(thunk),
            Source::Reference(cursor) => Spec::Reference(cursor),
        }
    }
}

impl From<Cursor> for Spec {
    fn from(cursor: Cursor) -> Self {
        Spec::Reference(cursor)
    }
}

impl From<serde_json::Value> for Spec {
    fn from(value: serde_json::Value) -> Self {
        Spec::Value(value.into())
    }
}

impl From<bool> for Spec {
    fn from(value: bool) -> Self {
        Spec::Value(value.into())
    }
}

impl From<i64> for Spec {
    fn from(value: i64) -> Self {
        Spec::Value(value.into())
    }
}

impl From<i32> for Spec {
    fn from(value: i32) -> Self {
        Spec::Value(value.into())
    }
}

impl From<f64> for Spec {
    fn from(value: f64) -> Self {
        Spec::Value(value.into())
    }
}

impl From<&str> for Spec {
    fn from(value: &str) -> Self {
        Spec::Value(value.into())
    }
}

impl From<String> for Spec {
    fn from(value: String) -> Self {
        Spec::Value(value.into())
    }
}

impl From<Vec<Spec>> for Spec {
    fn from(items: Vec<Spec>) -> Self {
        Spec::List(items)
    }
}

impl From<BTreeMap<String, Spec>> for Spec {
    fn from(entries: BTreeMap<String, Spec>) -> Self {
        Spec::Map(entries)
    }
}

/// The outcome of one condition evaluation.
#[derive(Clone)]
pub enum Gate {
    /// A final answer.
    Bool(bool),
    /// A cross-reference to resolve; the referenced value's truthiness is
    /// the answer (an undefined result is false).
    Reference(Cursor),
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Gate::Reference(cursor) => f.debug_tuple("Reference").field(&cursor.path()).finish(),
        }
    }
}

impl From<bool> for Gate {
    fn from(value: bool) -> Self {
        Gate::Bool(value)
    }
}

impl From<Cursor> for Gate {
    fn from(cursor: Cursor) -> Self {
        Gate::Reference(cursor)
    }
}

/// A gate attached to an assignment; when it evaluates to false the
/// assignment is skipped entirely.
///
/// Conditions attached to a structured `set` are shared unchanged by every
/// leaf assignment the call decomposes into, and re-evaluated on every
/// resolution that considers one of them.
///
/// ```
/// # use strata::{Condition, Tree};
/// let tree = Tree::new(serde_json::json!({"options": {"enable": true}}));
/// let on = Condition::reference(tree.at("options.enable"));
/// let off = on.clone().not();
/// ```
#[derive(Clone)]
pub enum Condition {
    /// An async predicate evaluated at resolution time.
    Predicate(Predicate),
    /// The truthiness of a referenced path.
    Reference(Cursor),
    /// Negation of another condition.
    Not(Box<Condition>),
}

impl Condition {
    /// Creates a condition from an async predicate.
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::Result<Gate>> + Send + 'static,
    {
        Condition::Predicate(Arc::new(move || Box::pin(f())))
    }

    /// Creates a condition gating on the truthiness of `cursor`'s value.
    pub fn reference(cursor: Cursor) -> Self {
        Condition::Reference(cursor)
    }

    /// Negates this condition.
    pub fn not(self) -> Self {
        Condition::Not(Box::new(self))
    }
}

impl From<Cursor> for Condition {
    fn from(cursor: Cursor) -> Self {
        Condition::Reference(cursor)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Predicate(_) => f.write_str("Predicate(..)"),
            Condition::Reference(cursor) => {
                f.debug_tuple("Reference").field(&cursor.path()).finish()
            }
            Condition::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
        }
    }
}
