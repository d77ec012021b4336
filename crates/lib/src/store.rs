//! The append-only assignment store.
//!
//! A resolution tree owns exactly one [`Store`]: a flat, ordered collection
//! of leaf-level [`Assignment`] records. Structured `set` calls are
//! decomposed here into one record per leaf; the store never resolves
//! anything and never shrinks.

use crate::{
    path::{Key, Path, PathBuf},
    source::{Condition, Source, Spec},
    value::Value,
};

/// One leaf-level layered assignment.
///
/// Records are immutable once appended; the `weight` orders application
/// during resolution and `force`/`condition` carry the override and gating
/// semantics attached to the originating `set` call.
#[derive(Debug, Clone)]
pub(crate) struct Assignment {
    pub path: PathBuf,
    pub source: Source,
    pub weight: i64,
    pub force: bool,
    pub condition: Option<Condition>,
}

/// Options attached to a `set` call.
///
/// The default is weight 0, no force, no condition: a plain merge layer.
///
/// ```
/// # use strata::{Condition, SetOptions, Tree};
/// let tree = Tree::new(serde_json::json!({"debug": false}));
/// tree.set_with(
///     "log_level",
///     "debug",
///     SetOptions::default()
///         .with_weight(10)
///         .with_condition(Condition::reference(tree.at("debug"))),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct SetOptions {
    /// Merge precedence; higher weights apply later and override.
    pub weight: i64,
    /// Replace the entire accumulated result instead of merging.
    pub force: bool,
    /// Skip the assignment when this gate evaluates to false.
    pub condition: Option<Condition>,
}

impl SetOptions {
    /// A plain layer at the given weight.
    pub fn weighted(weight: i64) -> Self {
        Self {
            weight,
            ..Default::default()
        }
    }

    /// A layer that replaces the whole accumulated result when applied.
    pub fn forced() -> Self {
        Self {
            force: true,
            ..Default::default()
        }
    }

    /// A layer gated on `condition`.
    pub fn when(condition: Condition) -> Self {
        Self {
            condition: Some(condition),
            ..Default::default()
        }
    }

    /// Sets the weight.
    pub fn with_weight(mut self, weight: i64) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the force flag.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Sets the condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }
}

/// The flat, append-only set of assignments for one tree.
#[derive(Debug, Default)]
pub(crate) struct Store {
    records: Vec<Assignment>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of assignments recorded so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Decomposes `spec` at `path` and appends one record per leaf.
    ///
    /// Non-empty maps and lists recurse (map entries in sorted key order,
    /// list entries in positional order); scalars, empty containers,
    /// deferred computations, and references append atomically. The options
    /// are propagated unchanged to every generated record; conditions are
    /// shared, not split.
    pub fn push_spec(&mut self, path: PathBuf, spec: Spec, opts: &SetOptions) {
        match spec {
            Spec::Deferred(thunk) => self.append(path, Source::Deferred(thunk), opts),
            Spec::Reference(cursor) => self.append(path, Source::Reference(cursor), opts),
            Spec::Value(value) => self.push_value(path, value, opts),
            Spec::Map(entries) if entries.is_empty() => {
                self.append(path, Source::Literal(Value::Map(Default::default())), opts)
            }
            Spec::List(items) if items.is_empty() => {
                self.append(path, Source::Literal(Value::List(Vec::new())), opts)
            }
            Spec::Map(entries) => {
                for (key, child) in entries {
                    self.push_spec(path.clone().push_key(Key::Field(key)), child, opts);
                }
            }
            Spec::List(items) => {
                for (index, child) in items.into_iter().enumerate() {
                    self.push_spec(path.clone().push_index(index), child, opts);
                }
            }
        }
    }

    fn push_value(&mut self, path: PathBuf, value: Value, opts: &SetOptions) {
        match value {
            Value::Map(entries) if !entries.is_empty() => {
                for (key, child) in entries {
                    self.push_value(path.clone().push_key(Key::Field(key)), child, opts);
                }
            }
            Value::List(items) if !items.is_empty() => {
                for (index, child) in items.into_iter().enumerate() {
                    self.push_value(path.clone().push_index(index), child, opts);
                }
            }
            leaf => self.append(path, Source::Literal(leaf), opts),
        }
    }

    fn append(&mut self, path: PathBuf, source: Source, opts: &SetOptions) {
        self.records.push(Assignment {
            path,
            source,
            weight: opts.weight,
            force: opts.force,
            condition: opts.condition.clone(),
        });
    }

    /// Collects every assignment relevant to `path`, unsorted.
    ///
    /// The result starts with exact matches at `path` and at each of its
    /// ancestors (walking up to the root), followed by strict descendants
    /// of `path`; within each prefix group records keep append order. The
    /// resolver's stable weight sort preserves this order among equal
    /// weights.
    pub fn candidates(&self, path: &Path) -> Vec<Assignment> {
        let keys = path.as_keys();
        let mut selected = Vec::new();

        for prefix_len in (0..=keys.len()).rev() {
            let prefix = &keys[..prefix_len];
            selected.extend(
                self.records
                    .iter()
                    .filter(|r| r.path.as_keys() == prefix)
                    .cloned(),
            );
        }

        selected.extend(
            self.records
                .iter()
                .filter(|r| r.path.len() > keys.len() && r.path.starts_with(path))
                .cloned(),
        );

        selected
    }
}
