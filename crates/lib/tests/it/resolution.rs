//! Layered set/get behavior: seeds, weights, force, decomposition.

use serde_json::json;
use strata::{SetOptions, Source, Spec, Tree, path};

use crate::helpers::{json as value, resolve_root};

#[tokio::test]
async fn seed_resolves_back_unchanged() {
    let seed = json!({
        "foobar": {
            "foo": {
                "bar_a": "12212",
                "bar_b": "1221212112",
            },
        },
    });

    let tree = Tree::new(seed.clone());
    assert_eq!(resolve_root(&tree).await, value(seed));
}

#[tokio::test]
async fn seed_from_scalar() {
    let tree = Tree::new("foobar");
    assert_eq!(resolve_root(&tree).await, "foobar");
}

#[tokio::test]
async fn seed_from_deferred() {
    let tree = Tree::new(Spec::deferred(|| async { Ok(Source::literal("foobar")) }));
    assert_eq!(resolve_root(&tree).await, "foobar");
}

#[tokio::test]
async fn setting_into_empty_seed() {
    // the closest analogue of seeding a key with no data: the seed holds
    // nothing under "foo" until a later layer supplies it
    let tree = Tree::new(json!({}));
    tree.set("foo", "bar");

    assert_eq!(resolve_root(&tree).await, value(json!({"foo": "bar"})));
}

#[tokio::test]
async fn weight_orders_application() {
    let tree = Tree::new(json!({
        "foobar": {"foo": {"bar_a": "12212", "bar_b": "1221212112"}},
    }));

    tree.set("foobar.foo.bar_b", "12828128138");
    tree.set_with("foobar.foo.bar_b", "23818383712372273", SetOptions::weighted(-10));
    tree.set_with("foobar.foo.bar_b", "2121121", SetOptions::weighted(30));

    assert_eq!(
        resolve_root(&tree).await,
        value(json!({
            "foobar": {"foo": {"bar_a": "12212", "bar_b": "2121121"}},
        }))
    );
}

#[tokio::test]
async fn equal_weights_apply_in_set_order() {
    let tree = Tree::new(json!({"level": "info"}));
    tree.set("level", "debug");
    tree.set("level", "trace");

    assert_eq!(
        tree.get("level").await.unwrap().unwrap(),
        "trace",
        "the later equal-weight layer wins for scalars"
    );
}

#[tokio::test]
async fn structured_set_equals_leaf_sets() {
    let combined = Tree::new(json!({}));
    combined.set("cfg", json!({"a": 1, "b": 2}));

    let split = Tree::new(json!({}));
    split.set("cfg.a", 1);
    split.set("cfg.b", 2);

    assert_eq!(resolve_root(&combined).await, resolve_root(&split).await);
}

#[tokio::test]
async fn force_resets_the_whole_accumulator() {
    let tree = Tree::new(json!({"a": 1}));
    tree.set_with("b", 2, SetOptions::forced());

    // the reset ignores the assignment's own path: the root collapses to
    // the forced scalar
    assert_eq!(resolve_root(&tree).await, 2);

    // narrower queries that never see the forced record are unaffected
    assert_eq!(tree.get("a").await.unwrap().unwrap(), 1);
}

#[tokio::test]
async fn layers_after_a_force_merge_on_top() {
    let tree = Tree::new(json!({"a": 1}));
    tree.set_with("b", 2, SetOptions::forced());
    tree.set("c", 3);

    // forced scalar, then a map contribution replaces it wholesale
    assert_eq!(resolve_root(&tree).await, value(json!({"c": 3})));
}

#[tokio::test]
async fn store_only_grows() {
    let tree = Tree::new(json!({"a": 1, "b": {"c": 2}}));
    let seeded = tree.assignment_count();
    assert_eq!(seeded, 2);

    tree.set("a", 10);
    tree.set("d", json!([1, 2, 3]));
    assert_eq!(tree.assignment_count(), seeded + 4);

    // resolution never compacts the store
    let _ = resolve_root(&tree).await;
    assert_eq!(tree.assignment_count(), seeded + 4);
}

#[tokio::test]
async fn concurrent_resolutions_agree() {
    let tree = Tree::new(json!({"a": {"b": [1, 2]}, "c": true}));
    tree.set_with("a.b", json!([3]), SetOptions::weighted(5));

    let (left, right) = tokio::join!(tree.get(path!()), tree.get(path!()));
    let left = left.unwrap().unwrap();
    let right = right.unwrap().unwrap();

    assert_eq!(left, right);
    assert_eq!(left, value(json!({"a": {"b": [1, 2, 3]}, "c": true})));
}
