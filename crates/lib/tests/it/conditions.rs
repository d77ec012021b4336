//! Conditional assignments: reference gates, async predicates, negation.

use serde_json::json;
use strata::{Condition, Gate, SetOptions, Tree};

use crate::helpers::{json as value, resolve_root};

#[tokio::test]
async fn reference_conditions_gate_leaf_layers() {
    let tree = Tree::new(json!({
        "stuff": ["foo"],
        "options": {"enable": true},
    }));

    let stuff = tree.at("stuff");
    stuff.set_with(
        json!(["bar"]),
        SetOptions::when(Condition::reference(tree.at("options.enable"))),
    );
    stuff.set_with(
        json!(["barfoo"]),
        SetOptions::when(Condition::reference(tree.at("options.enable")).not()),
    );

    assert_eq!(
        resolve_root(&tree).await,
        value(json!({
            "stuff": ["foo", "bar"],
            "options": {"enable": true},
        }))
    );
}

#[tokio::test]
async fn condition_routed_through_a_cross_reference() {
    let tree = Tree::new(json!({
        "app": {
            "stuff": [],
            "options": {"enable": false},
        },
    }));

    // app mirrors app2's flag; app2 starts disabled
    tree.set(
        strata::path!(),
        strata::Spec::map([
            (
                "app",
                strata::Spec::map([(
                    "options",
                    strata::Spec::map([("enable", strata::Spec::from(tree.at("app2.options.enable")))]),
                )]),
            ),
            ("app2", strata::Spec::from(json!({"stuff": [], "options": {"enable": false}}))),
        ]),
    );
    tree.at("app.stuff").set_with(
        json!(["bar"]),
        SetOptions::when(Condition::reference(tree.at("app.options.enable"))),
    );

    assert_eq!(
        resolve_root(&tree).await,
        value(json!({
            "app": {"stuff": [], "options": {"enable": false}},
            "app2": {"stuff": [], "options": {"enable": false}},
        }))
    );

    // flipping the referenced flag re-gates the layer on the next resolve
    tree.set("app2.options.enable", true);

    assert_eq!(
        resolve_root(&tree).await,
        value(json!({
            "app": {"stuff": ["bar"], "options": {"enable": true}},
            "app2": {"stuff": [], "options": {"enable": true}},
        }))
    );
}

#[tokio::test]
async fn async_predicate_conditions() {
    let tree = Tree::new(json!({"features": ["base"]}));

    tree.set_with(
        "features",
        json!(["on"]),
        SetOptions::when(Condition::from_fn(|| async { Ok(Gate::Bool(true)) })),
    );
    tree.set_with(
        "features",
        json!(["off"]),
        SetOptions::when(Condition::from_fn(|| async { Ok(Gate::Bool(false)) })),
    );

    assert_eq!(
        tree.get("features").await.unwrap().unwrap(),
        value(json!(["base", "on"]))
    );
}

#[tokio::test]
async fn predicate_may_answer_with_a_reference() {
    let tree = Tree::new(json!({"flags": {"beta": true}, "pool": [1]}));

    let flag = tree.at("flags.beta");
    tree.set_with(
        "pool",
        json!([2]),
        SetOptions::when(Condition::from_fn(move || {
            let flag = flag.clone();
            async move { Ok(Gate::Reference(flag)) }
        })),
    );

    assert_eq!(
        tree.get("pool").await.unwrap().unwrap(),
        value(json!([1, 2]))
    );
}

#[tokio::test]
async fn truthiness_gates_non_boolean_references() {
    let tree = Tree::new(json!({"mode": "", "extras": []}));

    tree.set_with(
        "extras",
        json!(["debug-sink"]),
        SetOptions::when(Condition::reference(tree.at("mode"))),
    );

    // "" is falsy: the layer is skipped
    assert_eq!(tree.get("extras").await.unwrap().unwrap(), value(json!([])));

    // the same condition sees the overridden value on the next resolve
    tree.set("mode", "verbose");
    assert_eq!(
        tree.get("extras").await.unwrap().unwrap(),
        value(json!(["debug-sink"]))
    );
}

#[tokio::test]
async fn double_negation_restores_the_gate() {
    let tree = Tree::new(json!({"on": true, "xs": []}));

    let gate = Condition::reference(tree.at("on")).not().not();
    tree.set_with("xs", json!(["kept"]), SetOptions::when(gate));

    assert_eq!(
        tree.get("xs").await.unwrap().unwrap(),
        value(json!(["kept"]))
    );
}

#[tokio::test]
async fn skipped_conditions_leave_prior_weights_in_place() {
    let tree = Tree::new(json!({"threads": 4}));
    tree.set_with(
        "threads",
        64,
        SetOptions::weighted(50)
            .with_condition(Condition::from_fn(|| async { Ok(Gate::Bool(false)) })),
    );

    assert_eq!(tree.get("threads").await.unwrap().unwrap(), 4);
}

#[tokio::test]
async fn all_layers_skipped_resolves_to_nothing() {
    let tree = Tree::new(json!({"only": 1}));
    // no layer under "only" is skipped; build a path whose only layer is gated
    tree.set_with(
        "ghost",
        1,
        SetOptions::when(Condition::from_fn(|| async { Ok(Gate::Bool(false)) })),
    );

    assert_eq!(tree.get("ghost").await.unwrap(), None);
}
