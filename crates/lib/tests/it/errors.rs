//! Error kinds, display strings, and propagation.

use serde_json::json;
use strata::{Condition, Gate, ResolveError, SetOptions, Tree, path};

#[tokio::test]
async fn not_found_names_the_path() {
    let tree = Tree::new(json!({"a": 1}));

    let err = tree.get("missing.path").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.module(), "resolve");
    assert_eq!(err.to_string(), "no value found at path missing.path");
}

#[tokio::test]
async fn undefined_traversal_vs_undefined_result() {
    let tree = Tree::new(json!({"a": {"b": "leaf"}}));

    // running out of data mid-path is an error...
    let err = tree.get("a.b.c.d").await.unwrap_err();
    assert!(err.is_undefined_traversal());
    assert_eq!(
        err.to_string(),
        "attempted to read value of undefined at a.b.c.d"
    );

    // ...but coming up empty exactly at the final key is just "nothing"
    assert_eq!(tree.get("a.b.c").await.unwrap(), None);
}

#[tokio::test]
async fn failing_predicates_propagate_unchanged() {
    let tree = Tree::new(json!({"xs": [1]}));
    tree.set_with(
        "xs",
        json!([2]),
        SetOptions::when(Condition::from_fn(|| async {
            Err(ResolveError::NotFound {
                path: "external.flag".to_string(),
            }
            .into())
        })),
    );

    let err = tree.get("xs").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "no value found at path external.flag");
}

#[tokio::test]
async fn failing_deferred_computations_propagate_unchanged() {
    let tree = Tree::new(json!({}));
    tree.set(
        "broken",
        strata::Spec::deferred(|| async {
            Err::<strata::Source, _>(
                ResolveError::UndefinedTraversal {
                    path: "upstream".to_string(),
                }
                .into(),
            )
        }),
    );

    let err = tree.get(path!()).await.unwrap_err();
    assert!(err.is_undefined_traversal());
}

#[tokio::test]
async fn recursion_limit_reports_kind_and_module() {
    let tree = Tree::new(json!({}));
    tree.set("loop", tree.at("loop"));

    let err = tree.get("loop").await.unwrap_err();
    assert!(err.is_recursion_limit());
    assert_eq!(err.module(), "resolve");
    assert!(err.to_string().contains("loop"), "got {err}");
}

#[test]
fn predicate_helpers_are_mutually_exclusive() {
    let not_found = ResolveError::NotFound {
        path: "p".to_string(),
    };
    assert!(not_found.is_not_found());
    assert!(!not_found.is_undefined_traversal());
    assert!(!not_found.is_mutation_rejected());
    assert!(!not_found.is_recursion_limit());
    assert_eq!(not_found.path(), "p");

    let rejected = ResolveError::MutationRejected {
        path: "q".to_string(),
    };
    assert!(rejected.is_mutation_rejected());
    assert_eq!(rejected.path(), "q");
}

#[tokio::test]
async fn gate_conversions() {
    let tree = Tree::new(json!({"on": true}));

    // both gate forms work through the same predicate surface
    let b: Gate = true.into();
    assert!(matches!(b, Gate::Bool(true)));
    let r: Gate = tree.at("on").into();
    assert!(matches!(r, Gate::Reference(_)));
}
