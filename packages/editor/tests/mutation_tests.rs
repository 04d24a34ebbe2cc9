//! Comprehensive mutation tests

use serde_json::{json, Value};
use wikiedit_editor::{
    add_field, add_list_item, decode, encode, remove_field, remove_list_item, rename_key,
    set_leaf, set_list_item, Document, FieldKind, KeyPath, MutationError, ValueNode,
};

fn doc(value: Value) -> Document {
    decode(Some(&value))
}

fn keys(doc: &Document) -> Vec<String> {
    doc.keys().map(str::to_string).collect()
}

#[test]
fn test_round_trip_string_shapes() {
    let wires = [
        json!({}),
        json!({ "a": "" }),
        json!({ "a": ["", "x", ""] }),
        json!({ "z": { "y": { "x": { "w": ["deep"] } } }, "a": "first?" }),
        json!({
            "identifier": "inv_item",
            "title": "Inventory Item",
            "rename_this_section": { "total": "32" },
            "inventory": {
                "container": "lab_small_parts",
                "items": ["AKG Wired Earbuds", "Steel Series Arctis 5 Cable"]
            }
        }),
    ];

    for wire in wires {
        assert_eq!(encode(&decode(Some(&wire))), wire);
    }
}

#[test]
fn test_encode_is_idempotent_after_canonicalizing() {
    let raw = json!({ "n": 1.5, "b": true, "mixed": [1, "a"], "s": "x" });
    let once = encode(&decode(Some(&raw)));
    let twice = encode(&decode(Some(&once)));
    assert_eq!(once, twice);
}

#[test]
fn test_unrelated_edits_keep_sibling_order() {
    let input = doc(json!({ "a": "1", "b": ["x"], "c": { "d": "2" }, "e": "3" }));
    let root = KeyPath::root();

    let after_add = add_field(&input, &root, FieldKind::Field, "new_field").unwrap().document;
    assert_eq!(keys(&after_add), vec!["a", "b", "c", "e", "new_field"]);

    let after_remove = remove_field(&input, &root, "c").unwrap().document;
    assert_eq!(keys(&after_remove), vec!["a", "b", "e"]);

    let after_set = set_leaf(&input, &KeyPath::from(["a"]), "changed").unwrap().document;
    assert_eq!(keys(&after_set), keys(&input));

    let after_item = set_list_item(&input, &KeyPath::from(["b"]), 0, "y").unwrap().document;
    assert_eq!(keys(&after_item), keys(&input));
}

#[test]
fn test_rename_preserves_position() {
    let input = doc(json!({ "a": 1, "b": 2, "c": 3 }));
    let outcome = rename_key(&input, &KeyPath::root(), "b", "z").unwrap();

    assert_eq!(keys(&outcome.document), vec!["a", "z", "c"]);
    assert_eq!(encode(&outcome.document), json!({ "a": 1, "z": 2, "c": 3 }));
}

#[test]
fn test_duplicate_rename_is_rejected() {
    let input = doc(json!({ "a": "x", "b": "y" }));
    let err = rename_key(&input, &KeyPath::root(), "b", "a").unwrap_err();

    assert_eq!(
        err,
        MutationError::DuplicateKey {
            section: KeyPath::root(),
            key: "a".to_string()
        }
    );
    assert_eq!(encode(&input), json!({ "a": "x", "b": "y" }));
}

#[test]
fn test_rename_to_same_key_is_noop() {
    let input = doc(json!({ "a": "x" }));
    let outcome = rename_key(&input, &KeyPath::root(), "a", "  a ").unwrap();
    assert!(outcome.is_noop());
    assert_eq!(outcome.document, input);
}

#[test]
fn test_empty_list_lifecycle() {
    let input = doc(json!({ "items": ["x"] }));
    let outcome = remove_list_item(&input, &KeyPath::from(["items"]), 0).unwrap();

    assert_eq!(outcome.document.fields()["items"], ValueNode::list(Vec::<String>::new()));
    assert_eq!(encode(&outcome.document), json!({ "items": [] }));
    assert_eq!(
        serde_json::to_string(&encode(&outcome.document)).unwrap(),
        r#"{"items":[]}"#
    );
}

#[test]
fn test_noop_set_leaf_emits_nothing() {
    let input = doc(json!({ "title": "Same", "other": "x" }));
    let outcome = set_leaf(&input, &KeyPath::from(["title"]), "Same").unwrap();

    assert!(outcome.change.is_none());
    assert_eq!(outcome.document, input);
}

#[test]
fn test_add_list_item_appends_empty_string() {
    let input = doc(json!({ "tags": ["a"] }));
    let outcome = add_list_item(&input, &KeyPath::from(["tags"])).unwrap();

    assert_eq!(encode(&outcome.document), json!({ "tags": ["a", ""] }));
    let change = outcome.change.unwrap();
    assert_eq!(change.old_value, Some(ValueNode::list(["a"])));
    assert_eq!(change.new_value, Some(ValueNode::list(["a", ""])));
}

#[test]
fn test_edited_number_keeps_type() {
    let input = doc(json!({ "total": 32 }));
    let edited = set_leaf(&input, &KeyPath::from(["total"]), "33").unwrap().document;
    assert_eq!(encode(&edited), json!({ "total": 33 }));

    let edited = set_leaf(&input, &KeyPath::from(["total"]), "lots").unwrap().document;
    assert_eq!(encode(&edited), json!({ "total": "lots" }));
}

#[test]
fn test_path_errors() {
    let input = doc(json!({ "title": "x", "tags": ["a"], "meta": {} }));

    assert_eq!(
        set_leaf(&input, &KeyPath::from(["missing"]), "x").unwrap_err(),
        MutationError::PathNotFound(KeyPath::from(["missing"]))
    );
    assert_eq!(
        add_list_item(&input, &KeyPath::from(["meta"])).unwrap_err(),
        MutationError::NotAList(KeyPath::from(["meta"]))
    );
    assert_eq!(
        add_field(&input, &KeyPath::from(["tags"]), FieldKind::Field, "new_field").unwrap_err(),
        MutationError::NotASection(KeyPath::from(["tags"]))
    );
    assert_eq!(
        set_leaf(&input, &KeyPath::from(["meta"]), "x").unwrap_err(),
        MutationError::NotALeaf(KeyPath::from(["meta"]))
    );
}

#[test]
fn test_input_is_never_mutated() {
    let input = doc(json!({ "a": "1", "list": ["x"], "s": { "k": "v" } }));
    let before = input.clone();

    let _ = set_leaf(&input, &KeyPath::from(["a"]), "2");
    let _ = add_list_item(&input, &KeyPath::from(["list"]));
    let _ = remove_list_item(&input, &KeyPath::from(["list"]), 0);
    let _ = rename_key(&input, &KeyPath::from(["s"]), "k", "j");
    let _ = add_field(&input, &KeyPath::root(), FieldKind::Section, "new_section");
    let _ = remove_field(&input, &KeyPath::root(), "a");

    assert_eq!(input, before);
}
