// Unit tests for the JSON decision tree classifier.
//
// Tests artifact parsing, load-time validation (dangling and backwards
// edges, bad feature indices), traversal semantics on a deeper tree, and
// feature-count checks at prediction time.

use fraudcheck::classifier::tree::{TreeClassifier, TreeNode};
use fraudcheck::classifier::Classifier;

/// amount <= 50      → legit
/// 50 < amount <= 2000 → fraud only above 1500
/// amount > 2000     → fraud
const BANDED_TREE: &str = r#"{
    "n_features": 1,
    "nodes": [
        {"feature": 0, "threshold": 50.0,   "left": 1, "right": 2},
        {"label": 0},
        {"feature": 0, "threshold": 2000.0, "left": 3, "right": 6},
        {"feature": 0, "threshold": 1500.0, "left": 4, "right": 5},
        {"label": 0},
        {"label": 1},
        {"label": 1}
    ]
}"#;

#[test]
fn parse_banded_tree() {
    let tree = TreeClassifier::from_json(BANDED_TREE).unwrap();
    assert_eq!(tree.n_features(), 1);
    assert_eq!(tree.nodes().len(), 7);
    assert_eq!(tree.leaf_count(), 4);
    assert_eq!(tree.nodes()[1], TreeNode::Leaf { label: 0 });
}

#[test]
fn banded_tree_traversal() {
    let tree = TreeClassifier::from_json(BANDED_TREE).unwrap();
    assert_eq!(tree.classify(&[10.0]).unwrap(), 0);
    assert_eq!(tree.classify(&[50.0]).unwrap(), 0);
    assert_eq!(tree.classify(&[1000.0]).unwrap(), 0);
    assert_eq!(tree.classify(&[1500.0]).unwrap(), 0);
    assert_eq!(tree.classify(&[1600.0]).unwrap(), 1);
    assert_eq!(tree.classify(&[2000.0]).unwrap(), 1);
    assert_eq!(tree.classify(&[99999.0]).unwrap(), 1);
}

#[tokio::test]
async fn predict_through_trait() {
    let tree = TreeClassifier::from_json(BANDED_TREE).unwrap();
    let classifier: &dyn Classifier = &tree;
    assert_eq!(classifier.predict(&[3000.0]).await.unwrap(), 1);
    assert_eq!(classifier.predict(&[5.0]).await.unwrap(), 0);
}

#[test]
fn wrong_feature_count_is_rejected() {
    let tree = TreeClassifier::from_json(BANDED_TREE).unwrap();
    let err = tree.classify(&[]).unwrap_err();
    assert!(err.to_string().contains("expects 1 feature(s), got 0"));
    assert!(tree.classify(&[1.0, 2.0]).is_err());
}

#[test]
fn invalid_json_is_rejected() {
    let err = TreeClassifier::from_json("{not json").unwrap_err();
    assert!(err.to_string().contains("Invalid decision tree JSON"));
}

#[test]
fn empty_tree_is_rejected() {
    let err = TreeClassifier::from_json(r#"{"n_features": 1, "nodes": []}"#).unwrap_err();
    assert!(err.to_string().contains("no nodes"));
}

#[test]
fn dangling_child_is_rejected() {
    let json = r#"{
        "n_features": 1,
        "nodes": [
            {"feature": 0, "threshold": 10.0, "left": 1, "right": 5},
            {"label": 0}
        ]
    }"#;
    let err = TreeClassifier::from_json(json).unwrap_err();
    assert!(err.to_string().contains("missing node 5"));
}

#[test]
fn direct_deserialize_runs_validation() {
    let json = r#"{"n_features":1,"nodes":[{"feature":0,"threshold":1.0,"left":1,"right":9},{"label":0}]}"#;
    let err = serde_json::from_str::<TreeClassifier>(json).unwrap_err();
    assert!(err.to_string().contains("missing node 9"), "got: {err}");
}

#[test]
fn direct_deserialize_rejects_out_of_range_feature() {
    let json = r#"{"n_features":1,"nodes":[{"feature":3,"threshold":1.0,"left":1,"right":2},{"label":0},{"label":1}]}"#;
    assert!(serde_json::from_str::<TreeClassifier>(json).is_err());
}

#[test]
fn direct_deserialize_accepts_valid_tree() {
    let tree: TreeClassifier = serde_json::from_str(BANDED_TREE).unwrap();
    assert_eq!(tree, TreeClassifier::from_json(BANDED_TREE).unwrap());
    assert_eq!(tree.classify(&[1600.0]).unwrap(), 1);
}

#[test]
fn backwards_edge_is_rejected() {
    // A cycle would make traversal loop forever.
    let json = r#"{
        "n_features": 1,
        "nodes": [
            {"feature": 0, "threshold": 10.0, "left": 1, "right": 2},
            {"feature": 0, "threshold": 5.0, "left": 0, "right": 2},
            {"label": 1}
        ]
    }"#;
    let err = TreeClassifier::from_json(json).unwrap_err();
    assert!(err.to_string().contains("points backwards"));
}

#[test]
fn self_loop_is_rejected() {
    let result = TreeClassifier::new(
        1,
        vec![
            TreeNode::Split {
                feature: 0,
                threshold: 1.0,
                left: 0,
                right: 1,
            },
            TreeNode::Leaf { label: 0 },
        ],
    );
    assert!(result.is_err());
}

#[test]
fn out_of_range_feature_is_rejected() {
    let json = r#"{
        "n_features": 1,
        "nodes": [
            {"feature": 1, "threshold": 10.0, "left": 1, "right": 2},
            {"label": 0},
            {"label": 1}
        ]
    }"#;
    let err = TreeClassifier::from_json(json).unwrap_err();
    assert!(err.to_string().contains("feature 1"));
}

#[test]
fn load_from_disk() {
    let path = std::env::temp_dir().join(format!("fraudcheck-tree-{}.json", std::process::id()));
    std::fs::write(&path, BANDED_TREE).unwrap();

    let tree = TreeClassifier::load(&path).unwrap();
    assert_eq!(tree.classify(&[1600.0]).unwrap(), 1);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn load_missing_file() {
    let err = TreeClassifier::load(std::path::Path::new("/nonexistent/tree.json")).unwrap_err();
    assert!(err.to_string().contains("Failed to read decision tree"));
}
