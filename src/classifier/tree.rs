// Decision tree classifier stored as JSON.
//
// Artifact layout:
//   {
//     "n_features": 1,
//     "nodes": [
//       {"feature": 0, "threshold": 1000.0, "left": 1, "right": 2},
//       {"label": 0},
//       {"label": 1}
//     ]
//   }
//
// Node 0 is the root. Splits send `x[feature] <= threshold` left and
// everything else right, the same convention scikit-learn trees use, so an
// exported sklearn tree maps onto this table one node per row.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

use super::traits::Classifier;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
    Leaf {
        label: i64,
    },
}

/// Artifact shape before validation.
#[derive(Deserialize)]
struct RawTree {
    n_features: usize,
    nodes: Vec<TreeNode>,
}

/// A validated decision tree. Every way of constructing one, including
/// deserializing it directly, runs the structural checks in `validate`.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeClassifier {
    n_features: usize,
    nodes: Vec<TreeNode>,
}

impl<'de> Deserialize<'de> for TreeClassifier {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawTree::deserialize(deserializer)?;
        Self::new(raw.n_features, raw.nodes).map_err(serde::de::Error::custom)
    }
}

impl TreeClassifier {
    /// Build a tree from already-deserialized nodes, checking its invariants.
    pub fn new(n_features: usize, nodes: Vec<TreeNode>) -> Result<Self> {
        let tree = Self { n_features, nodes };
        tree.validate()?;
        Ok(tree)
    }

    /// Parse and validate a tree from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawTree = serde_json::from_str(json).context("Invalid decision tree JSON")?;
        Self::new(raw.n_features, raw.nodes)
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Read a tree artifact from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read decision tree from {}", path.display()))?;
        Self::from_json(&json)
            .with_context(|| format!("Failed to load decision tree from {}", path.display()))
    }

    /// Children always point forward in the node table, so traversal from
    /// the root terminates in at most `nodes.len()` steps.
    fn validate(&self) -> Result<()> {
        if self.n_features == 0 {
            anyhow::bail!("Decision tree must use at least one feature");
        }
        if self.nodes.is_empty() {
            anyhow::bail!("Decision tree has no nodes");
        }

        for (index, node) in self.nodes.iter().enumerate() {
            let TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } = node
            else {
                continue;
            };

            if *feature >= self.n_features {
                anyhow::bail!(
                    "Node {index} splits on feature {feature}, but the tree has {} feature(s)",
                    self.n_features
                );
            }
            if !threshold.is_finite() {
                anyhow::bail!("Node {index} has a non-finite threshold");
            }
            for child in [*left, *right] {
                if child >= self.nodes.len() {
                    anyhow::bail!("Node {index} points at missing node {child}");
                }
                if child <= index {
                    anyhow::bail!("Node {index} points backwards to node {child}");
                }
            }
        }

        Ok(())
    }

    /// Walk the tree for one sample and return the leaf label.
    pub fn classify(&self, features: &[f32]) -> Result<i64> {
        if features.len() != self.n_features {
            anyhow::bail!(
                "Decision tree expects {} feature(s), got {}",
                self.n_features,
                features.len()
            );
        }

        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { label } => return Ok(*label),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, TreeNode::Leaf { .. }))
            .count()
    }
}

#[async_trait]
impl Classifier for TreeClassifier {
    async fn predict(&self, features: &[f32]) -> Result<i64> {
        self.classify(features)
    }

    fn describe(&self) -> String {
        format!(
            "tree:{} nodes, {} leaves, {} feature(s)",
            self.nodes.len(),
            self.leaf_count(),
            self.n_features
        )
    }
}
