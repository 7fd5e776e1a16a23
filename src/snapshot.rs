//! Key-addressed snapshot of one tree version
use crate::errors::{ReconcileError, Result};
use crate::props::{PropValue, Props};
use crate::types::Key;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One node of a snapshot. Children are referenced by key, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub key: Key,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub props: Props,
    #[serde(default)]
    pub children: Vec<Key>,
}

impl TreeNode {
    pub fn new(key: impl Into<Key>, node_type: impl Into<String>) -> Self {
        TreeNode {
            key: key.into(),
            node_type: node_type.into(),
            props: Props::new(),
            children: Vec::new(),
        }
    }

    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    pub fn with_children<K: Into<Key>>(mut self, children: impl IntoIterator<Item = K>) -> Self {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }
}

/// Nested description of a live tree, flattened into a [`Snapshot`] by a
/// full traversal.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub key: Key,
    pub node_type: String,
    pub props: Props,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(key: impl Into<Key>, node_type: impl Into<String>) -> Self {
        Element {
            key: key.into(),
            node_type: node_type.into(),
            props: Props::new(),
            children: Vec::new(),
        }
    }

    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }
}

/// Every node of a tree (or subtree) keyed by its [`Key`], plus the root key.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    root: Key,
    nodes: HashMap<Key, TreeNode>,
}

impl Snapshot {
    /// Flatten a nested element tree. Keys must be unique across the whole
    /// tree because the snapshot is a single key map.
    pub fn from_element(root: &Element) -> Result<Self> {
        let mut nodes = HashMap::new();
        nodes.insert(root.key.clone(), flat_node(root));

        let mut stack = vec![root];
        while let Some(element) = stack.pop() {
            for child in &element.children {
                if nodes.insert(child.key.clone(), flat_node(child)).is_some() {
                    return Err(ReconcileError::DuplicateKey {
                        parent: element.key.clone(),
                        key: child.key.clone(),
                    });
                }
                stack.push(child);
            }
        }

        Ok(Snapshot { root: root.key.clone(), nodes })
    }

    /// Build from already-flat nodes and check the structure reachable from
    /// `root`: every child exists, no key is reachable twice.
    pub fn from_nodes(root: impl Into<Key>, nodes: impl IntoIterator<Item = TreeNode>) -> Result<Self> {
        let snapshot = Snapshot {
            root: root.into(),
            nodes: nodes.into_iter().map(|n| (n.key.clone(), n)).collect(),
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    fn validate(&self) -> Result<()> {
        let root = self
            .nodes
            .get(&self.root)
            .ok_or_else(|| ReconcileError::UnknownRoot(self.root.clone()))?;

        let mut seen: HashSet<&Key> = HashSet::from([&root.key]);
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            for child_key in &node.children {
                if !seen.insert(child_key) {
                    return Err(ReconcileError::DuplicateKey {
                        parent: node.key.clone(),
                        key: child_key.clone(),
                    });
                }
                let child = self.nodes.get(child_key).ok_or_else(|| ReconcileError::MissingNode {
                    parent: node.key.clone(),
                    key: child_key.clone(),
                })?;
                stack.push(child);
            }
        }
        Ok(())
    }

    pub fn root(&self) -> &Key {
        &self.root
    }

    pub fn get(&self, key: &Key) -> Option<&TreeNode> {
        self.nodes.get(key)
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.values()
    }

    /// Copy of the subtree rooted at `key`, e.g. for a localized refresh.
    pub fn subtree(&self, key: &Key) -> Result<Snapshot> {
        let root = self
            .nodes
            .get(key)
            .ok_or_else(|| ReconcileError::UnknownRoot(key.clone()))?;
        let mut nodes = HashMap::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            nodes.insert(node.key.clone(), node.clone());
            for child_key in &node.children {
                if let Some(child) = self.nodes.get(child_key) {
                    stack.push(child);
                }
            }
        }
        Ok(Snapshot { root: key.clone(), nodes })
    }
}

fn flat_node(element: &Element) -> TreeNode {
    TreeNode {
        key: element.key.clone(),
        node_type: element.node_type.clone(),
        props: element.props.clone(),
        children: element.children.iter().map(|c| c.key.clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_tree_flattens_in_child_order() {
        let tree = Element::new("root", "Column")
            .with_child(Element::new("a", "Text").with_prop("data", "A"))
            .with_child(Element::new("b", "Row").with_child(Element::new("c", "Text")));

        let snapshot = Snapshot::from_element(&tree).unwrap();
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.root(), &Key::from("root"));
        let root = snapshot.get(&Key::from("root")).unwrap();
        assert_eq!(root.children, vec![Key::from("a"), Key::from("b")]);
        assert_eq!(snapshot.get(&Key::from("b")).unwrap().children, vec![Key::from("c")]);
    }

    #[test]
    fn duplicate_sibling_keys_are_rejected() {
        let tree = Element::new("root", "Column")
            .with_child(Element::new("a", "Text"))
            .with_child(Element::new("a", "Text"));
        let err = Snapshot::from_element(&tree).unwrap_err();
        assert!(matches!(err, ReconcileError::DuplicateKey { ref key, .. } if key.as_str() == "a"));
    }

    #[test]
    fn flat_nodes_must_reference_existing_children() {
        let err = Snapshot::from_nodes(
            "root",
            [TreeNode::new("root", "Column").with_children(["a", "ghost"]), TreeNode::new("a", "Text")],
        )
        .unwrap_err();
        assert!(matches!(err, ReconcileError::MissingNode { ref key, .. } if key.as_str() == "ghost"));
    }

    #[test]
    fn flat_nodes_reject_repeated_child_and_missing_root() {
        let err = Snapshot::from_nodes(
            "root",
            [TreeNode::new("root", "Column").with_children(["a", "a"]), TreeNode::new("a", "Text")],
        )
        .unwrap_err();
        assert!(matches!(err, ReconcileError::DuplicateKey { .. }));

        let err = Snapshot::from_nodes("nope", [TreeNode::new("root", "Column")]).unwrap_err();
        assert!(matches!(err, ReconcileError::UnknownRoot(_)));
    }

    #[test]
    fn subtree_keeps_only_descendants() {
        let tree = Element::new("root", "Column")
            .with_child(Element::new("list", "Column").with_child(Element::new("item", "Text")))
            .with_child(Element::new("footer", "Text"));
        let snapshot = Snapshot::from_element(&tree).unwrap();
        let sub = snapshot.subtree(&Key::from("list")).unwrap();
        assert_eq!(sub.root(), &Key::from("list"));
        assert_eq!(sub.len(), 2);
        assert!(!sub.contains(&Key::from("footer")));
    }
}
