#![allow(dead_code)]

use std::collections::HashMap;
use tree_reconciler::{
    Element, Handle, HostAdapter, HostError, Key, Patch, PatchPayload, PriorState, Props,
    RenderPayload, Snapshot, DEFAULT_CONTAINER,
};

/// Hands out `h<n>` handles and renders the node type as the stub, so the
/// replayed tree can be compared against a snapshot. `fail_at` makes the n-th
/// allocation fail; `composable` types are not rendered.
#[derive(Debug, Default)]
pub struct TypedStubs {
    pub allocated: usize,
    pub fail_at: Option<usize>,
    pub composable: Vec<&'static str>,
}

impl TypedStubs {
    pub fn failing_at(n: usize) -> Self {
        TypedStubs { fail_at: Some(n), ..TypedStubs::default() }
    }

    pub fn with_composable(types: &[&'static str]) -> Self {
        TypedStubs { composable: types.to_vec(), ..TypedStubs::default() }
    }
}

impl HostAdapter for TypedStubs {
    fn allocate_handle(&mut self) -> Result<Handle, HostError> {
        self.allocated += 1;
        if self.fail_at == Some(self.allocated) {
            return Err(HostError::new("handle pool exhausted"));
        }
        Ok(Handle::new(format!("h{}", self.allocated)))
    }

    fn render_stub(&mut self, _handle: &Handle, node_type: &str, _props: &Props) -> Result<RenderPayload, HostError> {
        Ok(node_type.to_string())
    }

    fn renders(&self, node_type: &str) -> bool {
        !self.composable.iter().any(|t| *t == node_type)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelNode {
    pub node_type: String,
    pub props: Props,
    pub children: Vec<Handle>,
}

/// Host-side tree rebuilt purely from patches, applied in list order.
#[derive(Debug)]
pub struct ModelHost {
    pub nodes: HashMap<Handle, ModelNode>,
    parents: HashMap<Handle, Handle>,
    composable: Vec<&'static str>,
}

impl ModelHost {
    /// Expects `types` to be absent from the host, their children spliced
    /// into the nearest rendered ancestor.
    pub fn with_composable(types: &[&'static str]) -> Self {
        ModelHost { composable: types.to_vec(), ..ModelHost::new() }
    }

    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            container(),
            ModelNode { node_type: "container".into(), props: Props::new(), children: Vec::new() },
        );
        ModelHost { nodes, parents: HashMap::new(), composable: Vec::new() }
    }

    pub fn apply(&mut self, patches: &[Patch]) {
        for patch in patches {
            self.apply_one(patch);
        }
    }

    fn apply_one(&mut self, patch: &Patch) {
        let handle = &patch.handle;
        match &patch.payload {
            PatchPayload::Remove => {
                assert!(self.nodes.contains_key(handle), "REMOVE of unknown handle {handle}");
                self.detach(handle);
                self.drop_subtree(handle);
            }
            PatchPayload::Insert { stub, parent, before, props } => {
                assert!(!self.nodes.contains_key(handle), "INSERT reuses live handle {handle}");
                self.nodes.insert(
                    handle.clone(),
                    ModelNode { node_type: stub.clone(), props: props.clone(), children: Vec::new() },
                );
                let parent = parent.clone().unwrap_or_else(container);
                self.attach(handle, &parent, before.as_ref());
            }
            PatchPayload::Move { parent, before } => {
                assert!(self.nodes.contains_key(handle), "MOVE of unknown handle {handle}");
                let current = self.parents.get(handle).cloned();
                self.detach(handle);
                let parent = parent.clone().or(current).unwrap_or_else(container);
                self.attach(handle, &parent, before.as_ref());
            }
            PatchPayload::Update { delta } => {
                let node = self
                    .nodes
                    .get_mut(handle)
                    .unwrap_or_else(|| panic!("UPDATE of unknown handle {handle}"));
                for (name, value) in delta {
                    match value {
                        Some(value) => {
                            node.props.insert(name.clone(), value.clone());
                        }
                        None => {
                            node.props.shift_remove(name);
                        }
                    }
                }
            }
        }
    }

    fn attach(&mut self, handle: &Handle, parent: &Handle, before: Option<&Handle>) {
        let siblings = &mut self
            .nodes
            .get_mut(parent)
            .unwrap_or_else(|| panic!("unknown parent {parent}"))
            .children;
        let at = match before {
            Some(anchor) => siblings
                .iter()
                .position(|s| s == anchor)
                .unwrap_or_else(|| panic!("anchor {anchor} is not a child of {parent}")),
            None => siblings.len(),
        };
        siblings.insert(at, handle.clone());
        self.parents.insert(handle.clone(), parent.clone());
    }

    fn detach(&mut self, handle: &Handle) {
        if let Some(parent) = self.parents.remove(handle) {
            if let Some(node) = self.nodes.get_mut(&parent) {
                node.children.retain(|c| c != handle);
            }
        }
    }

    fn drop_subtree(&mut self, handle: &Handle) {
        if let Some(node) = self.nodes.remove(handle) {
            for child in node.children {
                self.parents.remove(&child);
                self.drop_subtree(&child);
            }
        }
    }

    /// Elements in the host, the container excluded.
    pub fn element_count(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn roots(&self) -> &[Handle] {
        &self.nodes[&container()].children
    }

    /// Panics unless the host tree is exactly `snapshot`, with every key at
    /// the handle recorded in `state`.
    pub fn assert_renders(&self, snapshot: &Snapshot, state: &PriorState) {
        assert_eq!(state.len(), snapshot.len());
        let rendered: Vec<_> = snapshot.nodes().filter(|n| self.renders(&n.node_type)).collect();
        assert_eq!(self.element_count(), rendered.len(), "host holds stray elements");
        assert_eq!(self.roots(), self.expected_roots(snapshot, state, snapshot.root()).as_slice());

        for node in rendered {
            let entry = &state[&node.key];
            let element = &self.nodes[&entry.handle];
            assert_eq!(element.node_type, node.node_type, "type of '{}'", node.key);
            assert_eq!(element.props, node.props, "props of '{}'", node.key);
            let expected: Vec<Handle> = node
                .children
                .iter()
                .flat_map(|k| self.expected_roots(snapshot, state, k))
                .collect();
            assert_eq!(element.children, expected, "children of '{}'", node.key);
        }
    }

    fn renders(&self, node_type: &str) -> bool {
        !self.composable.iter().any(|t| *t == node_type)
    }

    /// Host elements standing in for `key`: itself, or the rendered
    /// descendants of a composable node.
    fn expected_roots(&self, snapshot: &Snapshot, state: &PriorState, key: &Key) -> Vec<Handle> {
        let node = snapshot.get(key).expect("key in snapshot");
        if self.renders(&node.node_type) {
            return vec![state[key].handle.clone()];
        }
        node.children
            .iter()
            .flat_map(|k| self.expected_roots(snapshot, state, k))
            .collect()
    }
}

pub fn container() -> Handle {
    Handle::from(DEFAULT_CONTAINER)
}

pub fn key(k: &str) -> Key {
    Key::from(k)
}

/// `root` Column over one Text per key, with `data` = the key.
pub fn list(keys: &[&str]) -> Snapshot {
    let root = Element::new("root", "Column")
        .with_children(keys.iter().map(|k| Element::new(*k, "Text").with_prop("data", *k)));
    Snapshot::from_element(&root).expect("valid list")
}
