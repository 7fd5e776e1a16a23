//! Tree walker: matches prior state against a new snapshot and assembles the
//! ordered patch stream plus the next round's state.
use crate::children::{diff_children_with, ChildStep};
use crate::config::ReconcileOptions;
use crate::errors::{ReconcileError, Result};
use crate::host::HostAdapter;
use crate::props::{node_diff, NodeDiff};
use crate::snapshot::{Snapshot, TreeNode};
use crate::types::*;
use std::collections::HashSet;

/// Reconcile `snapshot` against `prior`, asking `host` for handles and stubs.
pub fn reconcile<H: HostAdapter>(
    prior: &PriorState,
    snapshot: &Snapshot,
    host: &mut H,
    options: &ReconcileOptions,
) -> Result<ReconciliationResult> {
    DiffEngine::new(prior, snapshot, host).run(options)
}

/// Re-run the walk for the subtree at `root_key` only. Entries outside that
/// subtree are copied to the next state untouched.
pub fn reconcile_subtree<H: HostAdapter>(
    prior: &PriorState,
    snapshot: &Snapshot,
    root_key: &Key,
    host: &mut H,
) -> Result<ReconciliationResult> {
    reconcile(prior, snapshot, host, &ReconcileOptions::partial(root_key.clone()))
}

pub struct DiffEngine<'a, H: HostAdapter> {
    old_state: &'a PriorState,
    new_tree: &'a Snapshot,
    host: &'a mut H,
    result: ReconciliationResult,
    visited: HashSet<Key>,
}

impl<'a, H: HostAdapter> DiffEngine<'a, H> {
    pub fn new(old_state: &'a PriorState, new_tree: &'a Snapshot, host: &'a mut H) -> Self {
        DiffEngine {
            old_state,
            new_tree,
            host,
            result: ReconciliationResult::default(),
            visited: HashSet::new(),
        }
    }

    pub fn run(mut self, options: &ReconcileOptions) -> Result<ReconciliationResult> {
        let new_tree: &'a Snapshot = self.new_tree;
        let root_key = options.root_key.as_ref().unwrap_or(new_tree.root());
        let new_root = new_tree
            .get(root_key)
            .ok_or_else(|| ReconcileError::UnknownRoot(root_key.clone()))?;
        // a full pass rooted below the snapshot root only owns that subtree
        let scoped = !options.partial && root_key != new_tree.root();

        log::debug!(
            "reconcile: prior={} new={} root='{}' partial={} scoped={}",
            self.old_state.len(),
            new_tree.len(),
            root_key,
            options.partial,
            scoped
        );

        if options.partial || scoped {
            self.result.next_state = self.old_state.clone();
            self.reconcile_partial_root(new_root, &options.container)?;
            if scoped {
                self.sweep_unreached(Some(root_key));
            }
        } else {
            self.reconcile_full_root(new_root, options)?;
            self.sweep_unreached(None);
        }

        log::debug!(
            "reconcile: {} patches, {} live keys",
            self.result.patches.len(),
            self.result.next_state.len()
        );
        Ok(self.result)
    }

    fn reconcile_full_root(&mut self, new_root: &'a TreeNode, options: &ReconcileOptions) -> Result<()> {
        let container = &options.container;
        match self.resolve_old_root(options) {
            Some(old) if old.key == new_root.key => {
                let parent_handle = old.parent_handle.clone().unwrap_or_else(|| container.clone());
                self.diff_node(old, new_root, Some(&parent_handle), None, None)
            }
            Some(old) => {
                log::debug!("root key changed '{}' -> '{}'", old.key, new_root.key);
                self.remove_subtree(old);
                self.insert_subtree(new_root, Some(container), None, None).map(|_| ())
            }
            None => self.insert_subtree(new_root, Some(container), None, None).map(|_| ()),
        }
    }

    /// Explicit root key first, then the parentless entry mounted in the
    /// container, then whatever entry shares the new root's key.
    fn resolve_old_root(&self, options: &ReconcileOptions) -> Option<&'a PriorStateEntry> {
        let old_state: &'a PriorState = self.old_state;
        if let Some(entry) = options.root_key.as_ref().and_then(|k| old_state.get(k)) {
            return Some(entry);
        }
        let mut roots: Vec<&'a PriorStateEntry> = old_state
            .values()
            .filter(|e| e.parent_key.is_none() && e.parent_handle.as_ref() == Some(&options.container))
            .collect();
        if roots.len() > 1 {
            log::warn!("{} parentless entries under '{}'", roots.len(), options.container);
            roots.sort_by(|a, b| a.key.cmp(&b.key));
        }
        if let Some(root) = roots.first() {
            return Some(*root);
        }
        old_state.get(self.new_tree.root())
    }

    fn reconcile_partial_root(&mut self, new_root: &'a TreeNode, container: &Handle) -> Result<()> {
        let tail = self.following_anchor(&new_root.key);
        let Some(old) = self.old_entry(&new_root.key) else {
            return self.mount_unrecorded_root(new_root, container, tail);
        };
        self.diff_node(old, new_root, old.parent_handle.as_ref(), old.parent_key.as_ref(), tail)
    }

    /// A partial root with no prior entry goes under the prior entry that
    /// lists it as a child, or into the container when none does.
    fn mount_unrecorded_root(&mut self, new_root: &'a TreeNode, container: &Handle, before: Option<Handle>) -> Result<()> {
        let old_state: &'a PriorState = self.old_state;
        match parent_entry(old_state, &new_root.key) {
            Some(parent) => {
                log::debug!("partial root '{}' is new; mounting under '{}'", new_root.key, parent.key);
                let host_parent = self.child_host_parent(parent);
                self.insert_subtree(new_root, host_parent.as_ref(), Some(&parent.key), before)
                    .map(|_| ())
            }
            None => {
                log::warn!("partial root '{}' has no prior entry or parent; mounting in the container", new_root.key);
                self.insert_subtree(new_root, Some(container), None, None).map(|_| ())
            }
        }
    }

    /// `before` is the host element that follows this node: the insert anchor
    /// on replace and the end of the child list when the node is composable.
    fn diff_node(
        &mut self,
        old: &'a PriorStateEntry,
        new: &'a TreeNode,
        parent_handle: Option<&Handle>,
        parent_key: Option<&Key>,
        before: Option<Handle>,
    ) -> Result<()> {
        let host: &H = &*self.host;
        let renders = host.renders(&new.node_type);
        match node_diff(old, new, |a, b| host.prop_delta(a, b)) {
            NodeDiff::Replace => {
                self.note_replace(old, new);
                self.remove_subtree(old);
                self.insert_subtree(new, parent_handle, parent_key, before)?;
                Ok(())
            }
            NodeDiff::Update(delta) if renders => {
                log::trace!("update '{}' ({} props)", new.key, delta.len());
                self.result.patches.push(Patch {
                    handle: old.handle.clone(),
                    payload: PatchPayload::Update { delta },
                });
                self.update_node(old, new, parent_handle, parent_key, before)
            }
            NodeDiff::Update(_) | NodeDiff::Unchanged => self.update_node(old, new, parent_handle, parent_key, before),
        }
    }

    fn update_node(
        &mut self,
        old: &'a PriorStateEntry,
        new: &'a TreeNode,
        parent_handle: Option<&Handle>,
        parent_key: Option<&Key>,
        tail: Option<Handle>,
    ) -> Result<()> {
        self.visited.insert(new.key.clone());
        self.result.next_state.insert(
            new.key.clone(),
            PriorStateEntry {
                key: new.key.clone(),
                node_type: new.node_type.clone(),
                props: new.props.clone(),
                handle: old.handle.clone(),
                parent_handle: parent_handle.cloned(),
                parent_key: parent_key.cloned(),
                children_keys: new.children.clone(),
            },
        );
        if self.host.renders(&new.node_type) {
            self.diff_child_list(old, new, Some(old.handle.clone()), None)
        } else {
            self.diff_child_list(old, new, parent_handle.cloned(), tail)
        }
    }

    /// `host_parent` is the element the children live in and `tail` the
    /// element that ends their run (`None`: end of `host_parent`).
    fn diff_child_list(
        &mut self,
        old: &'a PriorStateEntry,
        new: &'a TreeNode,
        host_parent: Option<Handle>,
        tail: Option<Handle>,
    ) -> Result<()> {
        if old.children_keys.is_empty() && new.children.is_empty() {
            return Ok(());
        }

        let old_state: &'a PriorState = self.old_state;
        let new_tree: &'a Snapshot = self.new_tree;

        // A child listed without an entry degrades to a fresh insert.
        let old_children: Vec<Key> = old
            .children_keys
            .iter()
            .filter(|k| {
                let known = old_state.contains_key(*k);
                if !known {
                    log::warn!("stale state: child '{}' of '{}' has no prior entry", k, old.key);
                }
                known
            })
            .cloned()
            .collect();

        let diff = diff_children_with(&new.key, &old_children, &new.children, |k| {
            match (old_state.get(k), new_tree.get(k)) {
                (Some(o), Some(n)) => o.node_type != n.node_type,
                _ => false,
            }
        })?;

        for &key in &diff.removed {
            let Some(entry) = old_state.get(key) else { continue };
            if let Some(node) = new_tree.get(key) {
                if node.node_type != entry.node_type {
                    self.note_replace(entry, node);
                }
            }
            self.remove_subtree(entry);
        }

        // steps run right to left, one per new child
        let last = new.children.len();
        for (i, step) in diff.steps.iter().enumerate() {
            let following = &new.children[last - i..];
            let anchor = self.anchor_among(following, tail.as_ref());
            match *step {
                ChildStep::Keep(key) => {
                    let (old_child, new_child) = self.pair(&new.key, key)?;
                    self.diff_node(old_child, new_child, host_parent.as_ref(), Some(&new.key), anchor)?;
                }
                ChildStep::Move { key, .. } => {
                    let (old_child, new_child) = self.pair(&new.key, key)?;
                    log::trace!("move '{}' before {:?}", key, anchor);
                    for handle in self.rendered_roots(old_state, old_child) {
                        self.result.patches.push(Patch {
                            handle,
                            payload: PatchPayload::Move {
                                parent: host_parent.clone(),
                                before: anchor.clone(),
                            },
                        });
                    }
                    self.diff_node(old_child, new_child, host_parent.as_ref(), Some(&new.key), anchor)?;
                }
                ChildStep::Insert { key, .. } => {
                    let new_child = self.new_node(&new.key, key)?;
                    self.insert_subtree(new_child, host_parent.as_ref(), Some(&new.key), anchor)?;
                }
            }
        }
        Ok(())
    }

    /// INSERT `node` and, appended in order beneath it, every descendant.
    /// A composable node gets a handle and a state entry but no INSERT; its
    /// children go straight into `parent_handle` ahead of `before`.
    fn insert_subtree(
        &mut self,
        node: &'a TreeNode,
        parent_handle: Option<&Handle>,
        parent_key: Option<&Key>,
        before: Option<Handle>,
    ) -> Result<Handle> {
        let handle = self
            .host
            .allocate_handle()
            .map_err(|e| ReconcileError::host(&node.key, e))?;
        let renders = self.host.renders(&node.node_type);

        if renders {
            let stub = self
                .host
                .render_stub(&handle, &node.node_type, &node.props)
                .map_err(|e| ReconcileError::host(&node.key, e))?;
            log::trace!("insert '{}' as {} before {:?}", node.key, handle, before);
            self.result.patches.push(Patch {
                handle: handle.clone(),
                payload: PatchPayload::Insert {
                    stub,
                    parent: parent_handle.cloned(),
                    before: before.clone(),
                    props: node.props.clone(),
                },
            });
            let initializers = self.host.mount_initializers(&handle, node);
            self.result.initializers.extend(initializers);
        } else {
            log::trace!("'{}' ({}) is composable; children attach to {:?}", node.key, node.node_type, parent_handle);
        }

        self.visited.insert(node.key.clone());
        self.result.next_state.insert(
            node.key.clone(),
            PriorStateEntry {
                key: node.key.clone(),
                node_type: node.node_type.clone(),
                props: node.props.clone(),
                handle: handle.clone(),
                parent_handle: parent_handle.cloned(),
                parent_key: parent_key.cloned(),
                children_keys: node.children.clone(),
            },
        );

        let (child_parent, child_before) = if renders {
            (Some(handle.clone()), None)
        } else {
            (parent_handle.cloned(), before)
        };
        for child_key in &node.children {
            let child = self.new_node(&node.key, child_key)?;
            self.insert_subtree(child, child_parent.as_ref(), Some(&node.key), child_before.clone())?;
        }
        Ok(handle)
    }

    /// One REMOVE per top-most rendered element of the subtree; descendants
    /// leave the next state without patches of their own.
    fn remove_subtree(&mut self, entry: &'a PriorStateEntry) {
        let old_state: &'a PriorState = self.old_state;
        log::trace!("remove '{}' ({})", entry.key, entry.handle);
        let handles = self.rendered_roots(old_state, entry);
        self.result.patches.extend(handles.into_iter().map(Patch::remove));
        self.purge(entry);
    }

    fn purge(&mut self, entry: &'a PriorStateEntry) {
        let old_state: &'a PriorState = self.old_state;
        let mut seen: HashSet<&Key> = HashSet::new();
        let mut stack = vec![entry];
        while let Some(current) = stack.pop() {
            if !seen.insert(&current.key) {
                continue;
            }
            // an entry written this round under the same key (re-parented
            // element) belongs to the new tree and stays
            if self
                .result
                .next_state
                .get(&current.key)
                .is_some_and(|e| e.handle == current.handle)
            {
                self.result.next_state.remove(&current.key);
            }
            self.result.removed_keys.push(current.key.clone());
            stack.extend(current.children_keys.iter().filter_map(|k| old_state.get(k)));
        }
    }

    /// Prior entries the walk never reached and no REMOVE covered. The
    /// top-most of them still exist in the host, so they get removed here.
    /// With `scope`, only descendants of that key are considered.
    fn sweep_unreached(&mut self, scope: Option<&Key>) {
        let old_state: &'a PriorState = self.old_state;
        let removed: HashSet<Key> = self.result.removed_keys.iter().cloned().collect();
        let mut unreached: Vec<&'a PriorStateEntry> = old_state
            .values()
            .filter(|e| !self.visited.contains(&e.key) && !removed.contains(&e.key))
            .filter(|e| scope.is_none_or(|root| descends_from(old_state, e, root)))
            .collect();
        if unreached.is_empty() {
            return;
        }
        unreached.sort_by(|a, b| a.key.cmp(&b.key));
        let unreached_keys: HashSet<&Key> = unreached.iter().map(|e| &e.key).collect();

        for entry in &unreached {
            let covered = entry
                .parent_key
                .as_ref()
                .is_some_and(|p| unreached_keys.contains(p) || removed.contains(p));
            if !covered {
                log::warn!("removing unreached prior entry '{}' ({})", entry.key, entry.handle);
                let handles = self.rendered_roots(old_state, entry);
                self.result.patches.extend(handles.into_iter().map(Patch::remove));
            }
            if self
                .result
                .next_state
                .get(&entry.key)
                .is_some_and(|e| e.handle == entry.handle)
            {
                self.result.next_state.remove(&entry.key);
            }
        }
        self.result
            .removed_keys
            .extend(unreached.into_iter().map(|e| e.key.clone()));
    }

    fn note_replace(&mut self, old: &PriorStateEntry, new: &TreeNode) {
        log::debug!(
            "identity churn: '{}' changed type {} -> {}, replacing subtree",
            new.key,
            old.node_type,
            new.node_type
        );
        self.result.replaced_keys.push(new.key.clone());
    }

    /// Host element a child of `entry` attaches to.
    fn child_host_parent(&self, entry: &PriorStateEntry) -> Option<Handle> {
        if self.host.renders(&entry.node_type) {
            Some(entry.handle.clone())
        } else {
            entry.parent_handle.clone()
        }
    }

    /// Handles the host holds for `entry`: its own, or for a composable node
    /// those of its top-most rendered descendants, in order.
    fn rendered_roots(&self, state: &PriorState, entry: &PriorStateEntry) -> Vec<Handle> {
        if self.host.renders(&entry.node_type) {
            return vec![entry.handle.clone()];
        }
        entry
            .children_keys
            .iter()
            .filter_map(|k| state.get(k))
            .flat_map(|child| self.rendered_roots(state, child))
            .collect()
    }

    fn first_rendered(&self, state: &PriorState, keys: &[Key]) -> Option<Handle> {
        keys.iter().filter_map(|k| state.get(k)).find_map(|entry| {
            if self.host.renders(&entry.node_type) {
                Some(entry.handle.clone())
            } else {
                self.first_rendered(state, &entry.children_keys)
            }
        })
    }

    /// First host element among already placed `siblings`, else `tail`.
    fn anchor_among(&self, siblings: &[Key], tail: Option<&Handle>) -> Option<Handle> {
        self.first_rendered(&self.result.next_state, siblings)
            .or_else(|| tail.cloned())
    }

    /// Host element that follows `key` in the current state, looking past
    /// the end of composable parents.
    fn following_anchor(&self, key: &Key) -> Option<Handle> {
        let state = &self.result.next_state;
        let mut current = key.clone();
        for _ in 0..=state.len() {
            let parent = parent_entry(state, &current)?;
            let pos = parent.children_keys.iter().position(|k| *k == current)?;
            if let Some(handle) = self.first_rendered(state, &parent.children_keys[pos + 1..]) {
                return Some(handle);
            }
            if self.host.renders(&parent.node_type) {
                return None;
            }
            current = parent.key.clone();
        }
        None
    }

    fn old_entry(&self, key: &Key) -> Option<&'a PriorStateEntry> {
        self.old_state.get(key)
    }

    fn new_node(&self, parent: &Key, key: &Key) -> Result<&'a TreeNode> {
        self.new_tree.get(key).ok_or_else(|| ReconcileError::MissingNode {
            parent: parent.clone(),
            key: key.clone(),
        })
    }

    fn pair(&self, parent: &Key, key: &Key) -> Result<(&'a PriorStateEntry, &'a TreeNode)> {
        let old = self.old_entry(key).ok_or_else(|| ReconcileError::MissingNode {
            parent: parent.clone(),
            key: key.clone(),
        })?;
        Ok((old, self.new_node(parent, key)?))
    }
}

/// The entry `key` hangs under: its recorded parent, else the (lowest-keyed)
/// entry listing it as a child.
fn parent_entry<'s>(state: &'s PriorState, key: &Key) -> Option<&'s PriorStateEntry> {
    if let Some(parent) = state
        .get(key)
        .and_then(|e| e.parent_key.as_ref())
        .and_then(|p| state.get(p))
    {
        return Some(parent);
    }
    state
        .values()
        .filter(|e| e.children_keys.contains(key))
        .min_by(|a, b| a.key.cmp(&b.key))
}

fn descends_from(state: &PriorState, entry: &PriorStateEntry, root: &Key) -> bool {
    let mut parent = entry.parent_key.as_ref();
    for _ in 0..state.len() {
        match parent {
            Some(p) if p == root => return true,
            Some(p) => parent = state.get(p).and_then(|e| e.parent_key.as_ref()),
            None => return false,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SequentialHandles;
    use crate::snapshot::Element;

    fn list(keys: &[&str]) -> Snapshot {
        let root = Element::new("root", "Column")
            .with_children(keys.iter().map(|k| Element::new(*k, "Text").with_prop("data", *k)));
        Snapshot::from_element(&root).unwrap()
    }

    fn mount(snapshot: &Snapshot, host: &mut SequentialHandles) -> PriorState {
        reconcile(&PriorState::new(), snapshot, host, &ReconcileOptions::default())
            .unwrap()
            .next_state
    }

    #[test]
    fn first_round_inserts_parent_before_children() {
        let mut host = SequentialHandles::default();
        let result = reconcile(&PriorState::new(), &list(&["a", "b"]), &mut host, &ReconcileOptions::default()).unwrap();

        let actions: Vec<_> = result.patches.iter().map(Patch::action).collect();
        assert_eq!(actions, vec![PatchAction::Insert; 3]);
        assert_eq!(result.patches[0].parent(), Some(&Handle::from("root-container")));
        let root_handle = &result.next_state[&Key::from("root")].handle;
        assert!(result.patches[1..].iter().all(|p| p.parent() == Some(root_handle) && p.before().is_none()));
        assert_eq!(result.next_state.len(), 3);
    }

    #[test]
    fn keyed_reorder_emits_minimal_moves() {
        let mut host = SequentialHandles::default();
        let prior = mount(&list(&["a", "b", "c", "d", "e"]), &mut host);
        let handle = |k: &str| prior[&Key::from(k)].handle.clone();

        let result = reconcile(&prior, &list(&["a", "d", "c", "f", "b"]), &mut host, &ReconcileOptions::default()).unwrap();
        let f = result.next_state[&Key::from("f")].handle.clone();

        assert_eq!(result.patches.len(), 4);
        assert_eq!(result.patches[0], Patch::remove(handle("e")));
        assert_eq!(result.patches[1].action(), PatchAction::Insert);
        assert_eq!(result.patches[1].handle, f);
        assert_eq!(result.patches[1].before(), Some(&handle("b")));
        assert_eq!(result.patches[2].handle, handle("c"));
        assert_eq!(result.patches[2].action(), PatchAction::Move);
        assert_eq!(result.patches[2].before(), Some(&f));
        assert_eq!(result.patches[3].handle, handle("d"));
        assert_eq!(result.patches[3].before(), Some(&handle("c")));
    }

    #[test]
    fn changed_root_key_swaps_the_whole_tree() {
        let mut host = SequentialHandles::default();
        let prior = mount(&list(&["a"]), &mut host);
        let other = Snapshot::from_element(&Element::new("other", "Column")).unwrap();

        let result = reconcile(&prior, &other, &mut host, &ReconcileOptions::default()).unwrap();
        let actions: Vec<_> = result.patches.iter().map(Patch::action).collect();
        assert_eq!(actions, vec![PatchAction::Remove, PatchAction::Insert]);
        assert_eq!(result.next_state.len(), 1);
        assert_eq!(result.removed_keys.len(), 2);
    }

    #[test]
    fn stale_child_entry_degrades_to_insert() {
        let mut host = SequentialHandles::default();
        let mut prior = mount(&list(&["a", "b"]), &mut host);
        prior.remove(&Key::from("b"));

        let result = reconcile(&prior, &list(&["a", "b"]), &mut host, &ReconcileOptions::default()).unwrap();
        assert_eq!(result.patches.len(), 1);
        assert_eq!(result.patches[0].action(), PatchAction::Insert);
        assert!(result.next_state.contains_key(&Key::from("b")));
    }

    #[test]
    fn orphaned_prior_entries_are_swept() {
        let mut host = SequentialHandles::default();
        let mut prior = mount(&list(&["a", "b"]), &mut host);
        // "b" still lives in the host but its parent forgot it
        prior
            .get_mut(&Key::from("root"))
            .unwrap()
            .children_keys
            .retain(|k| k.as_str() != "b");
        let b = prior[&Key::from("b")].handle.clone();

        let result = reconcile(&prior, &list(&["a"]), &mut host, &ReconcileOptions::default()).unwrap();
        assert_eq!(result.patches, vec![Patch::remove(b)]);
        assert_eq!(result.removed_keys, vec![Key::from("b")]);
    }

    fn nested() -> Snapshot {
        let root = Element::new("root", "Column")
            .with_child(Element::new("list", "Column").with_children(["a", "b"].map(|k| Element::new(k, "Text"))))
            .with_child(Element::new("side", "Column").with_child(Element::new("s", "Text")));
        Snapshot::from_element(&root).unwrap()
    }

    #[test]
    fn full_pass_at_an_interior_key_keeps_the_tree_root() {
        let mut host = SequentialHandles::default();
        let prior = mount(&nested(), &mut host);

        let options = ReconcileOptions::default().with_root("list");
        let result = reconcile(&prior, &nested(), &mut host, &options).unwrap();
        assert!(result.patches.is_empty());
        assert!(result.removed_keys.is_empty());
        assert_eq!(result.next_state, prior);
    }

    #[test]
    fn same_type_key_under_a_new_parent_is_not_replaced() {
        let mut host = SequentialHandles::default();
        let prior = mount(&nested(), &mut host);
        let moved = Element::new("root", "Column")
            .with_child(Element::new("list", "Column").with_child(Element::new("a", "Text")))
            .with_child(
                Element::new("side", "Column")
                    .with_child(Element::new("s", "Text"))
                    .with_child(Element::new("b", "Text")),
            );

        let result = reconcile(&prior, &Snapshot::from_element(&moved).unwrap(), &mut host, &ReconcileOptions::default()).unwrap();
        assert!(result.replaced_keys.is_empty());
        assert_eq!(result.next_state[&Key::from("b")].parent_key, Some(Key::from("side")));
    }

    #[test]
    fn unknown_partial_root_is_an_error() {
        let mut host = SequentialHandles::default();
        let err = reconcile(&PriorState::new(), &list(&["a"]), &mut host, &ReconcileOptions::partial("zzz")).unwrap_err();
        assert!(matches!(err, ReconcileError::UnknownRoot(_)));
    }
}
