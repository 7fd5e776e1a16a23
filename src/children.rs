//! Keyed child-list diff with LIS-minimised moves
use crate::errors::{ReconcileError, Result};
use crate::sequence::longest_increasing_subsequence;
use crate::types::Key;
use std::collections::{HashMap, HashSet};

/// One step of the placement pass. `before` is the key immediately following
/// the subject in the new list; `None` means append at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildStep<'a> {
    /// Present in both lists and part of the stable subsequence.
    Keep(&'a Key),
    Move { key: &'a Key, before: Option<&'a Key> },
    Insert { key: &'a Key, before: Option<&'a Key> },
}

impl<'a> ChildStep<'a> {
    pub fn key(&self) -> &'a Key {
        match *self {
            ChildStep::Keep(key) => key,
            ChildStep::Move { key, .. } | ChildStep::Insert { key, .. } => key,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildListDiff<'a> {
    /// Old keys to remove, in old-list order. Emitted before any step.
    pub removed: Vec<&'a Key>,
    /// One step per new key, right to left, so every `before` anchor is
    /// already in its final place when referenced.
    pub steps: Vec<ChildStep<'a>>,
}

impl ChildListDiff<'_> {
    pub fn moves(&self) -> usize {
        self.steps.iter().filter(|s| matches!(s, ChildStep::Move { .. })).count()
    }

    pub fn inserts(&self) -> usize {
        self.steps.iter().filter(|s| matches!(s, ChildStep::Insert { .. })).count()
    }
}

/// Diff the children of `parent` between two rounds.
pub fn diff_children<'a>(parent: &Key, old_keys: &'a [Key], new_keys: &'a [Key]) -> Result<ChildListDiff<'a>> {
    diff_children_with(parent, old_keys, new_keys, |_| false)
}

/// Like [`diff_children`], but keys for which `recreate` returns true are
/// treated as removed and inserted again even though both lists hold them.
pub fn diff_children_with<'a>(
    parent: &Key,
    old_keys: &'a [Key],
    new_keys: &'a [Key],
    recreate: impl Fn(&Key) -> bool,
) -> Result<ChildListDiff<'a>> {
    let mut new_index: HashMap<&Key, usize> = HashMap::with_capacity(new_keys.len());
    for (pos, key) in new_keys.iter().enumerate() {
        if new_index.insert(key, pos).is_some() {
            return Err(duplicate(parent, key));
        }
    }
    let mut old_set: HashSet<&Key> = HashSet::with_capacity(old_keys.len());
    for key in old_keys {
        if !old_set.insert(key) {
            return Err(duplicate(parent, key));
        }
    }

    let mut removed = Vec::new();
    // new-list position of every surviving key, in old-list order
    let mut positions = Vec::with_capacity(old_keys.len().min(new_keys.len()));
    let mut common = vec![false; new_keys.len()];
    for key in old_keys {
        match new_index.get(key) {
            Some(&pos) if !recreate(key) => {
                positions.push(pos);
                common[pos] = true;
            }
            _ => removed.push(key),
        }
    }

    let mut stable = vec![false; new_keys.len()];
    for i in longest_increasing_subsequence(&positions) {
        stable[positions[i]] = true;
    }

    let mut steps = Vec::with_capacity(new_keys.len());
    for (pos, key) in new_keys.iter().enumerate().rev() {
        let before = new_keys.get(pos + 1);
        let step = if stable[pos] {
            ChildStep::Keep(key)
        } else if common[pos] {
            ChildStep::Move { key, before }
        } else {
            ChildStep::Insert { key, before }
        };
        steps.push(step);
    }

    log::trace!(
        "diff_children '{}': {} removed, {} moved, {} inserted",
        parent,
        removed.len(),
        positions.len() - stable.iter().filter(|s| **s).count(),
        new_keys.len() - positions.len()
    );

    Ok(ChildListDiff { removed, steps })
}

fn duplicate(parent: &Key, key: &Key) -> ReconcileError {
    ReconcileError::DuplicateKey { parent: parent.clone(), key: key.clone() }
}
