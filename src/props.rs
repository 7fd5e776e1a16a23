//! Property values, property deltas and the per-node diff
use crate::snapshot::TreeNode;
use crate::types::{Handle, PriorStateEntry};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Key used to carry a [`Handle`] through JSON.
const HANDLE_TAG: &str = "$handle";

/// A JSON-like property value with structural equality.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum PropValue {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<PropValue>),
    Map(Props),
    Handle(Handle),
}

/// Property name to value. Equality ignores insertion order.
pub type Props = IndexMap<String, PropValue>;

/// Changed properties only. `None` marks a property that was removed.
pub type PropDelta = IndexMap<String, Option<PropValue>>;

impl PropValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Props> {
        match self {
            PropValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[PropValue]> {
        match self {
            PropValue::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropValue::Null)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::from(self.clone())
    }
}

impl From<serde_json::Value> for PropValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => PropValue::Null,
            serde_json::Value::Bool(b) => PropValue::Bool(b),
            serde_json::Value::Number(n) => PropValue::Number(n),
            serde_json::Value::String(s) => PropValue::String(s),
            serde_json::Value::Array(items) => {
                PropValue::List(items.into_iter().map(PropValue::from).collect())
            }
            serde_json::Value::Object(map) => {
                if map.len() == 1 {
                    if let Some(serde_json::Value::String(h)) = map.get(HANDLE_TAG) {
                        return PropValue::Handle(Handle::new(h.clone()));
                    }
                }
                PropValue::Map(map.into_iter().map(|(k, v)| (k, PropValue::from(v))).collect())
            }
        }
    }
}

impl From<PropValue> for serde_json::Value {
    fn from(value: PropValue) -> Self {
        match value {
            PropValue::Null => serde_json::Value::Null,
            PropValue::Bool(b) => serde_json::Value::Bool(b),
            PropValue::Number(n) => serde_json::Value::Number(n),
            PropValue::String(s) => serde_json::Value::String(s),
            PropValue::List(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            PropValue::Map(map) => serde_json::Value::Object(
                map.into_iter().map(|(k, v)| (k, serde_json::Value::from(v))).collect(),
            ),
            PropValue::Handle(h) => {
                let mut tagged = serde_json::Map::new();
                tagged.insert(HANDLE_TAG.to_string(), serde_json::Value::String(h.as_str().to_string()));
                serde_json::Value::Object(tagged)
            }
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::String(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::String(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Number(value.into())
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Number(value.into())
    }
}

impl From<u64> for PropValue {
    fn from(value: u64) -> Self {
        PropValue::Number(value.into())
    }
}

/// Non-finite floats have no JSON form and become `Null`.
impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(PropValue::Number)
            .unwrap_or(PropValue::Null)
    }
}

impl From<Handle> for PropValue {
    fn from(value: Handle) -> Self {
        PropValue::Handle(value)
    }
}

impl From<Props> for PropValue {
    fn from(value: Props) -> Self {
        PropValue::Map(value)
    }
}

impl From<Vec<PropValue>> for PropValue {
    fn from(value: Vec<PropValue>) -> Self {
        PropValue::List(value)
    }
}

/// Convert a JSON object into props. Non-object values yield `None`.
pub fn props_from_json(value: serde_json::Value) -> Option<Props> {
    match PropValue::from(value) {
        PropValue::Map(map) => Some(map),
        _ => None,
    }
}

/// Symmetric difference of two prop maps.
///
/// Keys present on one side only, or present on both with unequal values,
/// land in the delta. Order follows `old` first, then keys new in `new`.
pub fn diff_props(old: &Props, new: &Props) -> PropDelta {
    diff_props_filtered(old, new, |_| false)
}

/// [`diff_props`] that skips every property for which `ignore` returns true.
pub fn diff_props_filtered(old: &Props, new: &Props, ignore: impl Fn(&str) -> bool) -> PropDelta {
    let mut delta = PropDelta::new();
    for (name, old_value) in old {
        if ignore(name) {
            continue;
        }
        match new.get(name) {
            Some(new_value) if new_value == old_value => {}
            Some(new_value) => {
                delta.insert(name.clone(), Some(new_value.clone()));
            }
            None => {
                delta.insert(name.clone(), None);
            }
        }
    }
    for (name, new_value) in new {
        if !ignore(name) && !old.contains_key(name) {
            delta.insert(name.clone(), Some(new_value.clone()));
        }
    }
    delta
}

/// Outcome of comparing a prior entry with the new node for the same key.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeDiff {
    /// Node type changed: remove the old element and insert a fresh subtree.
    Replace,
    /// Same type; only the delta is sent to the host.
    Update(PropDelta),
    Unchanged,
}

impl NodeDiff {
    pub fn is_replace(&self) -> bool {
        matches!(self, NodeDiff::Replace)
    }
}

pub fn node_diff(
    old: &PriorStateEntry,
    new: &TreeNode,
    delta: impl FnOnce(&Props, &Props) -> PropDelta,
) -> NodeDiff {
    if old.node_type != new.node_type {
        return NodeDiff::Replace;
    }
    let changes = delta(&old.props, &new.props);
    if changes.is_empty() {
        NodeDiff::Unchanged
    } else {
        NodeDiff::Update(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Handle, Key};
    use serde_json::json;

    fn props(value: serde_json::Value) -> Props {
        props_from_json(value).unwrap()
    }

    fn entry(node_type: &str, p: Props) -> PriorStateEntry {
        PriorStateEntry {
            key: Key::from("k"),
            node_type: node_type.to_string(),
            props: p,
            handle: Handle::from("h1"),
            parent_handle: None,
            parent_key: None,
            children_keys: Vec::new(),
        }
    }

    #[test]
    fn one_changed_prop_out_of_ten_yields_one_key() {
        let mut old = Props::new();
        for i in 0..10 {
            old.insert(format!("p{i}"), PropValue::from(i as i64));
        }
        let mut new = old.clone();
        new.insert("p7".into(), PropValue::from("changed"));

        let delta = diff_props(&old, &new);
        assert_eq!(delta.len(), 1);
        assert_eq!(delta["p7"], Some(PropValue::from("changed")));
    }

    #[test]
    fn removed_and_added_props_are_both_reported() {
        let old = props(json!({"a": 1, "b": 2}));
        let new = props(json!({"b": 2, "c": 3}));
        let delta = diff_props(&old, &new);
        assert_eq!(delta.len(), 2);
        assert_eq!(delta["a"], None);
        assert_eq!(delta["c"], Some(PropValue::from(3i64)));
    }

    #[test]
    fn nested_values_compare_structurally() {
        let old = props(json!({"style": {"color": "red", "pad": [1, 2]}}));
        let new = props(json!({"style": {"pad": [1, 2], "color": "red"}}));
        assert!(diff_props(&old, &new).is_empty());

        let changed = props(json!({"style": {"pad": [2, 1], "color": "red"}}));
        assert_eq!(diff_props(&old, &changed).len(), 1);
    }

    #[test]
    fn handle_values_survive_json() {
        let value = PropValue::Handle(Handle::from("fw_id_3"));
        let json = value.to_json();
        assert_eq!(json, json!({"$handle": "fw_id_3"}));
        assert_eq!(PropValue::from(json), value);
        // extra fields make it a plain map
        let plain = PropValue::from(json!({"$handle": "x", "other": 1}));
        assert!(matches!(plain, PropValue::Map(_)));
    }

    #[test]
    fn filtered_diff_skips_ignored_names() {
        let old = props(json!({"onTap": "cb_1", "text": "a"}));
        let new = props(json!({"onTap": "cb_2", "text": "a"}));
        let delta = diff_props_filtered(&old, &new, |name| name == "onTap");
        assert!(delta.is_empty());
    }

    #[test]
    fn node_diff_replaces_on_type_change() {
        let old = entry("Text", props(json!({"data": "x"})));
        let new = TreeNode::new("k", "Container");
        assert_eq!(node_diff(&old, &new, diff_props), NodeDiff::Replace);
    }

    #[test]
    fn node_diff_reports_update_or_unchanged() {
        let old = entry("Text", props(json!({"data": "x"})));
        let same = TreeNode::new("k", "Text").with_prop("data", "x");
        assert_eq!(node_diff(&old, &same, diff_props), NodeDiff::Unchanged);

        let changed = TreeNode::new("k", "Text").with_prop("data", "y");
        match node_diff(&old, &changed, diff_props) {
            NodeDiff::Update(delta) => assert_eq!(delta["data"], Some(PropValue::from("y"))),
            other => panic!("expected update, got {other:?}"),
        }
    }
}
