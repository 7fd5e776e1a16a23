//! Identity, handle, patch and prior-state types shared by the engine and hosts
use crate::props::{PropDelta, Props};
use once_cell::sync::Lazy;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Caller-assigned identity of a logical UI element.
///
/// Keys must be unique among siblings and stable across tree versions; a key
/// that changes between rounds is treated as a different element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    pub fn new(value: impl Into<String>) -> Self {
        Key(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key(value)
    }
}

impl From<u64> for Key {
    fn from(value: u64) -> Self {
        Key(value.to_string())
    }
}

impl From<usize> for Key {
    fn from(value: usize) -> Self {
        Key(value.to_string())
    }
}

/// Opaque identifier issued by the host for a materialized element.
/// The engine never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
    pub fn new(value: impl Into<String>) -> Self {
        Handle(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Handle {
    fn from(value: &str) -> Self {
        Handle(value.to_string())
    }
}

impl From<String> for Handle {
    fn from(value: String) -> Self {
        Handle(value)
    }
}

/// Initial representation produced by the host for a freshly inserted node
/// (an HTML fragment for the webview host).
pub type RenderPayload = String;

/// Patch action discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatchAction {
    Remove,
    Insert,
    Move,
    Update,
}

impl PatchAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchAction::Remove => "REMOVE",
            PatchAction::Insert => "INSERT",
            PatchAction::Move => "MOVE",
            PatchAction::Update => "UPDATE",
        }
    }
}

impl fmt::Display for PatchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action-specific patch data. Anchors (`before`) name the handle the subject
/// is placed in front of; `None` means append at the end of `parent`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PatchPayload {
    Remove,
    Insert {
        stub: RenderPayload,
        parent: Option<Handle>,
        before: Option<Handle>,
        props: Props,
    },
    Move {
        parent: Option<Handle>,
        before: Option<Handle>,
    },
    Update {
        delta: PropDelta,
    },
}

/// One mutation against the host representation, addressed by backend handle.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub handle: Handle,
    pub payload: PatchPayload,
}

impl Patch {
    pub fn remove(handle: Handle) -> Self {
        Patch { handle, payload: PatchPayload::Remove }
    }

    pub fn action(&self) -> PatchAction {
        match self.payload {
            PatchPayload::Remove => PatchAction::Remove,
            PatchPayload::Insert { .. } => PatchAction::Insert,
            PatchPayload::Move { .. } => PatchAction::Move,
            PatchPayload::Update { .. } => PatchAction::Update,
        }
    }

    /// Anchor handle for INSERT and MOVE patches.
    pub fn before(&self) -> Option<&Handle> {
        match &self.payload {
            PatchPayload::Insert { before, .. } | PatchPayload::Move { before, .. } => {
                before.as_ref()
            }
            _ => None,
        }
    }

    /// Parent handle for INSERT and MOVE patches.
    pub fn parent(&self) -> Option<&Handle> {
        match &self.payload {
            PatchPayload::Insert { parent, .. } | PatchPayload::Move { parent, .. } => {
                parent.as_ref()
            }
            _ => None,
        }
    }
}

impl Serialize for Patch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Patch", 3)?;
        state.serialize_field("action", &self.action())?;
        state.serialize_field("handle", &self.handle)?;
        state.serialize_field("data", &self.payload)?;
        state.end()
    }
}

/// The engine's memory of one key from the previous round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorStateEntry {
    pub key: Key,
    #[serde(rename = "type")]
    pub node_type: String,
    pub props: Props,
    pub handle: Handle,
    pub parent_handle: Option<Handle>,
    pub parent_key: Option<Key>,
    pub children_keys: Vec<Key>,
}

/// Prior state for a whole tree: every live key mapped to its entry.
pub type PriorState = HashMap<Key, PriorStateEntry>;

/// Host-side initializer queued for a freshly mounted element
/// (scrollbars, clip paths, plugin engines).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Initializer {
    #[serde(rename = "type")]
    pub init_type: String,
    pub target_id: Option<Handle>,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Everything one reconciliation call produces.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconciliationResult {
    /// Mutations to apply in list order.
    pub patches: Vec<Patch>,
    /// Authoritative input for the next call.
    pub next_state: PriorState,
    /// Every key dropped this round, including descendants covered by an
    /// ancestor's REMOVE.
    pub removed_keys: Vec<Key>,
    /// Keys re-created because their node type changed.
    pub replaced_keys: Vec<Key>,
    pub initializers: Vec<Initializer>,
}

impl ReconciliationResult {
    pub fn is_noop(&self) -> bool {
        self.patches.is_empty()
    }
}

// Process-wide so handles never collide across contexts or reconcilers.
static ID_COUNTER: Lazy<AtomicUsize> = Lazy::new(|| AtomicUsize::new(0));

pub fn next_id() -> Handle {
    let id = ID_COUNTER.fetch_add(1, Ordering::SeqCst);
    Handle(format!("fw_id_{}", id))
}
