//! Per-call reconciliation options
use crate::errors::Result;
use crate::types::{Handle, Key};
use serde::{Deserialize, Serialize};

/// Host element that holds the tree root when nothing else is known.
pub const DEFAULT_CONTAINER: &str = "root-container";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileOptions {
    /// Key to start the walk at. Defaults to the snapshot root.
    pub root_key: Option<Key>,
    /// Only rewrite the subtree under `root_key`; every other prior entry is
    /// carried over verbatim.
    pub partial: bool,
    /// Parent handle of the tree root.
    pub container: Handle,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        ReconcileOptions {
            root_key: None,
            partial: false,
            container: Handle::from(DEFAULT_CONTAINER),
        }
    }
}

impl ReconcileOptions {
    /// Localized refresh of the subtree rooted at `root_key`.
    pub fn partial(root_key: impl Into<Key>) -> Self {
        ReconcileOptions {
            root_key: Some(root_key.into()),
            partial: true,
            ..Default::default()
        }
    }

    pub fn with_root(mut self, root_key: impl Into<Key>) -> Self {
        self.root_key = Some(root_key.into());
        self
    }

    pub fn with_container(mut self, container: impl Into<Handle>) -> Self {
        self.container = container.into();
        self
    }

    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let options = ReconcileOptions::from_json(r#"{"partial": true, "root_key": "list"}"#).unwrap();
        assert!(options.partial);
        assert_eq!(options.root_key, Some(Key::from("list")));
        assert_eq!(options.container.as_str(), DEFAULT_CONTAINER);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(ReconcileOptions::from_json("{\"partial\": 3}").is_err());
    }
}
