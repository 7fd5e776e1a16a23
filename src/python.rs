//! Python module entry point (`python` feature)
use crate::config::{ReconcileOptions, DEFAULT_CONTAINER};
use crate::converters::{json_to_pyobject, py_dict_to_json};
use crate::errors::{HostError, ReconcileError};
use crate::host::HostAdapter;
use crate::html_host::HtmlHost;
use crate::props::{PropDelta, Props};
use crate::reconciler::{Reconciler, MAIN_CONTEXT};
use crate::snapshot::{Snapshot, TreeNode};
use crate::types::{Handle, Initializer, PatchAction, ReconciliationResult, RenderPayload};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Host adapter backed by an optional Python object. Missing methods fall
/// back to the built-in HTML host.
struct PyHost<'py> {
    adapter: Option<Bound<'py, PyAny>>,
    fallback: HtmlHost,
}

fn has_method(obj: &Bound<'_, PyAny>, name: &str) -> bool {
    obj.hasattr(name).unwrap_or(false)
}

impl HostAdapter for PyHost<'_> {
    fn allocate_handle(&mut self) -> Result<Handle, HostError> {
        match &self.adapter {
            Some(adapter) if has_method(adapter, "allocate_handle") => {
                let handle = adapter
                    .call_method0("allocate_handle")?
                    .extract::<String>()
                    .map_err(|e| HostError::new(e.to_string()))?;
                Ok(Handle::from(handle))
            }
            _ => self.fallback.allocate_handle(),
        }
    }

    fn render_stub(&mut self, handle: &Handle, node_type: &str, props: &Props) -> Result<RenderPayload, HostError> {
        match &self.adapter {
            Some(adapter) if has_method(adapter, "render_stub") => {
                let py = adapter.py();
                let props_json = serde_json::to_value(props).map_err(|e| HostError::new(e.to_string()))?;
                let props_py = json_to_pyobject(py, &props_json)?;
                adapter
                    .call_method1("render_stub", (handle.as_str(), node_type, props_py))?
                    .extract::<String>()
                    .map_err(|e| HostError::new(e.to_string()))
            }
            _ => self.fallback.render_stub(handle, node_type, props),
        }
    }

    fn prop_delta(&self, old: &Props, new: &Props) -> PropDelta {
        self.fallback.prop_delta(old, new)
    }

    fn renders(&self, node_type: &str) -> bool {
        self.fallback.renders(node_type)
    }

    fn mount_initializers(&mut self, handle: &Handle, node: &TreeNode) -> Vec<Initializer> {
        self.fallback.mount_initializers(handle, node)
    }
}

#[pyclass(name = "Reconciler")]
pub struct PyReconciler {
    inner: Arc<Mutex<Reconciler>>,
}

impl PyReconciler {
    fn lock(&self) -> PyResult<MutexGuard<'_, Reconciler>> {
        self.inner
            .lock()
            .map_err(|_| PyRuntimeError::new_err("reconciler state is poisoned"))
    }
}

#[pymethods]
impl PyReconciler {
    #[new]
    fn new() -> Self {
        log::info!("Reconciler initialized (Rust)");
        PyReconciler {
            inner: Arc::new(Mutex::new(Reconciler::new())),
        }
    }

    fn clear_context(&self, context_key: String) -> PyResult<()> {
        self.lock()?.clear_context(&context_key);
        Ok(())
    }

    fn clear_all_contexts(&self) -> PyResult<()> {
        self.lock()?.clear_all_contexts();
        Ok(())
    }

    /// `new_tree` maps each key to `{"key", "type", "props", "children"}`.
    #[pyo3(signature = (new_tree, root_key=None, context_key=None, is_partial_reconciliation=false, container=None, host=None))]
    fn reconcile<'py>(
        &self,
        py: Python<'py>,
        new_tree: &Bound<'py, PyDict>,
        root_key: Option<String>,
        context_key: Option<String>,
        is_partial_reconciliation: bool,
        container: Option<String>,
        host: Option<Bound<'py, PyAny>>,
    ) -> PyResult<Bound<'py, PyAny>> {
        let context = context_key.unwrap_or_else(|| MAIN_CONTEXT.to_string());
        let snapshot = snapshot_from_dict(py, new_tree, root_key.as_deref())?;
        let options = ReconcileOptions {
            root_key: root_key.map(Into::into),
            partial: is_partial_reconciliation,
            container: Handle::from(container.unwrap_or_else(|| DEFAULT_CONTAINER.to_string())),
        };

        let mut py_host = PyHost { adapter: host, fallback: HtmlHost::new() };
        let result = self.lock()?.reconcile(&context, &snapshot, &mut py_host, &options)?;
        result_to_python(py, result)
    }

    #[pyo3(signature = (initializer, context_key=None))]
    fn register_js_initializer<'py>(
        &self,
        py: Python<'py>,
        initializer: &Bound<'py, PyDict>,
        context_key: Option<String>,
    ) -> PyResult<String> {
        let mut fields = py_dict_to_json(py, initializer)?;
        if let Some(target) = fields.remove("targetId") {
            fields.insert("target_id".into(), target);
        }
        if !fields.contains_key("data") {
            let options = fields.remove("options").unwrap_or_else(|| serde_json::json!({}));
            fields.insert("data".into(), options);
        }
        let has_type = fields.get("type").and_then(|t| t.as_str()).is_some_and(|t| !t.is_empty());
        if !has_type {
            return Err(PyValueError::new_err("initializer must include a non-empty 'type' field"));
        }
        let init: Initializer = serde_json::from_value(serde_json::Value::Object(fields))
            .map_err(ReconcileError::from)?;
        let context = context_key.unwrap_or_else(|| MAIN_CONTEXT.to_string());
        Ok(self.lock()?.register_initializer(&context, init))
    }

    #[pyo3(signature = (initializer_id, context_key=None))]
    fn unregister_js_initializer(&self, initializer_id: String, context_key: Option<String>) -> PyResult<bool> {
        let context = context_key.unwrap_or_else(|| MAIN_CONTEXT.to_string());
        Ok(self.lock()?.unregister_initializer(&context, &initializer_id))
    }
}

/// The root is `root_key` if given, else the only key no node lists as a child.
fn snapshot_from_dict<'py>(
    py: Python<'py>,
    tree: &Bound<'py, PyDict>,
    root_key: Option<&str>,
) -> PyResult<Snapshot> {
    let mut nodes = Vec::with_capacity(tree.len());
    for (key, value) in py_dict_to_json(py, tree)? {
        let mut node = value;
        if let Some(fields) = node.as_object_mut() {
            fields.entry("key").or_insert_with(|| serde_json::Value::String(key.clone()));
        }
        let node: TreeNode = serde_json::from_value(node).map_err(ReconcileError::from)?;
        nodes.push(node);
    }

    let root = match root_key {
        Some(root) => root.into(),
        None => {
            let children: HashSet<_> = nodes.iter().flat_map(|n| n.children.iter()).collect();
            let mut roots = nodes.iter().filter(|n| !children.contains(&n.key));
            match (roots.next(), roots.next()) {
                (Some(root), None) => root.key.clone(),
                _ => return Err(PyValueError::new_err("new_tree must have exactly one root")),
            }
        }
    };
    Ok(Snapshot::from_nodes(root, nodes)?)
}

fn result_to_python<'py>(py: Python<'py>, result: ReconciliationResult) -> PyResult<Bound<'py, PyAny>> {
    let to_json = |value: serde_json::Result<serde_json::Value>| value.map_err(ReconcileError::from);
    let out = PyDict::new(py);

    let patches = PyList::empty(py);
    for patch in &result.patches {
        let entry = PyDict::new(py);
        entry.set_item("action", patch.action().as_str())?;
        entry.set_item("html_id", patch.handle.as_str())?;
        entry.set_item("data", json_to_pyobject(py, &to_json(serde_json::to_value(&patch.payload))?)?)?;
        patches.append(entry)?;
    }
    out.set_item("patches", patches)?;

    let rendered = PyDict::new(py);
    for (key, entry) in &result.next_state {
        let node = PyDict::new(py);
        node.set_item("html_id", entry.handle.as_str())?;
        node.set_item("widget_type", &entry.node_type)?;
        node.set_item("key", key.as_str())?;
        node.set_item("props", json_to_pyobject(py, &to_json(serde_json::to_value(&entry.props))?)?)?;
        node.set_item("parent_html_id", entry.parent_handle.as_ref().map(Handle::as_str))?;
        node.set_item("parent_key", entry.parent_key.as_ref().map(|k| k.as_str()))?;
        let children: Vec<&str> = entry.children_keys.iter().map(|k| k.as_str()).collect();
        node.set_item("children_keys", children)?;
        rendered.set_item(key.as_str(), node)?;
    }
    out.set_item("new_rendered_map", rendered)?;

    let removed: Vec<&str> = result.removed_keys.iter().map(|k| k.as_str()).collect();
    out.set_item("removed_keys", removed)?;
    let replaced: Vec<&str> = result.replaced_keys.iter().map(|k| k.as_str()).collect();
    out.set_item("replaced_keys", replaced)?;
    out.set_item(
        "js_initializers",
        json_to_pyobject(py, &to_json(serde_json::to_value(&result.initializers))?)?,
    )?;

    Ok(out.into_any())
}

#[pymodule]
fn tree_reconciler(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyReconciler>()?;

    for action in [PatchAction::Insert, PatchAction::Remove, PatchAction::Update, PatchAction::Move] {
        m.add(action.as_str(), action.as_str())?;
    }
    Ok(())
}
