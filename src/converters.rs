//! Python <-> JSON conversion for the extension module
use crate::errors::ReconcileError;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList, PyModule};

/// Serialize any JSON-compatible Python object (dicts, lists, scalars).
pub fn python_to_json<'py>(py: Python<'py>, obj: &Bound<'py, PyAny>) -> PyResult<serde_json::Value> {
    let dumped = PyModule::import(py, "json")?.getattr("dumps")?.call1((obj,))?;
    let text: String = dumped.extract()?;
    serde_json::from_str(&text).map_err(|e| PyValueError::new_err(ReconcileError::from(e).to_string()))
}

/// JSON object from a Python dict; anything else is a `ValueError`.
pub fn py_dict_to_json<'py>(
    py: Python<'py>,
    dict: &Bound<'py, PyDict>,
) -> PyResult<serde_json::Map<String, serde_json::Value>> {
    match python_to_json(py, dict.as_any())? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(PyValueError::new_err(format!("expected a dict, got {}", other))),
    }
}

pub fn json_to_pyobject<'py>(py: Python<'py>, value: &serde_json::Value) -> PyResult<Bound<'py, PyAny>> {
    Ok(match value {
        serde_json::Value::Null => py.None().into_bound(py),
        serde_json::Value::Bool(b) => (*b).into_pyobject(py)?.to_owned().into_any(),
        serde_json::Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.into_pyobject(py)?.into_any(),
            (None, Some(u), _) => u.into_pyobject(py)?.into_any(),
            (None, None, Some(f)) => f.into_pyobject(py)?.into_any(),
            _ => n.to_string().into_pyobject(py)?.into_any(),
        },
        serde_json::Value::String(s) => s.as_str().into_pyobject(py)?.into_any(),
        serde_json::Value::Array(items) => {
            let list = PyList::empty(py);
            for item in items {
                list.append(json_to_pyobject(py, item)?)?;
            }
            list.into_any()
        }
        serde_json::Value::Object(map) => {
            let dict = PyDict::new(py);
            for (k, v) in map {
                dict.set_item(k, json_to_pyobject(py, v)?)?;
            }
            dict.into_any()
        }
    })
}
