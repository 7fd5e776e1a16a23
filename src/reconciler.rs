//! Stateful front end: one prior-state map per render context
use crate::config::ReconcileOptions;
use crate::diff_engine::reconcile;
use crate::errors::Result;
use crate::host::HostAdapter;
use crate::snapshot::Snapshot;
use crate::types::{Initializer, PriorState, ReconciliationResult};
use std::collections::HashMap;
use uuid::Uuid;

pub const MAIN_CONTEXT: &str = "main";

/// Keeps the prior state of every render context (the main window, overlays,
/// detached subtrees) and feeds it to the engine.
///
/// Calls take `&mut self`: a context is never reconciled twice concurrently,
/// and its state is replaced only when a call succeeds.
#[derive(Debug)]
pub struct Reconciler {
    contexts: HashMap<String, PriorState>,
    registered: HashMap<String, Vec<Initializer>>,
}

impl Default for Reconciler {
    fn default() -> Self {
        Reconciler::new()
    }
}

impl Reconciler {
    pub fn new() -> Self {
        let mut contexts = HashMap::new();
        contexts.insert(MAIN_CONTEXT.to_string(), PriorState::new());
        Reconciler {
            contexts,
            registered: HashMap::new(),
        }
    }

    /// Prior state of `context`, if it has been rendered.
    pub fn state(&self, context: &str) -> Option<&PriorState> {
        self.contexts.get(context)
    }

    pub fn reconcile<H: HostAdapter>(
        &mut self,
        context: &str,
        snapshot: &Snapshot,
        host: &mut H,
        options: &ReconcileOptions,
    ) -> Result<ReconciliationResult> {
        let empty = PriorState::new();
        let prior = self.contexts.get(context).unwrap_or(&empty);
        let mut result = reconcile(prior, snapshot, host, options)?;

        if let Some(queued) = self.registered.get_mut(context) {
            if !queued.is_empty() {
                log::debug!("injecting {} registered initializers into '{}'", queued.len(), context);
                result.initializers.append(queued);
            }
        }

        self.contexts.insert(context.to_string(), result.next_state.clone());
        Ok(result)
    }

    pub fn clear_context(&mut self, context: &str) {
        self.contexts.remove(context);
        self.registered.remove(context);
    }

    /// Forget every context; `main` comes back empty.
    pub fn clear_all_contexts(&mut self) {
        log::info!("Reconciler: clearing all contexts");
        self.contexts.clear();
        self.registered.clear();
        self.contexts.insert(MAIN_CONTEXT.to_string(), PriorState::new());
    }

    /// Queue an initializer for the next successful reconcile of `context`.
    /// Returns its id.
    pub fn register_initializer(&mut self, context: &str, mut initializer: Initializer) -> String {
        let simple = Uuid::new_v4().simple().to_string();
        let id = format!("js_init_{}", &simple[..8]);
        initializer.id = Some(id.clone());
        log::debug!("registered initializer [{}] ({}) for '{}'", id, initializer.init_type, context);
        self.registered.entry(context.to_string()).or_default().push(initializer);
        id
    }

    /// Drop a queued initializer. Returns whether it was still pending.
    pub fn unregister_initializer(&mut self, context: &str, id: &str) -> bool {
        let Some(queued) = self.registered.get_mut(context) else {
            return false;
        };
        let before = queued.len();
        queued.retain(|init| init.id.as_deref() != Some(id));
        queued.len() != before
    }
}
