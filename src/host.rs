//! The boundary between the engine and a renderer
use crate::errors::HostError;
use crate::props::{diff_props, PropDelta, Props};
use crate::snapshot::TreeNode;
use crate::types::{Handle, Initializer, RenderPayload};

/// What the engine needs from a renderer.
///
/// Every call is synchronous. An `Err` aborts the reconciliation and is
/// returned to the caller; the engine never skips a node on failure.
pub trait HostAdapter {
    /// Called once per INSERT. Handles must stay unique until the matching
    /// REMOVE has been applied.
    fn allocate_handle(&mut self) -> Result<Handle, HostError>;

    /// Initial representation for a freshly inserted node.
    fn render_stub(&mut self, handle: &Handle, node_type: &str, props: &Props) -> Result<RenderPayload, HostError>;

    fn prop_delta(&self, old: &Props, new: &Props) -> PropDelta {
        diff_props(old, new)
    }

    /// False for composable node types that exist only in the tree: they get
    /// no INSERT or UPDATE and their children attach to the nearest rendered
    /// ancestor.
    fn renders(&self, _node_type: &str) -> bool {
        true
    }

    /// Lifecycle hook run after a node's INSERT has been emitted.
    fn mount_initializers(&mut self, _handle: &Handle, _node: &TreeNode) -> Vec<Initializer> {
        Vec::new()
    }
}

impl<H: HostAdapter + ?Sized> HostAdapter for &mut H {
    fn allocate_handle(&mut self) -> Result<Handle, HostError> {
        (**self).allocate_handle()
    }

    fn render_stub(&mut self, handle: &Handle, node_type: &str, props: &Props) -> Result<RenderPayload, HostError> {
        (**self).render_stub(handle, node_type, props)
    }

    fn prop_delta(&self, old: &Props, new: &Props) -> PropDelta {
        (**self).prop_delta(old, new)
    }

    fn renders(&self, node_type: &str) -> bool {
        (**self).renders(node_type)
    }

    fn mount_initializers(&mut self, handle: &Handle, node: &TreeNode) -> Vec<Initializer> {
        (**self).mount_initializers(handle, node)
    }
}

/// Minimal adapter: `<prefix>_<n>` handles and empty stubs. Suited to hosts
/// that build elements from the INSERT props themselves.
#[derive(Debug, Clone)]
pub struct SequentialHandles {
    prefix: String,
    next: usize,
}

impl SequentialHandles {
    pub fn new(prefix: impl Into<String>) -> Self {
        SequentialHandles { prefix: prefix.into(), next: 1 }
    }

    /// Number of handles handed out so far.
    pub fn issued(&self) -> usize {
        self.next - 1
    }
}

impl Default for SequentialHandles {
    fn default() -> Self {
        SequentialHandles::new("fw_id")
    }
}

impl HostAdapter for SequentialHandles {
    fn allocate_handle(&mut self) -> Result<Handle, HostError> {
        let handle = Handle::new(format!("{}_{}", self.prefix, self.next));
        self.next += 1;
        Ok(handle)
    }

    fn render_stub(&mut self, _handle: &Handle, _node_type: &str, _props: &Props) -> Result<RenderPayload, HostError> {
        Ok(RenderPayload::new())
    }
}
