//! Keyed tree reconciliation.
//!
//! Given the state left by the previous round and a freshly built snapshot of
//! the UI tree, [`reconcile`] produces the ordered patch list (REMOVE, INSERT,
//! MOVE, UPDATE) that turns the host's rendered tree into the new one, plus the
//! state to feed into the next round. Child lists are diffed by key; the set of
//! children left in place is a longest increasing subsequence, so only the
//! remaining ones are moved.
//!
//! The host is reached through [`HostAdapter`]: it hands out element handles
//! and renders the initial stub for inserted nodes. [`Reconciler`] keeps one
//! prior state per render context. With the `python` feature the crate builds
//! as a Python extension module exposing the same reconciler.
pub mod children;
pub mod config;
pub mod diff_engine;
pub mod errors;
pub mod host;
pub mod html_host;
pub mod props;
pub mod reconciler;
pub mod sequence;
pub mod snapshot;
pub mod types;

#[cfg(feature = "python")]
mod converters;
#[cfg(feature = "python")]
mod python;

pub use children::{diff_children, ChildListDiff, ChildStep};
pub use config::{ReconcileOptions, DEFAULT_CONTAINER};
pub use diff_engine::{reconcile, reconcile_subtree, DiffEngine};
pub use errors::{HostError, ReconcileError, Result};
pub use host::{HostAdapter, SequentialHandles};
pub use html_host::{generate_html_stub, HtmlHost};
pub use props::{diff_props, PropDelta, PropValue, Props};
pub use reconciler::{Reconciler, MAIN_CONTEXT};
pub use sequence::longest_increasing_subsequence;
pub use snapshot::{Element, Snapshot, TreeNode};
pub use types::{
    Handle, Initializer, Key, Patch, PatchAction, PatchPayload, PriorState, PriorStateEntry,
    ReconciliationResult, RenderPayload,
};
