//! Call scopes and per-call execution state.
//!
//! A [`CallScope`] carries request-scoped values down a call chain. Scopes
//! are never mutated: [`CallScope::with`] returns a derived scope whose
//! lookups see the new value first and then fall back to the parent chain.
//!
//! An [`ExecutionState`] is the side channel between the code that starts a
//! tool call and the code that reports its outcome. It is allocated fresh
//! for every call, bound into the scope handed to the tool, and read back
//! through the same scope lineage when the call ends.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use toolscope_context::{CallScope, ExecutionState, bind_state, lookup_state};
//!
//! let root = CallScope::new();
//! let state = Arc::new(ExecutionState::new());
//! let scope = bind_state(&root, Arc::clone(&state));
//!
//! // Somewhere deep inside the invocation.
//! if let Some(state) = lookup_state(&scope) {
//!     state.record(true);
//! }
//!
//! assert!(state.success());
//! assert!(lookup_state(&root).is_none());
//! ```

pub mod scope;
pub mod state;

pub use scope::CallScope;
pub use state::{ExecutionState, bind_state, lookup_state};
