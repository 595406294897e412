//! Per-call execution state.

use crate::scope::CallScope;
use std::sync::{Arc, OnceLock};

/// Outcome flag for a single tool invocation.
///
/// Created with `success = false` when a call starts, recorded at most once
/// by the code that runs the tool, and read when the call ends. A state
/// belongs to exactly one call; never reuse one across calls.
///
/// The first [`record`](Self::record) wins. Later writes are ignored, so a
/// reader never sees the outcome flip after it has been set.
#[derive(Debug, Default)]
pub struct ExecutionState {
    outcome: OnceLock<bool>,
}

impl ExecutionState {
    /// Creates a state whose outcome has not been recorded yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            outcome: OnceLock::new(),
        }
    }

    /// Records the outcome of the invocation.
    ///
    /// Returns `false` if an outcome was already recorded, in which case
    /// the earlier value is kept.
    pub fn record(&self, success: bool) -> bool {
        let accepted = self.outcome.set(success).is_ok();
        if !accepted {
            tracing::warn!(
                attempted = success,
                kept = self.success(),
                "execution state already recorded"
            );
        }
        accepted
    }

    /// Returns whether the invocation succeeded.
    ///
    /// `false` until an outcome is recorded.
    #[must_use]
    pub fn success(&self) -> bool {
        self.outcome.get().copied().unwrap_or(false)
    }

    /// Returns the recorded outcome, or `None` if nothing was recorded.
    #[must_use]
    pub fn outcome(&self) -> Option<bool> {
        self.outcome.get().copied()
    }

    /// Returns `true` once an outcome has been recorded.
    #[must_use]
    pub fn is_recorded(&self) -> bool {
        self.outcome.get().is_some()
    }
}

/// Private key so only this module can bind or read the state.
struct StateKey;

/// Returns a derived scope in which [`lookup_state`] yields `state`.
///
/// `scope` itself is left untouched.
#[must_use]
pub fn bind_state(scope: &CallScope, state: Arc<ExecutionState>) -> CallScope {
    scope.with_keyed::<StateKey>(state)
}

/// Returns the execution state bound on this scope lineage, if any.
///
/// Absence is not an error: it means observability is not wired for this
/// call.
#[must_use]
pub fn lookup_state(scope: &CallScope) -> Option<Arc<ExecutionState>> {
    scope.get_keyed::<StateKey, ExecutionState>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_not_successful() {
        let state = ExecutionState::new();
        assert!(!state.success());
        assert!(!state.is_recorded());
        assert_eq!(state.outcome(), None);
    }

    #[test]
    fn first_record_wins() {
        let state = ExecutionState::new();
        assert!(state.record(true));
        assert!(!state.record(false));
        assert!(state.success());
        assert_eq!(state.outcome(), Some(true));
    }

    #[test]
    fn lookup_without_bind_is_absent() {
        assert!(lookup_state(&CallScope::new()).is_none());
    }

    #[test]
    fn plain_execution_state_binding_is_not_visible() {
        // Binding under the public type key does not satisfy the private key.
        let scope = CallScope::new().with(ExecutionState::new());
        assert!(lookup_state(&scope).is_none());
    }

    #[test]
    fn bound_state_is_shared() {
        let state = Arc::new(ExecutionState::new());
        let scope = bind_state(&CallScope::new(), Arc::clone(&state));

        lookup_state(&scope).unwrap().record(true);

        assert!(state.success());
    }

    #[test]
    fn bind_leaves_original_scope_alone() {
        let root = CallScope::new();
        let _bound = bind_state(&root, Arc::new(ExecutionState::new()));
        assert!(lookup_state(&root).is_none());
    }

    #[test]
    fn nested_bind_shadows_outer_state() {
        let outer = Arc::new(ExecutionState::new());
        let inner = Arc::new(ExecutionState::new());
        let scope = bind_state(&CallScope::new(), Arc::clone(&outer));
        let scope = bind_state(&scope, Arc::clone(&inner));

        lookup_state(&scope).unwrap().record(true);

        assert!(inner.success());
        assert!(!outer.is_recorded());
    }
}
