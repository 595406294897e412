//! Isolation tests: concurrent calls never observe each other's state.

use proptest::prelude::*;
use std::sync::Arc;
use toolscope_context::{CallScope, ExecutionState, bind_state, lookup_state};

proptest! {
    #[test]
    fn mutating_one_binding_leaves_the_other_alone(a_outcome: Option<bool>, b_outcome: bool) {
        let root = CallScope::new();
        let a = bind_state(&root, Arc::new(ExecutionState::new()));
        let b = bind_state(&root, Arc::new(ExecutionState::new()));

        if let Some(outcome) = a_outcome {
            lookup_state(&a).unwrap().record(outcome);
        }
        lookup_state(&b).unwrap().record(b_outcome);

        let a_state = lookup_state(&a).unwrap();
        prop_assert_eq!(a_state.outcome(), a_outcome);
        prop_assert_eq!(lookup_state(&b).unwrap().outcome(), Some(b_outcome));
        prop_assert!(lookup_state(&root).is_none());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_calls_keep_their_own_state() {
    let root = CallScope::new();

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let state = Arc::new(ExecutionState::new());
            let scope = bind_state(&root, Arc::clone(&state));
            let handle = tokio::spawn(async move {
                tokio::task::yield_now().await;
                if let Some(state) = lookup_state(&scope) {
                    state.record(i % 2 == 0);
                }
            });
            (i, state, handle)
        })
        .collect();

    for (i, state, handle) in handles {
        handle.await.expect("task panicked");
        assert_eq!(state.outcome(), Some(i % 2 == 0), "call {i}");
    }
}
