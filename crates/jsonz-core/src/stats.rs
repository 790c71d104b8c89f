//! Live-value accounting.
//!
//! Every node bumps a thread-local counter when it is created and drops it
//! when it is freed. Since [`Value`](crate::Value) is confined to the thread
//! that created it, the per-thread count is exact: it returns to its
//! previous level once every handle to every node built since has been
//! released, including nodes built by a parse that failed halfway.

use std::cell::Cell;

thread_local! {
    static LIVE_VALUES: Cell<usize> = const { Cell::new(0) };
}

/// Number of value nodes currently alive on this thread.
pub fn live_values() -> usize {
    LIVE_VALUES.with(Cell::get)
}

pub(crate) fn node_created() {
    LIVE_VALUES.with(|n| n.set(n.get() + 1));
}

pub(crate) fn node_freed() {
    // Nodes held by other thread-locals may drop after this slot is gone.
    let _ = LIVE_VALUES.try_with(|n| n.set(n.get().saturating_sub(1)));
}
