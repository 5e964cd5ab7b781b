//! Aggregate count publication.
//!
//! The store calls [`CountsObserver::publish`] after every successful
//! mutation, with counts recomputed by full scan, while the write lock is
//! still held. Publications are therefore totally ordered with the mutations
//! that produced them.

use tally_core::TodoCounts;

/// Receiver of aggregate counts.
///
/// `publish` runs inside the store's exclusive section. Implementations must
/// not call back into the store.
pub trait CountsObserver: Send + Sync {
    fn publish(&self, counts: TodoCounts);
}

/// Discards every publication.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CountsObserver for NoopObserver {
    fn publish(&self, _counts: TodoCounts) {}
}
