//! Cycle-detecting queue of composite components pending expansion.
//!
//! While recursively expanding nested composite components, the caller
//! enqueues each type name before descending into it and dequeues it once
//! the expansion completes. The queue enforces at most one pending
//! occurrence of any name: re-enqueueing a name that is still pending means
//! the component nests into itself, directly or through an intermediate, and
//! the expansion must abort with a reported cycle instead of recursing
//! unboundedly.
//!
//! Uniqueness is the only ordering contract; pending names are served FIFO.

use crate::core::CsarError;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// FIFO of type names awaiting recursive expansion, with uniqueness
/// enforced across the pending set.
#[derive(Debug, Default)]
pub struct CompositionQueue {
    order: VecDeque<String>,
    pending: HashSet<String>,
}

impl CompositionQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of names currently pending.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether `type_name` is currently pending.
    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.pending.contains(type_name)
    }

    /// Append `type_name` to the pending set.
    ///
    /// `component` names the top-level component whose expansion is being
    /// driven; it only appears in the cycle diagnostic.
    ///
    /// # Errors
    ///
    /// Returns [`CsarError::NestingCycle`] when `type_name` is already
    /// pending.
    pub fn enqueue(&mut self, component: &str, type_name: impl Into<String>) -> Result<(), CsarError> {
        let type_name = type_name.into();
        if !self.pending.insert(type_name.clone()) {
            debug!(component, type_name = %type_name, "nesting loop detected while expanding component");
            return Err(CsarError::NestingCycle {
                component: component.to_string(),
                type_name,
            });
        }
        self.order.push_back(type_name);
        Ok(())
    }

    /// Remove and return the oldest pending name.
    ///
    /// # Errors
    ///
    /// Returns [`CsarError::EmptyQueue`] when nothing is pending; callers
    /// must pair every dequeue with an earlier successful enqueue.
    pub fn dequeue(&mut self) -> Result<String, CsarError> {
        let type_name = self.order.pop_front().ok_or(CsarError::EmptyQueue)?;
        self.pending.remove(&type_name);
        Ok(type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serves_names_in_fifo_order() {
        let mut queue = CompositionQueue::new();
        queue.enqueue("svc", "A").unwrap();
        queue.enqueue("svc", "B").unwrap();
        assert_eq!(queue.dequeue().unwrap(), "A");
        assert_eq!(queue.dequeue().unwrap(), "B");
    }

    #[test]
    fn duplicate_enqueue_reports_cycle() {
        let mut queue = CompositionQueue::new();
        queue.enqueue("svc", "A").unwrap();
        queue.enqueue("svc", "B").unwrap();
        queue.enqueue("svc", "C").unwrap();
        let err = queue.enqueue("svc", "B").unwrap_err();
        match err {
            CsarError::NestingCycle { component, type_name } => {
                assert_eq!(component, "svc");
                assert_eq!(type_name, "B");
            }
            other => panic!("unexpected error: {other}"),
        }
        // the original occurrence stays pending
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn name_can_be_requeued_after_dequeue() {
        let mut queue = CompositionQueue::new();
        queue.enqueue("svc", "A").unwrap();
        queue.dequeue().unwrap();
        queue.enqueue("svc", "A").unwrap();
        assert!(queue.contains("A"));
    }

    #[test]
    fn dequeue_on_empty_is_an_error() {
        let mut queue = CompositionQueue::new();
        assert!(matches!(queue.dequeue(), Err(CsarError::EmptyQueue)));
    }
}
