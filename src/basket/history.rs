//! Undo/Redo Operations
//!
//! Snapshot-based history: every mutating ledger call first pushes a deep
//! copy of the whole [`LedgerState`] onto the undo stack. Undo swaps the
//! current state with the top of that stack, redo swaps it back.
//!
//! ```text
//! mutate:  undo.push(current)      redo.clear()
//! undo:    redo.push(current)      current = undo.pop()
//! redo:    undo.push(current)      current = redo.pop()
//! ```

use std::collections::VecDeque;

use log::debug;

use super::store::{BasketStore, LedgerState};

/// Undo/redo stacks over any cloneable state.
///
/// With a `limit`, the oldest undo entry is evicted once the stack is full.
#[derive(Debug, Clone)]
pub struct History<S: Clone> {
    undo: VecDeque<S>,
    redo: Vec<S>,
    limit: Option<usize>,
}

impl<S: Clone> Default for History<S> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<S: Clone> History<S> {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit,
        }
    }

    /// Push a copy of `current`; forward history is dropped
    pub fn record(&mut self, current: &S) {
        self.undo.push_back(current.clone());
        self.redo.clear();

        if let Some(limit) = self.limit {
            while self.undo.len() > limit {
                self.undo.pop_front();
            }
        }
    }

    pub fn undo(&mut self, current: &mut S) -> bool {
        match self.undo.pop_back() {
            Some(previous) => {
                self.redo.push(std::mem::replace(current, previous));
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self, current: &mut S) -> bool {
        match self.redo.pop() {
            Some(next) => {
                self.undo.push_back(std::mem::replace(current, next));
                true
            }
            None => false,
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

/// Trait for basket history operations
pub trait HistoryOperations {
    /// Record the current state before a mutation
    fn snapshot(&mut self);

    /// Restore the state before the last mutation. `false` if nothing to undo.
    fn undo(&mut self) -> bool;

    /// Re-apply the last undone mutation. `false` if nothing to redo.
    fn redo(&mut self) -> bool;

    fn can_undo(&self) -> bool;

    fn can_redo(&self) -> bool;

    fn undo_depth(&self) -> usize;

    fn redo_depth(&self) -> usize;

    /// Forget all history (e.g. after opening another basket)
    fn clear_history(&mut self);
}

impl HistoryOperations for BasketStore {
    fn snapshot(&mut self) {
        self.history.record(&self.state);
        self.modified = true;
    }

    fn undo(&mut self) -> bool {
        let undone = self.history.undo(&mut self.state);
        if undone {
            self.modified = true;
            debug!("undo (remaining {})", self.history.undo_depth());
        }
        undone
    }

    fn redo(&mut self) -> bool {
        let redone = self.history.redo(&mut self.state);
        if redone {
            self.modified = true;
            debug!("redo (remaining {})", self.history.redo_depth());
        }
        redone
    }

    fn can_undo(&self) -> bool {
        self.history.undo_depth() > 0
    }

    fn can_redo(&self) -> bool {
        self.history.redo_depth() > 0
    }

    fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    fn clear_history(&mut self) {
        self.history.clear();
    }
}

/// Shorthand used by the ledger operations
pub(super) type LedgerHistory = History<LedgerState>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_cycle() {
        let mut history = History::new(None);
        let mut current = 1;

        history.record(&current);
        current = 2;
        history.record(&current);
        current = 3;

        assert!(history.undo(&mut current));
        assert_eq!(current, 2);
        assert!(history.undo(&mut current));
        assert_eq!(current, 1);
        assert!(!history.undo(&mut current));
        assert_eq!(current, 1);

        assert!(history.redo(&mut current));
        assert_eq!(current, 2);
        assert!(history.redo(&mut current));
        assert_eq!(current, 3);
        assert!(!history.redo(&mut current));
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::new(None);
        let mut current = "a".to_string();

        history.record(&current);
        current = "b".to_string();
        assert!(history.undo(&mut current));
        assert_eq!(history.redo_depth(), 1);

        history.record(&current);
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let mut history = History::new(Some(2));
        let mut current = 0;
        for next in 1..=4 {
            history.record(&current);
            current = next;
        }
        assert_eq!(history.undo_depth(), 2);

        assert!(history.undo(&mut current));
        assert!(history.undo(&mut current));
        assert_eq!(current, 2);
        assert!(!history.undo(&mut current));
    }

    #[test]
    fn test_clear() {
        let mut history = History::new(None);
        history.record(&1);
        history.clear();
        assert_eq!(history.undo_depth(), 0);
        assert_eq!(history.redo_depth(), 0);
    }
}
