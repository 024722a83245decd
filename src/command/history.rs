// HistoryManager - State-based undo/redo stacks

use crate::project::types::TimelineState;
use std::fmt;

/// Undo/redo availability, reported after every stack mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryStatus {
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Listener called synchronously with the new status after every mutation
pub type HistoryListener = Box<dyn FnMut(HistoryStatus) + Send>;

/// Manages undo/redo over whole timeline states
///
/// The HistoryManager maintains two stacks:
/// - Undo stack: accepted states, the most recent one is the current state
/// - Redo stack: states that have been undone and can be redone
///
/// Pushing a new state clears the redo stack, so history never branches.
/// Every state handed out is a clone; callers cannot reach the stored entries.
pub struct HistoryManager {
    /// Accepted states (current state at the back)
    undo_stack: Vec<TimelineState>,

    /// Undone states (next redo at the back)
    redo_stack: Vec<TimelineState>,

    /// Maximum number of entries in the undo stack, None for unlimited
    max_history: Option<usize>,

    listener: Option<HistoryListener>,
}

impl HistoryManager {
    /// Create a new HistoryManager without a depth limit
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_history: None,
            listener: None,
        }
    }

    /// Create a new HistoryManager that keeps at most `max_history` states
    pub fn with_limit(max_history: usize) -> Self {
        Self {
            max_history: Some(max_history.max(1)),
            ..Self::new()
        }
    }

    /// Register the change listener (replaces any previous one)
    pub fn set_listener(&mut self, listener: HistoryListener) {
        self.listener = Some(listener);
    }

    /// Record `state` as the new current state
    ///
    /// This will:
    /// 1. Push a copy onto the undo stack
    /// 2. Clear the redo stack
    /// 3. Trim the oldest entries if a limit is set
    pub fn push(&mut self, state: &TimelineState) {
        self.undo_stack.push(state.clone());
        self.redo_stack.clear();

        if let Some(max) = self.max_history
            && self.undo_stack.len() > max
        {
            let excess = self.undo_stack.len() - max;
            self.undo_stack.drain(..excess);
        }

        log::debug!(
            "History push: {} cells, duration {:.3} (depth {})",
            state.rhythm.len(),
            state.duration,
            self.undo_stack.len()
        );
        self.notify();
    }

    /// Step back to the previous state
    ///
    /// Returns a copy of the state that becomes current, or None when already
    /// at the oldest state.
    pub fn undo(&mut self) -> Option<TimelineState> {
        if self.undo_stack.len() < 2 {
            return None;
        }

        let current = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        let previous = self.undo_stack.last().cloned();

        log::debug!(
            "Undo (undo depth {}, redo depth {})",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        self.notify();
        previous
    }

    /// Step forward to the most recently undone state
    ///
    /// Returns a copy of the state that becomes current, or None when already
    /// at the newest state.
    pub fn redo(&mut self) -> Option<TimelineState> {
        let next = self.redo_stack.pop()?;
        let restored = next.clone();
        self.undo_stack.push(next);

        log::debug!(
            "Redo (undo depth {}, redo depth {})",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        self.notify();
        Some(restored)
    }

    /// Check if there is a previous state to go back to
    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    /// Check if there are undone states that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn status(&self) -> HistoryStatus {
        HistoryStatus {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    /// Copy of the current state, if anything was pushed yet
    pub fn current(&self) -> Option<TimelineState> {
        self.undo_stack.last().cloned()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.notify();
    }

    /// Get the number of states in the undo stack (current state included)
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of states in the redo stack
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    fn notify(&mut self) {
        let status = self.status();
        if let Some(listener) = self.listener.as_mut() {
            listener(status);
        }
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HistoryManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryManager")
            .field("undo_count", &self.undo_stack.len())
            .field("redo_count", &self.redo_stack.len())
            .field("max_history", &self.max_history)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::cell::RhythmCell;
    use std::sync::{Arc, Mutex};

    fn state(duration: f64) -> TimelineState {
        TimelineState::new(vec![RhythmCell::new(0.0, duration, 100)], duration)
    }

    #[test]
    fn test_push() {
        let mut history = HistoryManager::new();
        history.push(&state(1.0));

        assert_eq!(history.undo_count(), 1);
        assert_eq!(history.redo_count(), 0);
        // The only entry is the current state
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo() {
        let mut history = HistoryManager::new();
        history.push(&state(1.0));
        history.push(&state(2.0));

        let restored = history.undo().unwrap();
        assert_eq!(restored.duration, 1.0);
        assert_eq!(history.undo_count(), 1);
        assert_eq!(history.redo_count(), 1);
        assert!(!history.can_undo());
        assert!(history.can_redo());
    }

    #[test]
    fn test_redo() {
        let mut history = HistoryManager::new();
        history.push(&state(1.0));
        history.push(&state(2.0));
        history.undo();

        let restored = history.redo().unwrap();
        assert_eq!(Some(&restored), history.current().as_ref());
        assert_eq!(restored.duration, 2.0);
        assert_eq!(history.undo_count(), 2);
        assert_eq!(history.redo_count(), 0);
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut history = HistoryManager::new();
        let first = state(1.0);
        let second = state(2.0);
        history.push(&first);
        history.push(&second);

        assert_eq!(history.undo(), Some(first));
        assert_eq!(history.redo(), Some(second));
    }

    #[test]
    fn test_redo_stack_cleared_on_push() {
        let mut history = HistoryManager::new();

        history.push(&state(1.0));
        history.push(&state(2.0));
        history.undo();
        history.push(&state(3.0));

        assert!(!history.can_redo());
        assert_eq!(history.redo_count(), 0);
        assert_eq!(history.current().map(|s| s.duration), Some(3.0));
    }

    #[test]
    fn test_exhaustion_returns_none() {
        let mut history = HistoryManager::new();
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());

        history.push(&state(1.0));
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_returned_state_is_a_copy() {
        let mut history = HistoryManager::new();
        history.push(&state(1.0));
        history.push(&state(2.0));

        let mut restored = history.undo().unwrap();
        restored.rhythm[0].set_position(9.0);
        restored.duration = 9.0;

        let current = history.current().unwrap();
        assert_eq!(current.rhythm[0].position(), 0.0);
        assert_eq!(current.duration, 1.0);
    }

    #[test]
    fn test_history_limit() {
        let mut history = HistoryManager::with_limit(3);

        for i in 0..5 {
            history.push(&state(i as f64 + 1.0));
        }

        // Should only keep the last 3
        assert_eq!(history.undo_count(), 3);
        assert_eq!(history.undo().map(|s| s.duration), Some(4.0));
        assert_eq!(history.undo().map(|s| s.duration), Some(3.0));
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_listener_fires_after_every_mutation() {
        let seen = Arc::new(Mutex::new(Vec::<HistoryStatus>::new()));
        let sink = Arc::clone(&seen);

        let mut history = HistoryManager::new();
        history.set_listener(Box::new(move |status: HistoryStatus| {
            sink.lock().unwrap().push(status);
        }));

        history.push(&state(1.0));
        history.push(&state(2.0));
        history.undo();
        history.redo();
        history.undo(); // back to the first state
        history.undo(); // exhausted: no mutation, no notification
        history.clear();

        let seen = seen.lock().unwrap();
        let flags: Vec<(bool, bool)> = seen.iter().map(|s| (s.can_undo, s.can_redo)).collect();
        assert_eq!(
            flags,
            vec![
                (false, false),
                (true, false),
                (false, true),
                (true, false),
                (false, true),
                (false, false),
            ]
        );
    }
}
