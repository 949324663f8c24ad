//=========================================================================
// Transition Queue
//=========================================================================
//
// FIFO of scene changes waiting behind the in-flight transition.
//
// Only used under `RequestPolicy::Queue`. The orchestrator pops the front
// entry each time a transition completes.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;

//=== Internal Dependencies ===============================================

use super::{SceneKey, SceneTransition};

//=== TransitionQueue =====================================================

/// Pending scene changes in request order.
pub struct TransitionQueue<K: SceneKey> {
    queue: VecDeque<SceneTransition<K>>,
}

impl<K: SceneKey> TransitionQueue<K> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Appends a request behind everything already waiting.
    pub fn push(&mut self, transition: SceneTransition<K>) {
        self.queue.push_back(transition);
    }

    /// Removes the oldest waiting request.
    pub fn pop_front(&mut self) -> Option<SceneTransition<K>> {
        self.queue.pop_front()
    }

    pub fn peek(&self) -> Option<&SceneTransition<K>> {
        self.queue.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneTransition<K>> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear()
    }
}

impl<K: SceneKey> Default for TransitionQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
