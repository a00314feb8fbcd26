//! Session-scoped accumulation of accepted observations
//!
//! Append-only between resets, bounded by a retention cap so an arbitrarily
//! long session cannot grow without limit: once full, the oldest observation
//! is evicted first.

use std::collections::VecDeque;

use super::Observation;

/// Ordered collection of accepted observations for the current session.
///
/// Not internally synchronized - the reader serializes all access behind its
/// own lock.
#[derive(Debug)]
pub struct ObservationBuffer {
    entries: VecDeque<Observation>,
    capacity: usize,
}

impl ObservationBuffer {
    /// Create a buffer retaining at most `capacity` observations
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    /// Append an observation, evicting the oldest if the buffer is full
    pub fn append(&mut self, observation: Observation) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(observation);
    }

    /// Current observations in insertion order
    pub fn snapshot(&self) -> Vec<Observation> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all observations. Idempotent; the only mutator besides `append`.
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::Rect;

    fn obs(text: &str) -> Observation {
        Observation::new(text, Rect::new(0.0, 0.0, 10.0, 10.0))
    }

    #[test]
    fn test_append_and_snapshot_order() {
        let mut buffer = ObservationBuffer::with_capacity(16);
        buffer.append(obs("first"));
        buffer.append(obs("second"));
        buffer.append(obs("third"));

        let texts: Vec<_> = buffer.snapshot().into_iter().map(|o| o.text).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_retention_evicts_oldest() {
        let mut buffer = ObservationBuffer::with_capacity(2);
        buffer.append(obs("a"));
        buffer.append(obs("b"));
        buffer.append(obs("c"));

        let texts: Vec<_> = buffer.snapshot().into_iter().map(|o| o.text).collect();
        assert_eq!(texts, vec!["b", "c"]);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut buffer = ObservationBuffer::with_capacity(16);
        buffer.append(obs("a"));

        buffer.reset();
        assert!(buffer.is_empty());

        buffer.reset();
        assert!(buffer.is_empty());
    }
}
