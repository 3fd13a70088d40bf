//! Buffer of entries awaiting transmission.
//!
//! Entries accumulate in `pending`. When `pending` reaches `max_entries` it
//! is sealed into a batch queued for immediate sending. Batches that fail to
//! send are put back at the front of the sealed queue so ordering holds.
//!
//! The total number of buffered entries is capped at `max_retained`; past
//! that the oldest entries are dropped and counted.

use std::collections::VecDeque;

#[derive(Debug)]
pub struct LogBatch<T> {
    pending: Vec<T>,
    sealed: VecDeque<Vec<T>>,
    max_entries: usize,
    max_retained: usize,
    dropped: u64,
}

impl<T> LogBatch<T> {
    pub fn new(max_entries: usize, max_retained: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            pending: Vec::with_capacity(max_entries),
            sealed: VecDeque::new(),
            max_entries,
            max_retained: max_retained.max(max_entries),
            dropped: 0,
        }
    }

    /// Append an entry. Returns `true` if this push sealed a batch.
    pub fn push(&mut self, item: T) -> bool {
        self.pending.push(item);
        let sealed = self.pending.len() >= self.max_entries;
        if sealed {
            let batch = std::mem::replace(&mut self.pending, Vec::with_capacity(self.max_entries));
            self.sealed.push_back(batch);
        }
        self.enforce_cap();
        sealed
    }

    /// Oldest sealed batch, if any.
    pub fn take_sealed(&mut self) -> Option<Vec<T>> {
        self.sealed.pop_front()
    }

    /// Everything buffered, oldest first. Leaves the buffer empty.
    pub fn take_all(&mut self) -> Vec<T> {
        let mut all = Vec::with_capacity(self.len());
        for batch in self.sealed.drain(..) {
            all.extend(batch);
        }
        all.append(&mut self.pending);
        all
    }

    /// Put back entries that failed to send. They are older than anything
    /// still buffered.
    pub fn restore(&mut self, batch: Vec<T>) {
        if batch.is_empty() {
            return;
        }
        self.sealed.push_front(batch);
        self.enforce_cap();
    }

    pub fn len(&self) -> usize {
        self.sealed.iter().map(Vec::len).sum::<usize>() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.sealed.is_empty()
    }

    /// Number of sealed batches waiting to be sent.
    pub fn sealed_batches(&self) -> usize {
        self.sealed.len()
    }

    /// Entries dropped by the cap since the last call.
    pub fn take_dropped(&mut self) -> u64 {
        std::mem::take(&mut self.dropped)
    }

    fn enforce_cap(&mut self) {
        let mut excess = self.len().saturating_sub(self.max_retained);
        while excess > 0 {
            let removed = match self.sealed.front_mut() {
                Some(front) => {
                    let n = excess.min(front.len());
                    front.drain(..n);
                    if front.is_empty() {
                        self.sealed.pop_front();
                    }
                    n
                }
                None => {
                    let n = excess.min(self.pending.len());
                    self.pending.drain(..n);
                    n
                }
            };
            if removed == 0 && self.sealed.is_empty() {
                break;
            }
            excess -= removed;
            self.dropped += removed as u64;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_capacity_stays_pending() {
        let mut batch = LogBatch::new(10, 100);
        for i in 0..9 {
            assert!(!batch.push(i));
        }
        assert_eq!(batch.len(), 9);
        assert_eq!(batch.sealed_batches(), 0);
        assert!(batch.take_sealed().is_none());
    }

    #[test]
    fn test_twelve_entries_seal_first_ten() {
        let mut batch = LogBatch::new(10, 100);
        let seals = (0..12).filter(|i| batch.push(*i)).count();

        assert_eq!(seals, 1);
        assert_eq!(batch.take_sealed(), Some((0..10).collect::<Vec<_>>()));
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.take_all(), vec![10, 11]);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_restore_keeps_order() {
        let mut batch = LogBatch::new(3, 100);
        for i in 0..3 {
            batch.push(i);
        }
        let first = batch.take_sealed().unwrap();
        batch.push(3);
        batch.restore(first);

        assert_eq!(batch.len(), 4);
        assert_eq!(batch.take_all(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_restore_ahead_of_later_sealed_batches() {
        let mut batch = LogBatch::new(2, 100);
        for i in 0..4 {
            batch.push(i);
        }
        let first = batch.take_sealed().unwrap();
        batch.restore(first);

        assert_eq!(batch.take_sealed(), Some(vec![0, 1]));
        assert_eq!(batch.take_sealed(), Some(vec![2, 3]));
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut batch = LogBatch::new(2, 5);
        for i in 0..8 {
            batch.push(i);
        }
        assert_eq!(batch.len(), 5);
        assert_eq!(batch.take_dropped(), 3);
        assert_eq!(batch.take_dropped(), 0);
        assert_eq!(batch.take_all(), vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_cap_applies_to_restored_entries() {
        let mut batch = LogBatch::new(2, 4);
        for i in 0..4 {
            batch.push(i);
        }
        let failed = batch.take_all();
        batch.push(4);
        batch.restore(failed);

        assert_eq!(batch.take_dropped(), 1);
        assert_eq!(batch.take_all(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_restore_empty_is_noop() {
        let mut batch: LogBatch<u8> = LogBatch::new(2, 4);
        batch.restore(Vec::new());
        assert!(batch.is_empty());
        assert_eq!(batch.sealed_batches(), 0);
    }
}
