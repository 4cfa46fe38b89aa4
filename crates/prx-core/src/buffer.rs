//! Bounded, most-recent-first buffer.
//!
//! Used for both the decision history and the pending escalation list.
//! New items go to the front; when the buffer is full the item at the back
//! (the oldest) is evicted.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct RecentBuffer<T> {
    capacity: usize,
    items: VecDeque<T>,
    total_evicted: u64,
}

impl<T> RecentBuffer<T> {
    /// A zero capacity is treated as one. Storage grows on demand.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            items: VecDeque::new(),
            total_evicted: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items evicted for capacity since construction.
    pub fn total_evicted(&self) -> u64 {
        self.total_evicted
    }

    /// Insert `item` as the newest entry, returning the evicted oldest entry
    /// if the buffer overflowed.
    pub fn push_newest(&mut self, item: T) -> Option<T> {
        self.items.push_front(item);
        if self.items.len() > self.capacity {
            self.total_evicted += 1;
            return self.items.pop_back();
        }
        None
    }

    /// Replace the contents with `items`, given newest-first. Anything past
    /// capacity is dropped.
    pub fn reset(&mut self, items: impl IntoIterator<Item = T>) {
        self.items.clear();
        self.items.extend(items.into_iter().take(self.capacity));
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Newest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    /// Remove and return the first item matching `pred`.
    pub fn take_first(&mut self, pred: impl Fn(&T) -> bool) -> Option<T> {
        let pos = self.items.iter().position(pred)?;
        self.items.remove(pos)
    }

    /// Remove every item matching `pred`, returned newest-first.
    pub fn drain_matching(&mut self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        let mut kept = VecDeque::with_capacity(self.items.len());
        let mut drained = Vec::new();
        for item in self.items.drain(..) {
            if pred(&item) {
                drained.push(item);
            } else {
                kept.push_back(item);
            }
        }
        self.items = kept;
        drained
    }
}

impl<T: Clone> RecentBuffer<T> {
    /// Copy of the contents, newest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::RecentBuffer;

    #[test]
    fn newest_item_is_first() {
        let mut buf = RecentBuffer::new(3);
        buf.push_newest(1);
        buf.push_newest(2);
        buf.push_newest(3);
        assert_eq!(buf.to_vec(), vec![3, 2, 1]);
        assert_eq!(buf.iter().next(), Some(&3));
    }

    #[test]
    fn overflow_evicts_oldest() {
        let mut buf = RecentBuffer::new(2);
        assert_eq!(buf.push_newest("a"), None);
        assert_eq!(buf.push_newest("b"), None);
        assert_eq!(buf.push_newest("c"), Some("a"));
        assert_eq!(buf.to_vec(), vec!["c", "b"]);
        assert_eq!(buf.total_evicted(), 1);
    }

    #[test]
    fn reset_truncates_to_capacity() {
        let mut buf = RecentBuffer::new(2);
        buf.reset(vec![9, 8, 7]);
        assert_eq!(buf.to_vec(), vec![9, 8]);
    }

    #[test]
    fn take_and_drain_preserve_order() {
        let mut buf = RecentBuffer::new(10);
        for i in 1..=6 {
            buf.push_newest(i);
        }
        assert_eq!(buf.take_first(|v| *v == 4), Some(4));
        assert_eq!(buf.take_first(|v| *v == 4), None);
        let evens = buf.drain_matching(|v| v % 2 == 0);
        assert_eq!(evens, vec![6, 2]);
        assert_eq!(buf.to_vec(), vec![5, 3, 1]);
    }

    #[test]
    fn zero_capacity_holds_one() {
        let mut buf = RecentBuffer::new(0);
        buf.push_newest(1);
        buf.push_newest(2);
        assert_eq!(buf.to_vec(), vec![2]);
    }
}
