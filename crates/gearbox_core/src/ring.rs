//! # Fixed-Capacity Ring
//!
//! Bounded circular buffer for sample history. Pushing into a full ring
//! silently evicts the oldest element.

/// A circular buffer that never grows past its capacity.
///
/// # Example
///
/// ```rust
/// use gearbox_core::FixedCapacityRing;
///
/// let mut ring = FixedCapacityRing::new(2);
/// ring.push(1);
/// ring.push(2);
/// assert_eq!(ring.push(3), Some(1));
/// assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct FixedCapacityRing<T> {
    /// Slot storage, `None` until first written.
    storage: Box<[Option<T>]>,
    /// Index of the oldest element.
    head: usize,
    /// Number of live elements.
    len: usize,
}

impl<T> FixedCapacityRing<T> {
    /// Creates an empty ring. A capacity of zero is bumped to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            storage: (0..capacity).map(|_| None).collect(),
            head: 0,
            len: 0,
        }
    }

    /// Maximum number of elements held.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of elements currently held.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True if nothing has been pushed since creation or the last clear.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True once pushes start evicting.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Appends a value, returning the evicted oldest value if the ring was full.
    pub fn push(&mut self, value: T) -> Option<T> {
        let capacity = self.capacity();
        if self.len < capacity {
            let tail = (self.head + self.len) % capacity;
            self.storage[tail] = Some(value);
            self.len += 1;
            None
        } else {
            let evicted = self.storage[self.head].replace(value);
            self.head = (self.head + 1) % capacity;
            evicted
        }
    }

    /// Returns the element `index` steps after the oldest.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        self.storage[(self.head + index) % self.capacity()].as_ref()
    }

    /// Most recently pushed element.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len).filter_map(move |i| self.get(i))
    }

    /// Drops every element, keeping the capacity.
    pub fn clear(&mut self) {
        for slot in self.storage.iter_mut() {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }

    /// Changes the capacity.
    ///
    /// When shrinking, the oldest elements are dropped first; the newest
    /// `capacity` elements survive in their original order.
    pub fn set_capacity(&mut self, capacity: usize) {
        let capacity = capacity.max(1);
        if capacity == self.capacity() {
            return;
        }

        let skip = self.len.saturating_sub(capacity);
        let mut storage: Box<[Option<T>]> = (0..capacity).map(|_| None).collect();
        let mut len = 0;
        for i in skip..self.len {
            let index = (self.head + i) % self.storage.len();
            storage[len] = self.storage[index].take();
            len += 1;
        }

        self.storage = storage;
        self.head = 0;
        self.len = len;
    }
}

impl FixedCapacityRing<f32> {
    /// Minimum and maximum over the finite samples, or `None` if there are none.
    #[must_use]
    pub fn finite_range(&self) -> Option<(f32, f32)> {
        self.iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(ring: &FixedCapacityRing<i32>) -> Vec<i32> {
        ring.iter().copied().collect()
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut ring = FixedCapacityRing::new(3);
        assert!(ring.push(1).is_none());
        assert!(ring.push(2).is_none());
        assert!(ring.push(3).is_none());
        assert!(ring.is_full());

        assert_eq!(ring.push(4), Some(1));
        assert_eq!(contents(&ring), vec![2, 3, 4]);
        assert_eq!(ring.last(), Some(&4));
    }

    #[test]
    fn test_shrink_keeps_newest() {
        let mut ring = FixedCapacityRing::new(4);
        for v in 1..=6 {
            ring.push(v);
        }
        // Holds [3, 4, 5, 6] with a wrapped head.
        ring.set_capacity(2);
        assert_eq!(ring.capacity(), 2);
        assert_eq!(contents(&ring), vec![5, 6]);

        ring.push(7);
        assert_eq!(contents(&ring), vec![6, 7]);
    }

    #[test]
    fn test_grow_preserves_order() {
        let mut ring = FixedCapacityRing::new(2);
        ring.push(1);
        ring.push(2);
        ring.push(3);
        ring.set_capacity(4);
        assert_eq!(contents(&ring), vec![2, 3]);
        ring.push(4);
        ring.push(5);
        assert_eq!(contents(&ring), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_finite_range_skips_nan() {
        let mut ring = FixedCapacityRing::new(4);
        ring.push(f32::NAN);
        assert!(ring.finite_range().is_none());

        ring.push(2.0);
        ring.push(-1.0);
        assert_eq!(ring.finite_range(), Some((-1.0, 2.0)));
    }

    #[test]
    fn test_clear() {
        let mut ring = FixedCapacityRing::new(2);
        ring.push(1);
        ring.clear();
        assert!(ring.is_empty());
        assert!(ring.last().is_none());
        assert_eq!(ring.capacity(), 2);
    }
}
