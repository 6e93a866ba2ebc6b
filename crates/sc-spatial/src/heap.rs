//! `IndexedMinHeap` — binary min-heap with O(1) membership and O(log n)
//! priority updates.
//!
//! The heap array stores `(item, priority)` pairs; a side index maps each
//! item to its array position and is rewritten on every swap.

use std::hash::Hash;

use crate::{Map, SpatialError, SpatialResult};

pub struct IndexedMinHeap<K, P> {
    entries: Vec<(K, P)>,
    index: Map<K, usize>,
}

impl<K, P> Default for IndexedMinHeap<K, P>
where
    K: Hash + Eq + Clone,
    P: Ord + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, P> IndexedMinHeap<K, P>
where
    K: Hash + Eq + Clone,
    P: Ord + Copy,
{
    pub fn new() -> Self {
        Self { entries: Vec::new(), index: Map::default() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, item: &K) -> bool {
        self.index.contains_key(item)
    }

    pub fn priority(&self, item: &K) -> Option<P> {
        self.index.get(item).map(|&i| self.entries[i].1)
    }

    pub fn peek(&self) -> Option<(&K, P)> {
        self.entries.first().map(|(k, p)| (k, *p))
    }

    /// Insert `item`, or move it to `priority` if already present.
    pub fn enqueue(&mut self, item: K, priority: P) {
        if let Some(&i) = self.index.get(&item) {
            self.reprioritize(i, priority);
            return;
        }
        let i = self.entries.len();
        self.index.insert(item.clone(), i);
        self.entries.push((item, priority));
        self.sift_up(i);
    }

    /// Change the priority of an item already in the heap.
    pub fn set_priority(&mut self, item: &K, priority: P) -> SpatialResult<()> {
        let i = *self.index.get(item).ok_or(SpatialError::ItemNotQueued)?;
        self.reprioritize(i, priority);
        Ok(())
    }

    /// Remove and return the minimum-priority item.
    pub fn dequeue(&mut self) -> SpatialResult<(K, P)> {
        if self.entries.is_empty() {
            return Err(SpatialError::EmptyQueue);
        }
        let last = self.entries.len() - 1;
        self.swap(0, last);
        let (item, priority) = self.entries.pop().ok_or(SpatialError::EmptyQueue)?;
        self.index.remove(&item);
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Ok((item, priority))
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn reprioritize(&mut self, i: usize, priority: P) {
        let old = self.entries[i].1;
        self.entries[i].1 = priority;
        if priority < old {
            self.sift_up(i);
        } else {
            self.sift_down(i);
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.entries.swap(a, b);
        if let Some(slot) = self.index.get_mut(&self.entries[a].0) {
            *slot = a;
        }
        if let Some(slot) = self.index.get_mut(&self.entries[b].0) {
            *slot = b;
        }
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.entries[i].1 >= self.entries[parent].1 {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.entries.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;
            if left < n && self.entries[left].1 < self.entries[smallest].1 {
                smallest = left;
            }
            if right < n && self.entries[right].1 < self.entries[smallest].1 {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.swap(i, smallest);
            i = smallest;
        }
    }
}
