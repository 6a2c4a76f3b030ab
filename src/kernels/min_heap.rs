//! A fixed-capacity binary min-heap used as the priority queue for tree
//! construction.
//!
//! The heap stores entries in a 0-based array: the children of `i` live at
//! `2i + 1` and `2i + 2`. Ordering is whatever `Ord` says about `T`; the tree
//! builder supplies entries that order by `(weight, sequence)` so equal-weight
//! ties resolve the same way on every run.

use crate::error::HuffmanError;

#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    elements: Vec<T>,
    capacity: usize,
}

impl<T: Ord> MinHeap<T> {
    /// An empty heap that accepts at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Heapifies `source` in place in O(n).
    pub fn build(source: Vec<T>, capacity: usize) -> Result<Self, HuffmanError> {
        if source.len() > capacity {
            return Err(HuffmanError::HeapCapacityExceeded(capacity));
        }
        let mut heap = Self {
            elements: source,
            capacity,
        };
        let n = heap.len();
        for i in (0..n / 2).rev() {
            heap.sift_down(i);
        }
        Ok(heap)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn peek(&self) -> Option<&T> {
        self.elements.first()
    }

    /// Adds an entry in O(log n). Fails when the heap is already full.
    pub fn insert(&mut self, value: T) -> Result<(), HuffmanError> {
        if self.elements.len() == self.capacity {
            return Err(HuffmanError::HeapCapacityExceeded(self.capacity));
        }
        self.elements.push(value);
        self.sift_up(self.elements.len() - 1);
        Ok(())
    }

    /// Removes and returns the smallest entry in O(log n).
    pub fn extract_min(&mut self) -> Option<T> {
        if self.elements.is_empty() {
            return None;
        }
        let last = self.elements.len() - 1;
        self.elements.swap(0, last);
        let min = self.elements.pop();
        if !self.elements.is_empty() {
            self.sift_down(0);
        }
        min
    }

    /// True if every element is >= its parent.
    pub fn is_valid_min_heap(&self) -> bool {
        (1..self.elements.len()).all(|i| self.elements[parent(i)] <= self.elements[i])
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let p = parent(i);
            if self.elements[i] < self.elements[p] {
                self.elements.swap(i, p);
                i = p;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.elements.len();
        loop {
            let l = left(i);
            let r = right(i);
            let mut smallest = i;

            if l < n && self.elements[l] < self.elements[smallest] {
                smallest = l;
            }
            if r < n && self.elements[r] < self.elements[smallest] {
                smallest = r;
            }
            if smallest == i {
                break;
            }
            self.elements.swap(i, smallest);
            i = smallest;
        }
    }
}

fn parent(i: usize) -> usize {
    (i - 1) / 2
}

fn left(i: usize) -> usize {
    2 * i + 1
}

fn right(i: usize) -> usize {
    2 * i + 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_min_returns_sorted_order() {
        let mut heap = MinHeap::build(vec![9, 4, 7, 1, 8, 2, 2, 6], 8).unwrap();
        assert!(heap.is_valid_min_heap());

        let mut drained = Vec::new();
        while let Some(v) = heap.extract_min() {
            drained.push(v);
            assert!(heap.is_valid_min_heap());
        }
        assert_eq!(drained, vec![1, 2, 2, 4, 6, 7, 8, 9]);
    }

    #[test]
    fn test_insert_keeps_heap_property() {
        let mut heap = MinHeap::with_capacity(16);
        for v in [5u64, 3, 9, 1, 1, 12, 0, 7] {
            heap.insert(v).unwrap();
            assert!(heap.is_valid_min_heap());
        }
        assert_eq!(heap.peek(), Some(&0));
        assert_eq!(heap.len(), 8);
    }

    #[test]
    fn test_insert_into_full_heap_fails() {
        let mut heap = MinHeap::with_capacity(2);
        heap.insert(1).unwrap();
        heap.insert(2).unwrap();
        let result = heap.insert(3);
        assert!(matches!(result, Err(HuffmanError::HeapCapacityExceeded(2))));
        assert_eq!(heap.len(), 2);
    }

    #[test]
    fn test_build_rejects_oversized_source() {
        let result = MinHeap::build(vec![1, 2, 3], 2);
        assert!(matches!(result, Err(HuffmanError::HeapCapacityExceeded(2))));
    }

    #[test]
    fn test_extract_min_on_empty_heap() {
        let mut heap: MinHeap<u32> = MinHeap::with_capacity(4);
        assert!(heap.is_empty());
        assert_eq!(heap.extract_min(), None);
    }

    #[test]
    fn test_build_single_and_empty() {
        let mut one = MinHeap::build(vec![42], 1).unwrap();
        assert_eq!(one.extract_min(), Some(42));
        assert_eq!(one.extract_min(), None);

        let empty: MinHeap<u8> = MinHeap::build(Vec::new(), 0).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.capacity(), 0);
    }
}
