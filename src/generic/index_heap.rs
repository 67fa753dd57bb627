/*!
A max-heap on a subset of elements with fixed indicies.

The heap is backed by a vector of values, one for each index, and a companion vector which tracks the position of an index on the heap, if the index is *active*.
Values of inactive indicies are kept, so an index may be moved on and off the heap without losing its value.

In the SAT core the heap stores the activity of each atom, and the most active atom without a value is chosen when a decision is required.

```rust
# use otter_omt::generic::index_heap::IndexHeap;
let mut heap = IndexHeap::default();
heap.add(600, 10.0);
heap.add(0, 70.0);

heap.activate(600);
heap.activate(0);

assert_eq!(heap.count(), 601);
assert_eq!(heap.pop_max(), Some(0));
assert_eq!(heap.pop_max(), Some(600));
assert!(heap.pop_max().is_none());
```
*/

/// The index heap struct.
pub struct IndexHeap<V: PartialOrd + Default + Clone> {
    values: Vec<V>,
    position: Vec<Option<usize>>,
    heap: Vec<usize>,
}

impl<V: PartialOrd + Default + Clone> Default for IndexHeap<V> {
    fn default() -> Self {
        IndexHeap {
            values: Vec::default(),
            position: Vec::default(),
            heap: Vec::default(),
        }
    }
}

impl<V: PartialOrd + Default + Clone> IndexHeap<V> {
    /// Sets the value of `index` to `value`, growing the structure if required.
    /// Returns true if `index` was a fresh index, false otherwise.
    ///
    /// To place `index` on the heap [activate](IndexHeap::activate) should be called after this method.
    pub fn add(&mut self, index: usize, value: V) -> bool {
        let fresh = index >= self.values.len();
        if fresh {
            self.values.resize(index + 1, V::default());
            self.position.resize(index + 1, None);
        }
        self.values[index] = value;
        if let Some(heap_index) = self.position[index] {
            self.sift_up(heap_index);
            self.sift_down(heap_index);
        }
        fresh
    }

    /// Places `index` on the heap.
    /// Returns true if `index` was not on the heap, false otherwise.
    pub fn activate(&mut self, index: usize) -> bool {
        match self.position.get(index) {
            Some(None) => {
                self.position[index] = Some(self.heap.len());
                self.heap.push(index);
                self.sift_up(self.heap.len() - 1);
                true
            }
            _ => false,
        }
    }

    /// True if `index` is on the heap.
    pub fn is_active(&self, index: usize) -> bool {
        matches!(self.position.get(index), Some(Some(_)))
    }

    /// Removes `index` from the heap, if present.
    pub fn remove(&mut self, index: usize) -> bool {
        let Some(Some(heap_index)) = self.position.get(index).copied() else {
            return false;
        };
        let last = self.heap.len() - 1;
        self.swap(heap_index, last);
        self.heap.pop();
        self.position[index] = None;
        if heap_index < self.heap.len() {
            self.sift_up(heap_index);
            self.sift_down(heap_index);
        }
        true
    }

    /// Pops the index with the maximum value off the heap.
    pub fn pop_max(&mut self) -> Option<usize> {
        let max = *self.heap.first()?;
        self.remove(max);
        Some(max)
    }

    /// The value of `index`.
    pub fn value_at(&self, index: usize) -> &V {
        &self.values[index]
    }

    /// Applies `f` to the value of `index`, and repositions `index` if active.
    pub fn apply_to_index(&mut self, index: usize, f: impl Fn(&V) -> V) {
        self.values[index] = f(&self.values[index]);
        if let Some(heap_index) = self.position[index] {
            self.sift_up(heap_index);
            self.sift_down(heap_index);
        }
    }

    /// Applies `f` to every value.
    ///
    /// `f` is assumed to be monotone, and so the heap is not revised.
    pub fn apply_to_all(&mut self, f: impl Fn(&V) -> V) {
        for value in self.values.iter_mut() {
            *value = f(value)
        }
    }

    /// A count of indicies in the structure.
    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// True if no index is on the heap.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.position[self.heap[a]] = Some(a);
        self.position[self.heap[b]] = Some(b);
    }

    fn greater(&self, a: usize, b: usize) -> bool {
        self.values[self.heap[a]] > self.values[self.heap[b]]
    }

    fn sift_up(&mut self, mut heap_index: usize) {
        while heap_index > 0 {
            let parent = (heap_index - 1) / 2;
            if self.greater(heap_index, parent) {
                self.swap(heap_index, parent);
                heap_index = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut heap_index: usize) {
        loop {
            let left = 2 * heap_index + 1;
            let right = left + 1;
            let mut largest = heap_index;
            if left < self.heap.len() && self.greater(left, largest) {
                largest = left;
            }
            if right < self.heap.len() && self.greater(right, largest) {
                largest = right;
            }
            if largest == heap_index {
                break;
            }
            self.swap(heap_index, largest);
            heap_index = largest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_order() {
        let mut heap = IndexHeap::default();
        for (index, value) in [(6, 10), (5, 20), (4, 30), (1, 60), (0, 70)] {
            heap.add(index, value);
            heap.activate(index);
        }

        let order = std::iter::from_fn(|| heap.pop_max()).collect::<Vec<_>>();
        assert_eq!(order, vec![0, 1, 4, 5, 6]);
    }

    #[test]
    fn revalue_active() {
        let mut heap = IndexHeap::default();
        for index in 0..5 {
            heap.add(index, index as i32);
            heap.activate(index);
        }
        heap.apply_to_index(0, |_| 100);
        heap.add(4, -1);

        assert_eq!(heap.pop_max(), Some(0));
        assert_eq!(heap.pop_max(), Some(3));
        assert_eq!(heap.pop_max(), Some(2));
        assert_eq!(heap.pop_max(), Some(1));
        assert_eq!(heap.pop_max(), Some(4));
    }

    #[test]
    fn remove_and_reactivate() {
        let mut heap = IndexHeap::default();
        for index in 0..4 {
            heap.add(index, index as i32);
            heap.activate(index);
        }
        assert!(heap.remove(2));
        assert!(!heap.remove(2));
        assert!(!heap.is_active(2));
        assert!(heap.activate(2));
        assert!(!heap.activate(2));

        assert_eq!(heap.pop_max(), Some(3));
        assert_eq!(heap.pop_max(), Some(2));
    }
}
