//! Iterative Heap's algorithm.
//!
//! Produces every ordering of a small slice without recursion. Each step is a
//! single swap, the first item yielded is the input order, and the sequence is
//! not sorted.

/// Lazy, finite sequence of all `n!` orderings of `items`.
#[derive(Debug, Clone)]
pub struct HeapPermutations<T> {
    items: Vec<T>,
    initial: Vec<T>,
    counters: Vec<usize>,
    position: usize,
    started: bool,
}

impl<T: Clone> HeapPermutations<T> {
    pub fn new(items: Vec<T>) -> Self {
        let len = items.len();
        Self {
            initial: items.clone(),
            items,
            counters: vec![0; len],
            position: 0,
            started: false,
        }
    }

    /// Start over from the input order.
    pub fn reset(&mut self) {
        self.items.clone_from(&self.initial);
        self.counters.iter_mut().for_each(|counter| *counter = 0);
        self.position = 0;
        self.started = false;
    }
}

impl<T: Clone> Iterator for HeapPermutations<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            return Some(self.items.clone());
        }

        while self.position < self.items.len() {
            let i = self.position;
            if self.counters[i] < i {
                if i % 2 == 0 {
                    self.items.swap(0, i);
                } else {
                    self.items.swap(self.counters[i], i);
                }
                self.counters[i] += 1;
                self.position = 0;
                return Some(self.items.clone());
            }
            self.counters[i] = 0;
            self.position += 1;
        }

        None
    }
}
