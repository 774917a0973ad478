//! Lazy subset and ordering generators.
//!
//! Both iterators produce finite, restartable sequences (`Clone` restarts
//! from the current point; rebuilding restarts from scratch) and touch no
//! shared state, so they can be consumed eagerly inside a single
//! constraint call. The equal-cells family walks pairs via
//! [`combinations`]; [`permutations`] serves tuple-style deductions
//! layered on top of the engine.

/// All size-`k` subsets of `items`, in lexicographic index order.
///
/// Empty when `k > items.len()`; the single empty subset when `k == 0`.
pub fn combinations<T: Clone>(items: &[T], k: usize) -> Combinations<T> {
    Combinations {
        done: k > items.len(),
        indices: (0..k).collect(),
        items: items.to_vec(),
    }
}

#[derive(Debug, Clone)]
pub struct Combinations<T> {
    items: Vec<T>,
    indices: Vec<usize>,
    done: bool,
}

impl<T: Clone> Iterator for Combinations<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        if self.done {
            return None;
        }
        let subset = self
            .indices
            .iter()
            .map(|&index| self.items[index].clone())
            .collect();

        // Advance the rightmost index that still has room to move; each
        // index i tops out at n - k + i.
        let k = self.indices.len();
        let n = self.items.len();
        let mut position = k;
        loop {
            if position == 0 {
                self.done = true;
                break;
            }
            position -= 1;
            if self.indices[position] < n - (k - position) {
                self.indices[position] += 1;
                for next in position + 1..k {
                    self.indices[next] = self.indices[next - 1] + 1;
                }
                break;
            }
        }
        Some(subset)
    }
}

/// All orderings of `items`, lexicographic over the index sequence.
pub fn permutations<T: Clone>(items: &[T]) -> Permutations<T> {
    Permutations {
        indices: (0..items.len()).collect(),
        items: items.to_vec(),
        done: false,
    }
}

#[derive(Debug, Clone)]
pub struct Permutations<T> {
    items: Vec<T>,
    indices: Vec<usize>,
    done: bool,
}

impl<T: Clone> Iterator for Permutations<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        if self.done {
            return None;
        }
        let ordering = self
            .indices
            .iter()
            .map(|&index| self.items[index].clone())
            .collect();

        // Standard next-permutation step on the index sequence.
        let n = self.indices.len();
        let mut pivot = n.saturating_sub(1);
        while pivot > 0 && self.indices[pivot - 1] >= self.indices[pivot] {
            pivot -= 1;
        }
        if pivot == 0 {
            self.done = true;
        } else {
            let mut swap = n - 1;
            while self.indices[swap] <= self.indices[pivot - 1] {
                swap -= 1;
            }
            self.indices.swap(pivot - 1, swap);
            self.indices[pivot..].reverse();
        }
        Some(ordering)
    }
}

/// `n` choose `k`; 0 when `k > n`.
pub fn binomial_coefficient(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u64 = 1;
    for i in 0..k {
        result = result * (n - i) / (i + 1);
    }
    result
}
