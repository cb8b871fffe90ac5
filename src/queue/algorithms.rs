use crate::queue::{link_between, unlink, Queue};
use std::cmp::Ordering;

mod sort;

impl PartialEq for Queue {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other)
    }
}

impl Eq for Queue {}

impl Clone for Queue {
    fn clone(&self) -> Self {
        self.iter().collect()
    }
}

// Structural transforms: they only relink, never allocate or free.
impl Queue {
    /// Reverse the queue in place by swapping `next` and `prev` of every link,
    /// the ghost included.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["a", "b", "c"]);
    /// queue.reverse();
    /// assert_eq!(Vec::from_iter(queue.iter()), vec!["c", "b", "a"]);
    /// ```
    pub fn reverse(&mut self) {
        let ghost = self.ghost_link();
        let mut link = ghost;
        loop {
            // SAFETY: every link reachable from the ghost is a valid link of
            // this queue; after the swap, `prev` holds the old `next`.
            unsafe {
                let current = &mut *link.as_ptr();
                std::mem::swap(&mut current.next, &mut current.prev);
                link = current.prev;
            }
            if link == ghost {
                break;
            }
        }
    }

    /// Swap every two adjacent elements: the 1st with the 2nd, the 3rd with the
    /// 4th, and so on. An odd trailing element stays in place.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["1", "2", "3", "4", "5"]);
    /// queue.swap_pairs();
    /// assert_eq!(Vec::from_iter(queue.iter()), vec!["2", "1", "4", "3", "5"]);
    /// ```
    pub fn swap_pairs(&mut self) {
        let ghost = self.ghost_link();
        let mut first = self.front_link();
        // SAFETY: `first` and `second` are elements of this queue, and
        // `second` is put back between the adjacent `first.prev` and `first`.
        unsafe {
            while first != ghost {
                let second = first.as_ref().next;
                if second == ghost {
                    break;
                }
                unlink(second);
                link_between(first.as_ref().prev, first, second);
                first = first.as_ref().next;
            }
        }
    }

    /// Reverse the elements of every consecutive group of `k` elements. A
    /// trailing group shorter than `k` is left as it is.
    ///
    /// Nothing happens if `k <= 1` or the queue holds fewer than `k` elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["1", "2", "3", "4", "5", "6", "7"]);
    /// queue.reverse_k_groups(3);
    /// assert_eq!(
    ///     Vec::from_iter(queue.iter()),
    ///     vec!["3", "2", "1", "6", "5", "4", "7"]
    /// );
    /// ```
    pub fn reverse_k_groups(&mut self, k: usize) {
        if k <= 1 || self.is_empty() {
            return;
        }
        let groups = self.len() / k;
        let mut anchor = self.ghost_link();
        for _ in 0..groups {
            // Move each following element of the group right after the anchor;
            // the first element of the group ends up last.
            // SAFETY: the group `anchor.next` and its `k - 1` successors are
            // elements of this queue, since `groups * k <= len`.
            unsafe {
                let first = anchor.as_ref().next;
                for _ in 1..k {
                    let moved = first.as_ref().next;
                    unlink(moved);
                    link_between(anchor, anchor.as_ref().next, moved);
                }
                anchor = first;
            }
        }
    }
}

// Deletion transforms.
impl Queue {
    /// Delete the middle element, found by a slow/fast walk from the front:
    /// for *n* elements it is the one at index *n* / 2 (counted from 0).
    ///
    /// Returns `false` if the queue is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["a", "b", "c", "d"]);
    /// assert!(queue.delete_middle());
    /// assert_eq!(Vec::from_iter(queue.iter()), vec!["a", "b", "d"]);
    /// ```
    pub fn delete_middle(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        let ghost = self.ghost_link();
        let (mut slow, mut fast) = (self.front_link(), self.front_link());
        // SAFETY: `fast` only advances over links that are checked not to be
        // the ghost, and `slow` trails behind it, so `slow` is an element.
        unsafe {
            while fast != ghost && fast.as_ref().next != ghost {
                slow = slow.as_ref().next;
                fast = fast.as_ref().next.as_ref().next;
            }
            drop(self.detach(slow));
        }
        true
    }

    /// Delete every element whose value occurs more than once, in a queue
    /// sorted in non-decreasing order. All members of a run of equal values are
    /// deleted, not only the extra copies.
    ///
    /// Only adjacent values are compared, so the queue must already be
    /// sorted. Returns the number of deleted elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["a", "a", "b", "c", "c", "c"]);
    /// assert_eq!(queue.dedup_sorted(), 5);
    /// assert_eq!(Vec::from_iter(queue.iter()), vec!["b"]);
    /// ```
    pub fn dedup_sorted(&mut self) -> usize {
        let mut deleted = 0;
        let mut cursor = self.cursor_front_mut();
        while cursor.current().is_some() {
            let mut duplicated = false;
            while cursor.peek_next() == cursor.current() {
                drop(cursor.remove_next());
                deleted += 1;
                duplicated = true;
            }
            if duplicated {
                drop(cursor.remove());
                deleted += 1;
            } else {
                cursor.move_next_cyclic();
            }
        }
        deleted
    }

    /// Keep only the elements that are strictly less than every element to
    /// their right, scanning from the tail. Returns the remaining length.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["c", "a", "b"]);
    /// assert_eq!(queue.keep_ascending_from_right(), 2);
    /// assert_eq!(Vec::from_iter(queue.iter()), vec!["a", "b"]);
    /// ```
    pub fn keep_ascending_from_right(&mut self) -> usize {
        self.keep_monotonic_from_right(Ordering::Less)
    }

    /// Keep only the elements that are strictly greater than every element to
    /// their right, scanning from the tail. Returns the remaining length.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["e", "b", "d", "a"]);
    /// assert_eq!(queue.keep_descending_from_right(), 3);
    /// assert_eq!(Vec::from_iter(queue.iter()), vec!["e", "d", "a"]);
    /// ```
    pub fn keep_descending_from_right(&mut self) -> usize {
        self.keep_monotonic_from_right(Ordering::Greater)
    }

    /// Walk from the back; the element right after the cursor's previous one is
    /// always the last kept element, i.e. the running extremum. The previous
    /// element survives only if it compares as `keep` against it.
    fn keep_monotonic_from_right(&mut self, keep: Ordering) -> usize {
        if self.is_empty() {
            return 0;
        }
        if self.front_link() == self.back_link() {
            return 1;
        }
        let mut kept = 1;
        let mut cursor = self.cursor_back_mut();
        loop {
            let survives = match (cursor.previous(), cursor.current()) {
                (Some(candidate), Some(extremum)) => candidate.cmp(extremum) == keep,
                _ => break,
            };
            if survives {
                cursor.move_prev_cyclic();
                kept += 1;
            } else {
                drop(cursor.backspace());
            }
        }
        kept
    }
}

// Sorting.
impl Queue {
    /// Sort the queue by byte-wise comparison of the values, ascending or
    /// descending.
    ///
    /// The ascending sort is stable (i.e., does not reorder equal values); the
    /// descending order is the ascending result reversed.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* * log(*n*)) time and
    /// *O*(log(*n*)) stack. No element is allocated or freed.
    ///
    /// # Current Implementation
    ///
    /// A top-down merge sort: the queue is cut at its middle into two lists
    /// with their own sentinels, both halves are sorted recursively and then
    /// merged back into the queue.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["pear", "apple", "fig"]);
    /// queue.sort(false);
    /// assert_eq!(Vec::from_iter(queue.iter()), vec!["apple", "fig", "pear"]);
    ///
    /// queue.sort(true);
    /// assert_eq!(Vec::from_iter(queue.iter()), vec!["pear", "fig", "apple"]);
    /// ```
    pub fn sort(&mut self, descending: bool) {
        sort::merge_sort(self);
        if descending {
            self.reverse();
        }
    }

    /// Sort the queue with a comparator function.
    ///
    /// This sort is stable (i.e., does not reorder equal elements).
    ///
    /// The comparator function must define a total ordering for the
    /// values in the queue. If the ordering is not total, the order
    /// of the values is unspecified.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* * log(*n*)) time and *O*(1) memory.
    ///
    /// # Current Implementation
    ///
    /// A bottom-up merge sort: elements are pushed onto a stack of pending
    /// sorted runs, and two runs of the same size are merged as soon as a
    /// third one of that size would follow them, which keeps every merge
    /// balanced without measuring the queue first. No element is allocated or
    /// freed.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["bb", "a", "ccc"]);
    /// queue.sort_by(|a, b| a.len().cmp(&b.len()));
    /// assert_eq!(Vec::from_iter(queue.iter()), vec!["a", "bb", "ccc"]);
    ///
    /// // reverse sorting
    /// queue.sort_by(|a, b| b.cmp(a));
    /// assert_eq!(Vec::from_iter(queue.iter()), vec!["ccc", "bb", "a"]);
    /// ```
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&str, &str) -> Ordering,
    {
        sort::pending_run_sort(self, compare)
    }
}

#[cfg(test)]
mod tests {
    use crate::Queue;
    use proptest::prelude::*;
    use std::iter::FromIterator;

    fn queue_of(values: &[&str]) -> Queue {
        Queue::from_iter(values.iter().copied())
    }

    fn values(queue: &Queue) -> Vec<&str> {
        // Walk both directions to check the back links as well.
        let forward = Vec::from_iter(queue.iter());
        let mut backward = Vec::from_iter(queue.iter().rev());
        backward.reverse();
        assert_eq!(forward, backward);
        forward
    }

    #[test]
    fn reverse() {
        let inputs: [&[&str]; 4] = [&[], &["a"], &["a", "b"], &["a", "b", "c", "d", "e"]];
        for input in inputs {
            let mut queue = queue_of(input);
            queue.reverse();
            let expected: Vec<&str> = input.iter().rev().copied().collect();
            assert_eq!(values(&queue), expected);
            queue.reverse();
            assert_eq!(values(&queue), input);
        }
    }

    #[test]
    fn swap_pairs() {
        fn test_swap(input: &[&str], expected: &[&str]) {
            let mut queue = queue_of(input);
            queue.swap_pairs();
            assert_eq!(values(&queue), expected);
        }
        test_swap(&[], &[]);
        test_swap(&["1"], &["1"]);
        test_swap(&["1", "2"], &["2", "1"]);
        test_swap(&["1", "2", "3"], &["2", "1", "3"]);
        test_swap(&["1", "2", "3", "4"], &["2", "1", "4", "3"]);
    }

    #[test]
    fn reverse_k_groups() {
        fn test_reverse_k(input: &[&str], k: usize, expected: &[&str]) {
            let mut queue = queue_of(input);
            queue.reverse_k_groups(k);
            assert_eq!(values(&queue), expected);
        }
        let seven = ["1", "2", "3", "4", "5", "6", "7"];
        test_reverse_k(&seven, 3, &["3", "2", "1", "6", "5", "4", "7"]);
        test_reverse_k(&seven, 7, &["7", "6", "5", "4", "3", "2", "1"]);
        test_reverse_k(&seven, 2, &["2", "1", "4", "3", "6", "5", "7"]);
        test_reverse_k(&seven, 8, &seven);
        test_reverse_k(&seven, 1, &seven);
        test_reverse_k(&seven, 0, &seven);
        test_reverse_k(&[], 3, &[]);
        test_reverse_k(&["1", "2", "3", "4"], 2, &["2", "1", "4", "3"]);
    }

    #[test]
    fn delete_middle() {
        fn test_delete_mid(input: &[&str], expected: &[&str]) {
            let mut queue = queue_of(input);
            assert!(queue.delete_middle());
            assert_eq!(values(&queue), expected);
        }
        test_delete_mid(&["a"], &[]);
        test_delete_mid(&["a", "b"], &["a"]);
        test_delete_mid(&["a", "b", "c"], &["a", "c"]);
        test_delete_mid(&["a", "b", "c", "d"], &["a", "b", "d"]);
        test_delete_mid(&["a", "b", "c", "d", "e"], &["a", "b", "d", "e"]);

        let mut empty = Queue::new();
        assert!(!empty.delete_middle());
    }

    #[test]
    fn dedup_sorted() {
        fn test_dedup(input: &[&str], expected: &[&str]) {
            let mut queue = queue_of(input);
            assert_eq!(queue.dedup_sorted(), input.len() - expected.len());
            assert_eq!(values(&queue), expected);
        }
        test_dedup(&["a", "a", "b", "c", "c", "c"], &["b"]);
        test_dedup(&["a", "b", "c"], &["a", "b", "c"]);
        test_dedup(&["a", "a"], &[]);
        test_dedup(&["a", "b", "b"], &["a"]);
        test_dedup(&["a", "a", "b"], &["b"]);
        test_dedup(&["x"], &["x"]);
        test_dedup(&[], &[]);
    }

    #[test]
    fn keep_monotonic() {
        let mut queue = queue_of(&["c", "a", "b"]);
        assert_eq!(queue.keep_ascending_from_right(), 2);
        assert_eq!(values(&queue), ["a", "b"]);

        let mut queue = queue_of(&["5", "3", "8", "2", "9"]);
        assert_eq!(queue.keep_ascending_from_right(), 2);
        assert_eq!(values(&queue), ["2", "9"]);

        let mut queue = queue_of(&["9", "5", "7", "3", "1"]);
        assert_eq!(queue.keep_descending_from_right(), 4);
        assert_eq!(values(&queue), ["9", "7", "3", "1"]);

        // Equal values are not strictly smaller or greater.
        let mut queue = queue_of(&["b", "b", "b"]);
        assert_eq!(queue.keep_ascending_from_right(), 1);
        assert_eq!(values(&queue), ["b"]);
        let mut queue = queue_of(&["b", "b", "b"]);
        assert_eq!(queue.keep_descending_from_right(), 1);

        let mut single = queue_of(&["z"]);
        assert_eq!(single.keep_ascending_from_right(), 1);
        assert_eq!(single.keep_descending_from_right(), 1);
        let mut empty = Queue::new();
        assert_eq!(empty.keep_ascending_from_right(), 0);
        assert_eq!(empty.keep_descending_from_right(), 0);
    }

    #[test]
    fn sort_small() {
        fn test_sort(input: &[&str]) {
            let mut expected = input.to_vec();
            expected.sort();

            let mut queue = queue_of(input);
            queue.sort(false);
            assert_eq!(values(&queue), expected);

            let mut queue = queue_of(input);
            queue.sort(true);
            expected.reverse();
            assert_eq!(values(&queue), expected);
        }
        test_sort(&[]);
        test_sort(&["a"]);
        test_sort(&["b", "a"]);
        test_sort(&["c", "a", "b"]);
        test_sort(&["delta", "alpha", "charlie", "bravo", "alpha", "echo"]);
        test_sort(&["", "b", "", "a"]);
    }

    #[test]
    fn sort_by_small() {
        fn test_sort_by(input: &[&str]) {
            let mut expected = input.to_vec();
            expected.sort();
            let mut queue = queue_of(input);
            queue.sort_by(|a, b| a.cmp(b));
            assert_eq!(values(&queue), expected);

            expected.reverse();
            queue.sort_by(|a, b| b.cmp(a));
            assert_eq!(values(&queue), expected);
        }
        test_sort_by(&[]);
        test_sort_by(&["a"]);
        test_sort_by(&["b", "a"]);
        let long: Vec<String> = (0..40).map(|i| format!("{:02}", (i * 17) % 40)).collect();
        test_sort_by(&long.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn sort_is_stable() {
        // Values compare equal by length only, so their input order must survive.
        let mut queue = queue_of(&["bb", "a1", "c", "a2", "dd", "b"]);
        queue.sort_by(|a, b| a.len().cmp(&b.len()));
        assert_eq!(values(&queue), ["c", "b", "bb", "a1", "a2", "dd"]);
    }

    proptest! {
        #[test]
        fn reverse_twice_is_identity(input in proptest::collection::vec("[a-c]{0,3}", 0..32)) {
            let mut queue = Queue::from_iter(input.clone());
            queue.reverse();
            queue.reverse();
            prop_assert!(queue.iter().eq(input.iter().map(String::as_str)));
        }

        #[test]
        fn sort_orders_and_keeps_values(
            input in proptest::collection::vec("[a-d]{0,4}", 0..200),
            descending in any::<bool>(),
        ) {
            let mut expected = input.clone();
            expected.sort();
            if descending {
                expected.reverse();
            }
            let mut queue = Queue::from_iter(input.clone());
            queue.sort(descending);
            prop_assert_eq!(queue.len(), input.len());
            prop_assert!(queue.iter().eq(expected.iter().map(String::as_str)));
            prop_assert!(queue.iter().rev().eq(expected.iter().rev().map(String::as_str)));

            let mut baseline = Queue::from_iter(input);
            if descending {
                baseline.sort_by(|a, b| b.cmp(a));
            } else {
                baseline.sort_by(|a, b| a.cmp(b));
            }
            prop_assert_eq!(baseline, queue);
        }

        #[test]
        fn reverse_k_groups_keeps_values(
            input in proptest::collection::vec("[a-z]{1,2}", 0..40),
            k in 0_usize..10,
        ) {
            let mut queue = Queue::from_iter(input.clone());
            queue.reverse_k_groups(k);
            let mut expected = input.clone();
            if k > 1 {
                for group in expected.chunks_exact_mut(k) {
                    group.reverse();
                }
            }
            prop_assert!(queue.iter().eq(expected.iter().map(String::as_str)));
        }

        #[test]
        fn dedup_keeps_singletons(input in proptest::collection::vec("[a-e]", 0..40)) {
            let mut sorted = input;
            sorted.sort();
            let expected: Vec<&String> = sorted
                .iter()
                .filter(|v| sorted.iter().filter(|w| w == v).count() == 1)
                .collect();
            let mut queue = Queue::from_iter(sorted.clone());
            queue.dedup_sorted();
            prop_assert!(queue.iter().eq(expected.into_iter().map(String::as_str)));
        }
    }
}
