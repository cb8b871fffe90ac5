use crate::queue::{connect, init_head, link_between, unlink, value_of, Link, Queue};
use std::cmp::Ordering;
use std::ptr::{self, NonNull};

/// Stable ascending merge sort of the whole queue by byte-wise comparison.
pub(crate) fn merge_sort(queue: &mut Queue) {
    // SAFETY: the ghost heads a well-formed cycle of elements.
    unsafe { sort_list(queue.ghost_link()) }
}

/// Sort the cycle headed by `head`.
///
/// Each level splits the cycle into two temporary cycles headed by sentinels
/// on the stack. Both are empty again when the level returns, so no element is
/// left pointing into a dead frame.
unsafe fn sort_list(head: NonNull<Link>) {
    // Zero or one element.
    if head.as_ref().next == head.as_ref().prev {
        return;
    }
    let mid = middle_of(head);

    let mut left = Link::dangling();
    let mut right = Link::dangling();
    let left = NonNull::from(&mut left);
    let right = NonNull::from(&mut right);
    init_head(left);
    init_head(right);

    cut_position(left, head, mid);
    splice_tail(right, head);

    sort_list(left);
    sort_list(right);

    merge(head, left, right);
}

/// The last element of the first half: for *n* elements, the one at index
/// (*n* - 1) / 2. `head` must hold at least two elements.
unsafe fn middle_of(head: NonNull<Link>) -> NonNull<Link> {
    let mut slow = head.as_ref().next;
    let mut fast = slow;
    while fast.as_ref().next != head && fast.as_ref().next.as_ref().next != head {
        slow = slow.as_ref().next;
        fast = fast.as_ref().next.as_ref().next;
    }
    slow
}

/// Move `from.next..=mid` into the empty cycle `to`.
unsafe fn cut_position(to: NonNull<Link>, from: NonNull<Link>, mid: NonNull<Link>) {
    let front = from.as_ref().next;
    connect(from, mid.as_ref().next);
    connect(to, front);
    connect(mid, to);
}

/// Move every element of `from` to the tail of `to`, leaving `from` empty.
unsafe fn splice_tail(to: NonNull<Link>, from: NonNull<Link>) {
    let (front, back) = (from.as_ref().next, from.as_ref().prev);
    if front == from {
        return;
    }
    connect(to.as_ref().prev, front);
    connect(back, to);
    init_head(from);
}

/// Merge the sorted cycles `left` and `right` into the empty cycle `head`.
/// On ties the element of `left` goes first.
unsafe fn merge(head: NonNull<Link>, left: NonNull<Link>, right: NonNull<Link>) {
    loop {
        let (l, r) = (left.as_ref().next, right.as_ref().next);
        if l == left || r == right {
            break;
        }
        let taken = if value_of(r) < value_of(l) { r } else { l };
        unlink(taken);
        link_between(head.as_ref().prev, head, taken);
    }
    splice_tail(head, left);
    splice_tail(head, right);
}

/// Stable comparator sort of the whole queue, merging bottom-up.
///
/// Elements are pushed one by one onto a stack of pending sorted runs. Each
/// run is a `next` chain, and runs are chained to each other through the
/// `prev` of their first element. Before the `count`-th push, the number of
/// trailing one bits of `count` tells which two runs of equal size to merge,
/// so merges stay balanced at 2:1 or better without knowing the length up
/// front. The ghost terminates every chain until the final merge relinks
/// the cycle.
pub(crate) fn pending_run_sort<F>(queue: &mut Queue, mut compare: F)
where
    F: FnMut(&str, &str) -> Ordering,
{
    let head = queue.ghost_link();
    // SAFETY: the ghost heads a well-formed cycle; every link touched below is
    // one of its elements or the ghost used as a terminator.
    unsafe {
        let mut list = head.as_ref().next;
        // Zero or one element.
        if list == head.as_ref().prev {
            return;
        }

        let mut pending = head;
        let mut count = 0_usize;
        loop {
            let mut tail: *mut NonNull<Link> = &mut pending;
            let mut bits = count;
            while bits & 1 == 1 {
                tail = ptr::addr_of_mut!((*(*tail).as_ptr()).prev);
                bits >>= 1;
            }
            if bits != 0 {
                let newer = *tail;
                let older = newer.as_ref().prev;
                let merged = merge_runs(&mut compare, head, older, newer);
                (*merged.as_ptr()).prev = older.as_ref().prev;
                *tail = merged;
            }

            let next = list.as_ref().next;
            (*list.as_ptr()).prev = pending;
            (*list.as_ptr()).next = head;
            pending = list;
            list = next;
            count += 1;
            if list == head {
                break;
            }
        }

        // Fold the remaining runs, newest first, into one.
        let mut list = pending;
        let mut pending = pending.as_ref().prev;
        loop {
            let older = pending.as_ref().prev;
            if older == head {
                break;
            }
            list = merge_runs(&mut compare, head, pending, list);
            pending = older;
        }
        merge_into_cycle(&mut compare, head, pending, list);
    }
}

/// Merge two `next` chains terminated by `nil` and return the first link of
/// the result. On ties `older` goes first. `prev` links are left stale.
unsafe fn merge_runs<F>(
    compare: &mut F,
    nil: NonNull<Link>,
    mut older: NonNull<Link>,
    mut newer: NonNull<Link>,
) -> NonNull<Link>
where
    F: FnMut(&str, &str) -> Ordering,
{
    let mut first = nil;
    let mut tail: *mut NonNull<Link> = &mut first;
    loop {
        if compare(value_of(older), value_of(newer)) != Ordering::Greater {
            *tail = older;
            tail = ptr::addr_of_mut!((*older.as_ptr()).next);
            older = older.as_ref().next;
            if older == nil {
                *tail = newer;
                break;
            }
        } else {
            *tail = newer;
            tail = ptr::addr_of_mut!((*newer.as_ptr()).next);
            newer = newer.as_ref().next;
            if newer == nil {
                *tail = older;
                break;
            }
        }
    }
    first
}

/// The last merge: link both chains into the cycle of `head`, restoring the
/// `prev` links on the way.
unsafe fn merge_into_cycle<F>(
    compare: &mut F,
    head: NonNull<Link>,
    mut older: NonNull<Link>,
    mut newer: NonNull<Link>,
) where
    F: FnMut(&str, &str) -> Ordering,
{
    let mut tail = head;
    loop {
        if compare(value_of(older), value_of(newer)) != Ordering::Greater {
            connect(tail, older);
            tail = older;
            older = older.as_ref().next;
            if older == head {
                break;
            }
        } else {
            connect(tail, newer);
            tail = newer;
            newer = newer.as_ref().next;
            if newer == head {
                newer = older;
                break;
            }
        }
    }
    // One chain is exhausted; the other keeps its order.
    loop {
        connect(tail, newer);
        tail = newer;
        newer = newer.as_ref().next;
        if newer == head {
            break;
        }
    }
    connect(tail, head);
}

#[cfg(test)]
mod tests {
    use super::{merge_sort, pending_run_sort};
    use crate::Queue;
    use std::iter::FromIterator;

    #[test]
    fn merge_sort_keeps_links_consistent() {
        let mut queue = Queue::from_iter(["m", "c", "x", "a", "c", "b", "z", "a", "k", "e", "q"]);
        merge_sort(&mut queue);
        let forward = Vec::from_iter(queue.iter());
        let mut backward = Vec::from_iter(queue.iter().rev());
        backward.reverse();
        assert_eq!(forward, ["a", "a", "b", "c", "c", "e", "k", "m", "q", "x", "z"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn pending_run_sort_odd_lengths() {
        // Lengths around powers of two leave several runs pending at the end.
        for len in [2_usize, 3, 5, 7, 8, 9, 31, 33, 100] {
            let input: Vec<String> = (0..len).map(|i| format!("{:03}", (i * 37 + 11) % len)).collect();
            let mut expected = input.clone();
            expected.sort();
            let mut queue = Queue::from_iter(input);
            pending_run_sort(&mut queue, |a, b| a.cmp(b));
            assert!(queue.iter().eq(expected.iter().map(String::as_str)));
            assert!(queue.iter().rev().eq(expected.iter().rev().map(String::as_str)));
        }
    }

    #[test]
    fn pending_run_sort_keeps_ties_in_order() {
        let input: Vec<String> = (0..40).map(|i| format!("{}{}", i % 3, i)).collect();
        let mut expected = input.clone();
        expected.sort_by(|a, b| a[..1].cmp(&b[..1]));
        let mut queue = Queue::from_iter(input);
        pending_run_sort(&mut queue, |a, b| a[..1].cmp(&b[..1]));
        assert!(queue.iter().eq(expected.iter().map(String::as_str)));
    }
}
