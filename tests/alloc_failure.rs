//! Allocation failures on the fallible insertion paths.
//!
//! The global allocator below fails on demand and counts the bytes live on
//! the current thread, so each test checks both the error and that nothing
//! allocated before the failure is leaked.

use cyclic_queue::{Error, Queue, Result};
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::iter::FromIterator;

struct FailingAllocator;

thread_local! {
    /// Allocations still allowed before the next one fails; `None` never fails.
    static ALLOWED: Cell<Option<usize>> = const { Cell::new(None) };
    static LIVE_BYTES: Cell<usize> = const { Cell::new(0) };
}

unsafe impl GlobalAlloc for FailingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let fail = ALLOWED
            .try_with(|allowed| match allowed.get() {
                Some(0) => {
                    allowed.set(None);
                    true
                }
                Some(n) => {
                    allowed.set(Some(n - 1));
                    false
                }
                None => false,
            })
            .unwrap_or(false);
        if fail {
            return std::ptr::null_mut();
        }
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            let _ = LIVE_BYTES.try_with(|live| live.set(live.get().wrapping_add(layout.size())));
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        let _ = LIVE_BYTES.try_with(|live| live.set(live.get().wrapping_sub(layout.size())));
        System.dealloc(ptr, layout);
    }
}

#[global_allocator]
static ALLOCATOR: FailingAllocator = FailingAllocator;

fn live_bytes() -> usize {
    LIVE_BYTES.with(Cell::get)
}

/// Let `allocations` more allocations through, then fail the next one.
fn fail_after(allocations: usize) {
    ALLOWED.with(|allowed| allowed.set(Some(allocations)));
}

fn disarm() {
    ALLOWED.with(|allowed| allowed.set(None));
}

/// Run `insert` on a three-element queue with the `allowed + 1`-th allocation
/// failing, and check that the queue and the heap are left as they were.
fn assert_insert_fails<F>(allowed: usize, insert: F)
where
    F: FnOnce(&mut Queue) -> Result<()>,
{
    let mut queue = Queue::from_iter(["first", "second", "third"]);
    let forward: Vec<String> = queue.iter().map(String::from).collect();
    let backward: Vec<String> = queue.iter().rev().map(String::from).collect();

    let before = live_bytes();
    fail_after(allowed);
    let result = insert(&mut queue);
    disarm();
    let after = live_bytes();

    assert!(matches!(result, Err(Error::AllocFailed)), "{:?}", result);
    assert_eq!(after, before);
    assert_eq!(queue.len(), 3);
    assert!(queue.iter().eq(forward.iter().map(String::as_str)));
    assert!(queue.iter().rev().eq(backward.iter().map(String::as_str)));
}

#[test]
fn insert_head_without_memory() {
    // The copy of the value is the first allocation, the element the second.
    assert_insert_fails(0, |queue| queue.insert_head("value"));
    assert_insert_fails(1, |queue| queue.insert_head("value"));
}

#[test]
fn insert_tail_without_memory() {
    assert_insert_fails(0, |queue| queue.insert_tail("value"));
    assert_insert_fails(1, |queue| queue.insert_tail("value"));
}

#[test]
fn cursor_insert_without_memory() {
    for allowed in [0, 1] {
        assert_insert_fails(allowed, |queue| {
            let mut cursor = queue.cursor_front_mut();
            cursor.move_next_cyclic();
            cursor.insert("value")
        });
    }
}

#[test]
fn try_new_without_memory() {
    let before = live_bytes();
    fail_after(0);
    let result = Queue::try_new();
    disarm();
    assert!(matches!(result, Err(Error::AllocFailed)));
    assert_eq!(live_bytes(), before);
}

#[test]
fn insert_succeeds_once_memory_is_back() {
    let mut queue = Queue::from_iter(["b"]);
    fail_after(0);
    assert!(queue.insert_head("a").is_err());
    disarm();

    let before = live_bytes();
    queue.insert_head("a").unwrap();
    queue.insert_tail("c").unwrap();
    assert!(live_bytes() > before);
    assert_eq!(Vec::from_iter(queue.iter()), vec!["a", "b", "c"]);

    drop(queue.remove_head(None));
    drop(queue.remove_tail(None));
    assert_eq!(live_bytes(), before);
}
