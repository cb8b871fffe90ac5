//! This crate provides a queue of owned strings, implemented as an intrusive
//! cyclic doubly-linked list.
//!
//! The [`Queue`] allows inserting and removing strings at both ends in constant
//! time, and rearranging its elements (reversing, swapping, sorting, merging)
//! by relinking them, without copying or reallocating any string.
//!
//! Here is a quick example showing how the queue works.
//!
//! ```
//! use cyclic_queue::Queue;
//! use std::iter::FromIterator;
//!
//! let mut queue = Queue::new();
//! queue.insert_tail("b").unwrap();
//! queue.insert_tail("c").unwrap();
//! queue.insert_head("a").unwrap();
//! assert_eq!(queue.len(), 3);
//!
//! queue.reverse();
//! assert_eq!(Vec::from_iter(queue.iter()), vec!["c", "b", "a"]);
//!
//! queue.sort(false);
//! let head = queue.remove_head(None).unwrap();
//! assert_eq!(head.value(), "a");
//! ```
//!
//! # Memory Layout
//!
//! The memory layout of the queue is like the following graph:
//! ```text
//!          ┌─────────────────────────────────────────────────────────────────────┐
//!          ↓                                                       (Ghost) Link  │
//!    ╔═══════════╗           ╔═══════════╗                        ┌───────────┐  │
//!    ║   next    ║ ────────→ ║   next    ║ ────────→ ┄┄ ────────→ │   next    │ ─┘
//!    ╟───────────╢           ╟───────────╢   Element 2, 3, ...    ├───────────┤
//! ┌─ ║   prev    ║ ←──────── ║   prev    ║ ←──────── ┄┄ ←──────── │   prev    │
//! │  ╟───────────╢           ╟───────────╢                        └───────────┘
//! │  ║   value   ║           ║   value   ║                            ↑   ↑
//! │  ╚═══════════╝           ╚═══════════╝                            │   │
//! │    Element 0               Element 1                              │   │
//! └───────────────────────────────────────────────────────────────────┘   │
//! ╔═══════════╗                                                           │
//! ║   ghost   ║ ──────────────────────────────────────────────────────────┘
//! ╚═══════════╝
//!     Queue
//! ```
//! The `Queue` only holds a pointer `ghost` to the ghost link. The length is not
//! stored; [`Queue::len`] counts the elements.
//!
//! Each [`Element`] is allocated on heap and embeds its link as its first
//! field, followed by the owned `String` value. The ghost link is a bare link
//! without a value.
//!
//! In an empty queue, `ghost.next` and `ghost.prev` point to the ghost itself.
//! Otherwise `ghost.next` is the first element and `ghost.prev` the last one.
//!
//! # Traversal and Deletion
//!
//! [`Iter`] is a double-ended, fused and non-cyclic iterator over the values.
//! [`CursorMut`] moves back and forth over the *n* + 1 positions of a queue
//! (the ghost being position *n*) and removes elements without invalidating
//! itself:
//! - [`remove`]: remove the element at the cursor and move to its successor;
//! - [`remove_next`]: remove the element after the cursor;
//! - [`backspace`]: remove the element before the cursor;
//! - [`insert`]: insert a copy of a string before the cursor.
//!
//! # Merging
//!
//! A [`QueueGroup`] owns several queues with their cached sizes, and merges all
//! of them into its first queue with [`QueueGroup::merge_all`].
//!
//! ```
//! use cyclic_queue::{Queue, QueueGroup};
//! use std::iter::FromIterator;
//!
//! let mut group = QueueGroup::new();
//! group.push(Queue::from_iter(["kiwi", "apple"]));
//! group.push(Queue::from_iter(["fig"]));
//! assert_eq!(group.merge_all(true).unwrap(), 3);
//!
//! let merged = group.first().unwrap().queue();
//! assert_eq!(Vec::from_iter(merged.iter()), vec!["kiwi", "fig", "apple"]);
//! ```
//!
//! [`remove`]: crate::queue::cursor::CursorMut::remove
//! [`remove_next`]: crate::queue::cursor::CursorMut::remove_next
//! [`backspace`]: crate::queue::cursor::CursorMut::backspace
//! [`insert`]: crate::queue::cursor::CursorMut::insert

#[doc(inline)]
pub use corpus::{Corpus, CorpusConfig};
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use group::{QueueContext, QueueGroup};
#[doc(inline)]
pub use queue::cursor::CursorMut;
#[doc(inline)]
pub use queue::iterator::{IntoIter, Iter};
#[doc(inline)]
pub use queue::{Element, Queue};

pub mod corpus;
pub mod error;
pub mod group;
pub mod harness;
pub mod queue;
