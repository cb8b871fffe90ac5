//! A group of independently owned queues that can be merged into one.

use crate::error::{Error, Result};
use crate::queue::Queue;

/// An entry of a [`QueueGroup`]: one queue, its cached length and a stable id.
///
/// The cached size always equals `queue.len()`, except for entries drained by
/// [`QueueGroup::merge_all`], which keep an empty queue and a size of 0.
#[derive(Debug)]
pub struct QueueContext {
    id: usize,
    size: usize,
    queue: Queue,
}

impl QueueContext {
    pub fn id(&self) -> usize {
        self.id
    }

    /// The cached length, read without walking the queue.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Mutate the queue through `f` and refresh the cached size afterwards.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::{Queue, QueueGroup};
    ///
    /// let mut group = QueueGroup::new();
    /// let id = group.push(Queue::new());
    /// let context = group.get_mut(id).unwrap();
    /// context.update(|queue| queue.extend(["a", "b"]));
    /// assert_eq!(context.size(), 2);
    /// ```
    pub fn update<R, F>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut Queue) -> R,
    {
        let result = f(&mut self.queue);
        self.size = self.queue.len();
        result
    }
}

/// A chain of [`QueueContext`]s, iterated in insertion order.
#[derive(Debug, Default)]
pub struct QueueGroup {
    contexts: Vec<QueueContext>,
    next_id: usize,
}

impl QueueGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `queue` at the end of the chain and return the id of its entry.
    pub fn push(&mut self, queue: Queue) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        let size = queue.len();
        self.contexts.push(QueueContext { id, size, queue });
        id
    }

    /// The number of entries, not of elements.
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueueContext> {
        self.contexts.iter()
    }

    pub fn get(&self, id: usize) -> Option<&QueueContext> {
        self.contexts.iter().find(|context| context.id == id)
    }

    pub fn get_mut(&mut self, id: usize) -> Option<&mut QueueContext> {
        self.contexts.iter_mut().find(|context| context.id == id)
    }

    /// The first entry, which receives everything on [`QueueGroup::merge_all`].
    pub fn first(&self) -> Option<&QueueContext> {
        self.contexts.first()
    }

    /// Move the elements of every entry onto the tail of the first entry's
    /// queue, in chain order, then sort that queue once.
    ///
    /// The drained entries stay in the group with an empty queue and a size
    /// of 0. Returns the combined size, or `Error::EmptyGroup` if the group
    /// has no entry.
    ///
    /// # Complexity
    ///
    /// Splicing is *O*(1) per entry; the final sort is *O*(*n* * log(*n*)).
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::{Queue, QueueGroup};
    /// use std::iter::FromIterator;
    ///
    /// let mut group = QueueGroup::new();
    /// group.push(Queue::from_iter(["a", "d"]));
    /// group.push(Queue::from_iter(["b", "e"]));
    /// group.push(Queue::from_iter(["c"]));
    ///
    /// assert_eq!(group.merge_all(false).unwrap(), 5);
    /// let first = group.first().unwrap();
    /// assert_eq!(Vec::from_iter(first.queue().iter()), vec!["a", "b", "c", "d", "e"]);
    /// ```
    pub fn merge_all(&mut self, descending: bool) -> Result<usize> {
        let (first, rest) = self
            .contexts
            .split_first_mut()
            .ok_or(Error::EmptyGroup)?;
        let merged = rest.len() + 1;
        for context in rest {
            first.queue.append(&mut context.queue);
            first.size += context.size;
            context.size = 0;
        }
        first.queue.sort(descending);
        tracing::debug!(
            "Merged {} queues into queue {}, {} elements",
            merged,
            first.id,
            first.size
        );
        Ok(first.size)
    }
}

impl<'a> IntoIterator for &'a QueueGroup {
    type Item = &'a QueueContext;
    type IntoIter = std::slice::Iter<'a, QueueContext>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
