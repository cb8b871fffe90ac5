use crate::error::{Error, Result};
use crate::queue::{try_copy, value_of, Element, Link, Queue};
use std::fmt;
use std::fmt::Formatter;
use std::ptr::NonNull;

/// A cursor over a [`Queue`] with editing operations.
///
/// A `CursorMut` is like an iterator, except that it can freely seek
/// back-and-forth, and can safely remove elements during the traversal:
/// [`remove`](CursorMut::remove) leaves the cursor on the successor of the
/// removed element, [`remove_next`](CursorMut::remove_next) and
/// [`backspace`](CursorMut::backspace) leave it where it is.
///
/// In a queue with length *n*, there are *n* + 1 valid locations for the
/// cursor, indexed by 0, 1, ..., *n*, where *n* is the ghost link of the queue.
///
/// # Examples
///
/// ```
/// use cyclic_queue::Queue;
/// use std::iter::FromIterator;
///
/// // Create a queue: [ a b c d #]
/// let mut queue = Queue::from_iter(["a", "b", "c", "d"]);
///
/// // Create a cursor at start: [|a b c d #]
/// let mut cursor = queue.cursor_front_mut();
/// assert_eq!(cursor.current(), Some("a"));
///
/// // Move forward and remove: [ a|c d #]
/// assert!(cursor.move_next().is_ok());
/// assert_eq!(cursor.remove().unwrap().value(), "b");
/// assert_eq!(cursor.current(), Some("c"));
///
/// // Remove the element before the cursor: [|c d #]
/// assert_eq!(cursor.backspace().unwrap().value(), "a");
/// assert_eq!(cursor.previous(), None);
///
/// assert_eq!(Vec::from_iter(queue.iter()), vec!["c", "d"]);
/// ```
pub struct CursorMut<'a> {
    current: NonNull<Link>,
    queue: &'a mut Queue,
}

// Private methods
impl<'a> CursorMut<'a> {
    pub(crate) fn new(queue: &'a mut Queue, current: NonNull<Link>) -> Self {
        Self { current, queue }
    }
    fn is_ghost_link(&self) -> bool {
        self.current == self.queue.ghost_link()
    }
    fn is_front_link(&self) -> bool {
        self.prev_link() == self.queue.ghost_link()
    }
    fn next_link(&self) -> NonNull<Link> {
        // SAFETY: `current.next` is always valid since it is a cyclic list.
        unsafe { self.current.as_ref().next }
    }
    fn prev_link(&self) -> NonNull<Link> {
        // SAFETY: `current.prev` is always valid since it is a cyclic list.
        unsafe { self.current.as_ref().prev }
    }
}

impl<'a> CursorMut<'a> {
    /// Returns `true` if the `Queue` is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Move the cursor to the next position, where passing through the ghost
    /// link is allowed.
    pub fn move_next_cyclic(&mut self) {
        self.current = self.next_link();
    }

    /// Move the cursor to the previous position, where passing through the
    /// ghost link is allowed.
    pub fn move_prev_cyclic(&mut self) {
        self.current = self.prev_link();
    }

    /// Move the cursor to the next position, or return
    /// `Error::GhostBoundary` when it is at the ghost link.
    pub fn move_next(&mut self) -> Result<()> {
        if self.is_ghost_link() {
            return Err(Error::GhostBoundary);
        }
        self.move_next_cyclic();
        Ok(())
    }

    /// Move the cursor to the previous position, or return
    /// `Error::GhostBoundary` when it is at the first position.
    pub fn move_prev(&mut self) -> Result<()> {
        if self.is_front_link() {
            return Err(Error::GhostBoundary);
        }
        self.move_prev_cyclic();
        Ok(())
    }

    /// Set the cursor to the first element (or the ghost link of an empty
    /// queue).
    #[inline]
    pub fn move_to_start(&mut self) {
        self.current = self.queue.front_link();
    }

    /// Set the cursor to the ghost link.
    #[inline]
    pub fn move_to_end(&mut self) {
        self.current = self.queue.ghost_link();
    }

    /// The value at the cursor, or `None` at the ghost link.
    pub fn current(&self) -> Option<&str> {
        if self.is_ghost_link() {
            return None;
        }
        // SAFETY: non-ghost links are embedded in elements.
        Some(unsafe { value_of(self.current) })
    }

    /// The value before the cursor, or `None` at the first position.
    pub fn previous(&self) -> Option<&str> {
        if self.is_front_link() {
            return None;
        }
        // SAFETY: the link before a non-front position is never the ghost.
        Some(unsafe { value_of(self.prev_link()) })
    }

    /// The value after the cursor, or `None` if the next link is the ghost.
    pub fn peek_next(&self) -> Option<&str> {
        let next = self.next_link();
        if next == self.queue.ghost_link() {
            return None;
        }
        // SAFETY: `next` is not the ghost, so it is embedded in an element.
        Some(unsafe { value_of(next) })
    }

    /// Temporarily view the queue via an immutable reference.
    pub fn view(&self) -> &Queue {
        self.queue
    }

    /// Copy `value` into a new element before the cursor. The cursor stays
    /// put.
    pub fn insert(&mut self, value: &str) -> Result<()> {
        let link = Element::try_new_detached(try_copy(value)?)?;
        let (prev, next) = (self.prev_link(), self.current);
        // SAFETY: `current.prev` and `current` are adjacent links of the queue.
        unsafe { self.queue.attach(prev, next, link) };
        Ok(())
    }

    /// Remove the element at the cursor and return it, or return `None` at the
    /// ghost link. After removal, the cursor is moved to the next position.
    ///
    /// This operation should compute in *O*(1) time.
    pub fn remove(&mut self) -> Option<Box<Element>> {
        if self.is_ghost_link() {
            return None;
        }
        let (current, next) = (self.current, self.next_link());
        // SAFETY: `current` is a non-ghost link of the queue.
        let element = unsafe { self.queue.detach(current) };
        self.current = next;
        Some(element)
    }

    /// Remove the element after the cursor and return it, or return `None` if
    /// the next link is the ghost. The cursor is not moved.
    pub fn remove_next(&mut self) -> Option<Box<Element>> {
        let next = self.next_link();
        if next == self.queue.ghost_link() {
            return None;
        }
        // SAFETY: `next` is a non-ghost link of the queue.
        Some(unsafe { self.queue.detach(next) })
    }

    /// Remove the element before the cursor and return it, or return `None` at
    /// the first position. The cursor is not moved.
    pub fn backspace(&mut self) -> Option<Box<Element>> {
        if self.is_front_link() {
            return None;
        }
        let prev = self.prev_link();
        // SAFETY: the link before a non-front position is a non-ghost link.
        Some(unsafe { self.queue.detach(prev) })
    }
}

impl fmt::Debug for CursorMut<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("queue", &self.queue)
            .field("current", &self.current())
            .finish()
    }
}

unsafe impl Send for CursorMut<'_> {}

unsafe impl Sync for CursorMut<'_> {}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::queue::Queue;
    use std::iter::FromIterator;

    #[test]
    fn cursor_moves() {
        let mut queue = Queue::from_iter(["a", "b", "c"]);
        let mut cursor = queue.cursor_front_mut();
        assert!(matches!(cursor.move_prev(), Err(Error::GhostBoundary)));
        assert_eq!(cursor.current(), Some("a"));
        assert_eq!(cursor.peek_next(), Some("b"));

        cursor.move_to_end();
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.previous(), Some("c"));
        assert_eq!(cursor.peek_next(), Some("a"));
        assert!(matches!(cursor.move_next(), Err(Error::GhostBoundary)));

        cursor.move_next_cyclic();
        assert_eq!(cursor.current(), Some("a"));
        cursor.move_prev_cyclic();
        assert_eq!(cursor.current(), None);
        assert!(cursor.move_prev().is_ok());
        assert_eq!(cursor.current(), Some("c"));
        assert_eq!(cursor.peek_next(), None);
    }

    #[test]
    fn cursor_on_empty_queue() {
        let mut queue = Queue::new();
        let mut cursor = queue.cursor_front_mut();
        assert!(cursor.is_empty());
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.previous(), None);
        assert_eq!(cursor.peek_next(), None);
        assert!(cursor.remove().is_none());
        assert!(cursor.remove_next().is_none());
        assert!(cursor.backspace().is_none());
        assert!(cursor.move_next().is_err());
        assert!(cursor.move_prev().is_err());
    }

    #[test]
    fn cursor_remove_keeps_cursor_valid() {
        let mut queue = Queue::from_iter(["a", "b", "c", "d"]);
        let mut cursor = queue.cursor_front_mut();
        assert!(cursor.move_next().is_ok());

        assert_eq!(cursor.remove().unwrap().value(), "b");
        assert_eq!(cursor.current(), Some("c"));
        assert_eq!(cursor.remove_next().unwrap().value(), "d");
        assert_eq!(cursor.current(), Some("c"));
        assert!(cursor.remove_next().is_none());
        assert_eq!(cursor.remove().unwrap().value(), "c");
        assert_eq!(cursor.current(), None);
        assert!(cursor.remove().is_none());
        assert_eq!(cursor.backspace().unwrap().value(), "a");
        assert!(cursor.view().is_empty());
    }

    #[test]
    fn cursor_insert() {
        let mut queue = Queue::from_iter(["b", "d"]);
        let mut cursor = queue.cursor_front_mut();
        cursor.insert("a").unwrap();
        assert_eq!(cursor.current(), Some("b"));
        assert!(cursor.move_next().is_ok());
        cursor.insert("c").unwrap();
        cursor.move_to_end();
        cursor.insert("e").unwrap();
        assert_eq!(cursor.previous(), Some("e"));
        assert_eq!(Vec::from_iter(queue.iter()), vec!["a", "b", "c", "d", "e"]);
    }
}
