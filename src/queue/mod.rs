use std::alloc::{self, handle_alloc_error, Layout};
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::error::{Error, Result};
use crate::queue::cursor::CursorMut;
use crate::queue::iterator::Iter;

pub mod cursor;
pub mod iterator;

mod algorithms;

/// The `Queue` is a queue of owned strings, implemented as an intrusive cyclic
/// doubly-linked list. It allows inserting and removing strings at both ends in
/// constant time, and splicing whole runs of elements between queues without
/// touching the strings themselves.
///
/// The `Queue` contains a pointer `ghost` to the ghost link, a link without
/// payload that closes the cycle. `ghost.next` is the first element and
/// `ghost.prev` is the last one; in an empty queue both point to the ghost
/// itself.
///
/// The length is not cached: [`Queue::len`] walks the whole cycle.
///
/// # Naming Conventions
///
/// - `front..=back`: a closed range of links, both inclusive;
/// - `start..end`: a half-open range of links, left inclusive and right
///   exclusive (probably the ghost link).
pub struct Queue {
    ghost: NonNull<Link>,
    _marker: PhantomData<Box<Element>>,
}

#[repr(C)]
pub(crate) struct Link {
    pub(crate) next: NonNull<Link>,
    pub(crate) prev: NonNull<Link>,
}

/// An element of a [`Queue`]: the embedded link plus the owned string.
///
/// Elements handed out by [`Queue::remove_head`] and [`Queue::remove_tail`]
/// are detached; the caller owns both the element and its value.
#[repr(C)]
pub struct Element {
    link: Link,
    value: String,
}

/// A run of links `front..=back` detached from a queue, used in cutting and
/// splicing.
///
/// While detached, reading `front.prev` and `back.next` is invalid.
pub(crate) struct Segment {
    pub(crate) front: NonNull<Link>,
    pub(crate) back: NonNull<Link>,
}

impl Link {
    /// A link whose pointers must be written before they are read.
    pub(crate) const fn dangling() -> Self {
        Link {
            next: NonNull::dangling(),
            prev: NonNull::dangling(),
        }
    }
}

/// Make `head` an empty cycle.
pub(crate) unsafe fn init_head(head: NonNull<Link>) {
    (*head.as_ptr()).next = head;
    (*head.as_ptr()).prev = head;
}

pub(crate) unsafe fn connect(prev: NonNull<Link>, next: NonNull<Link>) {
    (*prev.as_ptr()).next = next;
    (*next.as_ptr()).prev = prev;
}

/// Take `link` out of its cycle. The pointers of `link` itself are left stale.
pub(crate) unsafe fn unlink(link: NonNull<Link>) {
    connect(link.as_ref().prev, link.as_ref().next);
}

/// Put a detached `link` between the adjacent links `prev` and `next`.
pub(crate) unsafe fn link_between(prev: NonNull<Link>, next: NonNull<Link>, link: NonNull<Link>) {
    #[cfg(debug_assertions)]
    assert_adjacent(prev, next);
    connect(prev, link);
    connect(link, next);
}

/// Read the value of the element embedding `link`.
///
/// It is unsafe because `link` must not be a ghost link, and the returned
/// lifetime is unbounded.
pub(crate) unsafe fn value_of<'a>(link: NonNull<Link>) -> &'a str {
    &(*link.cast::<Element>().as_ptr()).value
}

/// Allocate `value` on the heap, or report `Error::AllocFailed` instead of
/// aborting. The allocation can be released with `Box::from_raw`.
fn try_alloc<T>(value: T) -> Result<NonNull<T>> {
    let layout = Layout::new::<T>();
    debug_assert!(layout.size() > 0);
    // SAFETY: `Link` and `Element` are the only types allocated here, and
    // neither is zero-sized.
    let ptr = unsafe { alloc::alloc(layout) }.cast::<T>();
    let ptr = NonNull::new(ptr).ok_or(Error::AllocFailed)?;
    // SAFETY: `ptr` is freshly allocated with the layout of `T`.
    unsafe { ptr.as_ptr().write(value) };
    Ok(ptr)
}

/// Deep-copy `value` without aborting on allocation failure.
pub(crate) fn try_copy(value: &str) -> Result<String> {
    let mut copy = String::new();
    copy.try_reserve_exact(value.len())
        .map_err(|_| Error::AllocFailed)?;
    copy.push_str(value);
    Ok(copy)
}

// private methods
impl Queue {
    pub(crate) fn ghost_link(&self) -> NonNull<Link> {
        self.ghost
    }
    pub(crate) fn front_link(&self) -> NonNull<Link> {
        // SAFETY: `ghost.next` is always valid (either `ghost` itself, or the first element
        // in the queue).
        unsafe { self.ghost.as_ref().next }
    }
    pub(crate) fn back_link(&self) -> NonNull<Link> {
        // SAFETY: `ghost.prev` is always valid (either `ghost` itself, or the last element
        // in the queue).
        unsafe { self.ghost.as_ref().prev }
    }

    /// Attach a detached element `link` between `prev` and `next`.
    ///
    /// It is unsafe because it does not check whether `prev` and `next` belong
    /// to the queue, or whether they are adjacent (only in
    /// `#[cfg(debug_assertions)]`).
    pub(crate) unsafe fn attach(
        &mut self,
        prev: NonNull<Link>,
        next: NonNull<Link>,
        link: NonNull<Link>,
    ) {
        link_between(prev, next, link);
    }

    /// Detach the element `link` from the queue, and return it as a box.
    ///
    /// It is unsafe because it does not check whether `link` is a non-ghost
    /// link of this queue. Otherwise the queue becomes ill-formed.
    pub(crate) unsafe fn detach(&mut self, link: NonNull<Link>) -> Box<Element> {
        unlink(link);
        Box::from_raw(link.cast::<Element>().as_ptr())
    }

    /// Detach the range `front..=back` from the queue.
    ///
    /// It is unsafe because it does not check whether `front..=back` is a valid
    /// range of this queue (`front` must **NOT** be at the right of `back`, and
    /// neither can be the ghost).
    pub(crate) unsafe fn detach_segment(
        &mut self,
        front: NonNull<Link>,
        back: NonNull<Link>,
    ) -> Segment {
        connect(front.as_ref().prev, back.as_ref().next);
        Segment { front, back }
    }

    /// Attach a detached segment between `prev` and `next`.
    ///
    /// It is unsafe because it does not check whether `prev` and `next` belong
    /// to the queue, or whether they are adjacent (only in
    /// `#[cfg(debug_assertions)]`).
    pub(crate) unsafe fn attach_segment(
        &mut self,
        prev: NonNull<Link>,
        next: NonNull<Link>,
        segment: Segment,
    ) {
        #[cfg(debug_assertions)]
        assert_adjacent(prev, next);
        connect(prev, segment.front);
        connect(segment.back, next);
    }

    /// Detach every element, or return `None` if the queue is empty.
    pub(crate) fn detach_all(&mut self) -> Option<Segment> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: `front_link()..=back_link()` is the whole, non-empty queue.
        unsafe { Some(self.detach_segment(self.front_link(), self.back_link())) }
    }
}

impl Queue {
    /// Create an empty `Queue`.
    ///
    /// Like `Box::new`, it aborts through [`handle_alloc_error`] when the
    /// ghost link cannot be allocated. See [`Queue::try_new`].
    ///
    /// # Examples
    /// ```
    /// use cyclic_queue::Queue;
    /// let queue = Queue::new();
    /// assert!(queue.is_empty());
    /// ```
    pub fn new() -> Self {
        match Self::try_new() {
            Ok(queue) => queue,
            Err(_) => handle_alloc_error(Layout::new::<Link>()),
        }
    }

    /// Create an empty `Queue`, or return `Error::AllocFailed`.
    pub fn try_new() -> Result<Self> {
        let ghost = try_alloc(Link::dangling())?;
        // SAFETY: `ghost` is a valid allocation that nothing else points to yet.
        unsafe { init_head(ghost) };
        Ok(Self {
            ghost,
            _marker: PhantomData,
        })
    }

    /// Returns `true` if the `Queue` is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.front_link() == self.ghost
    }

    /// Returns the number of elements, counted by walking the whole queue.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// queue.insert_tail("a").unwrap();
    /// queue.insert_head("b").unwrap();
    /// assert_eq!(queue.len(), 2);
    /// ```
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Removes all elements from the `Queue`, releasing their strings.
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }

    /// Provides the first value, or `None` if the queue is empty.
    pub fn front(&self) -> Option<&str> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the queue is not empty, so the front link is an element.
        Some(unsafe { value_of(self.front_link()) })
    }

    /// Provides the last value, or `None` if the queue is empty.
    pub fn back(&self) -> Option<&str> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the queue is not empty, so the back link is an element.
        Some(unsafe { value_of(self.back_link()) })
    }

    /// Copies `value` into a new element at the head of the queue.
    ///
    /// On allocation failure `Error::AllocFailed` is returned and the queue is
    /// left unchanged.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// queue.insert_head("b").unwrap();
    /// queue.insert_head("a").unwrap();
    /// assert_eq!(queue.front(), Some("a"));
    /// ```
    pub fn insert_head(&mut self, value: &str) -> Result<()> {
        let link = Element::try_new_detached(try_copy(value)?)?;
        // SAFETY: the ghost and the front link are adjacent links of this queue.
        unsafe { self.attach(self.ghost, self.front_link(), link) };
        Ok(())
    }

    /// Copies `value` into a new element at the tail of the queue.
    ///
    /// On allocation failure `Error::AllocFailed` is returned and the queue is
    /// left unchanged.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    pub fn insert_tail(&mut self, value: &str) -> Result<()> {
        let link = Element::try_new_detached(try_copy(value)?)?;
        // SAFETY: the back link and the ghost are adjacent links of this queue.
        unsafe { self.attach(self.back_link(), self.ghost, link) };
        Ok(())
    }

    /// Moves `value` into a new element at the head of the queue.
    pub fn push_front(&mut self, value: String) {
        let link = Element::new_detached(value);
        // SAFETY: the ghost and the front link are adjacent links of this queue.
        unsafe { self.attach(self.ghost, self.front_link(), link) };
    }

    /// Moves `value` into a new element at the tail of the queue.
    pub fn push_back(&mut self, value: String) {
        let link = Element::new_detached(value);
        // SAFETY: the back link and the ghost are adjacent links of this queue.
        unsafe { self.attach(self.back_link(), self.ghost, link) };
    }

    /// Detaches the first element and hands it to the caller, or returns
    /// `None` if the queue is empty.
    ///
    /// If `buf` is given, the value is also copied into it, see
    /// [`Element::copy_to`]. `buf` is not touched when nothing is removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// queue.insert_tail("hello").unwrap();
    ///
    /// let mut buf = [0xff_u8; 4];
    /// let element = queue.remove_head(Some(&mut buf)).unwrap();
    /// assert_eq!(element.value(), "hello");
    /// assert_eq!(&buf, b"hel\0");
    ///
    /// assert!(queue.remove_head(Some(&mut buf)).is_none());
    /// ```
    pub fn remove_head(&mut self, buf: Option<&mut [u8]>) -> Option<Box<Element>> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the queue is not empty, so the front link is an element.
        let element = unsafe { self.detach(self.front_link()) };
        if let Some(buf) = buf {
            element.copy_to(buf);
        }
        Some(element)
    }

    /// Detaches the last element and hands it to the caller, or returns `None`
    /// if the queue is empty. See [`Queue::remove_head`].
    pub fn remove_tail(&mut self, buf: Option<&mut [u8]>) -> Option<Box<Element>> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the queue is not empty, so the back link is an element.
        let element = unsafe { self.detach(self.back_link()) };
        if let Some(buf) = buf {
            element.copy_to(buf);
        }
        Some(element)
    }

    /// Removes the first value and returns it, or `None` if the queue is
    /// empty.
    pub fn pop_front(&mut self) -> Option<String> {
        self.remove_head(None).map(Element::into_value)
    }

    /// Removes the last value and returns it, or `None` if the queue is
    /// empty.
    pub fn pop_back(&mut self) -> Option<String> {
        self.remove_tail(None).map(Element::into_value)
    }

    /// Provides a cursor with editing operations at the first element.
    ///
    /// The cursor is pointing to the ghost link if the queue is empty.
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_> {
        let front = self.front_link();
        CursorMut::new(self, front)
    }

    /// Provides a cursor with editing operations at the last element.
    ///
    /// The cursor is pointing to the ghost link if the queue is empty.
    pub fn cursor_back_mut(&mut self) -> CursorMut<'_> {
        let back = self.back_link();
        CursorMut::new(self, back)
    }

    /// Provides a cursor with editing operations at the ghost link.
    pub fn cursor_end_mut(&mut self) -> CursorMut<'_> {
        let ghost = self.ghost;
        CursorMut::new(self, ghost)
    }

    /// Provides a forward iterator over the values.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Moves all elements from `other` to the end of the queue.
    ///
    /// This relinks the elements of `other` into `self` without copying any
    /// string. After this operation, `other` becomes empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["a"]);
    /// let mut other = Queue::from_iter(["b", "c"]);
    ///
    /// queue.append(&mut other);
    /// assert_eq!(Vec::from_iter(queue.iter()), vec!["a", "b", "c"]);
    /// assert!(other.is_empty());
    /// ```
    pub fn append(&mut self, other: &mut Queue) {
        if let Some(segment) = other.detach_all() {
            // `self.back_link()` and the ghost are valid
            // links in the queue and they are adjacent, so it is safe.
            unsafe { self.attach_segment(self.back_link(), self.ghost, segment) }
        }
    }

    /// Moves all elements from `other` to the beginning of the queue.
    /// After this operation, `other` becomes empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time and *O*(1) memory.
    pub fn prepend(&mut self, other: &mut Queue) {
        if let Some(segment) = other.detach_all() {
            // the ghost and `self.front_link()` are valid
            // links in the queue and they are adjacent, so it is safe.
            unsafe { self.attach_segment(self.ghost, self.front_link(), segment) }
        }
    }

    /// Returns `true` if the `Queue` contains `value`.
    pub fn contains(&self, value: &str) -> bool {
        self.iter().any(|v| v == value)
    }
}

impl Debug for Queue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl Element {
    /// Create a detached element, aborting on allocation failure.
    fn new_detached(value: String) -> NonNull<Link> {
        let element = Box::new(Element {
            link: Link::dangling(),
            value,
        });
        NonNull::from(Box::leak(element)).cast()
    }

    /// Create a detached element, or drop `value` and report
    /// `Error::AllocFailed`.
    pub(crate) fn try_new_detached(value: String) -> Result<NonNull<Link>> {
        let element = try_alloc(Element {
            link: Link::dangling(),
            value,
        })?;
        Ok(element.cast())
    }

    /// The value of the element.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Release the element, keeping its value.
    pub fn into_value(self: Box<Self>) -> String {
        self.value
    }

    /// Copy the value into `buf` as a NUL-terminated byte string.
    ///
    /// At most `buf.len() - 1` bytes of the value are copied, the rest of `buf`
    /// is zero-filled, so `buf` always ends with a terminator. An empty `buf`
    /// is left untouched. Returns the number of value bytes copied.
    pub fn copy_to(&self, buf: &mut [u8]) -> usize {
        let capacity = match buf.len().checked_sub(1) {
            Some(capacity) => capacity,
            None => return 0,
        };
        let copied = self.value.len().min(capacity);
        buf[..copied].copy_from_slice(&self.value.as_bytes()[..copied]);
        buf[copied..].fill(0);
        copied
    }
}

impl Debug for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Element").field(&self.value).finish()
    }
}

#[cfg(debug_assertions)]
fn assert_adjacent(prev: NonNull<Link>, next: NonNull<Link>) {
    unsafe {
        assert_eq!(prev.as_ref().next, next);
        assert_eq!(next.as_ref().prev, prev);
    }
}

impl Drop for Queue {
    fn drop(&mut self) {
        self.clear();
        // SAFETY: the ghost was allocated with the layout of `Link`, and after
        // `clear` no element points to it any more.
        unsafe { drop(Box::from_raw(self.ghost.as_ptr())) };
    }
}

unsafe impl Send for Queue {}

unsafe impl Sync for Queue {}
