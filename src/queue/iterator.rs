use crate::queue::{value_of, Link, Queue};
use std::fmt;
use std::iter::{FromIterator, FusedIterator};
use std::marker::PhantomData;
use std::ptr::NonNull;

/// An iterator over the values of a `Queue`.
///
/// It uses a pair of links `start..end` to represent a half-open subrange
/// of the queue, where `start` is inclusive and `end` is not.
///
/// Though the `Iter` does not hold a reference to the queue, it actually
/// *borrows* (immutably) from the queue, so a phantom marker of `&'a Queue`
/// is added to protect the queue from being written.
///
/// # Examples
///
/// ```compile_fail
/// use cyclic_queue::Queue;
/// use std::iter::FromIterator;
///
/// let mut queue = Queue::from_iter(["a", "b"]);
/// let mut iter = queue.iter();
///
/// // Won't compile, because queue is already borrowed immutably.
/// queue.push_back("c".to_owned());
/// println!("{:?}", iter.next());
/// ```
#[derive(Clone)]
pub struct Iter<'a> {
    start: NonNull<Link>,
    end: NonNull<Link>,
    _marker: PhantomData<&'a Queue>,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(queue: &'a Queue) -> Self {
        Self {
            start: queue.front_link(),
            end: queue.ghost_link(),
            _marker: PhantomData,
        }
    }
}

impl fmt::Debug for Iter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.clone().collect::<Vec<_>>()).finish()
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    /// Return `*start` and reset the iterating range to `(start.next)..end`,
    /// or return `None` if `start..end` is already empty.
    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start..end` is always a valid range of a queue,
        // and it is not empty here, so `start` is an element.
        let current = self.start;
        self.start = unsafe { current.as_ref().next };
        Some(unsafe { value_of(current) })
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<'a> DoubleEndedIterator for Iter<'a> {
    /// Reset the iterating range to `start..(end.prev)` and return `*end`,
    /// or return `None` if `start..end` is already empty.
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start..end` is always a valid range of a queue,
        // and it is not empty here, so `end.prev` is an element.
        self.end = unsafe { self.end.as_ref().prev };
        Some(unsafe { value_of(self.end) })
    }
}

impl FusedIterator for Iter<'_> {}

/// An owning iterator over the values of a `Queue`.
///
/// This `struct` is created by the [`into_iter`] method on [`Queue`]
/// (provided by the `IntoIterator` trait).
///
/// [`into_iter`]: Queue::into_iter
pub struct IntoIter {
    queue: Queue,
}

impl fmt::Debug for IntoIter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter")
            .field("queue", &self.queue)
            .finish()
    }
}

impl Iterator for IntoIter {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop_front()
    }
}

impl DoubleEndedIterator for IntoIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.queue.pop_back()
    }
}

impl FusedIterator for IntoIter {}

impl IntoIterator for Queue {
    type Item = String;
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { queue: self }
    }
}

impl<'a> IntoIterator for &'a Queue {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<String> for Queue {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut queue = Queue::new();
        queue.extend(iter);
        queue
    }
}

impl<'a> FromIterator<&'a str> for Queue {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut queue = Queue::new();
        queue.extend(iter);
        queue
    }
}

impl Extend<String> for Queue {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        iter.into_iter().for_each(|value| self.push_back(value));
    }
}

impl<'a> Extend<&'a str> for Queue {
    fn extend<I: IntoIterator<Item = &'a str>>(&mut self, iter: I) {
        self.extend(iter.into_iter().map(str::to_owned))
    }
}

unsafe impl Send for Iter<'_> {}

unsafe impl Sync for Iter<'_> {}
