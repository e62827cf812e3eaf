//! Fixed-capacity sliding window over an append-only sequence.
//!
//! [`SlidingWindow`] keeps the most recent `capacity` elements of an
//! unbounded sequence. Elements are addressed by the logical index assigned
//! at append time; indices keep growing forever while old elements are
//! overwritten in place, so memory stays bounded.
//!
//! Appends are strictly sequential: the next element always goes to index
//! [`size`](SlidingWindow::size). Reads are limited to the retained window of
//! the most recent `capacity` indices. Violating either contract is a
//! programming error and panics rather than returning stale data.
//!
//! # Examples
//!
//! ```
//! use chain_window::SlidingWindow;
//!
//! let mut window = SlidingWindow::with_capacity(2);
//! window.append(0, "a");
//! window.append(1, "b");
//! window.append(2, "c"); // evicts index 0
//!
//! assert_eq!(window.size(), 3);
//! assert_eq!(window.window_start(), 1);
//! assert_eq!(window[2], "c");
//! assert!(!window.contains(0));
//! ```

use std::ops::{Index, IndexMut};

/// A fixed-size backing store addressed by an ever-increasing logical index.
///
/// Logical index `i` lives in physical slot `i % capacity`, so an append to a
/// full window overwrites the element `capacity` positions behind it.
///
/// The window is constructed with no capacity and must be sized with
/// [`resize`](Self::resize) (or built via [`with_capacity`](Self::with_capacity))
/// before the first append. It is not internally synchronized; shared access
/// must be serialized by the owner.
#[derive(Clone)]
pub struct SlidingWindow<T> {
    store: Vec<Option<T>>,
    size: u64,
}

impl<T> SlidingWindow<T> {
    /// Creates an empty window with no capacity.
    pub fn new() -> Self {
        Self {
            store: Vec::new(),
            size: 0,
        }
    }

    /// Creates an empty window holding up to `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut window = Self::new();
        window.resize(capacity);
        window
    }

    /// Resets the window to a new capacity.
    ///
    /// Any stored elements are discarded and the logical size returns to
    /// zero. Intended to be called once, before the first append, to
    /// establish the window size.
    pub fn resize(&mut self, capacity: usize) {
        self.store.clear();
        self.store.resize_with(capacity, || None);
        self.size = 0;
    }

    /// Total number of elements ever appended; also the next append index.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Number of elements the backing store can hold.
    pub fn capacity(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// First logical index still retained.
    ///
    /// Zero until the first eviction.
    pub fn window_start(&self) -> u64 {
        self.size.saturating_sub(self.store.len() as u64)
    }

    /// Whether `index` is inside the retained window, i.e. readable.
    pub fn contains(&self, index: u64) -> bool {
        self.window_start() <= index && index < self.size
    }

    /// Appends `value` at logical index `index`.
    ///
    /// `index` must equal the current [`size`](Self::size): this is the next
    /// position of an append-only sequence, not a general insert. Once
    /// `index` reaches the capacity, each append overwrites the element at
    /// `index - capacity`.
    ///
    /// # Panics
    ///
    /// Panics if the window has no capacity or if `index` is out of
    /// sequence.
    pub fn append(&mut self, index: u64, value: T) {
        assert!(
            !self.store.is_empty(),
            "append on a window with no capacity"
        );
        assert!(
            index == self.size,
            "append index {index} out of sequence, next is {}",
            self.size
        );

        let slot = self.slot(index);
        self.store[slot] = Some(value);
        self.size += 1;
    }

    /// Returns the element at logical index `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the retained window, including when the
    /// window is empty.
    pub fn get(&self, index: u64) -> &T {
        self.check_window(index);
        self.store[self.slot(index)]
            .as_ref()
            .expect("retained slot holds an element")
    }

    /// Returns the element at logical index `index` for in-place overwrite.
    ///
    /// Writing through the reference replaces the element without changing
    /// the logical size or the append sequence.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the retained window.
    pub fn get_mut(&mut self, index: u64) -> &mut T {
        self.check_window(index);
        let slot = self.slot(index);
        self.store[slot]
            .as_mut()
            .expect("retained slot holds an element")
    }

    /// The most recently appended element.
    ///
    /// # Panics
    ///
    /// Panics if the window is empty.
    pub fn back(&self) -> &T {
        assert!(self.size > 0, "back on an empty window");
        self.get(self.size - 1)
    }

    /// Mutable access to the most recently appended element.
    ///
    /// # Panics
    ///
    /// Panics if the window is empty.
    pub fn back_mut(&mut self) -> &mut T {
        assert!(self.size > 0, "back on an empty window");
        self.get_mut(self.size - 1)
    }

    /// Iterates the retained window in logical order, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (u64, &T)> + '_ {
        (self.window_start()..self.size).map(|index| (index, self.get(index)))
    }

    fn slot(&self, index: u64) -> usize {
        (index % self.store.len() as u64) as usize
    }

    fn check_window(&self, index: u64) {
        assert!(
            self.contains(index),
            "index {index} outside retained window [{}, {})",
            self.window_start(),
            self.size
        );
    }
}

impl<T> Default for SlidingWindow<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for SlidingWindow<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlidingWindow")
            .field("size", &self.size)
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl<T> Index<u64> for SlidingWindow<T> {
    type Output = T;

    fn index(&self, index: u64) -> &T {
        self.get(index)
    }
}

impl<T> IndexMut<u64> for SlidingWindow<T> {
    fn index_mut(&mut self, index: u64) -> &mut T {
        self.get_mut(index)
    }
}
