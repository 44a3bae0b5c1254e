//! A movable view over a shared byte buffer.
//!
//! [`BytesRef`] is the zero-copy handle used while walking flattened term
//! storage: one instance is created per loop and repositioned for every
//! term instead of slicing out a fresh owned value.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

/// A window `[offset, offset + length)` into a backing byte buffer.
#[derive(Clone, Copy)]
pub struct BytesRef<'a> {
    bytes: &'a [u8],
    offset: usize,
    length: usize,
}

impl<'a> BytesRef<'a> {
    /// Create an empty view positioned at the start of `bytes`.
    pub fn empty(bytes: &'a [u8]) -> Self {
        BytesRef {
            bytes,
            offset: 0,
            length: 0,
        }
    }

    /// Move the window without touching the backing buffer.
    ///
    /// # Panics
    ///
    /// Panics if the window would extend past the end of the buffer.
    #[inline]
    pub fn reposition(&mut self, offset: usize, length: usize) {
        assert!(
            offset + length <= self.bytes.len(),
            "window [{offset}, {}) exceeds buffer of {} bytes",
            offset + length,
            self.bytes.len()
        );
        self.offset = offset;
        self.length = length;
    }

    /// Start of the window in the backing buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes in the window.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The bytes currently in view.
    ///
    /// The returned slice borrows the backing buffer, not the view, so it
    /// stays valid after the view moves on.
    #[inline]
    pub fn as_slice(&self) -> &'a [u8] {
        &self.bytes[self.offset..self.offset + self.length]
    }

    /// Decode the window as UTF-8, replacing invalid sequences.
    pub fn utf8_lossy(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.as_slice())
    }
}

impl AsRef<[u8]> for BytesRef<'_> {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl PartialEq for BytesRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for BytesRef<'_> {}

impl PartialOrd for BytesRef<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BytesRef<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl fmt::Debug for BytesRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BytesRef")
            .field("offset", &self.offset)
            .field("length", &self.length)
            .field("bytes", &self.as_slice())
            .finish()
    }
}
