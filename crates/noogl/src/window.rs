//! Zero-copy byte windows projected from a [`NativePtr`](crate::NativePtr).
//!
//! A [`ByteWindow`] is only a description of a region: a start address and a
//! length. Producing one never touches memory. Reading or writing through it
//! requires one of the `unsafe` slice accessors, where the caller picks the
//! lifetime of the borrow. That lifetime is deliberately unrelated to the
//! handle the window came from: a view exposed to JavaScript can outlive both
//! the handle and the memory, and nothing here can prevent that.

use std::{fmt, ptr::NonNull, slice};

/// The `(address, length)` of a region that a host buffer view aliases.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteWindow {
    addr: *mut u8,
    len: usize,
}

impl ByteWindow {
    /// Describes `len` bytes starting at `addr`.
    #[must_use]
    pub const fn new(addr: *mut u8, len: usize) -> Self {
        Self { addr, len }
    }

    /// First byte of the window.
    #[must_use]
    pub const fn addr(&self) -> *mut u8 {
        self.addr
    }

    /// Number of bytes the window covers.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrows the window as a byte slice.
    ///
    /// An empty window yields an empty slice without looking at the address.
    ///
    /// # Safety
    ///
    /// For non-empty windows, `len` bytes starting at `addr` must be readable
    /// and must not be written through any other path for the whole of `'a`.
    #[must_use]
    pub unsafe fn as_slice<'a>(&self) -> &'a [u8] {
        if self.len == 0 {
            return &[];
        }
        // SAFETY: the caller guarantees `len` readable bytes at `addr` for `'a`
        unsafe { slice::from_raw_parts(self.addr, self.len) }
    }

    /// Borrows the window as a mutable byte slice aliasing the native memory.
    ///
    /// # Safety
    ///
    /// For non-empty windows, `len` bytes starting at `addr` must be readable
    /// and writable, and no other reference to them may be live during `'a`.
    #[must_use]
    pub unsafe fn as_mut_slice<'a>(&self) -> &'a mut [u8] {
        if self.len == 0 {
            // SAFETY: a dangling, well-aligned pointer is valid for zero-length slices
            return unsafe { slice::from_raw_parts_mut(NonNull::dangling().as_ptr(), 0) };
        }
        // SAFETY: the caller guarantees exclusive, writable access to `len` bytes at `addr` for `'a`
        unsafe { slice::from_raw_parts_mut(self.addr, self.len) }
    }
}

impl fmt::Debug for ByteWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteWindow")
            .field("addr", &self.addr)
            .field("len", &self.len)
            .finish()
    }
}
