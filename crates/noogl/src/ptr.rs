//! The native pointer handle.
//!
//! [`NativePtr`] is the only place raw addresses enter or leave the crate. It
//! stores exactly one address (possibly null), never owns the memory behind
//! it, and never frees it. Everything that can go wrong with that memory
//! (dangling addresses, short allocations, missing terminators) is the
//! caller's responsibility; the handle only makes the entry points explicit.
//!
//! The handle is neither `Send` nor `Sync`: it holds a bare `*mut c_void`
//! with no synchronization, so reads through [`NativePtr::get`] and writes
//! through [`NativePtr::set`] must stay on one owner at a time.

use std::{
    ffi::{c_void, CStr},
    fmt,
};

use crate::{
    error::{PtrError, PtrResult},
    window::ByteWindow,
};

/// An opaque native address held on behalf of a garbage-collected host.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativePtr {
    ptr: *mut c_void,
}

impl NativePtr {
    /// The null sentinel.
    #[must_use]
    pub const fn null() -> Self {
        Self {
            ptr: std::ptr::null_mut(),
        }
    }

    /// Wraps a pointer handed over by native code.
    #[must_use]
    pub const fn new<T>(ptr: *mut T) -> Self {
        Self { ptr: ptr.cast() }
    }

    /// Reinterprets a 64-bit integer as an address.
    ///
    /// Any value is accepted; there is no range or alignment check. On
    /// targets with pointers narrower than 64 bits the high bits are dropped.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "addresses are pointer-width; truncation on 32-bit targets is the documented behavior"
    )]
    pub fn from_offset(offset: u64) -> Self {
        Self {
            ptr: std::ptr::with_exposed_provenance_mut(offset as usize),
        }
    }

    /// Reinterprets a host number as an address.
    ///
    /// The fraction is dropped and the value is clamped to `0..=u64::MAX`;
    /// NaN becomes the null address.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "float-to-int `as` saturates, which is the coercion wanted here"
    )]
    pub fn from_f64(value: f64) -> Self {
        Self::from_offset(value as u64)
    }

    /// Reinterprets a sign-and-magnitude integer (a host bigint's low word) as an address.
    ///
    /// Negative values wrap the way two's complement would.
    #[must_use]
    pub fn from_signed_magnitude(negative: bool, magnitude: u64) -> Self {
        let offset = if negative { magnitude.wrapping_neg() } else { magnitude };
        Self::from_offset(offset)
    }

    /// The stored address.
    #[must_use]
    pub const fn get(&self) -> *mut c_void {
        self.ptr
    }

    /// The stored address reinterpreted as a typed pointer. No runtime check.
    #[must_use]
    pub const fn cast<T>(&self) -> *mut T {
        self.ptr.cast()
    }

    /// Overwrites the stored address, for callers that reuse one handle across calls.
    pub fn set<T>(&mut self, ptr: *mut T) {
        self.ptr = ptr.cast();
    }

    /// The stored address as an integer, the inverse of [`NativePtr::from_offset`].
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.ptr.expose_provenance() as u64
    }

    /// A handle `count` bytes past this one.
    ///
    /// Plain wrapping address arithmetic; nothing is read or checked.
    #[must_use]
    pub fn byte_add(self, count: usize) -> Self {
        Self {
            ptr: self.ptr.wrapping_byte_add(count),
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    /// Projects `len` bytes starting at the stored address.
    ///
    /// Nothing is read. A length larger than the real allocation is not
    /// detected; touching the extra bytes through the window is undefined
    /// behavior. Only a non-empty window over the null address is refused.
    pub fn window(&self, len: usize) -> PtrResult<ByteWindow> {
        if self.is_null() && len != 0 {
            return Err(PtrError::NullAddress);
        }
        Ok(ByteWindow::new(self.cast(), len))
    }

    /// Counts the bytes before the first zero byte at the stored address.
    ///
    /// The scan has no upper bound.
    ///
    /// # Safety
    ///
    /// A zero byte must exist at or after the address, and every byte up to
    /// and including it must be readable.
    pub unsafe fn scan_terminator(&self) -> PtrResult<usize> {
        if self.is_null() {
            return Err(PtrError::NullAddress);
        }
        // SAFETY: non-null, and the caller guarantees a readable terminated sequence
        let c_str = unsafe { CStr::from_ptr(self.cast()) };
        Ok(c_str.count_bytes())
    }

    /// Projects the bytes before the first zero byte, excluding the terminator.
    ///
    /// # Safety
    ///
    /// Same contract as [`NativePtr::scan_terminator`].
    pub unsafe fn null_terminated_window(&self) -> PtrResult<ByteWindow> {
        // SAFETY: forwarded to the caller
        let len = unsafe { self.scan_terminator() }?;
        Ok(ByteWindow::new(self.cast(), len))
    }
}

impl Default for NativePtr {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> From<*mut T> for NativePtr {
    fn from(ptr: *mut T) -> Self {
        Self::new(ptr)
    }
}

impl<T> From<*const T> for NativePtr {
    fn from(ptr: *const T) -> Self {
        Self::new(ptr.cast_mut())
    }
}

impl fmt::Debug for NativePtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NativePtr").field(&self.ptr).finish()
    }
}

impl fmt::Display for NativePtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CPtr({:#x})", self.offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_default() {
        assert!(NativePtr::default().is_null());
        assert_eq!(NativePtr::null().offset(), 0);
    }

    #[test]
    fn set_replaces_address() {
        let mut a = 1u32;
        let mut b = 2u32;
        let mut handle = NativePtr::new(&raw mut a);
        handle.set(&raw mut b);
        assert_eq!(handle.cast::<u32>(), &raw mut b);
    }

    #[test]
    fn null_window_rules() {
        let handle = NativePtr::null();
        assert_eq!(handle.window(0).map(|w| w.len()), Ok(0));
        assert_eq!(handle.window(1), Err(PtrError::NullAddress));
        // SAFETY: the null check happens before any read
        assert_eq!(unsafe { handle.scan_terminator() }, Err(PtrError::NullAddress));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn number_coercion() {
        assert_eq!(NativePtr::from_f64(4096.9).offset(), 4096);
        assert_eq!(NativePtr::from_f64(-1.0).offset(), 0);
        assert_eq!(NativePtr::from_f64(f64::NAN).offset(), 0);
        assert_eq!(NativePtr::from_f64(f64::INFINITY).offset(), u64::MAX);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn bigint_coercion() {
        assert_eq!(NativePtr::from_signed_magnitude(false, 0x10).offset(), 0x10);
        assert_eq!(NativePtr::from_signed_magnitude(true, 1).offset(), u64::MAX);
        assert_eq!(NativePtr::from_signed_magnitude(true, 0).offset(), 0);
    }

    #[test]
    fn byte_add_moves_within_buffer() {
        let mut bytes = [0u8; 8];
        let base = NativePtr::new(bytes.as_mut_ptr());
        assert_eq!(base.byte_add(3).cast::<u8>(), bytes[3..].as_mut_ptr());
        assert_eq!(base.byte_add(0), base);
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(NativePtr::from_offset(0xdead_beef).to_string(), "CPtr(0xdeadbeef)");
    }
}
