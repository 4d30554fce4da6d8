//! Resolving host arguments into native pointer parameters.
//!
//! Native entry points that take `void*` or `T*` parameters accept a handful of
//! host values: a pointer handle, a raw `ArrayBuffer`, a `DataView`, or a typed
//! array. The binding layer describes whichever it received as a
//! [`PointerSource`]; this module decides which of them are acceptable for a
//! given parameter and computes the final address.

use std::{ffi::c_void, mem::size_of};

use crate::{
    error::{PtrError, PtrResult},
    ptr::NativePtr,
};

/// A host value that can stand in for a native pointer parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSource {
    /// A `CPtr` handle; its address is used as-is.
    Handle(NativePtr),
    /// The start of an `ArrayBuffer`'s backing store.
    ArrayBuffer { data: NativePtr },
    /// A `DataView` over some backing store.
    DataView { data: NativePtr, byte_offset: usize },
    /// A typed array over some backing store, with its element width in bytes.
    TypedArray {
        data: NativePtr,
        byte_offset: usize,
        element_size: usize,
    },
}

impl PointerSource {
    /// Resolves an untyped (`void*`) parameter.
    ///
    /// Every kind of source is accepted; views contribute their byte offset.
    #[must_use]
    pub fn void_ptr(&self) -> *mut c_void {
        match *self {
            Self::Handle(ptr) | Self::ArrayBuffer { data: ptr } => ptr.get(),
            Self::DataView { data, byte_offset } | Self::TypedArray { data, byte_offset, .. } => {
                data.byte_add(byte_offset).get()
            }
        }
    }

    /// Resolves a typed (`T*`) parameter.
    ///
    /// Typed arrays must have elements exactly `size_of::<T>()` wide. Handles
    /// are cast without any check. Raw buffers and data views carry no element
    /// type and are refused.
    pub fn typed_ptr<T>(&self) -> PtrResult<*mut T> {
        match *self {
            Self::Handle(ptr) => Ok(ptr.cast()),
            Self::TypedArray {
                data,
                byte_offset,
                element_size,
            } => {
                let expected = size_of::<T>();
                if element_size != expected {
                    return Err(PtrError::ElementSize {
                        expected,
                        actual: element_size,
                    });
                }
                Ok(data.byte_add(byte_offset).cast())
            }
            Self::ArrayBuffer { .. } | Self::DataView { .. } => {
                Err(PtrError::UnsupportedArgument("a TypedArray or CPtr"))
            }
        }
    }
}
