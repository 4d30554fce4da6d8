//! The `CPtr` class: a JavaScript object wrapping one native address.
//!
//! ```typescript
//! import { CPtr } from 'noogl';
//!
//! const ptr = CPtr.fromOffset(address);
//! const bytes = new Uint8Array(ptr.arrayBuffer(16)); // aliases native memory
//! const name = new TextDecoder().decode(ptr.nullTerminatedArrayBuffer());
//! ```
//!
//! Views returned by `arrayBuffer` and `nullTerminatedArrayBuffer` are
//! external ArrayBuffers with no finalizer: they alias the native memory
//! directly, never free it, and stay usable after the `CPtr` is collected.
//! Keeping that memory alive for as long as any view is reachable is the
//! caller's job.

use std::{ffi::c_void, ptr};

use napi::{bindgen_prelude::*, sys};
use napi_derive::napi;
use noogl::{ByteWindow, NativePtr, PtrError};

use crate::{
    errors::{check, ptr_error_to_napi, throw_type_error},
    registry::AddonData,
};

const TRACE_TARGET: &str = "noogl::cptr";

/// An opaque handle to native memory.
///
/// Only native code can construct one directly, by passing an external value to
/// the constructor. From JavaScript the sole entry point is `CPtr.fromOffset`.
#[napi(js_name = "CPtr")]
pub struct CPtr {
    handle: NativePtr,
}

#[napi]
impl CPtr {
    /// Wraps the address carried by a native external value.
    ///
    /// Throws `TypeError` for anything else, including numbers.
    #[napi(constructor, ts_args_type = "external: ExternalObject<unknown>")]
    pub fn new(env: Env, external: Unknown<'_>) -> Result<Self> {
        let Some(address) = external_address(&env, &external)? else {
            return Err(throw_type_error(env, &PtrError::NotExternal));
        };
        let handle = NativePtr::new(address);
        tracing::trace!(target: TRACE_TARGET, %handle, "constructed CPtr");
        Ok(Self { handle })
    }

    /// Creates a handle from a raw integer address.
    ///
    /// Numbers are truncated toward zero and clamped to the unsigned 64-bit
    /// range; bigints keep their low 64 bits. No other validation happens.
    ///
    /// @param offset - The address as a number or bigint
    /// @returns A new CPtr pointing at `offset`
    #[napi(ts_return_type = "CPtr")]
    pub fn from_offset(env: &Env, offset: Either<BigInt, f64>) -> Result<Object<'_>> {
        let handle = match offset {
            Either::A(big) => {
                let (negative, low_word, _lossless) = big.get_u64();
                NativePtr::from_signed_magnitude(negative, low_word)
            }
            Either::B(number) => NativePtr::from_f64(number),
        };
        tracing::trace!(target: TRACE_TARGET, %handle, "CPtr.fromOffset");
        Self::wrap(env, handle.get())
    }

    /// Returns an ArrayBuffer aliasing `length` bytes at this address.
    ///
    /// Nothing is copied and the length is trusted: asking for more bytes than
    /// the native allocation holds exposes out-of-bounds memory.
    ///
    /// @param length - Number of bytes to expose
    /// @returns An ArrayBuffer backed by the native memory
    #[napi(ts_return_type = "ArrayBuffer")]
    pub fn array_buffer<'env>(&self, env: &'env Env, length: u32) -> Result<Unknown<'env>> {
        let window = self
            .handle
            .window(length as usize)
            .map_err(|err| ptr_error_to_napi(&err))?;
        tracing::trace!(target: TRACE_TARGET, handle = %self.handle, length, "CPtr.arrayBuffer");
        external_array_buffer(env, window)
    }

    /// Returns an ArrayBuffer aliasing the bytes before the first zero byte.
    ///
    /// The terminator is not included. The scan is unbounded: if no zero byte
    /// follows this address the process reads until it faults.
    ///
    /// @returns An ArrayBuffer backed by the native memory
    #[napi(ts_return_type = "ArrayBuffer")]
    pub fn null_terminated_array_buffer<'env>(&self, env: &'env Env) -> Result<Unknown<'env>> {
        // SAFETY: [DH] - whoever handed out this address vouches for a terminated, readable sequence
        let window = unsafe { self.handle.null_terminated_window() }.map_err(|err| ptr_error_to_napi(&err))?;
        tracing::trace!(
            target: TRACE_TARGET,
            handle = %self.handle,
            length = window.len(),
            "CPtr.nullTerminatedArrayBuffer"
        );
        external_array_buffer(env, window)
    }

    /// Creates a `CPtr` instance for `address` on behalf of another native module.
    pub fn wrap(env: &Env, address: *mut c_void) -> Result<Object<'_>> {
        AddonData::get(env)?.construct(env, address)
    }

    /// The wrapped address.
    #[must_use]
    pub fn get_ptr(&self) -> *mut c_void {
        self.handle.get()
    }

    /// The wrapped address as a typed pointer. Not checked.
    #[must_use]
    pub fn cast_ptr<T>(&self) -> *mut T {
        self.handle.cast()
    }

    /// Points this handle somewhere else.
    ///
    /// Not synchronized with readers of the same instance.
    pub fn set_ptr(&mut self, address: *mut c_void) {
        self.handle.set(address);
    }

    /// The underlying handle value.
    #[must_use]
    pub fn handle(&self) -> NativePtr {
        self.handle
    }
}

/// Reads the address out of `value` if it is a native external.
fn external_address(env: &Env, value: &Unknown<'_>) -> Result<Option<*mut c_void>> {
    if value.get_type()? != ValueType::External {
        return Ok(None);
    }
    let mut data = ptr::null_mut();
    // SAFETY: [DH] - `value` was just checked to be an external of this env
    let status = unsafe { sys::napi_get_value_external(env.raw(), value.raw(), &raw mut data) };
    check(status, "reading the external address")?;
    Ok(Some(data))
}

/// Exposes `window` to JavaScript as an ArrayBuffer without copying.
fn external_array_buffer(env: &Env, window: ByteWindow) -> Result<Unknown<'_>> {
    let mut value = ptr::null_mut();
    if window.is_empty() {
        // An empty view aliases nothing, so a plain zero-length buffer is indistinguishable.
        let mut data = ptr::null_mut();
        // SAFETY: [DH] - a zero-length allocation owned by the engine
        let status = unsafe { sys::napi_create_arraybuffer(env.raw(), 0, &raw mut data, &raw mut value) };
        check(status, "creating an empty ArrayBuffer")?;
    } else {
        // SAFETY: [DH] - no finalizer is registered, so the engine never frees the native memory;
        // validity of the region for the buffer's lifetime is the caller's contract
        let status = unsafe {
            sys::napi_create_external_arraybuffer(
                env.raw(),
                window.addr().cast(),
                window.len(),
                None,
                ptr::null_mut(),
                &raw mut value,
            )
        };
        check(status, "creating an external ArrayBuffer")?;
    }
    // SAFETY: [DH] - `value` is a valid ArrayBuffer on success
    Ok(unsafe { Unknown::from_raw_unchecked(env.raw(), value) })
}
