//! Reading native pointer parameters out of JavaScript arguments.
//!
//! Companion native functions (for instance generated GL entry points) accept
//! a `CPtr`, an `ArrayBuffer`, a `DataView`, or a typed array wherever the C
//! signature takes a pointer. [`resolve_pointer_arg`] classifies the value and
//! [`PointerSource`] turns it into the address for a `void*` or `T*` slot.

use std::{ffi::c_void, ptr};

use napi::{bindgen_prelude::*, sys};
use napi_derive::napi;
use noogl::{NativePtr, PointerSource, PtrError};

use crate::{
    cptr::CPtr,
    errors::{check, throw_type_error},
    registry::AddonData,
};

const EXPECTED: &str = "a CPtr, ArrayBuffer, DataView or TypedArray";

/// Classifies a JavaScript value that stands in for a native pointer.
///
/// Throws `TypeError` for anything that cannot carry an address.
pub fn resolve_pointer_arg(env: &Env, value: &Unknown<'_>) -> Result<PointerSource> {
    let raw_env = env.raw();
    let raw = value.raw();

    if AddonData::get(env)?.is_cptr(env, raw)? {
        // SAFETY: [DH] - `raw` is an instance of the registered CPtr class
        let cptr = unsafe { ClassInstance::<CPtr>::from_napi_value(raw_env, raw) }?;
        return Ok(PointerSource::Handle(cptr.handle()));
    }

    let mut is_dataview = false;
    // SAFETY: [DH] - only inspects `raw` and writes the flag
    let status = unsafe { sys::napi_is_dataview(raw_env, raw, &raw mut is_dataview) };
    check(status, "napi_is_dataview")?;
    if is_dataview {
        let mut buffer = ptr::null_mut();
        let mut byte_offset = 0;
        // SAFETY: [DH] - `raw` is a DataView; unused outputs are null
        let status = unsafe {
            sys::napi_get_dataview_info(
                raw_env,
                raw,
                ptr::null_mut(),
                ptr::null_mut(),
                &raw mut buffer,
                &raw mut byte_offset,
            )
        };
        check(status, "reading DataView info")?;
        let data = array_buffer_data(raw_env, buffer)?;
        return Ok(PointerSource::DataView { data, byte_offset });
    }

    let mut is_typedarray = false;
    // SAFETY: [DH] - only inspects `raw` and writes the flag
    let status = unsafe { sys::napi_is_typedarray(raw_env, raw, &raw mut is_typedarray) };
    check(status, "napi_is_typedarray")?;
    if is_typedarray {
        let mut kind = 0;
        let mut buffer = ptr::null_mut();
        let mut byte_offset = 0;
        // SAFETY: [DH] - `raw` is a typed array; unused outputs are null
        let status = unsafe {
            sys::napi_get_typedarray_info(
                raw_env,
                raw,
                &raw mut kind,
                ptr::null_mut(),
                ptr::null_mut(),
                &raw mut buffer,
                &raw mut byte_offset,
            )
        };
        check(status, "reading TypedArray info")?;
        let Some(element_size) = element_size(kind) else {
            return Err(throw_type_error(*env, &PtrError::UnsupportedArgument(EXPECTED)));
        };
        let data = array_buffer_data(raw_env, buffer)?;
        return Ok(PointerSource::TypedArray {
            data,
            byte_offset,
            element_size,
        });
    }

    let mut is_arraybuffer = false;
    // SAFETY: [DH] - only inspects `raw` and writes the flag
    let status = unsafe { sys::napi_is_arraybuffer(raw_env, raw, &raw mut is_arraybuffer) };
    check(status, "napi_is_arraybuffer")?;
    if is_arraybuffer {
        let data = array_buffer_data(raw_env, raw)?;
        return Ok(PointerSource::ArrayBuffer { data });
    }

    Err(throw_type_error(*env, &PtrError::UnsupportedArgument(EXPECTED)))
}

/// Resolves `value` for a `T*` parameter, throwing `TypeError` on a mismatch.
pub fn typed_pointer_arg<T>(env: &Env, value: &Unknown<'_>) -> Result<*mut T> {
    resolve_pointer_arg(env, value)?
        .typed_ptr::<T>()
        .map_err(|err| throw_type_error(*env, &err))
}

/// Resolves `value` for a `void*` parameter.
pub fn void_pointer_arg(env: &Env, value: &Unknown<'_>) -> Result<*mut c_void> {
    Ok(resolve_pointer_arg(env, value)?.void_ptr())
}

/// Returns the address a native `void*` parameter would receive for `value`.
///
/// Views include their byte offset. The result is read-only information;
/// turning it back into a handle still goes through `CPtr.fromOffset`.
///
/// @param value - A CPtr, ArrayBuffer, DataView or TypedArray
/// @returns The resolved address
#[napi(ts_args_type = "value: CPtr | ArrayBuffer | ArrayBufferView")]
pub fn address_of(env: Env, value: Unknown<'_>) -> Result<BigInt> {
    let address = void_pointer_arg(&env, &value)?;
    Ok(BigInt::from(NativePtr::new(address).offset()))
}

fn array_buffer_data(env: sys::napi_env, buffer: sys::napi_value) -> Result<NativePtr> {
    let mut data = ptr::null_mut();
    // SAFETY: [DH] - `buffer` is an ArrayBuffer of this env; the length output is unused
    let status = unsafe { sys::napi_get_arraybuffer_info(env, buffer, &raw mut data, ptr::null_mut()) };
    check(status, "reading ArrayBuffer info")?;
    Ok(NativePtr::new(data))
}

/// Element width of a napi typed array kind, in bytes.
fn element_size(kind: sys::napi_typedarray_type) -> Option<usize> {
    use sys::TypedarrayType as T;

    match kind {
        T::int8_array | T::uint8_array | T::uint8_clamped_array => Some(1),
        T::int16_array | T::uint16_array => Some(2),
        T::int32_array | T::uint32_array | T::float32_array => Some(4),
        T::float64_array | T::bigint64_array | T::biguint64_array => Some(8),
        _ => None,
    }
}
