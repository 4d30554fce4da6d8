// napi macros generate code that triggers some clippy lints
#![allow(clippy::needless_pass_by_value)]

//! Node.js bindings for opaque native pointer handles.
//!
//! Exposes a single class, `CPtr`, that lets JavaScript hold a native address
//! and look at the memory behind it through zero-copy `ArrayBuffer`s.
//!
//! ## Quick Start
//!
//! ```typescript
//! import { CPtr } from 'noogl';
//!
//! const ptr = CPtr.fromOffset(0x7f00_1000n);
//! const view = new Uint8Array(ptr.arrayBuffer(4));     // explicit length
//! const text = ptr.nullTerminatedArrayBuffer();         // length found by scanning for '\0'
//!
//! addressOf(ptr);                                      // the address as a bigint
//!
//! new CPtr(1234); // TypeError: CPtr cannot be constructed from JavaScript.
//! ```
//!
//! Other native modules mint handles with [`CPtr::wrap`] and read pointer
//! parameters with [`resolve_pointer_arg`], [`void_pointer_arg`] and
//! [`typed_pointer_arg`].

mod arg;
mod cptr;
mod errors;
mod registry;

use napi::bindgen_prelude::*;
use napi_derive::napi;

pub use arg::{address_of, resolve_pointer_arg, typed_pointer_arg, void_pointer_arg};
pub use cptr::CPtr;
pub use registry::AddonData;

/// Load-time hook: records the `CPtr` constructor in this environment's instance data.
#[napi(module_exports)]
pub fn init(exports: Object, env: Env) -> Result<()> {
    AddonData::install(&env, &exports)
}
