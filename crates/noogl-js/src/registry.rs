//! Per-environment addon state.
//!
//! Every `Env` that loads the addon gets one [`AddonData`], installed as napi
//! instance data while the module's exports are being populated and finalized
//! when that environment shuts down. It keeps a persistent reference to the
//! `CPtr` constructor so native code can mint handles through the same
//! constructor JavaScript sees, without re-deriving the class.

use std::{ffi::c_void, ptr};

use napi::{bindgen_prelude::*, sys};
use noogl::PtrError;

use crate::errors::{check, ptr_error_to_napi};

const TRACE_TARGET: &str = "noogl::cptr";

/// State shared by every native entry point of one `Env`.
pub struct AddonData {
    /// Strong reference to the exported `CPtr` class.
    cptr_ctor: sys::napi_ref,
}

impl AddonData {
    /// Registers the `CPtr` constructor found on `exports` for this environment.
    pub(crate) fn install(env: &Env, exports: &Object<'_>) -> Result<()> {
        let ctor: Unknown = exports.get_named_property("CPtr")?;

        let mut cptr_ctor = ptr::null_mut();
        // SAFETY: [DH] - `ctor` is a live value of this env and `cptr_ctor` is valid on success
        let status = unsafe { sys::napi_create_reference(env.raw(), ctor.raw(), 1, &raw mut cptr_ctor) };
        check(status, "creating the CPtr constructor reference")?;

        env.set_instance_data(Self { cptr_ctor }, (), |ctx| {
            ctx.value.release(&ctx.env);
        })?;
        tracing::trace!(target: TRACE_TARGET, "registered CPtr constructor");
        Ok(())
    }

    /// Looks up the state installed for `env`.
    pub fn get(env: &Env) -> Result<&'static Self> {
        match env.get_instance_data::<Self>()? {
            Some(data) => Ok(data),
            None => Err(ptr_error_to_napi(&PtrError::MissingRegistry)),
        }
    }

    fn constructor(&self, env: &Env) -> Result<sys::napi_value> {
        let mut ctor = ptr::null_mut();
        // SAFETY: [DH] - the reference is alive until this env's instance data is finalized
        let status = unsafe { sys::napi_get_reference_value(env.raw(), self.cptr_ctor, &raw mut ctor) };
        check(status, "resolving the CPtr constructor")?;
        Ok(ctor)
    }

    /// Builds a new `CPtr` instance holding `address`.
    ///
    /// The address travels to the constructor as a native external value, the
    /// one kind of argument the constructor accepts.
    pub fn construct<'env>(&self, env: &'env Env, address: *mut c_void) -> Result<Object<'env>> {
        let mut external = ptr::null_mut();
        // SAFETY: [DH] - no finalizer is attached; the external only carries the address
        let status = unsafe { sys::napi_create_external(env.raw(), address, None, ptr::null_mut(), &raw mut external) };
        check(status, "wrapping the native address")?;

        let ctor = self.constructor(env)?;
        let mut instance = ptr::null_mut();
        // SAFETY: [DH] - `ctor` and `external` are live values of this env
        let status = unsafe { sys::napi_new_instance(env.raw(), ctor, 1, &raw const external, &raw mut instance) };
        if status == sys::Status::napi_pending_exception {
            return Err(Error::new(Status::PendingException, "CPtr constructor threw"));
        }
        check(status, "constructing CPtr")?;

        Ok(Object::from_raw(env.raw(), instance))
    }

    /// Whether `value` is an instance of the registered `CPtr` class.
    pub(crate) fn is_cptr(&self, env: &Env, value: sys::napi_value) -> Result<bool> {
        let ctor = self.constructor(env)?;
        let mut result = false;
        // SAFETY: [DH] - both values belong to this env
        let status = unsafe { sys::napi_instanceof(env.raw(), value, ctor, &raw mut result) };
        check(status, "checking for a CPtr instance")?;
        Ok(result)
    }

    fn release(&self, env: &Env) {
        // SAFETY: [DH] - called once, from the instance data finalizer of the env that owns the reference
        let status = unsafe { sys::napi_delete_reference(env.raw(), self.cptr_ctor) };
        tracing::trace!(target: TRACE_TARGET, status, "released CPtr constructor reference");
    }
}
