//! Conversion of [`PtrError`] into JavaScript exceptions.

use napi::{bindgen_prelude::*, sys};
use noogl::PtrError;

/// Converts a `PtrError` to a napi `Error`, thrown as a plain `Error` by napi-rs.
pub(crate) fn ptr_error_to_napi(err: &PtrError) -> Error {
    let status = match err {
        PtrError::MissingRegistry => Status::GenericFailure,
        _ => Status::InvalidArg,
    };
    Error::new(status, err.to_string())
}

/// Throws `err` as a JavaScript `TypeError`.
///
/// The returned error carries `Status::PendingException`, which tells napi-rs
/// the exception is already set and must not be replaced.
pub(crate) fn throw_type_error(env: Env, err: &PtrError) -> Error {
    let message = err.to_string();
    match env.throw_type_error(&message, None) {
        Ok(()) => Error::new(Status::PendingException, message),
        Err(throw_failed) => throw_failed,
    }
}

/// Turns a raw napi status into a `Result`, labelling failures with `context`.
pub(crate) fn check(status: sys::napi_status, context: &str) -> Result<()> {
    if status == sys::Status::napi_ok {
        Ok(())
    } else {
        Err(Error::new(Status::from(status), format!("{context} failed")))
    }
}
