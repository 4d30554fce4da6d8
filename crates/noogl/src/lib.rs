//! Opaque native pointer handles for garbage-collected hosts.
//!
//! The crate lets a managed runtime hold a raw native address and look at the
//! memory behind it without copying. All of the unsafety is concentrated in
//! one type, [`NativePtr`], with one sanctioned way to turn an integer into an
//! address ([`NativePtr::from_offset`]) and two ways to project memory:
//!
//! - [`NativePtr::window`] for an explicit length the caller vouches for;
//! - [`NativePtr::null_terminated_window`] for C-style strings whose length is
//!   found by scanning for a zero byte.
//!
//! Neither the handle nor the [`ByteWindow`]s it produces own anything. They
//! never allocate, never free, and cannot tell whether an address is live.
//!
//! ```
//! use noogl::NativePtr;
//!
//! let mut text = *b"hi\0";
//! let handle = NativePtr::new(text.as_mut_ptr());
//!
//! let explicit = handle.window(2).unwrap();
//! // SAFETY: `text` is live and holds a terminator
//! let scanned = unsafe { handle.null_terminated_window() }.unwrap();
//! assert_eq!(explicit, scanned);
//! // SAFETY: `text` outlives the borrow
//! assert_eq!(unsafe { scanned.as_slice() }, b"hi");
//! ```

mod arg;
mod error;
mod ptr;
mod window;

pub use arg::PointerSource;
pub use error::{PtrError, PtrResult};
pub use ptr::NativePtr;
pub use window::ByteWindow;
