//! Behavior of `NativePtr` and the views it projects over real memory.

use noogl::{ByteWindow, NativePtr, PtrError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn offset_of(bytes: &mut [u8]) -> u64 {
    NativePtr::new(bytes.as_mut_ptr()).offset()
}

// =============================================================================
// 1. Offset factory
// =============================================================================

proptest! {
    /// Every 64-bit value survives the integer -> address -> integer round trip.
    #[test]
    #[cfg(target_pointer_width = "64")]
    fn from_offset_round_trips(n in any::<u64>()) {
        let handle = NativePtr::from_offset(n);
        prop_assert_eq!(handle.offset(), n);
        prop_assert_eq!(handle.get() as usize as u64, n);
    }

    /// Handles built from the same integer are interchangeable.
    #[test]
    fn equal_offsets_give_equal_handles(n in any::<u64>()) {
        prop_assert_eq!(NativePtr::from_offset(n), NativePtr::from_offset(n));
    }

    /// Projecting a window never reads memory, whatever the address.
    #[test]
    #[cfg(target_pointer_width = "64")]
    fn window_descriptor_matches_request(n in 1..u64::MAX, len in any::<u32>()) {
        let window = NativePtr::from_offset(n).window(len as usize).unwrap();
        prop_assert_eq!(window.len(), len as usize);
        prop_assert_eq!(window.addr() as usize as u64, n);
    }
}

#[test]
fn zero_offset_is_null() {
    assert!(NativePtr::from_offset(0).is_null());
}

// =============================================================================
// 2. Explicit-length views
// =============================================================================

/// The view's bytes are the source bytes, not a copy of them.
#[test]
fn array_buffer_view_matches_source() {
    let mut source = *b"native bytes";
    let handle = NativePtr::from_offset(offset_of(&mut source));

    let window = handle.window(6).unwrap();
    // SAFETY: `source` is live and at least 6 bytes long
    let view = unsafe { window.as_slice() };
    assert_eq!(view, b"native");
    assert_eq!(view.as_ptr(), source.as_ptr());
}

/// Writes through a view land in the underlying memory.
#[test]
fn mutating_view_mutates_source() {
    let mut source = [0u8; 4];
    let handle = NativePtr::new(source.as_mut_ptr());

    // SAFETY: `source` is live and not borrowed elsewhere while the slice exists
    let view = unsafe { handle.window(4).unwrap().as_mut_slice() };
    view.copy_from_slice(&[1, 2, 3, 4]);

    assert_eq!(source, [1, 2, 3, 4]);
}

/// Two handles minted from the same integer alias the same memory.
#[test]
fn handles_with_same_offset_alias() {
    let mut source = [0u8; 3];
    let offset = offset_of(&mut source);
    let first = NativePtr::from_offset(offset);
    let second = NativePtr::from_offset(offset);

    {
        // SAFETY: `source` is live; this is the only borrow in this scope
        let view = unsafe { first.window(3).unwrap().as_mut_slice() };
        view[1] = 0x7f;
    }
    // SAFETY: the mutable borrow above has ended
    let seen = unsafe { second.window(3).unwrap().as_slice() };
    assert_eq!(seen, &[0, 0x7f, 0]);
}

/// A handle that is repointed produces views of the new region.
#[test]
fn set_redirects_later_views() {
    let mut a = *b"aaaa";
    let mut b = *b"bbbb";
    let mut handle = NativePtr::new(a.as_mut_ptr());
    handle.set(b.as_mut_ptr());

    // SAFETY: `b` is live and 4 bytes long
    assert_eq!(unsafe { handle.window(4).unwrap().as_slice() }, b"bbbb");
    assert_eq!(a, *b"aaaa");
}

// =============================================================================
// 3. Null-terminated views
// =============================================================================

/// `"hi\0"`: both kinds of view see the same two bytes.
#[test]
fn hi_scenario() {
    let mut text = *b"hi\0";
    let handle = NativePtr::from_offset(offset_of(&mut text));

    let explicit = handle.window(2).unwrap();
    // SAFETY: `text` contains a terminator
    let scanned = unsafe { handle.null_terminated_window() }.unwrap();

    assert_eq!(explicit, scanned);
    // SAFETY: `text` outlives both borrows
    assert_eq!(unsafe { explicit.as_slice() }, &[0x68, 0x69]);
    // SAFETY: as above
    assert_eq!(unsafe { scanned.as_slice() }, &[0x68, 0x69]);
}

/// The scan stops at the first zero byte, ignoring everything after it.
#[test]
fn scan_stops_at_first_terminator() {
    let mut bytes = [5u8, 6, 7, 0, 8, 9, 0];
    let handle = NativePtr::new(bytes.as_mut_ptr());

    // SAFETY: `bytes` contains a terminator at index 3
    let window = unsafe { handle.null_terminated_window() }.unwrap();
    assert_eq!(window.len(), 3);
    // SAFETY: `bytes` outlives the borrow
    assert_eq!(unsafe { window.as_slice() }, &[5, 6, 7]);
}

#[test]
fn leading_terminator_gives_empty_view() {
    let mut bytes = [0u8, 1, 2];
    let handle = NativePtr::new(bytes.as_mut_ptr());

    // SAFETY: terminator at index 0
    let window = unsafe { handle.null_terminated_window() }.unwrap();
    assert!(window.is_empty());
    assert_eq!(window.addr(), bytes.as_mut_ptr());
}

proptest! {
    /// For any terminator-free prefix, the scanned view is exactly that prefix.
    #[test]
    fn scanned_view_is_prefix(prefix in prop::collection::vec(1u8..=255, 0..64), tail in prop::collection::vec(any::<u8>(), 0..8)) {
        let mut bytes = prefix.clone();
        bytes.push(0);
        bytes.extend(tail);
        let handle = NativePtr::new(bytes.as_mut_ptr());

        // SAFETY: a terminator follows the prefix
        let window = unsafe { handle.null_terminated_window() }.unwrap();
        // SAFETY: `bytes` outlives the borrow
        prop_assert_eq!(unsafe { window.as_slice() }, prefix.as_slice());
    }
}

// =============================================================================
// 4. Null handle
// =============================================================================

#[test]
fn null_handle_refuses_non_empty_views() {
    let handle = NativePtr::null();
    assert_eq!(handle.window(0), Ok(ByteWindow::new(std::ptr::null_mut(), 0)));
    assert_eq!(handle.window(8), Err(PtrError::NullAddress));
    // SAFETY: the null check happens before any read
    assert_eq!(unsafe { handle.null_terminated_window() }, Err(PtrError::NullAddress));
}
