//! Debug assertion macros for the ring's preconditions and index invariants.
//!
//! Programmer errors abort in debug builds and compile out in release; ring
//! full/empty at runtime are short counts, never assertions. Only active with
//! `#[cfg(debug_assertions)]`, so there is zero overhead in release builds.

/// Assert that a single request is smaller than the active ring length.
///
/// A request of exactly `len` (or more) can never complete in one call: the
/// ring holds at most `len - 1` bytes. A request of exactly `len - 1` passes
/// but may still short-count when the ring is not empty.
macro_rules! debug_assert_request_fits {
    ($n:expr, $len:expr) => {
        debug_assert!(
            $n < $len,
            "request of {} bytes cannot fit a ring of length {}",
            $n,
            $len
        )
    };
}

/// Assert that an index stays inside the active region.
///
/// Holds for `head` and `tail` at every observable instant.
macro_rules! debug_assert_index_in_bounds {
    ($name:literal, $idx:expr, $len:expr) => {
        debug_assert!(
            $idx < $len,
            "{} index {} outside ring of length {}",
            $name,
            $idx,
            $len
        )
    };
}

/// Assert that a resize stays within the initially allocated storage.
macro_rules! debug_assert_resize_within {
    ($new_len:expr, $len_max:expr) => {
        debug_assert!(
            $new_len <= $len_max,
            "cannot grow ring to {} past its allocation of {}",
            $new_len,
            $len_max
        )
    };
}

/// Assert that a ring length is usable at all.
macro_rules! debug_assert_nonzero_len {
    ($len:expr) => {
        debug_assert!($len > 0, "ring length must be nonzero")
    };
}

pub(crate) use debug_assert_index_in_bounds;
pub(crate) use debug_assert_nonzero_len;
pub(crate) use debug_assert_request_fits;
pub(crate) use debug_assert_resize_within;
