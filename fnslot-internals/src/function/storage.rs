//! Inline byte buffer holding the occupant of a
//! [`RawFunction`](crate::RawFunction).

use core::{mem::MaybeUninit, ptr::NonNull};

use crate::util::Erased;

/// The largest alignment a stored callable may require.
///
/// Every buffer is aligned to this value, which covers all primitive types on
/// the supported targets.
pub const MAX_ALIGN: usize = 16;

/// A buffer of exactly `CAPACITY` possibly-uninitialized bytes, aligned to
/// [`MAX_ALIGN`].
///
/// The buffer itself never drops or reads its contents; whoever writes a value
/// into it is responsible for destroying that value.
#[repr(C, align(16))]
pub(super) struct Storage<const CAPACITY: usize> {
    /// The raw bytes
    bytes: [MaybeUninit<u8>; CAPACITY],
}

const _: () = assert!(core::mem::align_of::<Storage<0>>() == MAX_ALIGN);

impl<const CAPACITY: usize> Storage<CAPACITY> {
    /// Creates a buffer whose bytes are all uninitialized.
    #[inline]
    pub(super) const fn uninit() -> Self {
        Self {
            bytes: [MaybeUninit::uninit(); CAPACITY],
        }
    }

    /// Whether a value of type `F` fits in this buffer, both in size and in
    /// alignment.
    #[inline]
    pub(super) const fn fits<F>() -> bool {
        core::mem::size_of::<F>() <= CAPACITY && core::mem::align_of::<F>() <= MAX_ALIGN
    }

    /// Returns a pointer to the start of the buffer.
    ///
    /// The pointer is aligned to [`MAX_ALIGN`] and valid for reads and writes
    /// of `CAPACITY` bytes for as long as `self` is neither moved nor
    /// otherwise accessed.
    #[inline]
    pub(super) fn as_erased(&mut self) -> NonNull<Erased> {
        NonNull::from(&mut self.bytes).cast::<Erased>()
    }
}
