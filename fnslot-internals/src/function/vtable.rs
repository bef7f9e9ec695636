//! Vtable for type-erased occupant operations.
//!
//! This module contains the [`FunctionVtable`] which enables invoking,
//! relocating and destroying the occupant of a
//! [`RawFunction`](crate::RawFunction) when its concrete type `F` has been
//! erased. The vtable stores function pointers that dispatch to the correct
//! typed implementations.
//!
//! This module encapsulates the fields of [`FunctionVtable`] so they cannot be
//! accessed directly. This visibility restriction guarantees the safety
//! invariant: **the vtable's type parameter must match the actual occupant
//! type stored in the buffer**.
//!
//! # Safety Invariant
//!
//! This invariant is maintained because vtables are created as `&'static`
//! references via [`FunctionVtable::new`], which pairs the function pointers
//! with a specific type `F` at compile time.

use core::ptr::NonNull;

use crate::{
    signature::{self, Callable, InvokeFn, Signature},
    util::Erased,
};

/// Vtable for type-erased occupant operations.
///
/// Contains function pointers for performing operations on an occupant
/// without knowing its concrete type at compile time.
///
/// # Safety Invariant
///
/// The fields `invoke`, `relocate` and `drop` are guaranteed to point to the
/// functions defined below instantiated with the occupant type `F` that was
/// used to create this [`FunctionVtable`]. The fields `size` and `align` are
/// the layout of that same `F`.
pub(super) struct FunctionVtable<S: Signature> {
    /// Gets the [`core::any::type_name`] of the occupant type.
    type_name: fn() -> &'static str,
    /// Size of the occupant type in bytes.
    size: usize,
    /// Alignment of the occupant type in bytes.
    align: usize,
    /// Invokes the occupant pointed to by this pointer.
    invoke: InvokeFn<S>,
    /// Moves the occupant from the first pointer into the second.
    relocate: unsafe fn(NonNull<Erased>, NonNull<Erased>),
    /// Drops the occupant in place.
    drop: unsafe fn(NonNull<Erased>),
}

impl<S: Signature> FunctionVtable<S> {
    /// Creates a new [`FunctionVtable`] for the occupant type `F`.
    pub(super) const fn new<F: Callable<S> + 'static>() -> &'static Self {
        const {
            &Self {
                type_name: core::any::type_name::<F>,
                size: core::mem::size_of::<F>(),
                align: core::mem::align_of::<F>(),
                invoke: signature::invoke::<S, F>,
                relocate: relocate::<F>,
                drop: drop::<F>,
            }
        }
    }

    /// Gets the [`core::any::type_name`] of the occupant type that was used
    /// to create this [`FunctionVtable`].
    #[inline]
    pub(super) fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Size in bytes of the occupant type.
    #[inline]
    pub(super) fn size(&self) -> usize {
        self.size
    }

    /// Alignment in bytes of the occupant type.
    #[inline]
    pub(super) fn align(&self) -> usize {
        self.align
    }

    /// The invocation entry point for the occupant type.
    ///
    /// Calling the returned function pointer carries the safety requirements
    /// of [`FunctionVtable::invoke`].
    #[inline]
    pub(super) fn invoke_fn(&self) -> InvokeFn<S> {
        self.invoke
    }

    /// Invokes the occupant pointed to by `ptr`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `ptr` points to an initialized occupant of the type this
    ///    [`FunctionVtable`] was created for.
    /// 2. No other access to the occupant happens during the call.
    #[inline]
    pub(super) unsafe fn invoke(&self, ptr: NonNull<Erased>, args: S::Args) -> S::Output {
        // SAFETY: We know that `self.invoke` points to the function
        // `signature::invoke::<S, F>`. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe { (self.invoke)(ptr, args) }
    }

    /// Moves the occupant from `src` into `dst`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `src` points to an initialized occupant of the type this
    ///    [`FunctionVtable`] was created for.
    /// 2. `dst` is valid for writes of that type and properly aligned for it.
    /// 3. `src` and `dst` do not overlap.
    /// 4. After this call, the memory at `src` is treated as uninitialized:
    ///    it is neither read, invoked nor dropped again.
    #[inline]
    pub(super) unsafe fn relocate(&self, src: NonNull<Erased>, dst: NonNull<Erased>) {
        // SAFETY: We know that `self.relocate` points to the function
        // `relocate::<F>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        // 4. Guaranteed by the caller
        unsafe { (self.relocate)(src, dst) }
    }

    /// Drops the occupant pointed to by `ptr` in place.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `ptr` points to an initialized occupant of the type this
    ///    [`FunctionVtable`] was created for.
    /// 2. After this call, the memory at `ptr` is treated as uninitialized:
    ///    it is neither read, invoked nor dropped again.
    #[inline]
    pub(super) unsafe fn drop(&self, ptr: NonNull<Erased>) {
        // SAFETY: We know that `self.drop` points to the function `drop::<F>`
        // below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe { (self.drop)(ptr) }
    }
}

/// Moves a value of type `F` from `src` into `dst`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `src` points to an initialized value of type `F`.
/// 2. `dst` is valid for writes of `F` and properly aligned for it.
/// 3. `src` and `dst` do not overlap.
/// 4. The value at `src` is not used again afterward.
unsafe fn relocate<F>(src: NonNull<Erased>, dst: NonNull<Erased>) {
    // SAFETY:
    // 1. Guaranteed by the caller
    // 4. Ownership moves out of `src`, guaranteed by the caller
    let value: F = unsafe { src.cast::<F>().read() };
    // SAFETY:
    // 2. Guaranteed by the caller
    // 3. Guaranteed by the caller
    unsafe { dst.cast::<F>().write(value) };
}

/// Drops a value of type `F` in place.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `ptr` points to an initialized value of type `F`.
/// 2. The value at `ptr` is not used again afterward.
unsafe fn drop<F>(ptr: NonNull<Erased>) {
    let ptr: *mut F = ptr.cast::<F>().as_ptr();
    // SAFETY:
    // 1. Guaranteed by the caller
    // 2. Guaranteed by the caller
    unsafe { core::ptr::drop_in_place(ptr) };
}
