//! Type-erased callable reference.
//!
//! This module encapsulates the `target` and `invoke` fields of
//! [`RawFunctionRef`], ensuring they are only visible within this module.
//! This visibility restriction guarantees the safety invariant: **`invoke` is
//! always the entry point instantiated for the concrete type behind
//! `target`**.
//!
//! # Safety Invariant
//!
//! Both fields are set together, either by [`RawFunctionRef::new`] from a
//! `&'a mut F`, or by [`RawFunctionRef::from_raw_parts`] whose caller promises
//! the same pairing. Neither can be modified afterward, and the lifetime `'a`
//! keeps the referenced callable mutably borrowed for as long as the
//! [`RawFunctionRef`] exists.

use core::{marker::PhantomData, ptr::NonNull};

use crate::{
    signature::{self, Callable, InvokeFn, Signature},
    util::Erased,
};

/// A mutable borrow of some callable `F: Callable<S>`, with `F` erased.
///
/// This is two machine words: a pointer to the callable and a pointer to the
/// function that knows how to invoke it. It never owns the callable; dropping
/// a [`RawFunctionRef`] leaves the callable untouched.
///
/// We cannot use a `&'a mut dyn Callable<S>` directly, because that would
/// route every call through a trait-object vtable instead of a single entry
/// point chosen at bind time.
pub struct RawFunctionRef<'a, S: Signature> {
    /// Pointer to the referenced callable
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer points to an initialized value of the type that `invoke`
    ///    was instantiated with.
    /// 2. That value is exclusively borrowed for `'a`.
    target: NonNull<Erased>,

    /// Entry point instantiated with the concrete type behind `target`
    invoke: InvokeFn<S>,

    /// Marker to tell the compiler that we should
    /// behave the same as a `&'a mut Erased`
    _marker: PhantomData<&'a mut Erased>,
}

impl<'a, S: Signature> RawFunctionRef<'a, S> {
    /// Creates a new [`RawFunctionRef`] that borrows `callable` for `'a`.
    ///
    /// The callable is not copied.
    #[inline]
    pub fn new<F>(callable: &'a mut F) -> Self
    where
        F: Callable<S>,
    {
        Self {
            target: NonNull::from(callable).cast::<Erased>(),
            invoke: signature::invoke::<S, F>,
            _marker: PhantomData,
        }
    }

    /// Creates a new [`RawFunctionRef`] from an erased pointer and a matching
    /// entry point.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `target` points to an initialized value of the type that `invoke`
    ///    was instantiated with, and stays that way for `'a`.
    /// 2. No other access to that value happens during `'a`.
    #[inline]
    pub(crate) unsafe fn from_raw_parts(target: NonNull<Erased>, invoke: InvokeFn<S>) -> Self {
        Self {
            target,
            invoke,
            _marker: PhantomData,
        }
    }

    /// Invokes the referenced callable with the given argument tuple.
    #[inline]
    pub fn call_with(&mut self, args: S::Args) -> S::Output {
        // SAFETY:
        // 1. `target` points to an initialized value of the type `invoke` was
        //    instantiated with (guaranteed by the invariants on this type)
        // 2. The value is exclusively borrowed for `'a`, and we hold `&mut self`,
        //    so no other access can happen during the call
        unsafe { (self.invoke)(self.target, args) }
    }

    /// Returns the address of the referenced callable.
    #[inline]
    pub fn target_ptr(&self) -> *const () {
        self.target.as_ptr().cast_const().cast::<()>()
    }
}

impl<S: Signature> core::fmt::Debug for RawFunctionRef<'_, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawFunctionRef")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
