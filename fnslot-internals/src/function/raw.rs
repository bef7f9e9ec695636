//! Type-erased owning callable.
//!
//! This module encapsulates the `vtable` and `storage` fields of
//! [`RawFunction`], ensuring they are only visible within this module. This
//! visibility restriction guarantees the safety invariant: **`vtable` is
//! `Some` exactly when `storage` holds an initialized occupant, and the vtable
//! was created for that occupant's type**.
//!
//! # Safety Invariant
//!
//! The vtable is only ever set immediately after a value of the matching type
//! has been written into the storage ([`RawFunction::set`],
//! [`RawFunction::try_set`], [`RawFunction::take`]). It is reset to `None`
//! before the occupant is dropped or relocated, so that an unwinding drop
//! can never lead to a second drop of the same occupant.
//!
//! # Type Erasure
//!
//! The concrete occupant type `F` is forgotten once it is written into the
//! buffer. The `&'static FunctionVtable<S>` stored alongside it provides the
//! three operations needed afterward: invoke, relocate and drop.

use core::marker::PhantomData;

use crate::{
    function::{storage::Storage, vtable::FunctionVtable},
    function_ref::RawFunctionRef,
    signature::{Callable, Signature},
    util::Erased,
};

/// An inline, fixed-capacity slot holding at most one callable `F:
/// Callable<S>`, with `F` erased.
///
/// The occupant lives in a buffer of exactly `CAPACITY` bytes embedded in the
/// [`RawFunction`] itself; nothing is ever allocated.
pub struct RawFunction<S: Signature, const CAPACITY: usize> {
    /// Vtable of the current occupant, or `None` if the slot is empty
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. If this is `Some(vtable)`, `storage` holds an initialized value of
    ///    the type `vtable` was created for.
    /// 2. If this is `None`, `storage` holds no live value.
    vtable: Option<&'static FunctionVtable<S>>,

    /// Inline buffer holding the occupant
    storage: Storage<CAPACITY>,

    /// The occupant type is unknown, so we cannot claim it is `Send` or
    /// `Sync`
    _marker: PhantomData<*mut Erased>,
}

impl<S: Signature, const CAPACITY: usize> RawFunction<S, CAPACITY> {
    /// Creates an empty [`RawFunction`].
    #[inline]
    pub const fn new() -> Self {
        Self {
            vtable: None,
            storage: Storage::uninit(),
            _marker: PhantomData,
        }
    }

    /// Whether a callable of type `F` fits in a buffer of `CAPACITY` bytes.
    #[inline]
    pub const fn fits<F>() -> bool {
        Storage::<CAPACITY>::fits::<F>()
    }

    /// Replaces the occupant with `callable`.
    ///
    /// A callable that does not fit is rejected at compile time.
    #[inline]
    pub fn set<F>(&mut self, callable: F)
    where
        F: Callable<S> + 'static,
    {
        const {
            assert!(
                Storage::<CAPACITY>::fits::<F>(),
                "callable does not fit in the capacity of the function buffer"
            );
        }

        self.clear();
        self.write(callable);
    }

    /// Replaces the occupant with `callable` if it fits, returning it back
    /// otherwise.
    ///
    /// When the callable does not fit, the current occupant is left in place.
    #[inline]
    pub fn try_set<F>(&mut self, callable: F) -> Result<(), F>
    where
        F: Callable<S> + 'static,
    {
        if !Self::fits::<F>() {
            return Err(callable);
        }

        self.clear();
        self.write(callable);
        Ok(())
    }

    /// Writes `callable` into the empty buffer and installs its vtable.
    ///
    /// The caller must have checked that `F` fits and emptied the slot.
    #[inline]
    fn write<F>(&mut self, callable: F)
    where
        F: Callable<S> + 'static,
    {
        debug_assert!(self.vtable.is_none());
        debug_assert!(Self::fits::<F>());

        let ptr: *mut F = self.storage.as_erased().cast::<F>().as_ptr();
        // SAFETY: The buffer is aligned to `MAX_ALIGN` and at least `CAPACITY`
        // bytes long, and `F` fits in both respects (checked by every caller).
        // The slot is empty, so no live value is overwritten.
        unsafe { ptr.write(callable) };

        self.vtable = Some(FunctionVtable::new::<F>());
    }

    /// Whether a callable currently occupies the buffer.
    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.vtable.is_some()
    }

    /// Drops the occupant, if any, leaving the slot empty.
    #[inline]
    pub fn clear(&mut self) {
        if let Some(vtable) = self.vtable.take() {
            // SAFETY:
            // 1. The vtable was `Some`, so the storage holds an initialized
            //    occupant of the type the vtable was created for.
            // 2. The vtable has already been reset to `None`, so the occupant is
            //    never touched again, even if its destructor unwinds.
            unsafe { vtable.drop(self.storage.as_erased()) };
        }
    }

    /// Moves the occupant into a new [`RawFunction`], leaving `self` empty.
    ///
    /// The occupant is moved through its relocate operation rather than by
    /// copying the whole buffer.
    #[inline]
    pub fn take(&mut self) -> Self {
        let mut target = Self::new();
        if let Some(vtable) = self.vtable.take() {
            // SAFETY:
            // 1. The vtable was `Some`, so the source storage holds an
            //    initialized occupant of the type the vtable was created for.
            // 2. The target buffer has the same capacity and alignment as the
            //    source buffer, which the occupant already fits in.
            // 3. The two buffers belong to different values and do not overlap.
            // 4. The source vtable has been reset to `None`, so the source
            //    memory is treated as uninitialized from here on.
            unsafe { vtable.relocate(self.storage.as_erased(), target.storage.as_erased()) };
            target.vtable = Some(vtable);
        }
        target
    }

    /// Invokes the occupant with the given argument tuple, or returns `None`
    /// without doing anything if the slot is empty.
    #[inline]
    pub fn call_with(&mut self, args: S::Args) -> Option<S::Output> {
        let vtable = self.vtable?;
        // SAFETY:
        // 1. The vtable is `Some`, so the storage holds an initialized occupant
        //    of the type the vtable was created for.
        // 2. We hold `&mut self`, so no other access can happen during the call.
        Some(unsafe { vtable.invoke(self.storage.as_erased(), args) })
    }

    /// Borrows the occupant as a [`RawFunctionRef`], or returns `None` if the
    /// slot is empty.
    #[inline]
    pub fn as_function_ref(&mut self) -> Option<RawFunctionRef<'_, S>> {
        let vtable = self.vtable?;
        // SAFETY:
        // 1. The vtable is `Some`, so the storage holds an initialized occupant
        //    of the type `vtable.invoke_fn()` was instantiated with. It stays
        //    initialized for the lifetime of the returned reference because
        //    `self` is mutably borrowed for that long.
        // 2. The mutable borrow of `self` also rules out any other access.
        let function_ref =
            unsafe { RawFunctionRef::from_raw_parts(self.storage.as_erased(), vtable.invoke_fn()) };
        Some(function_ref)
    }

    /// Returns the [`core::any::type_name`] of the occupant.
    #[inline]
    pub fn occupant_type_name(&self) -> Option<&'static str> {
        self.vtable.map(FunctionVtable::type_name)
    }

    /// Returns the size and alignment in bytes of the occupant.
    #[inline]
    pub fn occupant_layout(&self) -> Option<(usize, usize)> {
        self.vtable.map(|vtable| (vtable.size(), vtable.align()))
    }
}

impl<S: Signature, const CAPACITY: usize> Default for RawFunction<S, CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Signature, const CAPACITY: usize> core::ops::Drop for RawFunction<S, CAPACITY> {
    #[inline]
    fn drop(&mut self) {
        self.clear();
    }
}

impl<S: Signature, const CAPACITY: usize> core::fmt::Debug for RawFunction<S, CAPACITY> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawFunction")
            .field("capacity", &CAPACITY)
            .field("occupant", &self.occupant_type_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;

    use core::cell::Cell;

    use super::*;

    type IntFn = fn(i32) -> i32;

    struct DropCounter {
        drops: &'static Cell<usize>,
    }

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    fn leaked_counter() -> &'static Cell<usize> {
        alloc::boxed::Box::leak(alloc::boxed::Box::new(Cell::new(0)))
    }

    fn guarded_identity(drops: &'static Cell<usize>) -> impl FnMut(i32) -> i32 + 'static {
        let guard = DropCounter { drops };
        move |n: i32| {
            let _ = &guard;
            n
        }
    }

    #[test]
    fn test_raw_function_starts_empty() {
        let mut raw = RawFunction::<IntFn, 32>::new();
        assert!(!raw.is_occupied());
        assert_eq!(raw.call_with((1,)), None);
        assert!(raw.as_function_ref().is_none());
        assert_eq!(raw.occupant_type_name(), None);
        assert_eq!(raw.occupant_layout(), None);
    }

    #[test]
    fn test_raw_function_set_and_call() {
        let mut raw = RawFunction::<IntFn, 32>::new();
        let mut state = 73;
        raw.set(move |n: i32| {
            state += n;
            state
        });
        assert!(raw.is_occupied());
        assert_eq!(raw.call_with((1,)), Some(74));
        assert_eq!(raw.call_with((1,)), Some(75));
        assert_eq!(raw.occupant_layout(), Some((4, 4)));
    }

    #[test]
    fn test_raw_function_try_set_rejects_oversized() {
        let mut raw = RawFunction::<IntFn, 8>::new();
        raw.set(|n: i32| n);

        let payload = [0u8; 64];
        let oversized = move |n: i32| n + i32::from(payload[0]);
        assert!(raw.try_set(oversized).is_err());

        // The previous occupant is untouched
        assert_eq!(raw.call_with((3,)), Some(3));
    }

    #[test]
    fn test_raw_function_take_moves_occupant() {
        let mut source = RawFunction::<IntFn, 16>::new();
        let offset = 10;
        source.set(move |n: i32| n + offset);

        let mut target = source.take();
        assert!(!source.is_occupied());
        assert!(target.is_occupied());
        assert_eq!(target.call_with((5,)), Some(15));
        assert_eq!(source.call_with((5,)), None);
    }

    #[test]
    fn test_raw_function_ref_borrow() {
        let mut raw = RawFunction::<IntFn, 16>::new();
        let mut total = 0;
        raw.set(move |n: i32| {
            total += n;
            total
        });
        {
            let mut view = raw.as_function_ref().unwrap();
            assert_eq!(view.call_with((2,)), 2);
        }
        assert_eq!(raw.call_with((3,)), Some(5));
    }

    #[test]
    fn test_raw_function_clear_drops_once() {
        let drops = leaked_counter();
        let mut raw = RawFunction::<IntFn, 32>::new();
        raw.set(guarded_identity(drops));
        raw.clear();
        assert_eq!(drops.get(), 1);
        raw.clear();
        drop(raw);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_raw_function_set_drops_previous_occupant() {
        let drops = leaked_counter();
        let mut raw = RawFunction::<IntFn, 32>::new();
        raw.set(guarded_identity(drops));
        raw.set(|n: i32| n * 2);
        assert_eq!(drops.get(), 1);
        assert_eq!(raw.call_with((4,)), Some(8));
        drop(raw);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_raw_function_take_does_not_drop() {
        let drops = leaked_counter();
        let mut raw = RawFunction::<IntFn, 32>::new();
        raw.set(guarded_identity(drops));
        let moved = raw.take();
        assert_eq!(drops.get(), 0);
        drop(raw);
        assert_eq!(drops.get(), 0);
        drop(moved);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_raw_function_drop_runs_destructor() {
        let drops = leaked_counter();
        {
            let mut raw = RawFunction::<IntFn, 32>::new();
            raw.set(guarded_identity(drops));
        }
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_send_sync() {
        static_assertions::assert_not_impl_any!(RawFunction<fn(), 16>: Send, Sync, Clone);
    }
}
