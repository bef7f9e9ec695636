use core::fmt;

use fnslot_internals::{Callable, RawFunction, Signature};

use crate::{FunctionRef, error::CapacityError, error::unbound_invocation};

/// An owning, allocation-free callable with the signature `S` and an inline
/// buffer of `CAPACITY` bytes.
///
/// The bound callable (the *occupant*) is moved into a buffer embedded in the
/// [`Function`] itself, so its lifetime is governed by the [`Function`]:
/// rebinding or dropping the [`Function`] drops the occupant exactly once.
/// Three operations (invoke, relocate and drop) are selected for the concrete
/// occupant type when it is bound, and every call afterwards is a single
/// indirect call.
///
/// The occupant must fit in `CAPACITY` bytes and must not require an
/// alignment larger than [`MAX_ALIGN`](crate::MAX_ALIGN). Functions with
/// different capacities are different types.
///
/// # Examples
///
/// ```
/// use fnslot::Function;
///
/// let mut state = 73;
/// let mut counter = Function::<fn(i32) -> i32, 32>::new(move |n: i32| {
///     state += n;
///     state
/// });
///
/// assert_eq!(counter.call(1), 74);
/// assert_eq!(counter.call(1), 75);
/// ```
///
/// A callable that does not fit is rejected at compile time:
///
/// ```compile_fail
/// use fnslot::Function;
///
/// let table = [0u8; 64];
/// let function = Function::<fn(usize) -> u8, 32>::new(move |i: usize| table[i]);
/// ```
pub struct Function<S: Signature, const CAPACITY: usize> {
    raw: RawFunction<S, CAPACITY>,
}

impl<S: Signature, const CAPACITY: usize> Function<S, CAPACITY> {
    /// Creates an empty [`Function`].
    ///
    /// # Examples
    ///
    /// ```
    /// use fnslot::Function;
    ///
    /// let function = Function::<fn(), 16>::empty();
    /// assert!(!function.is_bound());
    /// ```
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            raw: RawFunction::new(),
        }
    }

    /// Creates a [`Function`] holding `callable`.
    ///
    /// A callable whose size exceeds `CAPACITY`, or whose alignment exceeds
    /// [`MAX_ALIGN`](crate::MAX_ALIGN), fails to compile. Use
    /// [`try_new`](Self::try_new) to check at runtime instead.
    #[inline]
    #[must_use]
    pub fn new<F>(callable: F) -> Self
    where
        F: Callable<S> + 'static,
    {
        let mut function = Self::empty();
        function.set(callable);
        function
    }

    /// Creates a [`Function`] holding `callable`, or hands `callable` back
    /// inside a [`CapacityError`] if it does not fit.
    ///
    /// # Examples
    ///
    /// ```
    /// use fnslot::Function;
    ///
    /// let small = |n: u64| n + 1;
    /// assert!(Function::<fn(u64) -> u64, 8>::try_new(small).is_ok());
    ///
    /// let key = [1u64, 2, 3];
    /// let large = move |n: u64| n ^ key[0];
    /// assert!(Function::<fn(u64) -> u64, 8>::try_new(large).is_err());
    /// ```
    #[inline]
    pub fn try_new<F>(callable: F) -> Result<Self, CapacityError<F>>
    where
        F: Callable<S> + 'static,
    {
        let mut function = Self::empty();
        function.try_set(callable)?;
        Ok(function)
    }

    /// Whether a callable of type `F` fits in this [`Function`].
    #[inline]
    #[must_use]
    pub const fn fits<F>() -> bool {
        RawFunction::<S, CAPACITY>::fits::<F>()
    }

    /// Replaces the occupant with `callable`.
    ///
    /// The previous occupant, if any, is dropped first. A callable that does
    /// not fit fails to compile.
    #[inline]
    pub fn set<F>(&mut self, callable: F)
    where
        F: Callable<S> + 'static,
    {
        let previous = self.raw.occupant_type_name();
        self.raw.set(callable);
        trace_dropped(previous, CAPACITY);
        self.trace_bound();
    }

    /// Replaces the occupant with `callable` if it fits.
    ///
    /// If it does not fit, the current occupant is kept and `callable` is
    /// handed back inside a [`CapacityError`].
    #[inline]
    pub fn try_set<F>(&mut self, callable: F) -> Result<(), CapacityError<F>>
    where
        F: Callable<S> + 'static,
    {
        let previous = self.raw.occupant_type_name();
        match self.raw.try_set(callable) {
            Ok(()) => {
                trace_dropped(previous, CAPACITY);
                self.trace_bound();
                Ok(())
            }
            Err(callable) => {
                tracing::debug!(
                    type_name = core::any::type_name::<F>(),
                    size = core::mem::size_of::<F>(),
                    align = core::mem::align_of::<F>(),
                    capacity = CAPACITY,
                    "callable does not fit"
                );
                Err(CapacityError::new(callable, CAPACITY))
            }
        }
    }

    fn trace_bound(&self) {
        if let (Some(type_name), Some((size, align))) =
            (self.raw.occupant_type_name(), self.raw.occupant_layout())
        {
            tracing::trace!(
                type_name,
                size,
                align,
                capacity = CAPACITY,
                "bound callable"
            );
        }
    }

    /// Whether a callable occupies this [`Function`], i.e. whether calling it
    /// is allowed.
    #[inline]
    pub fn is_bound(&self) -> bool {
        self.raw.is_occupied()
    }

    /// Drops the occupant, if any, leaving this [`Function`] empty.
    #[inline]
    pub fn clear(&mut self) {
        let previous = self.raw.occupant_type_name();
        self.raw.clear();
        trace_dropped(previous, CAPACITY);
    }

    /// Moves the occupant out into a new [`Function`], leaving `self` empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use fnslot::Function;
    ///
    /// let mut source = Function::<fn() -> &'static str, 16>::new(|| "moved");
    /// let mut target = source.take();
    ///
    /// assert!(!source.is_bound());
    /// assert_eq!(target.call(), "moved");
    /// ```
    #[inline]
    #[must_use]
    pub fn take(&mut self) -> Self {
        Self {
            raw: self.raw.take(),
        }
    }

    /// Exchanges the occupants of `self` and `other`.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        let mine = self.raw.take();
        self.raw = other.raw.take();
        other.raw = mine;
    }

    /// Invokes the occupant with the given argument tuple.
    ///
    /// Whatever the occupant returns is returned unchanged, and a panic in the
    /// occupant unwinds through this call. The occupant stays bound either way.
    ///
    /// # Panics
    ///
    /// Panics if this [`Function`] is empty. An error event is emitted through
    /// [`tracing`] first.
    #[inline]
    #[track_caller]
    pub fn call_with(&mut self, args: S::Args) -> S::Output {
        match self.raw.call_with(args) {
            Some(output) => output,
            None => unbound_invocation::<S>("Function"),
        }
    }

    /// Borrows the occupant as a [`FunctionRef`].
    ///
    /// The returned reference is unbound if this [`Function`] is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use fnslot::{Function, FunctionRef};
    ///
    /// fn run_twice(mut callback: FunctionRef<'_, fn(u32) -> u32>) -> u32 {
    ///     callback.call(1) + callback.call(1)
    /// }
    ///
    /// let mut calls = 0;
    /// let mut function = Function::<fn(u32) -> u32, 16>::new(move |n: u32| {
    ///     calls += n;
    ///     calls
    /// });
    /// assert_eq!(run_twice(function.as_function_ref()), 3);
    /// assert_eq!(function.call(1), 3);
    /// ```
    #[inline]
    pub fn as_function_ref(&mut self) -> FunctionRef<'_, S> {
        FunctionRef::from_raw(self.raw.as_function_ref())
    }

    /// Returns the [`core::any::type_name`] of the occupant, or `None` if this
    /// [`Function`] is empty.
    #[inline]
    pub fn occupant_type_name(&self) -> Option<&'static str> {
        self.raw.occupant_type_name()
    }
}

/// Emits the trace event for an occupant of type `type_name` that was just
/// dropped, if there was one.
fn trace_dropped(type_name: Option<&'static str>, capacity: usize) {
    if let Some(type_name) = type_name {
        tracing::trace!(type_name, capacity, "dropping callable");
    }
}

impl<S: Signature, const CAPACITY: usize> Drop for Function<S, CAPACITY> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<S: Signature, const CAPACITY: usize> Default for Function<S, CAPACITY> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: Signature, const CAPACITY: usize> fmt::Debug for Function<S, CAPACITY> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("signature", &core::any::type_name::<S>())
            .field("capacity", &CAPACITY)
            .field("occupant", &self.raw.occupant_type_name())
            .finish()
    }
}
