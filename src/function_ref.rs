use core::fmt;

use fnslot_internals::{Callable, RawFunctionRef, Signature};

use crate::error::unbound_invocation;

/// A non-owning reference to a callable with the signature `S`.
///
/// A [`FunctionRef`] borrows some callable for `'a` and remembers how to
/// invoke it; the concrete type of the callable is erased. It is exactly two
/// machine words: a pointer to the callable and a pointer to the function
/// that calls it. Binding never copies or moves the callable, and dropping a
/// [`FunctionRef`] never touches it.
///
/// A [`FunctionRef`] can also be unbound. Invoking an unbound reference is a
/// contract violation and panics, see [`call_with`](Self::call_with).
///
/// # Examples
///
/// ```
/// use fnslot::FunctionRef;
///
/// let mut total = 0;
/// let mut accumulate = |n: i32| {
///     total += n;
///     total
/// };
///
/// let mut function_ref = FunctionRef::<fn(i32) -> i32>::new(&mut accumulate);
/// assert_eq!(function_ref.call(2), 2);
/// assert_eq!(function_ref.call(3), 5);
///
/// // Moving out leaves the source unbound
/// let mut moved = function_ref.take();
/// assert!(!function_ref.is_bound());
/// assert_eq!(moved.call(1), 6);
/// ```
#[repr(transparent)]
pub struct FunctionRef<'a, S: Signature> {
    raw: Option<RawFunctionRef<'a, S>>,
}

impl<'a, S: Signature> FunctionRef<'a, S> {
    /// Creates an unbound [`FunctionRef`].
    ///
    /// # Examples
    ///
    /// ```
    /// use fnslot::FunctionRef;
    ///
    /// let function_ref = FunctionRef::<fn()>::empty();
    /// assert!(!function_ref.is_bound());
    /// ```
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self { raw: None }
    }

    /// Creates a [`FunctionRef`] bound to `callable`.
    ///
    /// The callable stays mutably borrowed for as long as the returned
    /// reference is alive, so it always outlives every call made through it.
    ///
    /// # Examples
    ///
    /// ```
    /// use fnslot::FunctionRef;
    ///
    /// fn double(n: u32) -> u32 {
    ///     n * 2
    /// }
    ///
    /// let mut function = double;
    /// let mut function_ref = FunctionRef::<fn(u32) -> u32>::new(&mut function);
    /// assert_eq!(function_ref.call(21), 42);
    /// ```
    #[inline]
    #[must_use]
    pub fn new<F>(callable: &'a mut F) -> Self
    where
        F: Callable<S>,
    {
        tracing::trace!(
            type_name = core::any::type_name::<F>(),
            signature = core::any::type_name::<S>(),
            "binding function reference"
        );
        Self {
            raw: Some(RawFunctionRef::new(callable)),
        }
    }

    #[inline]
    pub(crate) fn from_raw(raw: Option<RawFunctionRef<'a, S>>) -> Self {
        Self { raw }
    }

    /// Whether a callable is bound, i.e. whether calling this reference is
    /// allowed.
    #[inline]
    pub fn is_bound(&self) -> bool {
        self.raw.is_some()
    }

    /// Moves the binding out into a new [`FunctionRef`], leaving `self`
    /// unbound.
    #[inline]
    #[must_use]
    pub fn take(&mut self) -> Self {
        Self {
            raw: self.raw.take(),
        }
    }

    /// Exchanges the bindings of `self` and `other`.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.raw, &mut other.raw);
    }

    /// Unbinds this reference. The previously bound callable is not touched.
    #[inline]
    pub fn clear(&mut self) {
        self.raw = None;
    }

    /// Invokes the bound callable with the given argument tuple.
    ///
    /// Whatever the callable returns is returned unchanged, and a panic in the
    /// callable unwinds through this call.
    ///
    /// # Panics
    ///
    /// Panics if this reference is unbound. An error event is emitted through
    /// [`tracing`] first.
    ///
    /// # Examples
    ///
    /// ```
    /// use fnslot::FunctionRef;
    ///
    /// let mut join = |a: u8, b: u8| (u16::from(a) << 8) | u16::from(b);
    /// let mut function_ref = FunctionRef::<fn(u8, u8) -> u16>::new(&mut join);
    /// assert_eq!(function_ref.call_with((1, 2)), 0x0102);
    /// ```
    #[inline]
    #[track_caller]
    pub fn call_with(&mut self, args: S::Args) -> S::Output {
        match &mut self.raw {
            Some(raw) => raw.call_with(args),
            None => unbound_invocation::<S>("FunctionRef"),
        }
    }
}

impl<S: Signature> Default for FunctionRef<'_, S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a, S, F> From<&'a mut F> for FunctionRef<'a, S>
where
    S: Signature,
    F: Callable<S>,
{
    fn from(callable: &'a mut F) -> Self {
        Self::new(callable)
    }
}

impl<S: Signature> fmt::Debug for FunctionRef<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRef")
            .field("signature", &core::any::type_name::<S>())
            .field("target", &self.raw.as_ref().map(RawFunctionRef::target_ptr))
            .finish()
    }
}
