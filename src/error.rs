//! Errors reported by the callable wrappers.
//!
//! There are exactly two ways binding or invoking a wrapper can go wrong:
//!
//! - The callable is too large (or too strictly aligned) for the buffer of a
//!   [`Function`]. [`Function::new`] and [`Function::set`] reject this at
//!   compile time; [`Function::try_new`] and [`Function::try_set`] reject it
//!   at runtime with a [`CapacityError`] that hands the callable back.
//! - A wrapper with nothing bound is invoked. There is no value that could be
//!   returned instead, so this is a fatal contract violation: it emits a
//!   [`tracing`] error event and panics.
//!
//! Errors produced by the bound callable itself are never touched: the
//! wrappers return whatever the callable returns and unwind whenever the
//! callable unwinds.
//!
//! [`Function`]: crate::Function
//! [`Function::new`]: crate::Function::new
//! [`Function::set`]: crate::Function::set
//! [`Function::try_new`]: crate::Function::try_new
//! [`Function::try_set`]: crate::Function::try_set

use crate::MAX_ALIGN;

/// Error returned when a callable does not fit in the buffer of a
/// [`Function`](crate::Function).
///
/// Contains the callable that was attempted to be bound, allowing you to
/// recover it with [`into_inner`](Self::into_inner).
///
/// # Examples
///
/// ```
/// use fnslot::Function;
///
/// let table = [7u64; 8];
/// let lookup = move |i: usize| table[i];
///
/// let error = Function::<fn(usize) -> u64, 16>::try_new(lookup).unwrap_err();
/// assert_eq!(error.size(), 64);
/// assert_eq!(error.capacity(), 16);
///
/// // The callable is handed back untouched
/// let lookup = error.into_inner();
/// assert_eq!(lookup(3), 7);
/// ```
pub struct CapacityError<F> {
    /// The rejected callable
    callable: F,
    /// Capacity in bytes of the buffer that rejected it
    capacity: usize,
}

impl<F> CapacityError<F> {
    /// Creates a new [`CapacityError`] for a buffer of `capacity` bytes.
    #[inline]
    pub(crate) fn new(callable: F, capacity: usize) -> Self {
        Self { callable, capacity }
    }

    /// Returns the callable that could not be bound.
    #[inline]
    pub fn into_inner(self) -> F {
        self.callable
    }

    /// Size in bytes of the rejected callable.
    #[inline]
    pub const fn size(&self) -> usize {
        core::mem::size_of::<F>()
    }

    /// Alignment in bytes of the rejected callable.
    #[inline]
    pub const fn align(&self) -> usize {
        core::mem::align_of::<F>()
    }

    /// Capacity in bytes of the buffer that rejected the callable.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<F> core::fmt::Debug for CapacityError<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CapacityError")
            .field("type_name", &core::any::type_name::<F>())
            .field("size", &self.size())
            .field("align", &self.align())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<F> core::fmt::Display for CapacityError<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "callable of type `{}` needs {} bytes aligned to {}, but the buffer holds {} bytes aligned to {}",
            core::any::type_name::<F>(),
            self.size(),
            self.align(),
            self.capacity,
            MAX_ALIGN,
        )
    }
}

impl<F> core::error::Error for CapacityError<F> {}

/// Reports an invocation of a wrapper that has nothing bound and panics.
///
/// `wrapper` is the name of the wrapper type and `S` its signature.
#[cold]
#[inline(never)]
#[track_caller]
pub(crate) fn unbound_invocation<S>(wrapper: &'static str) -> ! {
    let signature = core::any::type_name::<S>();
    let location = core::panic::Location::caller();
    tracing::error!(
        wrapper,
        signature,
        %location,
        "invoked a callable wrapper with nothing bound"
    );
    panic!("invoked an unbound {wrapper} with signature `{signature}`")
}
