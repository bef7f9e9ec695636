//! Call signatures and the callables that satisfy them.
//!
//! A call signature is named by a plain function-pointer type such as
//! `fn(i32, &'static str) -> bool`. The [`Signature`] trait turns that type
//! into an argument tuple and a return type, and [`Callable`] is implemented
//! for everything that can be invoked with that argument tuple.
//!
//! Passing the arguments as a single tuple lets the type-erased entry points
//! in this crate have one shape (`unsafe fn(NonNull<Erased>, S::Args) ->
//! S::Output`) regardless of arity.

use core::ptr::NonNull;

use crate::util::Erased;

/// Private module used to seal [`Signature`].
mod sealed {
    /// Only function-pointer types implement this.
    pub trait Sealed {}
}

/// A call signature: an ordered list of argument types and one return type.
///
/// Implemented for the function-pointer types `fn() -> R` up to
/// `fn(A0, A1, A2, A3, A4, A5) -> R`. The trait is sealed.
///
/// Signatures are `'static`, so arguments that are references must name a
/// concrete lifetime (`fn(&'static str)`) rather than a higher-ranked one
/// (`for<'x> fn(&'x str)`).
///
/// # Examples
///
/// ```
/// use fnslot_internals::Signature;
///
/// fn output_size<S: Signature>() -> usize {
///     core::mem::size_of::<S::Output>()
/// }
///
/// assert_eq!(output_size::<fn(u8, u16) -> u32>(), 4);
/// assert_eq!(output_size::<fn()>(), 0);
/// ```
pub trait Signature: sealed::Sealed + 'static {
    /// The arguments of the signature, as a tuple.
    type Args;
    /// The return type of the signature.
    type Output;
}

/// A value that can be invoked with the arguments of the signature `S`.
///
/// Every `FnMut` closure, function item and function pointer with a matching
/// parameter list implements this trait through a blanket implementation.
/// Function-object types that are not closures can implement it directly.
///
/// # Examples
///
/// ```
/// use fnslot_internals::Callable;
///
/// struct Accumulator {
///     total: i32,
/// }
///
/// impl Callable<fn(i32) -> i32> for Accumulator {
///     fn call_with(&mut self, (n,): (i32,)) -> i32 {
///         self.total += n;
///         self.total
///     }
/// }
///
/// let mut acc = Accumulator { total: 10 };
/// assert_eq!(acc.call_with((5,)), 15);
/// ```
pub trait Callable<S: Signature> {
    /// Invokes the callable with the given argument tuple.
    fn call_with(&mut self, args: S::Args) -> S::Output;
}

/// Implements [`Signature`] and the blanket [`Callable`] for one arity.
macro_rules! impl_signature {
    ($($ty:ident => $arg:ident),*) => {
        impl<R: 'static, $($ty: 'static),*> sealed::Sealed for fn($($ty),*) -> R {}

        impl<R: 'static, $($ty: 'static),*> Signature for fn($($ty),*) -> R {
            type Args = ($($ty,)*);
            type Output = R;
        }

        impl<Func, R: 'static, $($ty: 'static),*> Callable<fn($($ty),*) -> R> for Func
        where
            Func: FnMut($($ty),*) -> R,
        {
            #[inline]
            fn call_with(&mut self, ($($arg,)*): ($($ty,)*)) -> R {
                self($($arg),*)
            }
        }
    };
}

impl_signature!();
impl_signature!(A0 => a0);
impl_signature!(A0 => a0, A1 => a1);
impl_signature!(A0 => a0, A1 => a1, A2 => a2);
impl_signature!(A0 => a0, A1 => a1, A2 => a2, A3 => a3);
impl_signature!(A0 => a0, A1 => a1, A2 => a2, A3 => a3, A4 => a4);
impl_signature!(A0 => a0, A1 => a1, A2 => a2, A3 => a3, A4 => a4, A5 => a5);

/// Type-erased invocation entry point shared by
/// [`RawFunctionRef`](crate::RawFunctionRef) and
/// [`RawFunction`](crate::RawFunction).
pub(crate) type InvokeFn<S> =
    unsafe fn(NonNull<Erased>, <S as Signature>::Args) -> <S as Signature>::Output;

/// Invokes the callable of type `F` that `target` points to.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `target` points to an initialized, properly aligned value of type `F`.
/// 2. No other reference to that value is alive for the duration of the call.
pub(crate) unsafe fn invoke<S: Signature, F: Callable<S>>(
    target: NonNull<Erased>,
    args: S::Args,
) -> S::Output {
    let mut target: NonNull<F> = target.cast::<F>();
    // SAFETY:
    // 1. The pointee is an initialized `F` (guaranteed by the caller)
    // 2. The access is exclusive (guaranteed by the caller)
    let callable: &mut F = unsafe { target.as_mut() };
    callable.call_with(args)
}
