//! Positional `call` methods for every supported arity.
//!
//! [`FunctionRef::call_with`] and [`Function::call_with`] take the arguments
//! as a single tuple so that they work for any [`Signature`]. For a concrete
//! function-pointer signature the methods generated here accept the arguments
//! one by one instead, so `function.call(a, b)` reads like a normal call.
//!
//! [`Signature`]: crate::Signature

use crate::{Function, FunctionRef};

/// Generates `call` for [`FunctionRef`] and [`Function`] at one arity.
macro_rules! impl_call {
    ($($ty:ident => $arg:ident),*) => {
        impl<'a, R: 'static, $($ty: 'static),*> FunctionRef<'a, fn($($ty),*) -> R> {
            /// Invokes the bound callable with the given arguments.
            ///
            /// # Panics
            ///
            /// Panics if this reference is unbound.
            #[inline]
            #[track_caller]
            pub fn call(&mut self, $($arg: $ty),*) -> R {
                self.call_with(($($arg,)*))
            }
        }

        impl<R: 'static, $($ty: 'static,)* const CAPACITY: usize> Function<fn($($ty),*) -> R, CAPACITY> {
            /// Invokes the occupant with the given arguments.
            ///
            /// # Panics
            ///
            /// Panics if this function is empty.
            #[inline]
            #[track_caller]
            pub fn call(&mut self, $($arg: $ty),*) -> R {
                self.call_with(($($arg,)*))
            }
        }
    };
}

impl_call!();
impl_call!(A0 => a0);
impl_call!(A0 => a0, A1 => a1);
impl_call!(A0 => a0, A1 => a1, A2 => a2);
impl_call!(A0 => a0, A1 => a1, A2 => a2, A3 => a3);
impl_call!(A0 => a0, A1 => a1, A2 => a2, A3 => a3, A4 => a4);
impl_call!(A0 => a0, A1 => a1, A2 => a2, A3 => a3, A4 => a4, A5 => a5);
