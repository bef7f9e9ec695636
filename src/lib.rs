#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Extra checks on nightly
#![cfg_attr(nightly_extra_checks, feature(rustdoc_missing_doc_code_examples))]
#![cfg_attr(nightly_extra_checks, forbid(rustdoc::missing_doc_code_examples))]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Allocation-free callable wrappers for `no_std` code.
//!
//! ## Overview
//!
//! This crate lets you store "something that can be called with these
//! arguments and returns this type" without naming the concrete closure type
//! and without ever touching the heap. There are two wrappers:
//!
//! - [`FunctionRef`] borrows a callable. It is two machine words, never copies
//!   the callable and never outlives it.
//! - [`Function`] owns a callable, stored inline in a buffer of a fixed number
//!   of bytes chosen at compile time.
//!
//! Both are parameterized by a call signature written as a function-pointer
//! type, e.g. `fn(u32, &'static str) -> bool`. Any closure, function item,
//! function pointer or type implementing [`Callable`] with a matching
//! parameter list can be bound.
//!
//! ## Quick Example
//!
//! ```
//! use fnslot::{Function, FunctionRef};
//!
//! // Borrow a closure for the duration of a call
//! fn apply_twice(mut f: FunctionRef<'_, fn(i32) -> i32>, value: i32) -> i32 {
//!     let once = f.call(value);
//!     f.call(once)
//! }
//!
//! let mut double = |n: i32| n * 2;
//! assert_eq!(apply_twice(FunctionRef::new(&mut double), 3), 12);
//!
//! // Own a stateful closure in 16 bytes of inline storage
//! let mut state = 73;
//! let mut counter = Function::<fn(i32) -> i32, 16>::new(move |n: i32| {
//!     state += n;
//!     state
//! });
//! assert_eq!(counter.call(1), 74);
//! assert_eq!(counter.call(1), 75);
//! ```
//!
//! ## Core Concepts
//!
//! **Signatures.** A [`Signature`] is a function-pointer type with up to six
//! parameters. Closures passed to the wrappers need annotated parameter
//! types (`|n: i32| ...`), since the signature only reaches the closure
//! through the [`Callable`] bound.
//!
//! **Binding.** A wrapper is either *bound* to a callable or *unbound*. Both
//! wrappers start unbound by default, and moving out of one with `take`
//! leaves it unbound. Invoking an unbound wrapper is a contract violation:
//! it emits a [`tracing`] error event and then panics.
//!
//! **Capacity.** A [`Function<S, CAPACITY>`] accepts any callable that is at
//! most `CAPACITY` bytes large and at most [`MAX_ALIGN`] bytes aligned.
//! [`Function::new`] and [`Function::set`] check this at compile time;
//! [`Function::try_new`] and [`Function::try_set`] check it at runtime and
//! return a [`CapacityError`] holding the rejected callable.
//!
//! **Durations.** [`Duration`] is a saturating time interval for code that
//! passes timeouts around, with conversions to `timespec`/`timeval` pairs,
//! `itimerspec` intervals and [`core::time::Duration`].
//!
//! ## Threading
//!
//! Neither wrapper is [`Send`] or [`Sync`], as the erased callable might not
//! be. Move them between threads only by binding the callable on the thread
//! that uses it.
//!
//! ## Feature flags
//!
//! - `std`: Enables `Duration::to_timespec_from` and forwards `std` to
//!   [`tracing`]. Off by default; the crate is `no_std` and never allocates.
//!
//! ## Architecture
//!
//! The type-erased storage and dispatch live in the `fnslot-internals`
//! crate, which keeps every `unsafe` block behind a small set of types with
//! module-private fields. This crate adds the public API on top of it.

#[cfg(feature = "std")]
extern crate std;

mod call;
mod duration;
mod error;
mod function;
mod function_ref;

#[cfg(feature = "std")]
pub use self::duration::TimeSpecReference;
pub use self::{
    duration::{Duration, ITimerSpec, TimeSpec, TimeVal},
    error::CapacityError,
    function::Function,
    function_ref::FunctionRef,
};
pub use fnslot_internals::{Callable, MAX_ALIGN, Signature};
