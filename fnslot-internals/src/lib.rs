#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`fnslot`].
//!
//! # Overview
//!
//! This crate contains the low-level, type-erased data structures and unsafe
//! operations that power the [`fnslot`] callable wrappers. It erases the
//! concrete type of a callable behind plain function pointers that are chosen
//! once, when the callable is bound, so that every later call is a single
//! indirect call.
//!
//! **This crate is an implementation detail.** No semantic versioning guarantees
//! are provided. Users should depend on the [`fnslot`] crate, not this one.
//!
//! # Architecture
//!
//! - **[`signature`]**: Call signatures and callables
//!   - [`Signature`]: Sealed trait turning `fn(A0, ..) -> R` into an argument
//!     tuple and an output type
//!   - [`Callable`]: Anything invocable with a signature's argument tuple
//!
//! - **[`function_ref`]**: Non-owning erasure
//!   - [`RawFunctionRef`]: A mutable borrow of a callable, two machine words
//!
//! - **[`function`]**: Owning erasure into a fixed inline buffer
//!   - [`RawFunction`]: Buffer of `CAPACITY` bytes plus an optional vtable
//!   - [`FunctionVtable`]: Function pointers for invoke, relocate and drop
//!
//! # Safety Strategy
//!
//! When we erase a callable `F` to a `NonNull<Erased>`, the function pointers
//! stored next to that pointer must still match the actual concrete type in
//! memory.
//!
//! This crate maintains safety through:
//!
//! - **Module-based encapsulation**: Safety-critical types keep fields
//!   module-private, making invariants locally verifiable within a single file
//! - **Compile-time vtables**: Every vtable is a `&'static` constant created
//!   for exactly one occupant type
//! - **Documented vtable contracts**: Each vtable method specifies exactly when
//!   it can be safely called
//!
//! [`fnslot`]: https://docs.rs/fnslot/latest/fnslot/
//! [`FunctionVtable`]: function::vtable::FunctionVtable

mod function;
mod function_ref;
pub mod signature;
mod util;

pub use function::{MAX_ALIGN, RawFunction};
pub use function_ref::RawFunctionRef;
pub use signature::{Callable, Signature};
