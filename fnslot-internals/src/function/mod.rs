//! Module containing the owning, fixed-capacity callable

mod raw;
mod storage;
mod vtable;

pub use self::{raw::RawFunction, storage::MAX_ALIGN};
