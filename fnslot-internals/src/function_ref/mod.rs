//! Module containing the non-owning callable reference

mod raw;

pub use self::raw::RawFunctionRef;
