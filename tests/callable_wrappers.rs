//! Integration tests for the public callable wrappers.
//!
//! ## Binding
//! - `test_default_constructed_wrappers_are_unbound`
//! - `test_bind_then_invoke_matches_direct_call`
//! - `test_function_object_in_both_wrappers`
//!
//! ## Ownership
//! - `test_owned_state_is_independent_of_original`: counter bound at 73, then
//!   74, original reset and out of scope, then 75
//! - `test_move_invalidates_source`
//! - `test_oversized_callables_are_rejected`
//! - `test_rebinding_drops_previous_occupant`
//!
//! ## Errors
//! - `test_errors_from_callable_are_returned_unchanged`
//! - `test_panics_from_callable_unwind_through_wrapper`
//! - `test_unbound_function_ref_is_fatal`
//! - `test_moved_from_function_is_fatal`

use std::{panic, rc::Rc};

use fnslot::{Callable, Function, FunctionRef, MAX_ALIGN};

type IntFn = fn(i32) -> i32;

fn free_function(n: i32) -> i32 {
    n + 1
}

#[derive(Clone)]
struct Counter {
    state: i32,
}

impl Callable<IntFn> for Counter {
    fn call_with(&mut self, (n,): (i32,)) -> i32 {
        self.state += n;
        self.state
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
enum ParseError {
    #[error("input was empty")]
    Empty,
    #[error("invalid digit {0:?}")]
    InvalidDigit(char),
}

type ParseFn = fn(&'static str) -> Result<u32, ParseError>;

fn parse_digits(input: &'static str) -> Result<u32, ParseError> {
    if input.is_empty() {
        return Err(ParseError::Empty);
    }
    input.chars().try_fold(0u32, |total, c| -> Result<u32, ParseError> {
        let digit = c.to_digit(10).ok_or(ParseError::InvalidDigit(c))?;
        Ok(total * 10 + digit)
    })
}

#[test]
fn test_default_constructed_wrappers_are_unbound() {
    assert!(!FunctionRef::<IntFn>::default().is_bound());
    assert!(!Function::<IntFn, 32>::default().is_bound());
    assert!(!Function::<fn(), 0>::default().is_bound());
}

#[test]
fn test_bind_then_invoke_matches_direct_call() {
    let mut function = free_function;
    let mut function_ref = FunctionRef::<IntFn>::new(&mut function);
    assert_eq!(function_ref.call(41), free_function(41));

    let mut owned = Function::<IntFn, 16>::new(free_function);
    assert_eq!(owned.call(41), free_function(41));

    let offset = 100;
    let closure = move |n: i32| n - offset;
    let mut owned = Function::<IntFn, 16>::new(closure);
    assert_eq!(owned.call(1), closure(1));
}

#[test]
fn test_function_object_in_both_wrappers() {
    let mut counter = Counter { state: 0 };
    {
        let mut function_ref = FunctionRef::<IntFn>::from(&mut counter);
        assert_eq!(function_ref.call(5), 5);
    }
    assert_eq!(counter.state, 5);

    let mut owned = Function::<IntFn, 8>::new(counter.clone());
    assert_eq!(owned.call(5), 10);
    assert_eq!(counter.state, 5);
    assert_eq!(owned.occupant_type_name(), Some(std::any::type_name::<Counter>()));
}

#[test]
fn test_owned_state_is_independent_of_original() {
    let mut function = {
        let mut original = Counter { state: 73 };
        let mut function = Function::<IntFn, 128>::new(original.clone());

        assert_eq!(function.call(1), 74);

        // Mutating the original does not reach the bound copy
        assert_eq!(original.call_with((100,)), 173);
        original.state = 0;
        assert_eq!(original.call_with((0,)), 0);
        function
    };

    // The original has gone out of scope
    assert_eq!(function.call(1), 75);
}

#[test]
fn test_move_invalidates_source() {
    let mut function = free_function;
    let mut source_ref = FunctionRef::<IntFn>::new(&mut function);
    let mut target_ref = source_ref.take();
    assert!(!source_ref.is_bound());
    assert_eq!(target_ref.call(1), 2);

    let mut source = Function::<IntFn, 32>::new(Counter { state: 10 });
    let mut target = source.take();
    assert!(!source.is_bound());
    assert!(target.is_bound());
    assert_eq!(target.call(1), 11);

    let mut empty = Function::<IntFn, 32>::empty();
    let moved_empty = empty.take();
    assert!(!empty.is_bound());
    assert!(!moved_empty.is_bound());
}

#[test]
fn test_oversized_callables_are_rejected() {
    let bytes = [1u8; 33];
    let words = [1u64; 5];
    let wide = [0u128; 3];

    let mut function = Function::<IntFn, 32>::empty();
    assert!(function.try_set(move |n: i32| n + i32::from(bytes[0])).is_err());
    assert!(function.try_set(move |n: i32| n + words[4] as i32).is_err());
    assert!(function.try_set(move |n: i32| n + wide[2] as i32).is_err());
    assert!(!function.is_bound());

    #[repr(align(32))]
    struct OverAligned;
    impl Callable<IntFn> for OverAligned {
        fn call_with(&mut self, (n,): (i32,)) -> i32 {
            n
        }
    }
    assert!(std::mem::align_of::<OverAligned>() > MAX_ALIGN);
    assert!(!Function::<IntFn, 1024>::fits::<OverAligned>());
    let error = Function::<IntFn, 1024>::try_new(OverAligned).unwrap_err();
    assert_eq!(error.align(), 32);
}

#[test]
fn test_rebinding_drops_previous_occupant() {
    let tracker = Rc::new(());

    let token = Rc::clone(&tracker);
    let mut function = Function::<IntFn, 16>::new(move |n: i32| {
        let _ = &token;
        n
    });
    assert_eq!(Rc::strong_count(&tracker), 2);

    function.set(free_function);
    assert_eq!(Rc::strong_count(&tracker), 1);

    let token = Rc::clone(&tracker);
    let mut other = Function::<IntFn, 16>::new(move |n: i32| {
        let _ = &token;
        -n
    });
    function.swap(&mut other);
    assert_eq!(function.call(3), -3);
    assert_eq!(other.call(3), 4);

    drop(function);
    assert_eq!(Rc::strong_count(&tracker), 1);
}

#[test]
fn test_errors_from_callable_are_returned_unchanged() {
    fn parse_all(
        mut parse: FunctionRef<'_, ParseFn>,
        inputs: &[&'static str],
    ) -> Result<u32, ParseError> {
        let mut total = 0;
        for &input in inputs {
            total += parse.call(input)?;
        }
        Ok(total)
    }

    let mut parser = Function::<ParseFn, 8>::new(parse_digits);
    assert_eq!(parse_all(parser.as_function_ref(), &["12", "30"]), Ok(42));
    assert_eq!(
        parse_all(parser.as_function_ref(), &["12", "3x"]),
        Err(ParseError::InvalidDigit('x'))
    );

    let error = parser.call("").unwrap_err();
    assert_eq!(error.to_string(), "input was empty");
}

#[test]
fn test_panics_from_callable_unwind_through_wrapper() {
    let mut function = Function::<fn(u32) -> u32, 8>::new(|n: u32| {
        assert!(n < 10, "argument out of range");
        n
    });

    let result = panic::catch_unwind(panic::AssertUnwindSafe(|| function.call(11)));
    assert!(result.is_err());

    // The occupant stays bound after unwinding
    assert!(function.is_bound());
    assert_eq!(function.call(3), 3);
}

#[test]
#[should_panic(expected = "invoked an unbound FunctionRef")]
fn test_unbound_function_ref_is_fatal() {
    let mut function_ref = FunctionRef::<IntFn>::default();
    function_ref.call(1);
}

#[test]
#[should_panic(expected = "invoked an unbound Function")]
fn test_moved_from_function_is_fatal() {
    let mut source = Function::<IntFn, 16>::new(free_function);
    let _target = source.take();
    source.call(1);
}
