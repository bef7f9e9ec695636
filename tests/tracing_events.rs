//! Tests for the diagnostics emitted through `tracing`.
//!
//! A capturing layer on top of the `tracing-subscriber` registry records every
//! event together with its fields, so the tests can assert on what an
//! operator would see in the logs.

use std::{
    collections::HashMap,
    fmt,
    panic,
    sync::{Arc, Mutex},
};

use fnslot::{Function, FunctionRef};
use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{Layer, layer::Context, layer::SubscriberExt};

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: Level,
    fields: HashMap<&'static str, String>,
}

impl CapturedEvent {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

struct FieldVisitor<'a> {
    fields: &'a mut HashMap<&'static str, String>,
}

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields.insert(field.name(), value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.fields.insert(field.name(), format!("{value:?}"));
    }
}

#[derive(Clone, Default)]
struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CaptureLayer {
    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        event.record(&mut FieldVisitor {
            fields: &mut fields,
        });
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields,
        });
    }
}

/// Runs `f` with a capturing subscriber installed on the current thread.
fn capture<R>(f: impl FnOnce() -> R) -> (R, Vec<CapturedEvent>) {
    let layer = CaptureLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, layer.events())
}

#[test]
fn test_unbound_invocation_emits_error_event() {
    let (result, events) = capture(|| {
        let mut function = Function::<fn(i32) -> i32, 16>::empty();
        panic::catch_unwind(panic::AssertUnwindSafe(|| function.call(1)))
    });

    let payload = result.unwrap_err();
    let message = payload
        .downcast_ref::<String>()
        .expect("panic payload is a formatted message");
    assert!(message.starts_with("invoked an unbound Function with signature"));

    let error = events
        .iter()
        .find(|event| event.level == Level::ERROR)
        .expect("an error event was emitted");
    assert_eq!(error.field("wrapper"), Some("Function"));
    assert_eq!(error.field("signature"), Some("fn(i32) -> i32"));
    assert!(error.field("location").unwrap().contains("tracing_events.rs"));
    assert_eq!(
        error.field("message"),
        Some("invoked a callable wrapper with nothing bound")
    );
}

#[test]
fn test_unbound_function_ref_emits_error_event() {
    let (result, events) = capture(|| {
        let mut function_ref = FunctionRef::<fn()>::empty();
        panic::catch_unwind(panic::AssertUnwindSafe(|| function_ref.call()))
    });

    assert!(result.is_err());
    let errors: Vec<_> = events
        .iter()
        .filter(|event| event.level == Level::ERROR)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field("wrapper"), Some("FunctionRef"));
}

#[test]
fn test_rejected_callable_emits_debug_event() {
    let (rejected, events) = capture(|| {
        let payload = [0u8; 64];
        Function::<fn() -> u8, 16>::try_new(move || payload[0]).is_err()
    });
    assert!(rejected);

    let debug = events
        .iter()
        .find(|event| event.level == Level::DEBUG)
        .expect("a debug event was emitted");
    assert_eq!(debug.field("capacity"), Some("16"));
    assert_eq!(debug.field("size"), Some("64"));
    assert_eq!(debug.field("message"), Some("callable does not fit"));
}

#[test]
fn test_binding_and_clearing_emit_trace_events() {
    let ((), events) = capture(|| {
        let mut function = Function::<fn(u8) -> u8, 16>::new(|n: u8| n);
        function.clear();
    });

    let messages: Vec<_> = events
        .iter()
        .filter(|event| event.level == Level::TRACE)
        .filter_map(|event| event.field("message"))
        .collect();
    assert_eq!(messages, ["bound callable", "dropping callable"]);
}

#[test]
fn test_successful_calls_are_silent() {
    let (output, events) = capture(|| {
        let mut double = |n: u32| n * 2;
        let mut function_ref = FunctionRef::<fn(u32) -> u32>::new(&mut double);
        let before = function_ref.call(1);
        (before, function_ref.call(2))
    });

    assert_eq!(output, (2, 4));
    assert!(!events.is_empty());
    assert!(events.iter().all(|event| event.level == Level::TRACE));
}

#[test]
fn test_dropping_bound_function_emits_trace_event() {
    let ((), events) = capture(|| {
        let _function = Function::<fn(u8) -> u8, 16>::new(|n: u8| n + 1);
    });

    let dropped: Vec<_> = events
        .iter()
        .filter(|event| event.field("message") == Some("dropping callable"))
        .collect();
    assert_eq!(dropped.len(), 1);
    assert_eq!(dropped[0].field("capacity"), Some("16"));

    // Dropping an empty function and a moved-from source stays silent
    let ((), events) = capture(|| {
        let _empty = Function::<fn(u8) -> u8, 16>::empty();
        let mut source = Function::<fn(u8) -> u8, 16>::new(|n: u8| n);
        let _target = source.take();
    });
    let dropped = events
        .iter()
        .filter(|event| event.field("message") == Some("dropping callable"))
        .count();
    assert_eq!(dropped, 1);
}

#[test]
fn test_rebinding_reports_previous_and_new_occupant() {
    fn first(n: u8) -> u8 {
        n
    }

    let (mut function, events) = capture(|| {
        let mut function = Function::<fn(u8) -> u8, 16>::new(first);
        function.set(|n: u8| n * 2);
        let payload = [0u8; 32];
        assert!(function.try_set(move |n: u8| n + payload[0]).is_err());
        function
    });

    // The rejected callable left the previous occupant in place
    assert_eq!(function.call(4), 8);

    let messages: Vec<_> = events
        .iter()
        .filter_map(|event| event.field("message"))
        .collect();
    assert_eq!(
        messages,
        [
            "bound callable",
            "dropping callable",
            "bound callable",
            "callable does not fit",
        ]
    );

    let rejected = events
        .iter()
        .find(|event| event.level == Level::DEBUG)
        .expect("the rejection was reported");
    assert_eq!(rejected.field("size"), Some("32"));
    assert_eq!(rejected.field("align"), Some("1"));
}
