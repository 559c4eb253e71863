// tests/options_tests.rs
mod support;
use support::Record;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use encrypted_attrs::error::CoreError;
use encrypted_attrs::{FilterSpec, Host, ModelType, OptionSpec, OptionValue};
use serde_json::{json, Value};

static WIDGET: ModelType = ModelType::new("OptionsWidget", &["body_encrypted"]);

#[test]
fn test_literal_resolves_without_instance() {
    let spec: OptionSpec<Vec<u8>> = OptionSpec::literal("literal key");
    assert_eq!(spec.resolve("key", None).unwrap(), b"literal key");
    assert!(spec.is_literal());

    let flag: OptionSpec<bool> = OptionSpec::literal(false);
    assert!(!flag.resolve("if", None).unwrap());
}

#[test]
fn test_method_reference_resolves_on_instance() {
    let record = Record::new(&WIDGET)
        .with_method("secret_key", b"per-instance".as_slice())
        .with_method("text_key", "as text")
        .with_method("encrypt?", false);

    let key: OptionSpec<Vec<u8>> = OptionSpec::method("secret_key");
    assert_eq!(key.resolve("key", Some(record.as_host())).unwrap(), b"per-instance");

    // Text results are taken as their bytes
    let text: OptionSpec<Vec<u8>> = OptionSpec::method("text_key");
    assert_eq!(text.resolve("key", Some(record.as_host())).unwrap(), b"as text");

    let flag: OptionSpec<bool> = OptionSpec::method("encrypt?");
    assert!(!flag.resolve("if", Some(record.as_host())).unwrap());
}

#[test]
fn test_method_reference_errors() {
    let record = Record::new(&WIDGET).with_method("flag", true);

    let missing: OptionSpec<Vec<u8>> = OptionSpec::method("nope");
    assert!(matches!(
        missing.resolve("key", Some(record.as_host())),
        Err(CoreError::UnresolvedOption(_))
    ));
    assert!(matches!(
        missing.resolve("key", None),
        Err(CoreError::UnresolvedOption(_))
    ));

    let wrong_kind: OptionSpec<Vec<u8>> = OptionSpec::method("flag");
    assert!(matches!(
        wrong_kind.resolve("key", Some(record.as_host())),
        Err(CoreError::UnresolvedOption(_))
    ));
}

#[test]
fn test_callable_is_evaluated_on_every_resolve() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let spec: OptionSpec<Vec<u8>> = OptionSpec::callable(move |host: &dyn Host| {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        format!("{}-{n}", host.model().name).into_bytes()
    });

    let record = Record::new(&WIDGET);
    let first = spec.resolve("iv", Some(record.as_host())).unwrap();
    let second = spec.resolve("iv", Some(record.as_host())).unwrap();

    assert_eq!(first, b"OptionsWidget-0");
    assert_eq!(second, b"OptionsWidget-1");
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    assert!(matches!(
        spec.resolve("iv", None),
        Err(CoreError::UnresolvedOption(_))
    ));
}

#[test]
fn test_filters_by_method_and_callable() {
    let record = Record::new(&WIDGET);

    let upcase = FilterSpec::method("upcase");
    assert_eq!(
        upcase.apply("read_filter", &record, json!("shout")).unwrap(),
        json!("SHOUT")
    );

    let unknown = FilterSpec::method("reverse");
    assert!(matches!(
        unknown.apply("read_filter", &record, json!("x")),
        Err(CoreError::UnresolvedOption(_))
    ));

    let wrap = FilterSpec::callable(|_host: &dyn Host, value: Value| json!({ "wrapped": value }));
    assert_eq!(
        wrap.apply("write_filter", &record, json!(1)).unwrap(),
        json!({ "wrapped": 1 })
    );
}

#[test]
fn test_option_value_conversions() {
    assert_eq!(OptionValue::from("a"), OptionValue::Text("a".into()));
    assert_eq!(OptionValue::from(vec![1u8, 2]), OptionValue::Bytes(vec![1, 2]));
    assert_eq!(OptionValue::from(true), OptionValue::Flag(true));
}

#[test]
fn test_debug_output_hides_literals() {
    let spec: OptionSpec<Vec<u8>> = OptionSpec::literal("top secret key material 1234567");
    let printed = format!("{spec:?}");
    assert_eq!(printed, "Literal(..)");
    assert_eq!(
        format!("{:?}", OptionSpec::<bool>::method("ready")),
        "Method(\"ready\")"
    );
}
