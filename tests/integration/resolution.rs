use wrench::{Origin, Slot, Source, Value};

use crate::fixtures::{args, server};

#[test]
fn later_sources_override_earlier_ones() {
    let factory = server();
    let s = factory.schema();
    let file = Source::stringified("file", [("port", "8000"), ("host", "file.example.org")]);
    let cli = Source::stringified("cli", [("port", "9000")]);

    let configuration = factory.create([file, cli]).unwrap();

    assert_eq!(configuration.get(s.port), 9000);
    assert_eq!(configuration.get(s.host), "file.example.org");

    let inspector = configuration.inspector();
    assert_eq!(inspector.source_of(s.port).map(Source::name), Some("cli"));
    assert_eq!(inspector.source_of(s.host).map(Source::name), Some("file"));
    assert_eq!(inspector.string_value_of(s.port), Some("9000"));
}

#[test]
fn defaults_fill_what_no_source_sets() {
    let factory = server();
    let s = factory.schema();
    let configuration = factory.create([args([("port", "9000")])]).unwrap();

    assert_eq!(configuration.get(s.host), "localhost");
    assert_eq!(configuration.get(s.min_connections), 1);
    assert!(!configuration.get(s.verbose));

    let inspector = configuration.inspector();
    assert!(inspector.using_default(s.host));
    assert_eq!(inspector.origin(s.host), Some(Origin::Builtin));
    assert_eq!(inspector.origin(s.port), Some(Origin::Explicit));
    assert_eq!(
        inspector.source_of(s.host).map(Source::name),
        Some(wrench::DEFAULTS_SOURCE)
    );
}

#[test]
fn unknown_keys_are_reported_from_every_source() {
    let factory = server();
    let error = factory
        .create([
            Source::stringified("a", [("prot", "1")]),
            Source::stringified("b", [("port", "9000"), ("hots", "x")]),
        ])
        .unwrap_err();

    assert!(error.is_declaration());
    let messages: Vec<_> = error.bads().iter().map(|bad| bad.message()).collect();
    assert_eq!(
        messages,
        [
            "Unknown property name 'prot' from a",
            "Unknown property name 'hots' from b",
        ]
    );
    assert_eq!(error.bads()[0].sources()[0].name(), "a");
}

#[test]
fn every_failed_conversion_is_reported() {
    let factory = server();
    let error = factory
        .create([args([("port", "abc"), ("min-connections", "-1")])])
        .unwrap_err();

    let messages: Vec<_> = error.bads().iter().map(|bad| bad.message()).collect();
    assert_eq!(messages.len(), 2);
    assert_eq!(
        messages[0],
        "Conversion failed on property 'port' from args: u16: invalid digit found in string"
    );
    assert!(messages[1].starts_with("Conversion failed on property 'min-connections' from args: u32:"));
}

#[test]
fn failed_conversion_implicates_the_value_it_would_replace() {
    let factory = server();
    let error = factory
        .create([
            args([("port", "9000")]),
            Source::stringified("override", [("port", "abc")]),
        ])
        .unwrap_err();

    let bad = &error.bads()[0];
    assert!(bad.to_string().starts_with("[ port ] Conversion failed on property 'port' from override"));
    assert_eq!(bad.properties().len(), 1);
    assert_eq!(bad.properties()[0].display_value(), "9000");
    assert_eq!(bad.properties()[0].source().name(), "args");
    let sources: Vec<_> = bad.sources().iter().map(|source| source.name()).collect();
    assert_eq!(sources, ["override"]);
}

#[test]
fn missing_values_are_checked_only_after_keys_and_conversions() {
    let factory = server();

    let error = factory.create(Vec::new()).unwrap_err();
    assert_eq!(error.to_string(), "could not create Server:\n    [ port ] No value set");

    // The unknown key stops resolution before the missing port is noticed.
    let error = factory.create([args([("hots", "x")])]).unwrap_err();
    assert_eq!(error.bads().len(), 1);
    assert_eq!(error.bads()[0].message(), "Unknown property name 'hots' from args");
}

#[test]
fn null_and_absent_stay_distinct() {
    let factory = server();
    let s = factory.schema();

    let configuration = factory.create([args([("port", "9000")])]).unwrap();
    assert_eq!(configuration.get(s.workers), None);
    assert_eq!(configuration.inspector().origin(s.workers), Some(Origin::Builtin));

    let explicit = Source::stringified("args", [("port", Some("9000")), ("workers", None)]);
    let configuration = factory.create([explicit]).unwrap();
    assert_eq!(configuration.get(s.workers), None);
    assert_eq!(configuration.inspector().origin(s.workers), Some(Origin::Explicit));

    let configuration = factory.create([args([("port", "9000"), ("workers", "")])]).unwrap();
    assert_eq!(configuration.get(s.workers), None);

    let configuration = factory.create([args([("port", "9000"), ("workers", "6")])]).unwrap();
    assert_eq!(configuration.get(s.workers), Some(6));
}

#[test]
fn null_is_rejected_where_the_type_cannot_hold_it() {
    let factory = server();
    let error = factory
        .create([Source::stringified("args", [("port", None::<&str>)])])
        .unwrap_err();

    assert_eq!(
        error.bads()[0].message(),
        "Null value for property 'port' from args, which does not accept null"
    );
}

#[test]
fn raw_sources_are_type_checked() {
    let factory = server();
    let s = factory.schema();

    let raw = Source::raw("raw")
        .set(s.port, 9000)
        .insert(s.workers.key(), Value::new(4u32))
        .build();
    let configuration = factory.create([raw]).unwrap();
    assert_eq!(configuration.get(s.port), 9000);
    assert_eq!(configuration.get(s.workers), Some(4));
    assert_eq!(configuration.inspector().string_value_of(s.port), Some("9000"));

    let raw = Source::raw("raw")
        .insert(s.port.key(), Value::new("high".to_string()))
        .build();
    let error = factory.create([raw]).unwrap_err();
    let message = error.bads()[0].message();
    assert!(message.starts_with("Can't use 'high' of type "), "{message}");
    assert!(message.ends_with("as a value for property 'port' of type u16 from raw"), "{message}");
}

#[test]
fn raw_none_is_an_explicit_null() {
    let factory = server();
    let s = factory.schema();

    let raw = Source::raw("raw")
        .set(s.port, 9000)
        .insert(s.workers.key(), Value::new(None::<u32>))
        .build();
    let configuration = factory.create([raw]).unwrap();
    let inspector = configuration.inspector();

    assert_eq!(configuration.get(s.workers), None);
    assert_eq!(inspector.string_value_of(s.workers), None);
    assert_eq!(inspector.origin(s.workers), Some(Origin::Explicit));
    assert_eq!(
        inspector.valued_property(s.workers).map(|valued| valued.slot()),
        Some(&Slot::ExplicitNull)
    );
}

#[test]
fn configurations_compare_by_values_and_provenance() {
    let factory = server();
    let a = factory.create([args([("port", "9000")])]).unwrap();
    let b = factory.create([args([("port", "9000")])]).unwrap();
    let c = factory.create([args([("port", "9001")])]).unwrap();
    let d = factory
        .create([Source::stringified("other", [("port", "9000")])])
        .unwrap();

    assert_eq!(a, b);
    assert_eq!(a, a.clone());
    assert_ne!(a, c);
    assert_ne!(a, d);
}

#[test]
fn display_lists_values_sorted_by_name() {
    let factory = server();
    let configuration = factory
        .create([args([("port", "9000"), ("workers", "4")])])
        .unwrap();

    assert_eq!(
        configuration.to_string(),
        "Server{api-token=null; host=localhost; max-connections=10; min-connections=1; \
         port=9000; verbose=false; workers=4}"
    );
}

/// A schema whose default cannot be converted.
struct Misdeclared {
    #[allow(dead_code)]
    retries: wrench::Accessor<u8>,
}

impl wrench::Schema for Misdeclared {
    const NAME: &'static str = "Misdeclared";

    fn declare(t: &mut wrench::Template<Self>) -> Self {
        Misdeclared {
            retries: t.field("retries").default_literal("lots").finish(),
        }
    }
}

#[test]
fn bad_defaults_fail_before_any_configuration_exists() {
    let error = wrench::Factory::<Misdeclared>::new().unwrap_err();
    assert_eq!(error.problems.len(), 1);
    assert_eq!(error.problems[0].code(), "definition::invalid_default");
    assert!(error.to_string().contains("lots"), "{error}");
}
