use wrench::{Origin, Property};

use crate::fixtures::{args, server};

fn names(properties: Vec<Property>) -> Vec<String> {
    properties.iter().map(|p| p.name().to_string()).collect()
}

#[test]
fn access_log_is_most_recent_first_without_duplicates() {
    let factory = server();
    let s = factory.schema();
    let configuration = factory.create([args([("port", "9000")])]).unwrap();

    let inspector = configuration.inspector();
    configuration.get(s.port);
    configuration.get(s.host);
    configuration.get(s.port);
    assert_eq!(names(inspector.last_accessed()), ["port", "host"]);

    inspector.clear_last_accessed();
    assert!(inspector.last_accessed().is_empty());
    configuration.try_get(s.workers);
    assert_eq!(names(inspector.last_accessed()), ["workers"]);
}

#[test]
fn inspectors_only_see_reads_after_they_open() {
    let factory = server();
    let s = factory.schema();
    let configuration = factory.create([args([("port", "9000")])]).unwrap();

    let first = configuration.inspector();
    configuration.get(s.port);
    let second = configuration.inspector();
    configuration.get(s.host);

    assert_eq!(names(first.last_accessed()), ["host", "port"]);
    assert_eq!(names(second.last_accessed()), ["host"]);
}

#[test]
fn inspectors_are_scoped_to_their_configuration() {
    let factory = server();
    let s = factory.schema();
    let a = factory.create([args([("port", "9000")])]).unwrap();
    let b = factory.create([args([("port", "9000")])]).unwrap();

    let inspector = a.inspector();
    b.get(s.port);
    assert!(inspector.last_accessed().is_empty());

    // Clones share the identity the log follows.
    a.clone().get(s.port);
    assert_eq!(names(inspector.last_accessed()), ["port"]);
}

#[test]
fn reads_on_other_threads_are_not_logged() {
    let factory = server();
    let s = factory.schema();
    let configuration = factory.create([args([("port", "9000")])]).unwrap();

    let inspector = configuration.inspector();
    std::thread::scope(|scope| {
        scope.spawn(|| {
            let remote = configuration.inspector();
            assert_eq!(configuration.get(s.port), 9000);
            assert_eq!(names(remote.last_accessed()), ["port"]);
        });
    });
    assert!(inspector.last_accessed().is_empty());
}

#[test]
fn sensitive_values_are_obfuscated() {
    let factory = server();
    let s = factory.schema();
    let configuration = factory
        .create([args([("port", "9000"), ("api-token", "key-0123456789abcdef")])])
        .unwrap();

    let inspector = configuration.inspector();
    assert_eq!(inspector.string_value_of(s.api_token), Some("key-0123456789abcdef"));
    assert_eq!(inspector.safe_value_of(s.api_token, "***").as_deref(), Some("key-***"));
    assert_eq!(inspector.safe_value_of(s.port, "***").as_deref(), Some("9000"));
    assert_eq!(inspector.safe_value_of(s.workers, "***"), None);
}

#[test]
fn properties_are_described() {
    let factory = server();
    let s = factory.schema();
    let configuration = factory.create([args([("port", "9000")])]).unwrap();
    let inspector = configuration.inspector();

    let names: Vec<_> = inspector.properties().keys().map(String::as_str).collect();
    assert_eq!(
        names,
        [
            "api-token",
            "host",
            "max-connections",
            "min-connections",
            "port",
            "verbose",
            "workers",
        ]
    );

    let host = inspector.property("host").unwrap();
    assert_eq!(host.field(), "host");
    assert_eq!(host.default_value_as_string(), Some("localhost"));
    assert_eq!(host.documentation(), "Host name to bind");
    assert!(!host.accepts_null());

    let workers = inspector.property("workers").unwrap();
    assert!(workers.accepts_null());
    assert!(!workers.has_default());

    let valued = inspector.valued_property(s.port).unwrap();
    assert_eq!(valued.origin(), Origin::Explicit);
    assert_eq!(valued.to_string(), "port -> '9000' (EXPLICIT from args)");

    // Inspection does not count as reading.
    assert!(inspector.last_accessed().is_empty());

    let sources: Vec<_> = inspector.sources().iter().map(|s| s.name()).collect();
    assert_eq!(sources, ["defaults", "args"]);
}
