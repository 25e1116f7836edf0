use std::io::Write;

use tempfile::NamedTempFile;
use wrench::layers::cli::COMMAND_LINE_SOURCE;
use wrench::layers::env::{EnvConfig, MockEnv, env_source};
use wrench::layers::properties::properties_source;
use wrench::{CommandLineError, Source};

use crate::fixtures::server;

fn create_temp_properties(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".properties").unwrap();
    write!(file, "{}", content).unwrap();
    file
}

#[test]
fn properties_text_resolves() {
    let factory = server();
    let s = factory.schema();
    let source = properties_source(
        "server.properties",
        "# listening\nport = 9000\nhost: example.org\nverbose true\n",
    );

    let configuration = factory.create([source]).unwrap();
    assert_eq!(configuration.get(s.port), 9000);
    assert_eq!(configuration.get(s.host), "example.org");
    assert!(configuration.get(s.verbose));
}

#[test]
fn command_line_arguments_override_their_files() {
    let factory = server();
    let s = factory.schema();
    let first_file = create_temp_properties("port=8000\nhost=first.example.org\n");
    let second_file = create_temp_properties("host=second.example.org\nworkers=2\n");
    let first = first_file.path().to_str().unwrap();
    let second = second_file.path().to_str().unwrap();

    let configuration = factory
        .create_from_command_line([
            "--configuration-files",
            first,
            second,
            "--port",
            "9100",
            "--",
            "--port",
            "1",
        ])
        .unwrap();

    assert_eq!(configuration.get(s.port), 9100);
    assert_eq!(configuration.get(s.host), "second.example.org");
    assert_eq!(configuration.get(s.workers), Some(2));

    let inspector = configuration.inspector();
    assert_eq!(inspector.source_of(s.port).map(Source::name), Some(COMMAND_LINE_SOURCE));
    assert_eq!(inspector.source_of(s.host).map(Source::name), Some(second));
}

#[test]
fn command_line_failures_keep_their_kind() {
    let factory = server();

    let error = factory.create_from_command_line(["--port"]).unwrap_err();
    assert!(matches!(error, CommandLineError::Source(_)));

    let error = factory
        .create_from_command_line(["--port", "9000", "--prot", "1"])
        .unwrap_err();
    let CommandLineError::Configuration(error) = error else {
        panic!("expected a configuration error, got {error}");
    };
    assert_eq!(
        error.bads()[0].message(),
        "Unknown property name 'prot' from command line"
    );
}

#[test]
fn environment_variables_resolve() {
    let factory = server();
    let s = factory.schema();
    let env = MockEnv::from_pairs([
        ("SRV__PORT", "9300"),
        ("SRV__MAX_CONNECTIONS", "50"),
        ("SRV__UNRELATED", "ignored"),
        ("PORT", "1"),
    ]);

    let source = env_source(factory.registry(), &EnvConfig::new("SRV"), &env);
    let configuration = factory.create([source]).unwrap();

    assert_eq!(configuration.get(s.port), 9300);
    assert_eq!(configuration.get(s.max_connections), 50);
    assert_eq!(
        configuration.inspector().source_of(s.port).map(Source::name),
        Some("environment")
    );
}

#[test]
fn strict_environment_reports_typos() {
    let factory = server();
    let mut env = MockEnv::new();
    env.set("SRV__PORT", "9300");
    env.set("SRV__PROT", "9300");

    let source = env_source(factory.registry(), &EnvConfig::new("SRV").strict(), &env);
    let error = factory.create([source]).unwrap_err();

    assert_eq!(
        error.bads()[0].message(),
        "Unknown property name 'SRV__PROT' from environment"
    );
}
