use wrench::{Accessor, Accumulator, Bad, Configuration, Factory, Schema, Source, Template};

use crate::fixtures::{args, server};

#[test]
fn failed_rules_name_the_properties_they_read() {
    let factory = server();
    let error = factory
        .create([args([("port", "9000"), ("min-connections", "20")])])
        .unwrap_err();

    assert!(error.is_validation());
    let bads = error.bads();
    assert_eq!(bads.len(), 1);
    assert_eq!(
        bads[0].to_string(),
        "[ max-connections, min-connections ] min-connections must not exceed max-connections"
    );
    let sources: Vec<_> = bads[0].sources().iter().map(Source::name).collect();
    assert_eq!(sources, ["defaults", "args"]);

    assert_eq!(
        error.to_string(),
        "Server failed validation:\n    \
         [ max-connections, min-connections ] min-connections must not exceed max-connections\n        \
         max-connections -> '10' from defaults\n        \
         min-connections -> '20' from args"
    );
}

#[test]
fn every_failed_rule_is_reported() {
    let factory = server();
    let error = factory
        .create([args([("port", "80"), ("max-connections", "0")])])
        .unwrap_err();

    let messages: Vec<_> = error.bads().iter().map(ToString::to_string).collect();
    assert_eq!(
        messages,
        [
            "[ max-connections, min-connections ] min-connections must not exceed max-connections",
            "[ port ] port must not be privileged",
        ]
    );
}

/// Rules that do not read properties, and a repeated rule.
struct Rules {
    name: Accessor<String>,
}

impl Schema for Rules {
    const NAME: &'static str = "Rules";

    fn declare(t: &mut Template<Self>) -> Self {
        Rules {
            name: t.field("name").finish(),
        }
    }

    fn validate(&self, configuration: &Configuration<Self>) -> Vec<Bad> {
        let mut accumulator = Accumulator::new(configuration);
        let name = configuration.get(self.name);
        accumulator
            .just_verify(name != "forbidden", "the name is forbidden")
            .verify(name.len() <= 4, "name too long")
            .verify(!name.contains(' '), "no spaces");
        for _ in 0..2 {
            let name = configuration.get(self.name);
            accumulator.verify(!name.starts_with('x'), "no leading x");
        }
        accumulator.done()
    }
}

#[test]
fn rule_findings_keep_their_shape() {
    let factory = Factory::<Rules>::new().unwrap();

    let error = factory
        .create([Source::stringified("args", [("name", "forbidden")])])
        .unwrap_err();
    let messages: Vec<_> = error.bads().iter().map(ToString::to_string).collect();
    // `just_verify` clears the log, so the length rule implicates nothing.
    assert_eq!(messages, ["the name is forbidden", "name too long"]);

    let error = factory
        .create([Source::stringified("args", [("name", "xy")])])
        .unwrap_err();
    let messages: Vec<_> = error.bads().iter().map(ToString::to_string).collect();
    assert_eq!(messages, ["[ name ] no leading x"]);
}

#[test]
fn rules_see_only_reads_after_the_accumulator_started() {
    let factory = Factory::<Rules>::new().unwrap();
    let configuration = factory
        .create([Source::stringified("args", [("name", "ok")])])
        .unwrap();

    let _ = configuration.get(factory.schema().name);
    let mut accumulator = Accumulator::new(&configuration);
    accumulator.add("nothing read");
    assert!(!accumulator.is_ok());
    assert!(accumulator.done()[0].properties().is_empty());
}
