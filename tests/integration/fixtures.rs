//! Schemas shared by the integration tests.

use wrench::{
    Accessor, Accumulator, Bad, Configuration, Factory, NameTransformer, Obfuscator, Schema,
    Source, Template,
};

/// A server with one required property, defaults, a nullable property, a
/// secret and two cross-property rules.
pub struct Server {
    pub host: Accessor<String>,
    pub port: Accessor<u16>,
    pub workers: Accessor<Option<u32>>,
    pub min_connections: Accessor<u32>,
    pub max_connections: Accessor<u32>,
    pub api_token: Accessor<Option<String>>,
    pub verbose: Accessor<bool>,
}

impl Schema for Server {
    const NAME: &'static str = "Server";

    fn declare(t: &mut Template<Self>) -> Self {
        t.name_transformer(NameTransformer::KebabCase);
        Server {
            host: t
                .field("host")
                .default_literal("localhost")
                .documentation("Host name to bind")
                .finish(),
            port: t.field("port").documentation("Port to listen on").finish(),
            workers: t
                .field("workers")
                .documentation("Worker threads, one per core when unset")
                .finish(),
            min_connections: t.field("minConnections").default_value(1).finish(),
            max_connections: t.field("maxConnections").default_value(10).finish(),
            api_token: t
                .field("apiToken")
                .obfuscator(Obfuscator::patterns(["[0-9a-f]{8,}"]).unwrap())
                .documentation("Token for the upstream API")
                .finish(),
            verbose: t.field("verbose").default_value(false).finish(),
        }
    }

    fn validate(&self, configuration: &Configuration<Self>) -> Vec<Bad> {
        let mut accumulator = Accumulator::new(configuration);
        accumulator
            .verify(
                configuration.get(self.min_connections) <= configuration.get(self.max_connections),
                "min-connections must not exceed max-connections",
            )
            .verify(
                configuration.get(self.port) >= 1024,
                "port must not be privileged",
            );
        accumulator.done()
    }
}

pub fn server() -> Factory<Server> {
    Factory::new().unwrap()
}

/// A stringified source named `args`.
pub fn args<const N: usize>(entries: [(&str, &str); N]) -> Source {
    Source::stringified("args", entries)
}
