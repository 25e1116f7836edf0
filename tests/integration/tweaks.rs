use wrench::{Accessor, Configuration, Factory, Origin, Schema, Slot, Source, Template, Tweaks, Value};

/// Derives the worker count and a label from other properties.
struct Pool {
    cores: Accessor<u32>,
    workers: Accessor<Option<u32>>,
    label: Accessor<String>,
}

impl Schema for Pool {
    const NAME: &'static str = "Pool";

    fn declare(t: &mut Template<Self>) -> Self {
        Pool {
            cores: t.field("cores").default_value(2).finish(),
            workers: t.field("workers").finish(),
            label: t.field("label").finish(),
        }
    }

    fn tweak(&self, configuration: &Configuration<Self>) -> Tweaks {
        let mut tweaks = Tweaks::new();
        if configuration.get(self.workers).is_none() {
            // u32 into an Option<u32> property
            let doubled = configuration.get(self.cores) * 2;
            tweaks.insert(self.workers, Some(Value::new(doubled)), None);
        }
        if configuration.try_get(self.label).is_none() {
            tweaks.set_with_text(self.label, format!("pool-{}", configuration.get(self.cores)), "generated");
        }
        tweaks
    }
}

#[test]
fn tweaks_derive_values_from_first_pass() {
    let factory = Factory::<Pool>::new().unwrap();
    let s = factory.schema();
    let configuration = factory
        .create([Source::stringified("args", [("cores", "4")])])
        .unwrap();

    assert_eq!(configuration.get(s.workers), Some(8));
    assert_eq!(configuration.get(s.label), "pool-4");

    let inspector = configuration.inspector();
    assert_eq!(inspector.origin(s.workers), Some(Origin::Tweak));
    assert_eq!(inspector.string_value_of(s.workers), Some("8"));
    assert_eq!(inspector.string_value_of(s.label), Some("generated"));
    assert_eq!(
        inspector.source_of(s.workers).map(Source::name),
        Some(wrench::TWEAKS_SOURCE)
    );

    let names: Vec<_> = configuration.sources().iter().map(Source::name).collect();
    assert_eq!(names, ["defaults", "args", "tweaks"]);
}

#[test]
fn explicit_values_leave_nothing_to_tweak() {
    let factory = Factory::<Pool>::new().unwrap();
    let s = factory.schema();
    let configuration = factory
        .create([Source::stringified("args", [("workers", "3"), ("label", "main")])])
        .unwrap();

    assert_eq!(configuration.get(s.workers), Some(3));
    assert_eq!(configuration.inspector().origin(s.workers), Some(Origin::Explicit));
    assert_eq!(configuration.sources().len(), 2);
}

/// Tweaks with values of the wrong type.
struct Broken {
    queue: Accessor<u32>,
    name: Accessor<String>,
}

impl Schema for Broken {
    const NAME: &'static str = "Broken";

    fn declare(t: &mut Template<Self>) -> Self {
        Broken {
            queue: t.field("queue").default_value(16).finish(),
            name: t.field("name").default_literal("broken").finish(),
        }
    }

    fn tweak(&self, _configuration: &Configuration<Self>) -> Tweaks {
        let mut tweaks = Tweaks::new();
        tweaks
            .insert(self.queue, Some(Value::new("many".to_string())), None)
            .set_null(self.name);
        tweaks
    }
}

#[test]
fn tweaks_are_type_checked() {
    let factory = Factory::<Broken>::new().unwrap();
    let error = factory.create(Vec::new()).unwrap_err();

    assert!(error.is_declaration());
    let bads = error.bads();
    assert_eq!(bads.len(), 2);

    assert!(bads[0].message().starts_with("Can't assign a value of type "));
    assert!(bads[0].message().ends_with(" to a property of type u32"));
    assert_eq!(bads[0].properties()[0].property().name(), "queue");

    assert_eq!(
        bads[1].message(),
        format!(
            "Can't assign null to a property of type {}",
            std::any::type_name::<String>()
        )
    );
    assert_eq!(bads[1].to_string(), format!("[ name ] {}", bads[1].message()));
}

/// Drops the reserve of a single-threaded pool.
struct Reserve {
    threads: Accessor<u32>,
    reserve: Accessor<Option<u32>>,
}

impl Schema for Reserve {
    const NAME: &'static str = "Reserve";

    fn declare(t: &mut Template<Self>) -> Self {
        Reserve {
            threads: t.field("threads").default_value(1).finish(),
            reserve: t.field("reserve").default_value(Some(4)).finish(),
        }
    }

    fn tweak(&self, configuration: &Configuration<Self>) -> Tweaks {
        let mut tweaks = Tweaks::new();
        if configuration.get(self.threads) == 1 {
            tweaks.set(self.reserve, None);
        }
        tweaks
    }
}

#[test]
fn tweaking_to_none_is_an_explicit_null() {
    let factory = Factory::<Reserve>::new().unwrap();
    let s = factory.schema();

    let configuration = factory.create(Vec::new()).unwrap();
    let inspector = configuration.inspector();
    assert_eq!(configuration.get(s.reserve), None);
    assert_eq!(inspector.string_value_of(s.reserve), None);
    assert_eq!(inspector.origin(s.reserve), Some(Origin::Tweak));
    assert_eq!(
        inspector.valued_property(s.reserve).map(|valued| valued.slot()),
        Some(&Slot::ExplicitNull)
    );

    let configuration = factory
        .create([Source::stringified("args", [("threads", "2")])])
        .unwrap();
    assert_eq!(configuration.get(s.reserve), Some(4));
    assert_eq!(configuration.inspector().origin(s.reserve), Some(Origin::Builtin));
}

/// Hands an optional value to a plain property.
struct Retries {
    retries: Accessor<u32>,
}

impl Schema for Retries {
    const NAME: &'static str = "Retries";

    fn declare(t: &mut Template<Self>) -> Self {
        Retries {
            retries: t.field("retries").default_value(1).finish(),
        }
    }

    fn tweak(&self, _configuration: &Configuration<Self>) -> Tweaks {
        let mut tweaks = Tweaks::new();
        tweaks.insert(self.retries, Some(Value::new(Some(5u32))), None);
        tweaks
    }
}

#[test]
fn tweaks_unwrap_some_into_plain_properties() {
    let factory = Factory::<Retries>::new().unwrap();
    let s = factory.schema();
    let configuration = factory.create(Vec::new()).unwrap();

    assert_eq!(configuration.get(s.retries), 5);
    let inspector = configuration.inspector();
    assert_eq!(inspector.origin(s.retries), Some(Origin::Tweak));
    assert_eq!(inspector.string_value_of(s.retries), Some("5"));
}

/// Hands an absent optional value to a plain property.
struct Budget {
    budget: Accessor<u32>,
}

impl Schema for Budget {
    const NAME: &'static str = "Budget";

    fn declare(t: &mut Template<Self>) -> Self {
        Budget {
            budget: t.field("budget").default_value(3).finish(),
        }
    }

    fn tweak(&self, _configuration: &Configuration<Self>) -> Tweaks {
        let mut tweaks = Tweaks::new();
        tweaks.insert(self.budget, Some(Value::new(None::<u32>)), None);
        tweaks
    }
}

#[test]
fn tweaks_reject_none_for_plain_properties() {
    let factory = Factory::<Budget>::new().unwrap();
    let error = factory.create(Vec::new()).unwrap_err();

    assert!(error.is_declaration());
    let bads = error.bads();
    assert_eq!(bads.len(), 1);
    assert_eq!(bads[0].message(), "Can't assign null to a property of type u32");
    assert_eq!(bads[0].properties()[0].display_value(), "3");
}
