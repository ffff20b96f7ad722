//! Tests for builder modules

use lazyload::builders::LoaderBuilder;
use lazyload::config::LoaderConfig;
use lazyload::core::{
    CapabilityRecord, EngineClass, HostProbe, LazyLoader, LoaderError, ResourceClass,
};
use lazyload::infra::InMemoryDocument;

#[test]
fn test_loader_builder_defaults() {
    let builder: LoaderBuilder<InMemoryDocument> = LoaderBuilder::new(LoaderConfig::default());
    assert_eq!(builder.config().max_poll_attempts, 200);

    let loader: LazyLoader<_, ()> = builder
        .host(InMemoryDocument::new(HostProbe::new("Gecko/20100101")))
        .build()
        .unwrap();
    assert_eq!(loader.capabilities().engine, EngineClass::Gecko);
    assert!(!loader.stats(ResourceClass::Code).busy);
}

#[test]
fn test_loader_builder_requires_host() {
    let result = LoaderBuilder::<InMemoryDocument>::new(LoaderConfig::default()).build::<()>();
    assert!(matches!(result, Err(LoaderError::MissingHost)));
}

#[test]
fn test_loader_builder_validates_config() {
    let config = LoaderConfig {
        poll_interval_ms: 0,
        ..LoaderConfig::default()
    };
    let result = LoaderBuilder::new(config)
        .host(InMemoryDocument::default())
        .build::<()>();
    assert!(matches!(result, Err(LoaderError::InvalidConfig(_))));
}

#[test]
fn test_loader_builder_capability_override() {
    let loader: LazyLoader<_, ()> = LoaderBuilder::new(LoaderConfig::default())
        .host(InMemoryDocument::new(HostProbe::new("Gecko/20100101")))
        .capabilities(CapabilityRecord::conservative())
        .build()
        .unwrap();
    assert_eq!(loader.capabilities(), CapabilityRecord::conservative());
}

#[test]
fn test_capability_override_replaces_probed_record() {
    let loader: LazyLoader<_, ()> = LoaderBuilder::new(LoaderConfig::default())
        .host(InMemoryDocument::new(HostProbe::new("Gecko/20100101")))
        .build()
        .unwrap();
    assert_eq!(loader.capabilities().engine, EngineClass::Gecko);

    let loader = loader.with_capabilities(CapabilityRecord::conservative());
    assert_eq!(loader.capabilities(), CapabilityRecord::conservative());
}

#[test]
fn test_new_loader_is_idle_for_every_class() {
    let loader: LazyLoader<_, ()> = LoaderBuilder::new(LoaderConfig::default())
        .host(InMemoryDocument::default())
        .build()
        .unwrap();
    for class in ResourceClass::ALL {
        let stats = loader.stats(class);
        assert_eq!(stats.class, class);
        assert!(!stats.busy);
        assert!(!stats.halted);
        assert!(loader.outstanding(class).is_empty());
    }
}
