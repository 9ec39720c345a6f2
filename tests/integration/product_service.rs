//! Library-level tests of the product driver through the fake runner.

use serde_json::{Map, Value, json};
use std::sync::Arc;
use tile_harness::core::HarnessError;
use tile_harness::product::ProductService;
use tile_harness::test_utils::{FakeCommandRunner, ProductFixture, init_test_logging, om_env};

fn overrides(value: Value) -> Map<String, Value> {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_configure_then_render_round() {
    init_test_logging(None);

    let fixture = ProductFixture::with_documents(
        &json!({ "a": { "value": 1 }, "b": { "value": 2 } }),
        &ProductFixture::default_network(),
    )
    .unwrap();
    let fake = Arc::new(FakeCommandRunner::new());
    let service =
        ProductService::with_environment(fixture.config("p-redis", "2.4.0"), om_env, fake.clone())
            .unwrap();

    service.configure(&overrides(json!({ "b": 3, "c": 4 }))).unwrap();

    fake.push_stdout(r#"[{"guid": "guid-1", "type": "p-redis"}]"#)
        .push_stdout(r#"{"manifest": {"name": "p-redis"}, "errors": {"base": []}}"#)
        .push_stdout("p-redis\n");
    let manifest = service.render_manifest().unwrap();

    let properties: Value = serde_json::from_str(
        fake.calls()[2].flag_value("--product-properties").unwrap(),
    )
    .unwrap();
    assert_eq!(
        properties,
        json!({ "a": { "value": 1 }, "b": { "value": 3 }, "c": { "value": 4 } })
    );

    // The manifest keeps using the service's runner.
    assert_eq!(manifest.path("/name").unwrap().as_str(), Some("p-redis"));
    let last = fake.calls().pop().unwrap();
    assert_eq!(last.command, "bosh");
    assert_eq!(fake.call_count(), 6);
}

#[test]
fn test_errors_win_over_manifest_content() {
    let fixture = ProductFixture::basic().unwrap();
    let fake = Arc::new(FakeCommandRunner::new());
    fake.push_stdout(r#"[{"guid": "guid-1", "type": "p-redis"}]"#).push_stdout(
        r#"{"manifest": {"name": "p-redis"}, "errors": {"base": ["product is not configured"]}}"#,
    );
    let service =
        ProductService::with_environment(fixture.config("p-redis", "2.4.0"), om_env, fake.clone())
            .unwrap();

    let err = service.render_manifest().unwrap_err();

    match err {
        HarnessError::Protocol {
            message, ..
        } => assert_eq!(message, "product is not configured"),
        other => panic!("expected protocol error, got {other:?}"),
    }
}

#[test]
fn test_missing_manifest_renders_empty_mapping() {
    let fixture = ProductFixture::basic().unwrap();
    let fake = Arc::new(FakeCommandRunner::new());
    fake.push_stdout(r#"[{"guid": "guid-1", "type": "p-redis"}]"#).push_stdout("{}");
    let service =
        ProductService::with_environment(fixture.config("p-redis", "2.4.0"), om_env, fake.clone())
            .unwrap();

    let manifest = service.render_manifest().unwrap();

    assert_eq!(manifest.as_str().trim(), "{}");
}
