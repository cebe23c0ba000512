//! Record/Replay Integration Tests
//!
//! Drives mocks through `Mockery` the way a fixture would:
//! - Recording configures return values and raised errors
//! - Replay consumes expectations per method in FIFO order
//! - Exhausted methods log unexpected calls; unknown methods stay silent
//! - Verification reports leftovers
//!
//! # Running Tests
//! ```bash
//! cargo test --test mock_lifecycle_tests
//! ```

use mockery_engine::{
    ConstructionError, InvocationError, LoadingContext, MethodOptions, MethodSpec, MockValue,
    Mockery, MockeryConfig, ParameterSpec, ProxyInstance, RaisedError, TypeSpec,
};
use std::sync::Arc;

fn quiet() -> MockeryConfig {
    MockeryConfig::default().with_unexpected_logging(false)
}

fn service() -> TypeSpec {
    TypeSpec::interface("IService")
        .method(MethodSpec::new("foo"))
        .method(MethodSpec::new("bar"))
        .method(MethodSpec::new("baz"))
}

fn record(mock: &ProxyInstance, method: &str) -> MethodOptions {
    mock.call::<MethodOptions>(method, vec![]).unwrap()
}

// ===== Replay Tests =====

#[test]
fn test_record_replay_then_unexpected() {
    let mut mockery = Mockery::with_config(quiet());
    let mock = mockery.create_mock_for(&[service()]).unwrap();

    record(&mock, "foo").returns(42);
    mockery.replay_all().unwrap();

    assert_eq!(mock.invoke("foo", vec![]), Ok(MockValue::Int(42)));
    assert_eq!(mock.invoke("foo", vec![]), Ok(MockValue::Null));

    let calls = mockery.store_of(&mock).unwrap().unexpected_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "foo");
    assert!(calls[0].arguments.is_empty());
}

#[test]
fn test_fifo_value_then_error() {
    let mut mockery = Mockery::with_config(quiet());
    let mock = mockery.create_mock_for(&[service()]).unwrap();
    let error = RaisedError::new("E", "second call fails");

    record(&mock, "foo").returns(1);
    record(&mock, "foo").throws(error.clone());
    mockery.replay_all().unwrap();

    assert_eq!(mock.call::<i64>("foo", vec![]), Ok(1));
    assert_eq!(mock.invoke("foo", vec![]), Err(InvocationError::Raised(error)));
}

#[test]
fn test_never_recorded_method_is_silent() {
    let mut mockery = Mockery::with_config(quiet());
    let mock = mockery.create_mock_for(&[service()]).unwrap();
    mockery.replay_all().unwrap();

    assert_eq!(mock.invoke("baz", vec![]), Ok(MockValue::Null));
    assert!(mockery.store_of(&mock).unwrap().unexpected_calls().is_empty());
    assert_eq!(mockery.verify_all(), Ok(()));
}

#[test]
fn test_methods_do_not_interfere() {
    let mut mockery = Mockery::with_config(quiet());
    let mock = mockery.create_mock_for(&[service()]).unwrap();

    record(&mock, "foo").returns("foo-1");
    record(&mock, "bar").returns("bar-1");
    record(&mock, "foo").returns("foo-2");
    mockery.replay_all().unwrap();

    assert_eq!(mock.call::<String>("bar", vec![]), Ok("bar-1".to_string()));
    assert_eq!(mock.call::<String>("foo", vec![]), Ok("foo-1".to_string()));
    assert_eq!(mock.invoke("bar", vec![]), Ok(MockValue::Null));
    assert_eq!(mock.call::<String>("foo", vec![]), Ok("foo-2".to_string()));
}

#[test]
fn test_arguments_are_not_matched() {
    let spec = TypeSpec::interface("ILookup")
        .method(MethodSpec::new("get").param(ParameterSpec::new("key").restricted("string")));
    let mut mockery = Mockery::with_config(quiet());
    let mock = mockery.create_mock_for(&[spec]).unwrap();

    mock.call::<MethodOptions>("get", vec!["a".into()])
        .unwrap()
        .returns(1);
    mockery.replay_all().unwrap();

    assert_eq!(mock.call::<i64>("get", vec!["something else".into()]), Ok(1));
}

// ===== Fixture Tests =====

#[test]
fn test_permission_check_fixture() {
    let context = LoadingContext::new("fixture");
    context.define(
        TypeSpec::interface("IContext").method(
            MethodSpec::new("hasPermission").param(ParameterSpec::new("permission").restricted("string")),
        ),
    );
    let mut mockery = Mockery::with_config(quiet()).with_context(context);
    let ctx = mockery.create_mock("IContext").unwrap();

    ctx.call::<MethodOptions>("hasPermission", vec!["rt=foo,rp=bar".into()])
        .unwrap()
        .returns(true);
    ctx.call::<MethodOptions>("hasPermission", vec!["rt=foo,rp=bar".into()])
        .unwrap()
        .throws(RaisedError::new("lang.IllegalAccessException", "Permission denied"));
    mockery.replay_all().unwrap();

    assert_eq!(ctx.call::<bool>("hasPermission", vec!["rt=foo,rp=bar".into()]), Ok(true));
    let err = ctx
        .call::<bool>("hasPermission", vec!["rt=foo,rp=bar".into()])
        .unwrap_err();
    assert_eq!(err.as_raised().map(|e| e.kind.as_str()), Some("lang.IllegalAccessException"));
    assert_eq!(mockery.verify_all(), Ok(()));
}

#[test]
fn test_mock_as_value_implements_interface() {
    let mut mockery = Mockery::with_config(quiet());
    let mock = mockery.create_mock_for(&[service()]).unwrap();

    let value = mock.to_value();
    assert!(value.satisfies("IService"));
    let back = value.as_object().and_then(|o| o.downcast::<ProxyInstance>()).unwrap();
    assert!(Arc::ptr_eq(&back, &mock));
}

#[test]
fn test_recording_accepts_any_argument_count() {
    let spec = TypeSpec::interface("IWorker")
        .method(MethodSpec::new("foo"))
        .method(MethodSpec::new("bar").param(ParameterSpec::new("a")));
    let mut mockery = Mockery::with_config(quiet());
    let mock = mockery.create_mock_for(&[spec]).unwrap();

    mock.call::<MethodOptions>("foo", vec![MockValue::Int(1)])
        .unwrap()
        .returns("extra");
    mock.call::<MethodOptions>("bar", vec![]).unwrap().returns("missing");
    let store = Arc::clone(mockery.store_of(&mock).unwrap());
    assert_eq!(store.remaining("foo"), 1);
    assert_eq!(store.remaining("bar"), 1);

    mockery.replay_all().unwrap();
    assert_eq!(mock.call::<String>("foo", vec![MockValue::Int(2)]), Ok("extra".to_string()));
    assert_eq!(mock.call::<String>("bar", vec![]), Ok("missing".to_string()));

    // Exhausted calls are logged with the bound arguments
    mock.invoke("bar", vec![]).unwrap();
    assert_eq!(store.unexpected_calls()[0].arguments, vec![MockValue::Null]);
}

#[test]
fn test_recording_undefined_method_fails() {
    let mut mockery = Mockery::with_config(quiet());
    let mock = mockery.create_mock_for(&[service()]).unwrap();

    assert!(matches!(
        mock.invoke("qux", vec![]),
        Err(InvocationError::Construction(ConstructionError::UndefinedMethod { .. }))
    ));
}

// ===== Verification Tests =====

#[test]
fn test_verify_all_reports_unexpected_and_pending() {
    let queue = TypeSpec::interface("IQueue")
        .method(MethodSpec::new("push").param(ParameterSpec::new("item")));
    let mut mockery = Mockery::with_config(quiet());
    let first = mockery.create_mock_for(&[&queue]).unwrap();
    let second = mockery.create_mock_for(&[service()]).unwrap();

    first.call::<MethodOptions>("push", vec![MockValue::Int(1)]).unwrap();
    record(&second, "bar");
    record(&second, "bar");
    mockery.replay_all().unwrap();

    first.invoke("push", vec![MockValue::Int(1)]).unwrap();
    first.invoke("push", vec![MockValue::Int(7)]).unwrap();
    second.invoke("bar", vec![]).unwrap();

    let report = mockery.verify_all().unwrap_err();
    assert_eq!(report.unexpected.len(), 1);
    assert_eq!(report.unexpected[0].to_string(), "push(7)");
    assert_eq!(report.pending, vec![("bar".to_string(), 1)]);
}
