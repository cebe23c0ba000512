use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mockery_engine::{
    InvocationHandler, InvocationResult, LoadingContext, MethodOptions, MethodSpec, MockValue,
    Mockery, MockeryConfig, OverloadSignature, ParameterSpec, ProxyInstance, ProxyTypeFactory,
    TypeSpec,
};
use std::sync::Arc;

fn repository() -> TypeSpec {
    TypeSpec::interface("IRepository")
        .method(
            MethodSpec::new("fetch")
                .param(ParameterSpec::new("key").restricted("string"))
                .param(ParameterSpec::new("limit").restricted("int").optional(10)),
        )
        .method(
            MethodSpec::new("find")
                .overload(OverloadSignature::new(Vec::<String>::new()))
                .overload(OverloadSignature::new(["string", "int"])),
        )
}

fn constant_handler() -> Arc<dyn InvocationHandler> {
    Arc::new(|_: &ProxyInstance, _: &str, _: Vec<MockValue>| -> InvocationResult {
        Ok(MockValue::Int(1))
    })
}

fn bench_cache_lookup(c: &mut Criterion) {
    let context = LoadingContext::new("bench-cache");
    let spec = repository();
    ProxyTypeFactory::create_proxy_type(&context, &[&spec]).unwrap();

    c.bench_function("proxy_type_cache_hit", |b| {
        b.iter(|| ProxyTypeFactory::create_proxy_type(black_box(&context), &[&spec]).unwrap());
    });
}

fn bench_invoke(c: &mut Criterion) {
    let context = LoadingContext::new("bench-invoke");
    let proxy = ProxyTypeFactory::create_proxy_instance(&context, &[repository()], constant_handler())
        .unwrap();

    let mut group = c.benchmark_group("invoke");
    for type_checks in [true, false] {
        let proxy = ProxyTypeFactory::create_proxy_type(&context, &[repository()])
            .unwrap()
            .instantiate(constant_handler())
            .with_type_checks(type_checks);
        group.bench_with_input(
            BenchmarkId::new("fixed_with_default", type_checks),
            &proxy,
            |b, proxy| {
                b.iter(|| proxy.invoke("fetch", vec![black_box("key").into()]).unwrap());
            },
        );
    }
    group.bench_function("overloaded", |b| {
        b.iter(|| proxy.invoke("find", vec!["key".into(), MockValue::Int(2)]).unwrap());
    });
    group.finish();
}

fn bench_record_replay(c: &mut Criterion) {
    let config = MockeryConfig::default().with_unexpected_logging(false);

    c.bench_function("record_replay_100", |b| {
        b.iter(|| {
            let mut mockery = Mockery::with_config(config);
            let mock = mockery.create_mock_for(&[repository()]).unwrap();
            for i in 0..100 {
                mock.call::<MethodOptions>("fetch", vec!["k".into()])
                    .unwrap()
                    .returns(i as i64);
            }
            mockery.replay_all().unwrap();
            for _ in 0..100 {
                black_box(mock.invoke("fetch", vec!["k".into()]).unwrap());
            }
        });
    });
}

criterion_group!(benches, bench_cache_lookup, bench_invoke, bench_record_replay);
criterion_main!(benches);
