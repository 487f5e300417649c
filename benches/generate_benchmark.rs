//! Benchmarks for rule set generation.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dnr_rulegen::{
    build_google_redirect_rules, generate_all_rule_sets, ContentScript, GeneratorConfig, Hostname,
    Manifest, PriorityTiers, GOOGLE_FIRST_PARTY_SCRIPT,
};

/// Build a manifest whose first-party script lists `count` Google hosts.
fn manifest_with_hosts(count: usize) -> Manifest {
    Manifest {
        content_scripts: vec![ContentScript {
            js: vec![GOOGLE_FIRST_PARTY_SCRIPT.to_string()],
            matches: (0..count)
                .map(|i| format!("https://www.google{}.com/*", i))
                .collect(),
        }],
    }
}

fn bench_generate_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_all");
    let config = GeneratorConfig::default();

    for count in [10, 200, 2000] {
        let manifest = manifest_with_hosts(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &manifest, |b, m| {
            b.iter(|| generate_all_rule_sets(black_box(m), &config).unwrap())
        });
    }

    group.finish();
}

fn bench_redirect_rules(c: &mut Criterion) {
    let hosts: Vec<Hostname> = (0..200)
        .map(|i| Hostname::parse(&format!("www.google{}.com", i)).unwrap())
        .collect();
    let tiers = PriorityTiers::default();

    c.bench_function("redirect_rules_200_hosts", |b| {
        b.iter(|| build_google_redirect_rules(black_box(&hosts), &tiers))
    });
}

criterion_group!(benches, bench_generate_all, bench_redirect_rules);
criterion_main!(benches);
