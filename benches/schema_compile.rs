//! Benchmarks for schema parsing and compilation.
//!
//! These benchmarks measure the performance of parsing schema YAML files of
//! various sizes and compiling them into per-destination documents.

use confgen::{compiler, schema};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Minimal schema with a single block.
const MINIMAL_SCHEMA: &str = r#"
blocks:
  - id: app
    fields:
      - name: title
        type: text
        default: demo
"#;

/// Small schema with routing across settings and secrets.
const SMALL_SCHEMA: &str = r#"
blocks:
  - id: postgresql
    fields:
      - name: host
        type: text
        default: 127.0.0.1
        development: localhost
      - name: port
        type: int
        secret: true
        default: 5432
      - name: user
        type: text
        secret: true
        default: ghost
      - name: password
        type: text
        secret: true
        default: qwerty
"#;

/// Medium schema with nested block references and list fields.
const MEDIUM_SCHEMA: &str = r#"
blocks:
  - id: pool
    exclude: true
    fields:
      - name: size
        type: int
        default: 10
      - name: recycle_seconds
        type: int
        default: 300
  - id: node
    exclude: true
    fields:
      - name: host
        type: text
        default: node.local
      - name: weight
        type: int
        default: 1
      - name: token
        type: text
        secret: true
        default: changeme
  - id: postgresql
    fields:
      - name: host
        type: text
        default: 127.0.0.1
      - name: port
        type: int
        secret: true
        default: 5432
      - name: connection_pool
        block: pool
  - id: cluster
    fields:
      - name: name
        type: text
        default: primary
      - name: seed_hosts
        type: text
        list: true
        default: seed.local
      - name: nodes
        block: node
        list: true
  - id: kafka
    fields:
      - name: host
        type: text
        default: kafka.internal
      - name: port
        type: int
        default: 9092
      - name: client_ratio
        type: float
        filename: tuning
        default: 0.75
"#;

/// Builds a schema with `num_blocks` blocks of `fields_per_block` fields,
/// every third field routed to secrets.
fn generate_large_schema(num_blocks: usize, fields_per_block: usize) -> String {
    let mut schema = String::from("blocks:\n");

    for i in 0..num_blocks {
        schema.push_str(&format!("  - id: service_{}\n    fields:\n", i));
        for j in 0..fields_per_block {
            schema.push_str(&format!(
                "      - name: field_{}\n        type: {}\n",
                j,
                match j % 3 {
                    0 => "text",
                    1 => "int",
                    _ => "bool",
                }
            ));
            if j % 3 == 2 {
                schema.push_str("        secret: true\n");
            }
            schema.push_str(&format!(
                "        default: {}\n",
                match j % 3 {
                    0 => "value".to_string(),
                    1 => j.to_string(),
                    _ => "true".to_string(),
                }
            ));
        }
    }

    schema
}

fn bench_schema_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("schema_parsing");

    group.bench_function("minimal", |b| {
        b.iter(|| schema::parse(black_box(MINIMAL_SCHEMA)))
    });

    group.bench_function("small", |b| {
        b.iter(|| schema::parse(black_box(SMALL_SCHEMA)))
    });

    group.bench_function("medium", |b| {
        b.iter(|| schema::parse(black_box(MEDIUM_SCHEMA)))
    });

    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    let small = schema::parse(SMALL_SCHEMA).unwrap();
    group.bench_function("small", |b| b.iter(|| compiler::compile(black_box(&small))));

    let medium = schema::parse(MEDIUM_SCHEMA).unwrap();
    group.bench_function("medium", |b| {
        b.iter(|| compiler::compile(black_box(&medium)))
    });

    group.finish();
}

fn bench_compile_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_scaling");

    // Test scaling with number of blocks
    for num_blocks in [5, 10, 20, 50] {
        let blocks = schema::parse(&generate_large_schema(num_blocks, 5)).unwrap();
        group.bench_with_input(
            BenchmarkId::new("blocks", num_blocks),
            &blocks,
            |b, blocks| b.iter(|| compiler::compile(black_box(blocks))),
        );
    }

    // Test scaling with fields per block
    for fields in [5, 10, 20, 50] {
        let blocks = schema::parse(&generate_large_schema(5, fields)).unwrap();
        group.bench_with_input(BenchmarkId::new("fields", fields), &blocks, |b, blocks| {
            b.iter(|| compiler::compile(black_box(blocks)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_schema_parsing,
    bench_compile,
    bench_compile_scaling
);
criterion_main!(benches);
