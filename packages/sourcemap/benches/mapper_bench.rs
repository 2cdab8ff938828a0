use criterion::{black_box, criterion_group, criterion_main, Criterion};
use formsync_codec::{serialize, FieldPath, Format};
use formsync_sourcemap::{line_for_path, path_at_position};
use serde_json::{json, Value};

fn document() -> Value {
    let servers: Vec<Value> = (0..200)
        .map(|i| json!({"host": format!("node-{i}"), "port": 8000 + i, "tags": ["a", "b"]}))
        .collect();
    json!({"name": "bench", "servers": servers})
}

fn bench_mapper(c: &mut Criterion) {
    let tree = document();
    let last = FieldPath::parse("servers[199].tags[1]").unwrap();

    for format in Format::ALL {
        let text = serialize(&tree, format).unwrap();
        let line = line_for_path(&text, &last, format).unwrap();

        c.bench_function(&format!("line_for_path_{format}"), |b| {
            b.iter(|| line_for_path(black_box(&text), black_box(&last), format))
        });
        c.bench_function(&format!("path_at_position_{format}"), |b| {
            b.iter(|| path_at_position(black_box(&text), black_box(line), 5, format))
        });
    }
}

criterion_group!(benches, bench_mapper);
criterion_main!(benches);
