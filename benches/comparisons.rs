#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};
use tbson::{prelude::*, stringify::to_json};

fn tbson_i64_encode(c: &mut Criterion) {
    c.bench_function("TBSON i64 encode", |b| {
        let v = Bson::from(1_000_000i64);
        b.iter(|| encode_full(black_box(&v)))
    });
}

fn tbson_i64_add(c: &mut Criterion) {
    c.bench_function("TBSON i64 add", |b| {
        b.iter(|| {
            let mut enc = Encoder::with_sink(Vec::with_capacity(128));
            enc.add_int(black_box(1_000_000i64));
            enc.into_inner()
        })
    });
}

fn json_i64_encode(c: &mut Criterion) {
    c.bench_function("JSON i64 encode", |b| {
        b.iter(|| serde_json::to_string(&black_box(1_000_000i64)))
    });
}

fn tbson_i64_decode(c: &mut Criterion) {
    c.bench_function("TBSON i64 decode", |b| {
        let buf = encode_full(&Bson::from(1_000_000i64));
        b.iter(|| black_box(&buf).parser().read_int64())
    });
}

fn json_i64_decode(c: &mut Criterion) {
    c.bench_function("JSON i64 decode", |b| {
        b.iter(|| serde_json::from_str::<i64>(black_box("1000000")))
    });
}

fn tbson_str_encode(c: &mut Criterion) {
    c.bench_function("TBSON string encode", |b| {
        let s: String = (0..MAX_LEN).map(|x| (b'a' + (x % 26) as u8) as char).collect();
        b.iter(|| {
            let mut enc = Encoder::with_sink(Vec::with_capacity(MAX_LEN + 2));
            enc.add_str(black_box(s.as_str()));
            enc.into_inner()
        })
    });
}

fn json_str_encode(c: &mut Criterion) {
    c.bench_function("JSON string encode", |b| {
        let s: String = (0..MAX_LEN).map(|x| (b'a' + (x % 26) as u8) as char).collect();
        b.iter(|| serde_json::to_string(&black_box(&s)))
    });
}

fn tbson_stringify(c: &mut Criterion) {
    c.bench_function("TBSON render as JSON", |b| {
        let tree = Bson::from((0..100).map(|i| Bson::from(i * 7)).collect::<Vec<_>>());
        let buf = encode_full(&tree);
        b.iter(|| to_json(black_box(&buf)))
    });
}

criterion_group!(
    benches,
    tbson_i64_encode,
    tbson_i64_add,
    json_i64_encode,
    tbson_i64_decode,
    json_i64_decode,
    tbson_str_encode,
    json_str_encode,
    tbson_stringify,
);

criterion_main!(benches);
