#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};

use tbson::prelude::*;

const N_BIG_ARR: usize = 2000;

fn big_arr() -> Bson { Bson::from((0..N_BIG_ARR as i64).collect::<Vec<_>>()) }

const N_ARR: usize = 10;
const N_OBJ: usize = 10;

fn big_b() -> Bson {
    let v0: Vec<Bson> = (0..N_ARR).map(|i| Bson::from(i as i64)).collect();
    let o: Vec<(Key, Bson)> = (0..N_OBJ)
        .map(|i| (Key::Code(i as u16), Bson::from(v0.clone())))
        .collect();
    Bson::from(vec![Bson::Object(o); N_ARR])
}

fn bench_construction(c: &mut Criterion) {
    c.bench_function(
        &format!(
            "Creating a Bson tree of size {}",
            encode_full(&big_b()).len()
        ),
        |b| b.iter(|| black_box(big_b())),
    );
}

fn bench_enc(c: &mut Criterion) {
    let big_b = big_b();
    let enc_len = encode_full(&big_b).len();
    c.bench_function(
        &format!("Encoding a Bson tree, output size of {} bytes", enc_len),
        move |b| b.iter(|| encode_full(black_box(&big_b))),
    );
}

fn bench_direct_enc(c: &mut Criterion) {
    c.bench_function("Encoding the same tree directly", |b| {
        b.iter(|| {
            let mut enc = Encoder::with_capacity(1024);
            enc.begin_arr();
            for _ in 0..N_ARR {
                enc.begin_obj();
                for k in 0..N_OBJ {
                    enc.add_code_key(k as u16).begin_arr();
                    for i in 0..N_ARR {
                        enc.add(black_box(i));
                    }
                    enc.end_arr();
                }
                enc.end_obj();
            }
            enc.end_arr();
            enc.into_inner()
        })
    });
}

fn bench_dec(c: &mut Criterion) {
    let enc = encode_full(&big_b());
    c.bench_function(
        &format!("Decoding a Bson tree of size {}", enc.len()),
        move |b| b.iter(|| decode_full(black_box(&enc))),
    );
}

fn bench_walk(c: &mut Criterion) {
    let enc = encode_full(&big_arr());
    c.bench_function(
        &format!("Walking {} records without allocating", N_BIG_ARR + 2),
        move |b| {
            b.iter(|| {
                let mut p = black_box(&enc).parser();
                let mut sum = 0i64;
                while !p.is_done() && p.advance() {
                    sum = sum.wrapping_add(p.to_int64());
                }
                sum
            })
        },
    );
}

criterion_group!(
    benches,
    bench_construction,
    bench_enc,
    bench_direct_enc,
    bench_dec,
    bench_walk
);
criterion_main!(benches);
