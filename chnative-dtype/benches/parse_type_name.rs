#![allow(clippy::unwrap_used)]

use chnative_dtype::{TypeNameCache, TypeParser, lower, parse_type_name};
use divan::Bencher;

fn main() {
    divan::main();
}

const NAMES: [&str; 4] = [
    "UInt64",
    "Nullable(FixedString(16))",
    "Array(Array(Tuple(Int8, String, DateTime64(3, 'UTC'))))",
    "Enum8('active' = 1, 'paused' = 2, 'deleted' = 3, 'archived' = 4)",
];

#[divan::bench(args = NAMES)]
fn parse(name: &str) {
    divan::black_box(TypeParser::new(name).parse().unwrap());
}

#[divan::bench(args = NAMES)]
fn parse_and_lower(name: &str) {
    divan::black_box(lower(&TypeParser::new(name).parse().unwrap()).unwrap());
}

#[divan::bench(args = NAMES)]
fn cached(bencher: Bencher, name: &str) {
    let cache = TypeNameCache::default();
    cache.get_or_parse(name).unwrap();
    bencher.bench_local(|| cache.get_or_parse(divan::black_box(name)).unwrap());
}

#[divan::bench]
fn canonical_name(bencher: Bencher) {
    let dtype = parse_type_name(NAMES[2]).unwrap();
    bencher.bench_local(|| dtype.name());
}
