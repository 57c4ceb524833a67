use std::hint::black_box;

use abyss_records::inmemory::InMemoryRecordStore;
use abyss_records::model::{OwnerId, Season};
use abyss_records::store::RecordStore;
use abyss_records::Codec;
use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};

fn bench_payload() -> Value {
    let battle = json!({
        "half": 1,
        "timestamp": "2024-01-20T12:00:00Z",
        "characters": [
            { "id": 10000073, "name": "Nahida", "level": 90, "rarity": 5 },
            { "id": 10000052, "name": "Raiden Shogun", "level": 90, "rarity": 5 },
            { "id": 10000025, "name": "Xingqiu", "level": 90, "rarity": 4 },
            { "id": 10000032, "name": "Bennett", "level": 90, "rarity": 4 }
        ]
    });
    let chamber = json!({ "chamber": 3, "stars": 3, "max_stars": 3, "battles": [battle.clone(), battle] });
    let floors: Vec<Value> = (9..=12)
        .map(|floor| json!({ "floor": floor, "stars": 9, "max_stars": 9, "chambers": [chamber.clone(), chamber.clone(), chamber.clone()] }))
        .collect();
    json!({ "total_stars": 36, "total_battles": 12, "floors": floors })
}

fn store_benches(c: &mut Criterion) {
    let payload = bench_payload();

    for level in [1, 5, 9] {
        let store = InMemoryRecordStore::with_codec(Codec::new(level).expect("codec"));
        c.bench_function(&format!("showcase_put_level_{level}"), |b| {
            let mut counter = 0u64;
            b.iter(|| {
                counter = counter.wrapping_add(1);
                let owner = OwnerId(counter % 16);
                store
                    .put_showcase(owner, Season(80), black_box(&payload))
                    .expect("put");
            });
        });
    }

    let store = InMemoryRecordStore::new();
    store
        .put_showcase(OwnerId(1), Season(80), &payload)
        .expect("put for get");
    c.bench_function("showcase_get", |b| {
        b.iter(|| {
            black_box(store.get_showcase(OwnerId(1)).expect("get bench"));
        });
    });
}

criterion_group!(record_ops, store_benches);
criterion_main!(record_ops);
