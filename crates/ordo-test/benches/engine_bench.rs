//! Benchmarks for ORDO collection actions

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ordo_core::{Destination, Document, DocumentKey, Position, Target};
use ordo_engine::{stable_order, ActionSet, Direction, RemoveTarget, Reorder, Sequence};
use ordo_store::Collection;

fn build(len: usize) -> (ActionSet<Document>, Sequence<Document>) {
    let actions = ActionSet::default();
    let seq = actions
        .replace((0..len).map(|n| {
            Document::new()
                .with("id", format!("k{n}"))
                .with("value", ((n * 7919) % 1000) as i64)
        }))
        .unwrap();
    (actions, seq)
}

fn bench_add_at_end(c: &mut Criterion) {
    let (actions, seq) = build(1000);
    let fresh = Document::new().with("id", "fresh").with("value", 1);

    c.bench_function("add_at_end_1000", |b| {
        b.iter(|| black_box(actions.add(&seq, [fresh.clone()], Position::End)))
    });
}

fn bench_add_before_anchor(c: &mut Criterion) {
    let (actions, seq) = build(1000);
    let fresh = Document::new().with("id", "fresh").with("value", 1);
    let anchor = DocumentKey::from("k500");

    c.bench_function("add_before_anchor_1000", |b| {
        b.iter(|| {
            black_box(actions.add(
                &seq,
                [fresh.clone()],
                Position::Before(black_box(anchor.clone())),
            ))
        })
    });
}

fn bench_remove_by_key(c: &mut Criterion) {
    let (actions, seq) = build(1000);
    let key = DocumentKey::from("k999");

    c.bench_function("remove_by_key_1000", |b| {
        b.iter(|| black_box(actions.remove(&seq, RemoveTarget::ByKey(key.clone()), None)))
    });
}

fn bench_reorder_by_field(c: &mut Criterion) {
    let (actions, seq) = build(1000);

    c.bench_function("reorder_by_field_1000", |b| {
        b.iter(|| black_box(actions.reorder(&seq, Reorder::by_field("value", Direction::Descending))))
    });
}

fn bench_stable_order(c: &mut Criterion) {
    let values: Vec<u32> = (0..10_000u32).map(|n| n.wrapping_mul(2_654_435_761) % 97).collect();

    c.bench_function("stable_order_10000", |b| {
        b.iter(|| black_box(stable_order(values.len(), |a, b| values[a].cmp(&values[b]))))
    });
}

fn bench_move_across(c: &mut Criterion) {
    let (actions, seq) = build(1000);

    c.bench_function("move_first_to_last_1000", |b| {
        b.iter(|| black_box(actions.move_record(&seq, Target::Index(0), Destination::Index(999))))
    });
}

fn bench_keyed_view(c: &mut Criterion) {
    let (_, seq) = build(1000);
    let collection = Collection::with_records(seq.to_vec()).unwrap();

    c.bench_function("keyed_view_1000", |b| {
        b.iter(|| black_box(collection.keyed().len()))
    });
}

criterion_group!(
    benches,
    bench_add_at_end,
    bench_add_before_anchor,
    bench_remove_by_key,
    bench_reorder_by_field,
    bench_stable_order,
    bench_move_across,
    bench_keyed_view,
);
criterion_main!(benches);
