#![no_main]

use std::collections::HashSet;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use ordo_core::{Destination, Document, DocumentKey, Locator, Position, Record, Target};
use ordo_engine::{Direction, RemoveTarget, Reorder};
use ordo_store::Collection;

#[derive(Arbitrary, Debug)]
enum Loc {
    Index(u8),
    ByKey(u8),
    Before(u8),
    After(u8),
    Start,
    End,
}

#[derive(Arbitrary, Debug)]
enum Op {
    Add { ids: Vec<u8>, value: i8, at: Loc },
    RemoveAt(u8),
    RemoveKey(u8),
    RemoveBelow { limit: i8, amount: Option<u8> },
    Sort { by_value: bool, descending: bool },
    Move { from: Loc, to: Loc },
    Update { target: Loc, value: i8, rekey: Option<u8> },
    Replace(Vec<u8>),
}

fn key(id: u8) -> DocumentKey {
    DocumentKey::Text(format!("k{id}"))
}

fn doc(id: u8, value: i8) -> Document {
    Document::new().with("id", format!("k{id}")).with("value", i64::from(value))
}

fn value_of(record: &Document) -> i64 {
    record.get("value").and_then(|v| v.as_i64()).unwrap_or(0)
}

fn locator(loc: &Loc) -> Locator<DocumentKey> {
    match *loc {
        Loc::Index(n) => Locator::Index(usize::from(n)),
        Loc::ByKey(id) => Locator::ByKey(key(id)),
        Loc::Before(id) => Locator::Before(key(id)),
        Loc::After(id) => Locator::After(key(id)),
        Loc::Start => Locator::Start,
        Loc::End => Locator::End,
    }
}

fuzz_target!(|ops: Vec<Op>| {
    let Ok(mut collection) = Collection::<Document>::with_records(Vec::new()) else {
        return;
    };

    for op in ops.iter().take(64) {
        let before = collection.snapshot();
        let revision = collection.revision();

        let outcome = match op {
            Op::Add { ids, value, at } => Position::try_from(locator(at)).and_then(|at| {
                collection.add(ids.iter().take(8).map(|&id| doc(id, *value)), at)
            }),
            Op::RemoveAt(n) => collection.remove(RemoveTarget::Index(usize::from(*n)), None),
            Op::RemoveKey(id) => collection.remove(RemoveTarget::ByKey(key(*id)), None),
            Op::RemoveBelow { limit, amount } => {
                let limit = i64::from(*limit);
                collection.remove(
                    RemoveTarget::matching(move |_: &DocumentKey, r: &Document| value_of(r) < limit),
                    amount.map(usize::from),
                )
            }
            Op::Sort { by_value, descending } => {
                let field = if *by_value { "value" } else { "id" };
                let direction = if *descending { Direction::Descending } else { Direction::Ascending };
                collection.reorder(Reorder::by_field(field, direction))
            }
            Op::Move { from, to } => Target::try_from(locator(from))
                .and_then(|from| Ok((from, Destination::try_from(locator(to))?)))
                .and_then(|(from, to)| collection.move_record(from, to)),
            Op::Update { target, value, rekey } => {
                let mut patch = Document::new().with("value", i64::from(*value));
                if let Some(id) = rekey {
                    patch.set("id", format!("k{id}"));
                }
                Target::try_from(locator(target)).and_then(|target| collection.update(target, patch))
            }
            Op::Replace(ids) => collection.replace(ids.iter().take(16).map(|&id| doc(id, 0))),
        };

        if outcome.is_err() {
            assert!(collection.snapshot().ptr_eq(&before));
            assert_eq!(collection.revision(), revision);
        }

        let mut seen = HashSet::new();
        for record in collection.records() {
            let held = record.key("id").expect("every record carries an identifier");
            assert!(seen.insert(held), "duplicate identifier after {op:?}");
        }
        assert_eq!(collection.keyed().len(), collection.len());
    }
});
