//! Action Fuzzer - Differential testing for collection actions
//!
//! Tests:
//! - Engine and reference model agree on every outcome
//! - Identifiers stay unique
//! - Failed actions leave snapshot and revision untouched
//! - The keyed view mirrors the sequence

use ordo_core::{Destination, Document, DocumentKey, Locator, OrdoResult, Position, Target};
use ordo_engine::{Direction, RemoveTarget, Reorder};
use ordo_store::Collection;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::model::{same_outcome, value_of, FuzzAction, ReferenceModel, IDENTIFIER};

/// Fuzzer configuration
#[derive(Clone, Debug)]
pub struct FuzzerConfig {
    /// Records in the starting collection
    pub initial_records: usize,
    /// Number of actions to generate
    pub action_count: usize,
    /// Distinct identifiers to draw from
    pub key_space: u32,
    /// Probability that a generated locator uses a variant the action rejects
    pub bad_locator_prob: f64,
    /// Random seed
    pub seed: u64,
}

impl Default for FuzzerConfig {
    fn default() -> Self {
        FuzzerConfig {
            initial_records: 10,
            action_count: 1000,
            key_space: 40,
            bad_locator_prob: 0.05,
            seed: 42,
        }
    }
}

impl FuzzerConfig {
    /// Light fuzzing for quick tests
    pub fn light() -> Self {
        FuzzerConfig {
            initial_records: 4,
            action_count: 100,
            key_space: 12,
            bad_locator_prob: 0.0,
            seed: 42,
        }
    }

    /// Heavy fuzzing for thorough testing
    pub fn heavy() -> Self {
        FuzzerConfig {
            initial_records: 50,
            action_count: 10000,
            key_space: 200,
            bad_locator_prob: 0.1,
            seed: 42,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Replay one action against a collection
pub fn apply_action(collection: &mut Collection<Document>, action: &FuzzAction) -> OrdoResult<()> {
    match action.clone() {
        FuzzAction::Add { records, target } => collection.add(records, Position::try_from(target)?),
        FuzzAction::RemoveAt(index) => collection.remove(RemoveTarget::Index(index), None),
        FuzzAction::RemoveKey(key) => collection.remove(RemoveTarget::ByKey(key), None),
        FuzzAction::RemoveMatching { modulus, amount } => collection.remove(
            RemoveTarget::matching(move |_: &DocumentKey, record: &Document| value_of(record) % modulus == 0),
            amount,
        ),
        FuzzAction::SortBy { field, direction } => collection.reorder(Reorder::by_field(field, direction)),
        FuzzAction::SortByParity => collection.reorder(Reorder::<Document>::with(|a, b| {
            value_of(a.record).rem_euclid(2).cmp(&value_of(b.record).rem_euclid(2))
        })),
        FuzzAction::Move { from, to } => {
            let from = Target::try_from(from)?;
            let to = Destination::try_from(to)?;
            collection.move_record(from, to)
        }
        FuzzAction::Update { target, patch } => collection.update(Target::try_from(target)?, patch),
        FuzzAction::Replace(records) => collection.replace(records),
    }
}

/// Collection fuzzer
pub struct ActionFuzzer {
    config: FuzzerConfig,
    rng: StdRng,
    collection: Collection<Document>,
    model: ReferenceModel,
}

impl ActionFuzzer {
    pub fn new(config: FuzzerConfig) -> OrdoResult<Self> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let starting: Vec<Document> = (0..config.initial_records.min(config.key_space as usize))
            .map(|n| record(&format!("k{n}"), rng.gen_range(0..100)))
            .collect();

        Ok(ActionFuzzer {
            collection: Collection::with_records(starting.clone())?,
            model: ReferenceModel::new(starting),
            config,
            rng,
        })
    }

    pub fn collection(&self) -> &Collection<Document> {
        &self.collection
    }

    fn random_key(&mut self) -> DocumentKey {
        DocumentKey::Text(format!("k{}", self.rng.gen_range(0..self.config.key_space)))
    }

    /// A key that is usually held by the collection
    fn likely_key(&mut self) -> DocumentKey {
        let records = self.model.records();
        if !records.is_empty() && self.rng.gen_bool(0.8) {
            let index = self.rng.gen_range(0..records.len());
            if let Some(key) = records[index].get(IDENTIFIER).and_then(DocumentKey::from_value) {
                return key;
            }
        }
        self.random_key()
    }

    fn random_index(&mut self) -> usize {
        let len = self.model.records().len();
        self.rng.gen_range(0..len + 2)
    }

    fn random_locator(&mut self) -> Locator<DocumentKey> {
        match self.rng.gen_range(0..6) {
            0 => Locator::Index(self.random_index()),
            1 => Locator::ByKey(self.likely_key()),
            2 => Locator::Before(self.likely_key()),
            3 => Locator::After(self.likely_key()),
            4 => Locator::Start,
            _ => Locator::End,
        }
    }

    /// A locator of the wanted shape, or occasionally any shape at all
    fn locator_or_stray(&mut self, wanted: impl FnOnce(&mut Self) -> Locator<DocumentKey>) -> Locator<DocumentKey> {
        if self.rng.gen_bool(self.config.bad_locator_prob) {
            self.random_locator()
        } else {
            wanted(self)
        }
    }

    fn random_record(&mut self) -> Document {
        let key = self.random_key();
        let value = self.rng.gen_range(0..100);
        record(&key.to_string(), value)
    }

    fn generate_action(&mut self) -> FuzzAction {
        match self.rng.gen_range(0..10) {
            0 | 1 => {
                let count = self.rng.gen_range(1..=3);
                let records = (0..count).map(|_| self.random_record()).collect();
                let target = self.locator_or_stray(|f| match f.rng.gen_range(0..5) {
                    0 => Locator::Index(f.random_index()),
                    1 => Locator::Start,
                    2 => Locator::End,
                    3 => Locator::Before(f.likely_key()),
                    _ => Locator::After(f.likely_key()),
                });
                FuzzAction::Add { records, target }
            }
            2 => FuzzAction::RemoveAt(self.random_index()),
            3 => FuzzAction::RemoveKey(self.likely_key()),
            4 => FuzzAction::RemoveMatching {
                modulus: self.rng.gen_range(2..7),
                amount: if self.rng.gen_bool(0.5) {
                    None
                } else {
                    Some(self.rng.gen_range(0..4))
                },
            },
            5 => {
                let direction = if self.rng.gen_bool(0.5) {
                    Direction::Ascending
                } else {
                    Direction::Descending
                };
                if self.rng.gen_bool(0.2) {
                    FuzzAction::SortByParity
                } else {
                    let field = if self.rng.gen_bool(0.5) { "value" } else { IDENTIFIER };
                    FuzzAction::SortBy { field, direction }
                }
            }
            6 | 7 => {
                let from = self.locator_or_stray(|f| {
                    if f.rng.gen_bool(0.5) {
                        Locator::Index(f.random_index())
                    } else {
                        Locator::ByKey(f.likely_key())
                    }
                });
                let to = self.locator_or_stray(|f| match f.rng.gen_range(0..3) {
                    0 => Locator::Index(f.random_index()),
                    1 => Locator::Before(f.likely_key()),
                    _ => Locator::After(f.likely_key()),
                });
                FuzzAction::Move { from, to }
            }
            8 => {
                let target = self.locator_or_stray(|f| {
                    if f.rng.gen_bool(0.5) {
                        Locator::Index(f.random_index())
                    } else {
                        Locator::ByKey(f.likely_key())
                    }
                });
                let mut patch = Document::new().with("value", self.rng.gen_range(0..100i64));
                if self.rng.gen_bool(0.2) {
                    patch.set(IDENTIFIER, self.random_key().to_string());
                }
                FuzzAction::Update { target, patch }
            }
            _ => {
                if self.rng.gen_bool(0.7) {
                    // Mostly rebuild from a handful of fresh records
                    let count = self.rng.gen_range(0..6);
                    FuzzAction::Replace((0..count).map(|_| self.random_record()).collect())
                } else {
                    FuzzAction::RemoveAt(self.random_index())
                }
            }
        }
    }

    /// Run the fuzzer
    pub fn run(&mut self) -> FuzzResult {
        let mut result = FuzzResult::new();

        for step in 0..self.config.action_count {
            let action = self.generate_action();
            let before = self.collection.snapshot();
            let revision = self.collection.revision();

            let engine = apply_action(&mut self.collection, &action);
            let mut model = self.model.clone();
            let expected = model.apply(&action);

            match &engine {
                Ok(()) => result.actions_applied += 1,
                Err(_) => {
                    result.actions_rejected += 1;
                    if !self.collection.snapshot().ptr_eq(&before) || self.collection.revision() != revision {
                        result.rollback_violations += 1;
                    }
                }
            }

            if !same_outcome(&engine, &expected) {
                result
                    .mismatches
                    .push(format!("step {step}: {action:?} engine {engine:?} model {expected:?}"));
            }
            if expected.is_ok() {
                self.model = model;
            }
            if self.model != *self.collection.records() {
                result.mismatches.push(format!("step {step}: {action:?} left diverging records"));
                // resynchronize so one defect is not reported on every later step
                self.model = ReferenceModel::new(self.collection.records().to_vec());
            }

            result.invariant_violations += self.check_invariants();
        }

        debug!(
            applied = result.actions_applied,
            rejected = result.actions_rejected,
            mismatches = result.mismatches.len(),
            "fuzz run finished"
        );
        result
    }

    fn check_invariants(&self) -> u32 {
        let mut violations = 0;
        if !properties::keys_unique(self.collection.records()) {
            violations += 1;
        }
        if !properties::view_matches_sequence(&self.collection) {
            violations += 1;
        }
        violations
    }
}

fn record(id: &str, value: i64) -> Document {
    Document::new().with(IDENTIFIER, id).with("value", value)
}

/// Fuzzing result
#[derive(Debug, Default)]
pub struct FuzzResult {
    pub actions_applied: u64,
    pub actions_rejected: u64,
    /// Steps where engine and model disagreed
    pub mismatches: Vec<String>,
    /// Failed actions that still changed the collection
    pub rollback_violations: u32,
    pub invariant_violations: u32,
}

impl FuzzResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.mismatches.is_empty() && self.rollback_violations == 0 && self.invariant_violations == 0
    }
}

/// Property-based test helpers
pub mod properties {
    use std::collections::HashSet;

    use ordo_core::Record;
    use ordo_engine::{ActionSet, Sequence};

    use super::*;

    /// Property: No two records share an identifier
    pub fn keys_unique(records: &[Document]) -> bool {
        let mut seen = HashSet::new();
        records
            .iter()
            .all(|r| r.key(IDENTIFIER).is_some_and(|key| seen.insert(key)))
    }

    /// Property: The keyed view holds every record, in sequence order
    pub fn view_matches_sequence(collection: &Collection<Document>) -> bool {
        let keyed = collection.keyed();
        keyed.len() == collection.len()
            && keyed
                .iter()
                .zip(collection.records())
                .all(|((_, viewed), record)| std::ptr::eq(viewed, record))
    }

    /// Property: Adding a fresh record and removing it by key restores the sequence
    pub fn add_remove_inverse(actions: &ActionSet<Document>, sequence: &Sequence<Document>, fresh: Document, at: Position<DocumentKey>) -> bool {
        let Some(key) = fresh.key(IDENTIFIER) else {
            return false;
        };
        if sequence.contains_key(IDENTIFIER, &key) {
            return false;
        }
        let restored = actions
            .add(sequence, [fresh], at)
            .and_then(|added| actions.remove(&added, RemoveTarget::ByKey(key), None));
        matches!(restored, Ok(restored) if restored == *sequence)
    }

    /// Property: Moving a record away and back by index restores the sequence
    pub fn move_round_trip(actions: &ActionSet<Document>, sequence: &Sequence<Document>, from: usize, to: usize) -> bool {
        if from == to || from >= sequence.len() || to >= sequence.len() {
            return true;
        }
        let restored = actions
            .move_record(sequence, Target::Index(from), Destination::Index(to))
            .and_then(|moved| actions.move_record(&moved, Target::Index(to), Destination::Index(from)));
        matches!(restored, Ok(restored) if restored == *sequence)
    }

    /// Property: Records with equal field values keep their relative order
    /// ascending, and come out in reverse relative order descending
    pub fn reorder_stable(actions: &ActionSet<Document>, sequence: &Sequence<Document>, field: &str, direction: Direction) -> bool {
        let Ok(sorted) = actions.reorder(sequence, Reorder::by_field(field, direction)) else {
            return false;
        };
        let original: Vec<_> = sequence.keys(IDENTIFIER).collect();
        let rank = |key: &DocumentKey| original.iter().position(|k| k == key);

        sorted.as_slice().windows(2).all(|pair| {
            if pair[0].get(field) != pair[1].get(field) {
                return true;
            }
            match (pair[0].key(IDENTIFIER), pair[1].key(IDENTIFIER)) {
                (Some(a), Some(b)) => match direction {
                    Direction::Ascending => rank(&a) < rank(&b),
                    Direction::Descending => rank(&a) > rank(&b),
                },
                _ => false,
            }
        })
    }

    /// Property: A descending reorder is the ascending result reversed
    pub fn descending_reverses_ascending(actions: &ActionSet<Document>, sequence: &Sequence<Document>, field: &str) -> bool {
        let up = actions.reorder(sequence, Reorder::by_field(field, Direction::Ascending));
        let down = actions.reorder(sequence, Reorder::by_field(field, Direction::Descending));
        match (up, down) {
            (Ok(up), Ok(down)) => up.as_slice().iter().rev().eq(down.as_slice()),
            _ => false,
        }
    }

    /// Property: Reorder keeps exactly the same records
    pub fn reorder_is_permutation(before: &Sequence<Document>, after: &Sequence<Document>) -> bool {
        let mut left: Vec<_> = before.keys(IDENTIFIER).collect();
        let mut right: Vec<_> = after.keys(IDENTIFIER).collect();
        left.sort();
        right.sort();
        left == right
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordo_engine::ActionSet;

    #[test]
    fn test_fuzzer_light() {
        let mut fuzzer = ActionFuzzer::new(FuzzerConfig::light()).unwrap();
        let result = fuzzer.run();
        assert!(result.is_valid(), "{:#?}", result.mismatches);
        assert!(result.actions_applied > 0);
    }

    #[test]
    fn test_fuzzer_default() {
        let mut fuzzer = ActionFuzzer::new(FuzzerConfig::default()).unwrap();
        let result = fuzzer.run();
        assert!(result.is_valid(), "{:#?}", result.mismatches);
        assert!(result.actions_rejected > 0);
    }

    #[test]
    fn test_fuzzer_many_seeds() {
        for seed in 0..20 {
            let mut fuzzer = ActionFuzzer::new(FuzzerConfig::light().with_seed(seed)).unwrap();
            let result = fuzzer.run();
            assert!(result.is_valid(), "seed {seed}: {:#?}", result.mismatches);
        }
    }

    #[test]
    #[ignore] // Run with --ignored for heavy testing
    fn test_fuzzer_heavy() {
        let mut fuzzer = ActionFuzzer::new(FuzzerConfig::heavy()).unwrap();
        let result = fuzzer.run();
        assert!(result.is_valid(), "{:#?}", result.mismatches);
    }

    #[test]
    fn test_rejected_locator_variant() {
        let mut collection = Collection::with_records(vec![record("a", 1)]).unwrap();
        let action = FuzzAction::Move {
            from: Locator::Start,
            to: Locator::Index(0),
        };
        let mut model = ReferenceModel::new(collection.records().to_vec());
        assert!(same_outcome(&apply_action(&mut collection, &action), &model.apply(&action)));
        assert_eq!(collection.revision(), 0);
    }

    #[test]
    fn test_properties_on_fixed_sequence() {
        let actions = ActionSet::<Document>::default();
        let sequence = actions
            .replace(vec![record("a", 2), record("b", 1), record("c", 2), record("d", 1)])
            .unwrap();

        assert!(properties::keys_unique(sequence.as_slice()));
        assert!(properties::add_remove_inverse(&actions, &sequence, record("z", 0), Position::Index(2)));
        assert!(!properties::add_remove_inverse(&actions, &sequence, record("a", 0), Position::End));
        assert!(properties::move_round_trip(&actions, &sequence, 0, 3));
        assert!(properties::reorder_stable(&actions, &sequence, "value", Direction::Ascending));
        assert!(properties::reorder_stable(&actions, &sequence, "value", Direction::Descending));
        assert!(properties::descending_reverses_ascending(&actions, &sequence, "value"));
    }

    #[test]
    fn test_model_descending_matches_engine_on_ties() {
        let records = vec![record("a", 1), record("b", 2), record("c", 1), record("d", 2)];
        let mut collection = Collection::with_records(records.clone()).unwrap();
        let mut model = ReferenceModel::new(records);
        let action = FuzzAction::SortBy {
            field: "value",
            direction: Direction::Descending,
        };

        assert!(same_outcome(&apply_action(&mut collection, &action), &model.apply(&action)));
        assert!(model == *collection.records());
        let ids: Vec<String> = collection.keyed().keys().map(|k| k.to_string()).collect();
        assert_eq!(ids, ["d", "b", "c", "a"]);
    }

    #[test]
    fn test_model_zero_amount_removes_every_match() {
        let records = vec![record("a", 2), record("b", 3), record("c", 4)];
        let mut collection = Collection::with_records(records.clone()).unwrap();
        let mut model = ReferenceModel::new(records);
        let action = FuzzAction::RemoveMatching {
            modulus: 2,
            amount: Some(0),
        };

        assert!(same_outcome(&apply_action(&mut collection, &action), &model.apply(&action)));
        assert!(model == *collection.records());
        assert_eq!(collection.len(), 1);
    }
}
