//! Reference model - a deliberately naive collection
//!
//! The model keeps a plain `Vec<Document>` and applies each action the
//! most direct way it can: anchors are looked up after the moved record is
//! taken out, sorts use the standard library, and every check is a linear
//! scan. The fuzzer compares the engine against it after every step.

use ordo_core::{Document, DocumentKey, Locator, OrdoError, OrdoResult, Record};
use ordo_engine::Direction;
use serde_json::Value;

pub const IDENTIFIER: &str = "id";

/// One generated action, in a form both sides can replay
#[derive(Clone, Debug)]
pub enum FuzzAction {
    Add {
        records: Vec<Document>,
        target: Locator<DocumentKey>,
    },
    RemoveAt(usize),
    RemoveKey(DocumentKey),
    /// Remove records whose `value` is divisible by `modulus`
    RemoveMatching {
        modulus: i64,
        amount: Option<usize>,
    },
    SortBy {
        field: &'static str,
        direction: Direction,
    },
    /// Even `value`s first, otherwise stable
    SortByParity,
    Move {
        from: Locator<DocumentKey>,
        to: Locator<DocumentKey>,
    },
    Update {
        target: Locator<DocumentKey>,
        patch: Document,
    },
    Replace(Vec<Document>),
}

/// `value` field as an integer, zero when absent
pub fn value_of(record: &Document) -> i64 {
    record.get("value").and_then(Value::as_i64).unwrap_or(0)
}

fn key_of(record: &Document) -> Option<DocumentKey> {
    record.key(IDENTIFIER)
}

fn rejected(kind: &str, action: &str) -> OrdoError {
    OrdoError::InvalidArgument(format!("{kind} locator is not accepted by {action}"))
}

#[derive(Clone, Debug, Default)]
pub struct ReferenceModel {
    records: Vec<Document>,
}

impl ReferenceModel {
    pub fn new(records: Vec<Document>) -> Self {
        ReferenceModel { records }
    }

    pub fn records(&self) -> &[Document] {
        &self.records
    }

    fn index_of(&self, key: &DocumentKey) -> Option<usize> {
        self.records.iter().position(|r| key_of(r).as_ref() == Some(key))
    }

    fn holds(&self, key: &DocumentKey) -> bool {
        self.index_of(key).is_some()
    }

    /// Apply one action; on error the model is left untouched
    pub fn apply(&mut self, action: &FuzzAction) -> OrdoResult<()> {
        match action {
            FuzzAction::Add { records, target } => self.add(records, target),
            FuzzAction::RemoveAt(index) => {
                if *index < self.records.len() {
                    self.records.remove(*index);
                }
                Ok(())
            }
            FuzzAction::RemoveKey(key) => {
                self.records.retain(|r| key_of(r).as_ref() != Some(key));
                Ok(())
            }
            FuzzAction::RemoveMatching { modulus, amount } => {
                let mut budget = match amount {
                    Some(n) if *n > 0 => *n,
                    _ => usize::MAX,
                };
                self.records.retain(|r| {
                    if budget > 0 && value_of(r) % modulus == 0 {
                        budget -= 1;
                        false
                    } else {
                        true
                    }
                });
                Ok(())
            }
            FuzzAction::SortBy { field, direction } => {
                let compare = |a: &Document, b: &Document| match *field {
                    "value" => value_of(a).cmp(&value_of(b)),
                    _ => text_of(a, field).cmp(&text_of(b, field)),
                };
                self.records.sort_by(compare);
                if *direction == Direction::Descending {
                    self.records.reverse();
                }
                Ok(())
            }
            FuzzAction::SortByParity => {
                self.records.sort_by_key(|r| value_of(r).rem_euclid(2));
                Ok(())
            }
            FuzzAction::Move { from, to } => self.move_record(from, to),
            FuzzAction::Update { target, patch } => self.update(target, patch),
            FuzzAction::Replace(records) => {
                let mut seen: Vec<DocumentKey> = Vec::new();
                for (position, record) in records.iter().enumerate() {
                    let key = key_of(record).ok_or_else(|| OrdoError::missing_identifier(IDENTIFIER, position))?;
                    if seen.contains(&key) {
                        return Err(OrdoError::duplicate(&key));
                    }
                    seen.push(key);
                }
                self.records = records.clone();
                Ok(())
            }
        }
    }

    fn add(&mut self, batch: &[Document], target: &Locator<DocumentKey>) -> OrdoResult<()> {
        if let Locator::ByKey(_) = target {
            return Err(rejected("key", "add"));
        }

        let mut keys = Vec::with_capacity(batch.len());
        for (position, record) in batch.iter().enumerate() {
            keys.push(key_of(record).ok_or_else(|| OrdoError::missing_identifier(IDENTIFIER, position))?);
        }

        let at = match target {
            Locator::Index(n) => (*n).min(self.records.len()),
            Locator::Start | Locator::ByKey(_) => 0,
            Locator::End => self.records.len(),
            Locator::Before(anchor) => self.index_of(anchor).ok_or_else(|| OrdoError::not_found(target))?,
            Locator::After(anchor) => self.index_of(anchor).ok_or_else(|| OrdoError::not_found(target))? + 1,
        };

        for (i, key) in keys.iter().enumerate() {
            if self.holds(key) || keys[..i].contains(key) {
                return Err(OrdoError::duplicate(key));
            }
        }

        let tail = self.records.split_off(at);
        self.records.extend(batch.iter().cloned());
        self.records.extend(tail);
        Ok(())
    }

    fn move_record(&mut self, from: &Locator<DocumentKey>, to: &Locator<DocumentKey>) -> OrdoResult<()> {
        let source = match from {
            Locator::Index(i) => Some(*i),
            Locator::ByKey(key) => self.index_of(key),
            _ => return Err(rejected("from", "move")),
        };
        if matches!(to, Locator::ByKey(_) | Locator::Start | Locator::End) {
            return Err(rejected("to", "move"));
        }

        let len = self.records.len();
        let source = source.ok_or_else(|| OrdoError::not_found(from))?;
        if source >= len {
            return Err(OrdoError::InvalidArgument("source".into()));
        }

        let final_index = match to {
            Locator::Index(n) => {
                if *n >= len {
                    return Err(OrdoError::InvalidArgument("destination".into()));
                }
                *n
            }
            Locator::Before(anchor) | Locator::After(anchor) => {
                if !self.holds(anchor) {
                    return Err(OrdoError::not_found(to));
                }
                let mut rest = self.records.clone();
                rest.remove(source);
                match rest.iter().position(|r| key_of(r).as_ref() == Some(anchor)) {
                    // the anchor was the moved record itself
                    None => return Err(OrdoError::InvalidMove { index: source }),
                    Some(j) if matches!(to, Locator::Before(_)) => j,
                    Some(j) => j + 1,
                }
            }
            Locator::ByKey(_) | Locator::Start | Locator::End => return Err(rejected("to", "move")),
        };

        if final_index == source {
            return Err(OrdoError::InvalidMove { index: source });
        }
        let record = self.records.remove(source);
        self.records.insert(final_index, record);
        Ok(())
    }

    fn update(&mut self, target: &Locator<DocumentKey>, patch: &Document) -> OrdoResult<()> {
        let index = match target {
            Locator::Index(i) => Some(*i).filter(|&i| i < self.records.len()),
            Locator::ByKey(key) => self.index_of(key),
            _ => return Err(rejected("target", "update")),
        }
        .ok_or_else(|| OrdoError::not_found(target))?;

        let merged = self.records[index].merge(patch);
        let new_key = key_of(&merged).ok_or_else(|| OrdoError::missing_identifier(IDENTIFIER, index))?;
        let clash = self
            .records
            .iter()
            .enumerate()
            .any(|(i, r)| i != index && key_of(r).as_ref() == Some(&new_key));
        if clash {
            return Err(OrdoError::duplicate(&new_key));
        }
        self.records[index] = merged;
        Ok(())
    }
}

fn text_of<'a>(record: &'a Document, field: &str) -> &'a str {
    record.get(field).and_then(Value::as_str).unwrap_or("")
}

/// Whether two outcomes agree on success, or on the kind of failure
pub fn same_outcome(left: &OrdoResult<()>, right: &OrdoResult<()>) -> bool {
    match (left, right) {
        (Ok(()), Ok(())) => true,
        (Err(a), Err(b)) => std::mem::discriminant(a) == std::mem::discriminant(b),
        _ => false,
    }
}

impl PartialEq<[Document]> for ReferenceModel {
    fn eq(&self, other: &[Document]) -> bool {
        self.records.as_slice() == other
    }
}
