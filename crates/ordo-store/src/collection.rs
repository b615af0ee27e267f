//! Collection - the single-writer store
//!
//! The collection owns the current snapshot. Each action runs against it,
//! and only a successful result replaces it. `&mut self` on every action
//! keeps one writer at a time.

use ordo_core::{
    CollectionConfig, Destination, OrdoResult, Policies, Position, Record, Target, Transformer,
};
use ordo_engine::{ActionSet, RemoveTarget, Reorder, Sequence};
use tracing::{debug, info};

use crate::{KeyedView, View};

/// Authoritative holder of an ordered keyed collection
#[derive(Debug)]
pub struct Collection<R: Record> {
    config: CollectionConfig,
    actions: ActionSet<R>,
    current: Sequence<R>,
    /// Number of committed changes since initialization
    revision: u64,
}

impl<R: Record> Collection<R> {
    /// Create a collection from starting records
    pub fn new<I>(starting: I, config: CollectionConfig, policies: Policies<R>) -> OrdoResult<Self>
    where
        I: IntoIterator<Item = R>,
    {
        config.validate()?;
        let actions = ActionSet::from_config(&config, policies);
        let current = actions.replace(starting)?;

        info!(
            len = current.len(),
            identifier = %config.identifier,
            transformer = ?config.transformer,
            "collection initialized"
        );

        Ok(Collection {
            config,
            actions,
            current,
            revision: 0,
        })
    }

    /// Create a collection with the default configuration and no policies
    pub fn with_records<I>(starting: I) -> OrdoResult<Self>
    where
        I: IntoIterator<Item = R>,
    {
        Self::new(starting, CollectionConfig::default(), Policies::new())
    }

    fn commit(&mut self, next: Sequence<R>) {
        if next.ptr_eq(&self.current) {
            return;
        }
        self.current = next;
        self.revision += 1;
        debug!(revision = self.revision, len = self.current.len(), "snapshot committed");
    }

    pub fn add<I>(&mut self, records: I, target: Position<R::Key>) -> OrdoResult<()>
    where
        I: IntoIterator<Item = R>,
    {
        let next = self.actions.add(&self.current, records, target)?;
        self.commit(next);
        Ok(())
    }

    pub fn remove(&mut self, target: RemoveTarget<'_, R>, amount: Option<usize>) -> OrdoResult<()> {
        let next = self.actions.remove(&self.current, target, amount)?;
        self.commit(next);
        Ok(())
    }

    pub fn reorder(&mut self, command: Reorder<'_, R>) -> OrdoResult<()> {
        let next = self.actions.reorder(&self.current, command)?;
        self.commit(next);
        Ok(())
    }

    pub fn move_record(&mut self, from: Target<R::Key>, to: Destination<R::Key>) -> OrdoResult<()> {
        let next = self.actions.move_record(&self.current, from, to)?;
        self.commit(next);
        Ok(())
    }

    /// Rekeying patches are checked for uniqueness before commit
    pub fn update(&mut self, target: Target<R::Key>, changes: R::Patch) -> OrdoResult<()> {
        let next = self.actions.update(&self.current, target, changes)?;
        self.commit(next);
        Ok(())
    }

    /// Swap in a whole new set of records
    pub fn replace<I>(&mut self, records: I) -> OrdoResult<()>
    where
        I: IntoIterator<Item = R>,
    {
        let next = self.actions.replace(records)?;
        info!(len = next.len(), "collection replaced");
        self.commit(next);
        Ok(())
    }

    /// Cheap handle on the current snapshot
    pub fn snapshot(&self) -> Sequence<R> {
        self.current.clone()
    }

    pub fn records(&self) -> &[R] {
        self.current.as_slice()
    }

    pub fn get(&self, key: &R::Key) -> Option<&R> {
        self.current.find(&self.config.identifier, key)
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    pub fn actions(&self) -> &ActionSet<R> {
        &self.actions
    }

    /// Keyed projection of the current snapshot
    pub fn keyed(&self) -> KeyedView<'_, R> {
        KeyedView::build(self.current.as_slice(), &self.config.identifier)
    }

    /// Projection selected by the configured transformer
    pub fn view(&self) -> View<'_, R> {
        match self.config.transformer {
            Transformer::Object => View::Keyed(self.keyed()),
            Transformer::Array => View::Array(self.current.as_slice()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordo_core::{Document, DocumentKey, OrdoError};
    use ordo_engine::Direction;
    use serde_json::{json, Value};

    fn doc(value: Value) -> Document {
        Document::from_value(value).unwrap()
    }

    fn key(s: &str) -> DocumentKey {
        DocumentKey::from(s)
    }

    fn ids(collection: &Collection<Document>) -> Vec<String> {
        collection.keyed().keys().map(|k| k.to_string()).collect()
    }

    fn basic() -> Collection<Document> {
        Collection::with_records(vec![
            doc(json!({ "id": "c", "value": 30 })),
            doc(json!({ "id": "e", "value": 50 })),
        ])
        .unwrap()
    }

    #[test]
    fn test_collection_basic_scenario() {
        let mut collection = basic();
        assert_eq!(
            serde_json::to_value(collection.view()).unwrap(),
            json!({ "c": { "id": "c", "value": 30 }, "e": { "id": "e", "value": 50 } })
        );

        collection.add([doc(json!({ "id": "g", "value": 70 }))], Position::End).unwrap();
        assert_eq!(ids(&collection), ["c", "e", "g"]);

        collection
            .add(
                vec![doc(json!({ "id": "a", "value": 10 })), doc(json!({ "id": "h", "value": 80 }))],
                Position::Start,
            )
            .unwrap();
        assert_eq!(ids(&collection), ["a", "h", "c", "e", "g"]);

        collection.add([doc(json!({ "id": "b", "value": 20 }))], Position::Index(1)).unwrap();
        assert_eq!(ids(&collection), ["a", "b", "h", "c", "e", "g"]);

        collection
            .add([doc(json!({ "id": "d", "value": 40 }))], Position::Before(key("e")))
            .unwrap();
        collection
            .add([doc(json!({ "id": "f", "value": 60 }))], Position::After(key("e")))
            .unwrap();
        assert_eq!(ids(&collection), ["a", "b", "h", "c", "d", "e", "f", "g"]);

        collection.reorder(Reorder::by_field("id", Direction::Ascending)).unwrap();
        assert_eq!(ids(&collection), ["a", "b", "c", "d", "e", "f", "g", "h"]);

        collection.reorder(Reorder::by_field("value", Direction::Descending)).unwrap();
        assert_eq!(ids(&collection), ["h", "g", "f", "e", "d", "c", "b", "a"]);

        assert_eq!(collection.revision(), 7);
    }

    #[test]
    fn test_failed_action_leaves_collection_unchanged() {
        let mut collection = basic();
        let before = collection.snapshot();

        let err = collection
            .add([doc(json!({ "id": "c", "value": 1 }))], Position::End)
            .unwrap_err();
        assert!(matches!(err, OrdoError::DuplicateIdentifier(_)));
        assert!(collection.snapshot().ptr_eq(&before));
        assert_eq!(collection.revision(), 0);
    }

    #[test]
    fn test_noop_does_not_bump_revision() {
        let mut collection = basic();
        collection.remove(RemoveTarget::ByKey(key("zz")), None).unwrap();
        assert_eq!(collection.revision(), 0);

        collection.remove(RemoveTarget::ByKey(key("c")), None).unwrap();
        assert_eq!(collection.revision(), 1);
        assert_eq!(ids(&collection), ["e"]);
    }

    #[test]
    fn test_update_move_and_replace() {
        let mut collection = basic();

        collection.update(Target::ByKey(key("c")), doc(json!({ "value": 31 }))).unwrap();
        assert_eq!(collection.get(&key("c")).unwrap().get("value"), Some(&json!(31)));

        collection.move_record(Target::Index(0), Destination::After(key("e"))).unwrap();
        assert_eq!(ids(&collection), ["e", "c"]);

        collection.replace([doc(json!({ "id": "x" }))]).unwrap();
        assert_eq!(ids(&collection), ["x"]);
        assert_eq!(collection.revision(), 3);

        assert!(collection.replace([doc(json!({ "name": "no id" }))]).is_err());
        assert_eq!(ids(&collection), ["x"]);
    }

    #[test]
    fn test_snapshot_survives_later_changes() {
        let mut collection = basic();
        let old = collection.snapshot();
        collection.remove(RemoveTarget::Index(0), None).unwrap();
        assert_eq!(old.len(), 2);
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_array_transformer_and_custom_identifier() {
        let config = CollectionConfig::default()
            .with_transformer(Transformer::Array)
            .with_identifier("uid");
        let collection = Collection::new(
            vec![doc(json!({ "uid": 2 })), doc(json!({ "uid": 1 }))],
            config,
            Policies::new(),
        )
        .unwrap();

        let view = collection.view();
        assert_eq!(view.as_array().map(<[Document]>::len), Some(2));
        assert!(view.as_keyed().is_none());
        assert!(collection.get(&DocumentKey::Int(1)).is_some());
    }

    #[test]
    fn test_initialization_requires_identifier() {
        let err = Collection::with_records(vec![doc(json!({ "value": 1 }))]).unwrap_err();
        assert_eq!(err, OrdoError::missing_identifier("id", 0));
    }

    #[test]
    fn test_initialization_with_auto_id() {
        let config = CollectionConfig::default().with_auto_id(true);
        let collection =
            Collection::new(vec![doc(json!({ "value": 1 }))], config, Policies::new()).unwrap();
        assert_eq!(collection.keyed().len(), 1);
    }
}
