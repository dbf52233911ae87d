use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use bootcamp_query::FindOptions;
use bson::Document;

use crate::error::StoreError;
use crate::exec::apply_find_options;
use crate::lookup::Lookup;
use crate::matcher::Predicate;
use crate::record::{apply_update, parse_id, prepare_new};
use crate::store::Store;

type Records = BTreeMap<String, Document>;

/// Process-local store. Contents are lost on drop.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Records>, StoreError> {
        self.records
            .read()
            .map_err(|_| StoreError::Storage("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Records>, StoreError> {
        self.records
            .write()
            .map_err(|_| StoreError::Storage("memory store lock poisoned".into()))
    }
}

impl Store for MemoryStore {
    fn find(&self, filter: &Document, options: &FindOptions) -> Result<Vec<Document>, StoreError> {
        let predicate = Predicate::compile(filter)?;
        let matched: Vec<Document> = self
            .read()?
            .values()
            .filter(|doc| predicate.matches(doc))
            .cloned()
            .collect();
        Ok(apply_find_options(matched, options))
    }

    fn count(&self, filter: &Document) -> Result<u64, StoreError> {
        let predicate = Predicate::compile(filter)?;
        let count = self
            .read()?
            .values()
            .filter(|doc| predicate.matches(doc))
            .count();
        Ok(count as u64)
    }

    fn find_by_id(&self, id: &str) -> Result<Lookup<Document>, StoreError> {
        let key = parse_id(id)?.to_hex();
        Ok(self.read()?.get(&key).cloned().into())
    }

    fn insert(&self, doc: Document) -> Result<Document, StoreError> {
        let mut inserted = self.insert_many(vec![doc])?;
        inserted
            .pop()
            .ok_or_else(|| StoreError::Storage("insert produced no document".into()))
    }

    fn insert_many(&self, docs: Vec<Document>) -> Result<Vec<Document>, StoreError> {
        let prepared = docs
            .into_iter()
            .map(prepare_new)
            .collect::<Result<Vec<_>, _>>()?;

        let mut records = self.write()?;
        for (i, (key, _)) in prepared.iter().enumerate() {
            if records.contains_key(key) || prepared[..i].iter().any(|(k, _)| k == key) {
                return Err(StoreError::DuplicateKey(key.clone()));
            }
        }

        let mut inserted = Vec::with_capacity(prepared.len());
        for (key, doc) in prepared {
            records.insert(key, doc.clone());
            inserted.push(doc);
        }
        Ok(inserted)
    }

    fn update_by_id(&self, id: &str, patch: Document) -> Result<Lookup<Document>, StoreError> {
        let key = parse_id(id)?.to_hex();
        let mut records = self.write()?;
        Ok(records
            .get_mut(&key)
            .map(|doc| {
                apply_update(doc, patch);
                doc.clone()
            })
            .into())
    }

    fn delete_by_id(&self, id: &str) -> Result<Lookup<Document>, StoreError> {
        let key = parse_id(id)?.to_hex();
        Ok(self.write()?.remove(&key).into())
    }

    fn delete_many(&self) -> Result<u64, StoreError> {
        let mut records = self.write()?;
        let removed = records.len() as u64;
        records.clear();
        Ok(removed)
    }
}
