use std::path::Path;

use bootcamp_query::FindOptions;
use bson::{Document, RawDocumentBuf};
use redb::{Database, ReadableTable, TableDefinition};

use crate::error::StoreError;
use crate::exec::apply_find_options;
use crate::lookup::Lookup;
use crate::matcher::Predicate;
use crate::record::{apply_update, parse_id, prepare_new};
use crate::store::Store;

/// Records keyed by hex object id, stored as BSON bytes.
const BOOTCAMPS: TableDefinition<&str, &[u8]> = TableDefinition::new("bootcamps");

/// File-backed store. Filters run as a full scan over decoded records.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let db = Database::create(path).map_err(storage)?;
        let txn = db.begin_write().map_err(storage)?;
        txn.open_table(BOOTCAMPS).map_err(storage)?;
        txn.commit().map_err(storage)?;
        Ok(Self { db })
    }

    fn scan(&self, predicate: &Predicate) -> Result<Vec<Document>, StoreError> {
        let txn = self.db.begin_read().map_err(storage)?;
        let table = txn.open_table(BOOTCAMPS).map_err(storage)?;

        let mut matched = Vec::new();
        for entry in table.iter().map_err(storage)? {
            let (_, value) = entry.map_err(storage)?;
            let doc = decode(value.value())?;
            if predicate.matches(&doc) {
                matched.push(doc);
            }
        }
        Ok(matched)
    }
}

impl Store for RedbStore {
    fn find(&self, filter: &Document, options: &FindOptions) -> Result<Vec<Document>, StoreError> {
        let predicate = Predicate::compile(filter)?;
        Ok(apply_find_options(self.scan(&predicate)?, options))
    }

    fn count(&self, filter: &Document) -> Result<u64, StoreError> {
        let predicate = Predicate::compile(filter)?;
        Ok(self.scan(&predicate)?.len() as u64)
    }

    fn find_by_id(&self, id: &str) -> Result<Lookup<Document>, StoreError> {
        let key = parse_id(id)?.to_hex();
        let txn = self.db.begin_read().map_err(storage)?;
        let table = txn.open_table(BOOTCAMPS).map_err(storage)?;
        let found = table
            .get(key.as_str())
            .map_err(storage)?
            .map(|guard| decode(guard.value()))
            .transpose()?;
        Ok(found.into())
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

        let txn = self.db.begin_write().map_err(storage)?;
        {
            let mut table = txn.open_table(BOOTCAMPS).map_err(storage)?;
            for (key, doc) in &prepared {
                if table.get(key.as_str()).map_err(storage)?.is_some() {
                    return Err(StoreError::DuplicateKey(key.clone()));
                }
                let bytes = encode(doc)?;
                table
                    .insert(key.as_str(), bytes.as_bytes())
                    .map_err(storage)?;
            }
        }
        txn.commit().map_err(storage)?;

        Ok(prepared.into_iter().map(|(_, doc)| doc).collect())
    }

    fn update_by_id(&self, id: &str, patch: Document) -> Result<Lookup<Document>, StoreError> {
        let key = parse_id(id)?.to_hex();
        let txn = self.db.begin_write().map_err(storage)?;
        let updated = {
            let mut table = txn.open_table(BOOTCAMPS).map_err(storage)?;
            let existing = table
                .get(key.as_str())
                .map_err(storage)?
                .map(|guard| decode(guard.value()))
                .transpose()?;
            match existing {
                Some(mut doc) => {
                    apply_update(&mut doc, patch);
                    let bytes = encode(&doc)?;
                    table
                        .insert(key.as_str(), bytes.as_bytes())
                        .map_err(storage)?;
                    Some(doc)
                }
                None => None,
            }
        };
        txn.commit().map_err(storage)?;
        Ok(updated.into())
    }

    fn delete_by_id(&self, id: &str) -> Result<Lookup<Document>, StoreError> {
        let key = parse_id(id)?.to_hex();
        let txn = self.db.begin_write().map_err(storage)?;
        let removed = {
            let mut table = txn.open_table(BOOTCAMPS).map_err(storage)?;
            table
                .remove(key.as_str())
                .map_err(storage)?
                .map(|guard| decode(guard.value()))
                .transpose()?
        };
        txn.commit().map_err(storage)?;
        Ok(removed.into())
    }

    fn delete_many(&self) -> Result<u64, StoreError> {
        let txn = self.db.begin_write().map_err(storage)?;
        let removed = {
            let mut table = txn.open_table(BOOTCAMPS).map_err(storage)?;
            // Snapshot keys, then remove.
            let keys: Vec<String> = table
                .iter()
                .map_err(storage)?
                .map(|entry| entry.map(|(k, _)| k.value().to_string()))
                .collect::<Result<_, _>>()
                .map_err(storage)?;
            for key in &keys {
                table.remove(key.as_str()).map_err(storage)?;
            }
            keys.len() as u64
        };
        txn.commit().map_err(storage)?;
        Ok(removed)
    }
}

fn encode(doc: &Document) -> Result<RawDocumentBuf, StoreError> {
    Ok(RawDocumentBuf::try_from(doc)?)
}

fn decode(bytes: &[u8]) -> Result<Document, StoreError> {
    Ok(bson::deserialize_from_slice(bytes)?)
}

fn storage(e: impl std::fmt::Display) -> StoreError {
    StoreError::Storage(e.to_string())
}
