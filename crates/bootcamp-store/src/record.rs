use bson::oid::ObjectId;
use bson::{Bson, DateTime, Document};

use crate::error::StoreError;

pub const ID: &str = "_id";
pub const CREATED_AT: &str = "createdAt";

pub fn parse_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

/// Normalize a document before its first insert.
///
/// - missing `_id` → fresh object id; hex string `_id` → object id
/// - missing `createdAt` → now; RFC 3339 string `createdAt` → timestamp
pub fn prepare_new(mut doc: Document) -> Result<(String, Document), StoreError> {
    let oid = match doc.get(ID) {
        None => ObjectId::new(),
        Some(Bson::ObjectId(oid)) => *oid,
        Some(Bson::String(s)) => parse_id(s)?,
        Some(other) => return Err(StoreError::InvalidId(other.to_string())),
    };
    doc.insert(ID, oid);

    let created_at = match doc.get(CREATED_AT) {
        None => Some(DateTime::now()),
        Some(Bson::String(s)) => DateTime::parse_rfc3339_str(s).ok(),
        Some(_) => None,
    };
    if let Some(ts) = created_at {
        doc.insert(CREATED_AT, ts);
    }

    Ok((oid.to_hex(), doc))
}

/// Shallow update: every top-level key in `patch` replaces the stored
/// value. `_id` is immutable and ignored.
pub fn apply_update(existing: &mut Document, patch: Document) {
    for (key, value) in patch {
        if key == ID {
            continue;
        }
        existing.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn prepare_assigns_id_and_timestamp() {
        let (key, doc) = prepare_new(doc! { "name": "Devworks" }).unwrap();
        assert_eq!(doc.get_object_id(ID).unwrap().to_hex(), key);
        assert!(doc.get_datetime(CREATED_AT).is_ok());
    }

    #[test]
    fn prepare_converts_hex_id_and_date_string() {
        let (key, doc) = prepare_new(doc! {
            "_id": "5d713995b721c3bb38c1f5d0",
            "createdAt": "2020-01-02T03:04:05Z",
        })
        .unwrap();
        assert_eq!(key, "5d713995b721c3bb38c1f5d0");
        assert!(doc.get_object_id(ID).is_ok());
        assert_eq!(
            doc.get_datetime(CREATED_AT).unwrap().timestamp_millis(),
            1_577_934_245_000
        );
    }

    #[test]
    fn prepare_rejects_malformed_id() {
        let err = prepare_new(doc! { "_id": "not-an-id" }).unwrap_err();
        assert!(matches!(err, StoreError::InvalidId(id) if id == "not-an-id"));
    }

    #[test]
    fn update_keeps_id() {
        let (_, mut doc) = prepare_new(doc! { "name": "Old" }).unwrap();
        let id = doc.get_object_id(ID).unwrap();
        apply_update(&mut doc, doc! { "_id": ObjectId::new(), "name": "New", "housing": true });
        assert_eq!(doc.get_object_id(ID).unwrap(), id);
        assert_eq!(doc.get_str("name").unwrap(), "New");
        assert!(doc.get_bool("housing").unwrap());
    }
}
