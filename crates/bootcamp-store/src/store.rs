use bootcamp_query::FindOptions;
use bson::Document;

use crate::error::StoreError;
use crate::lookup::Lookup;

/// A single collection of bootcamp documents.
///
/// Ids cross this boundary as hex strings; a malformed id is reported as
/// [`StoreError::InvalidId`], a well-formed but unknown id as
/// [`Lookup::NotFound`].
pub trait Store: Send + Sync {
    fn find(&self, filter: &Document, options: &FindOptions) -> Result<Vec<Document>, StoreError>;
    fn count(&self, filter: &Document) -> Result<u64, StoreError>;
    fn find_by_id(&self, id: &str) -> Result<Lookup<Document>, StoreError>;

    /// Insert one document, assigning `_id` and `createdAt` when absent.
    fn insert(&self, doc: Document) -> Result<Document, StoreError>;
    /// Insert all documents or none of them.
    fn insert_many(&self, docs: Vec<Document>) -> Result<Vec<Document>, StoreError>;
    /// Shallow update; returns the document after the change.
    fn update_by_id(&self, id: &str, patch: Document) -> Result<Lookup<Document>, StoreError>;
    /// Returns the removed document.
    fn delete_by_id(&self, id: &str) -> Result<Lookup<Document>, StoreError>;
    /// Remove every document; returns how many were removed.
    fn delete_many(&self) -> Result<u64, StoreError>;
}
