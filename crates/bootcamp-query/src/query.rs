use bson::{Bson, Document};

use crate::fields::normalize_field_list;
use crate::filter::filter_candidate;
use crate::operator::rewrite_operators;
use crate::pagination::{PageWindow, Pagination};
use crate::params::RawParams;
use crate::reserved::strip_reserved_keys;
use crate::sort::{Sort, resolve_sort};

/// Everything a store needs to run one list request.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDescriptor {
    pub filter: Document,
    pub projection: Option<Vec<String>>,
    pub sort: Vec<Sort>,
    pub page: u64,
    pub skip: u64,
    pub limit: u64,
}

impl QueryDescriptor {
    pub fn window(&self) -> PageWindow {
        PageWindow {
            page: self.page,
            limit: self.limit,
        }
    }

    /// Finalize page links once the store has counted matches for `filter`.
    pub fn pagination(&self, total: u64) -> Pagination {
        self.window().pagination(total)
    }

    pub fn find_options(&self) -> FindOptions {
        FindOptions {
            projection: self.projection.clone(),
            sort: self.sort.clone(),
            skip: self.skip,
            limit: Some(self.limit),
        }
    }

    pub fn sort_document(&self) -> Document {
        sort_document(&self.sort)
    }

    pub fn projection_document(&self) -> Option<Document> {
        self.projection.as_deref().map(projection_document)
    }
}

/// Shaping options passed to a store's find, minus the filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub projection: Option<Vec<String>>,
    pub sort: Vec<Sort>,
    pub skip: u64,
    pub limit: Option<u64>,
}

/// Translate request parameters into a query descriptor.
///
/// Runs reserved-key stripping, filter expansion, operator rewriting,
/// `select`/`sort` normalization and page windowing. Never fails: malformed
/// paging input falls back to defaults and malformed filters are left for
/// the store to reject.
pub fn translate(params: &RawParams) -> QueryDescriptor {
    let candidate = filter_candidate(&strip_reserved_keys(params));
    let filter = rewrite_operators(&candidate);

    let projection = params
        .get_joined("select")
        .map(|csv| normalize_field_list(&csv))
        .filter(|fields| !fields.is_empty());

    let window = PageWindow::from_params(params.get("page"), params.get("limit"));

    QueryDescriptor {
        filter,
        projection,
        sort: resolve_sort(params),
        page: window.page,
        skip: window.skip(),
        limit: window.limit,
    }
}

fn sort_document(sort: &[Sort]) -> Document {
    sort.iter()
        .map(|s| (s.field.clone(), Bson::Int32(s.direction.as_i32())))
        .collect()
}

fn projection_document(fields: &[String]) -> Document {
    fields
        .iter()
        .map(|field| (field.clone(), Bson::Int32(1)))
        .collect()
}
