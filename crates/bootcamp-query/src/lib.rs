mod fields;
mod filter;
mod geo;
mod operator;
mod pagination;
mod params;
mod query;
mod reserved;
mod sort;

pub use fields::normalize_field_list;
pub use filter::{coerce_value, filter_candidate};
pub use geo::{EARTH_RADIUS_MILES, GeoPoint, radius_filter};
pub use operator::{Operator, rewrite_operators};
pub use pagination::{
    DEFAULT_LIMIT, DEFAULT_PAGE, PageRef, PageResult, PageWindow, Pagination, compute_pagination,
};
pub use params::RawParams;
pub use query::{FindOptions, QueryDescriptor, translate};
pub use reserved::{RESERVED_KEYS, base_key, is_reserved, strip_reserved_keys};
pub use sort::{DEFAULT_SORT_FIELD, Sort, SortDirection, resolve_sort};
