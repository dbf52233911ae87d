use crate::params::RawParams;

/// Parameters that shape the response and never act as filters.
pub const RESERVED_KEYS: [&str; 4] = ["select", "sort", "page", "limit"];

/// Field name portion of a parameter key: `averageCost[lte]` → `averageCost`.
pub fn base_key(key: &str) -> &str {
    match key.find('[') {
        Some(idx) => &key[..idx],
        None => key,
    }
}

pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&base_key(key))
}

/// Copy of `params` without the reserved keys, bracketed forms included.
///
/// `select[]` and `sort[]` are read as list forms of `select` and `sort`;
/// other bracketed reserved keys (`page[x]`, `limit[]`) carry no meaning
/// and are dropped.
pub fn strip_reserved_keys(params: &RawParams) -> RawParams {
    params.iter().filter(|(key, _)| !is_reserved(key)).collect()
}
