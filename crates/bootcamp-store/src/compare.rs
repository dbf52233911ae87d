use std::cmp::Ordering;

use bson::Bson;

/// Total order used for sorting. Missing and null sort first, then numbers,
/// strings, documents, arrays, object ids, booleans and dates.
pub fn compare_values(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(b)) => return type_rank(None).cmp(&type_rank(Some(b))),
        (Some(a), None) => return type_rank(Some(a)).cmp(&type_rank(None)),
        (Some(a), Some(b)) => (a, b),
    };

    match (a, b) {
        (Bson::String(x), Bson::String(y)) => x.cmp(y),
        (Bson::ObjectId(x), Bson::ObjectId(y)) => x.bytes().cmp(&y.bytes()),
        (Bson::Boolean(x), Bson::Boolean(y)) => x.cmp(y),
        (Bson::DateTime(x), Bson::DateTime(y)) => {
            x.timestamp_millis().cmp(&y.timestamp_millis())
        }
        _ => match (as_number(a), as_number(b)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => type_rank(Some(a)).cmp(&type_rank(Some(b))),
        },
    }
}

/// Equality with numeric widening; other types compare only within their
/// own type.
pub(crate) fn values_eq(stored: &Bson, query: &Bson) -> bool {
    match (as_number(stored), as_number(query)) {
        (Some(x), Some(y)) => x == y,
        _ => stored == query,
    }
}

/// Ordering between comparable values: numbers with numbers, strings with
/// strings, dates with dates. Anything else is incomparable.
pub(crate) fn comparable_cmp(stored: &Bson, query: &Bson) -> Option<Ordering> {
    match (stored, query) {
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        (Bson::DateTime(x), Bson::DateTime(y)) => {
            Some(x.timestamp_millis().cmp(&y.timestamp_millis()))
        }
        _ => match (as_number(stored), as_number(query)) {
            (Some(x), Some(y)) => x.partial_cmp(&y),
            _ => None,
        },
    }
}

pub(crate) fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(*n as f64),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(f) => Some(*f),
        _ => None,
    }
}

fn type_rank(value: Option<&Bson>) -> u8 {
    match value {
        None | Some(Bson::Null) => 0,
        Some(Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_)) => 1,
        Some(Bson::String(_)) => 2,
        Some(Bson::Document(_)) => 3,
        Some(Bson::Array(_)) => 4,
        Some(Bson::ObjectId(_)) => 5,
        Some(Bson::Boolean(_)) => 6,
        Some(Bson::DateTime(_)) => 7,
        Some(_) => 8,
    }
}
