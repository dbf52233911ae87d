use bson::{Bson, Document};

use crate::operator::Operator;
use crate::params::RawParams;

/// Key a plain value takes when it shares a field with bracketed operators.
const EQ: &str = "$eq";

/// Expand non-reserved parameters into a nested filter document.
///
/// - `name=Devworks` → `{ name: "Devworks" }`
/// - `averageCost[lte]=10000` → `{ averageCost: { lte: 10000 } }`
/// - `careers[in]=Business,UI` → `{ careers: { in: ["Business", "UI"] } }`
/// - `tags[]=a&tags[]=b` and repeated keys → arrays
/// - `averageCost=5000&averageCost[gt]=100` → `{ averageCost: { $eq: 5000, gt: 100 } }`
///   in either order
///
/// Operator keys are left unescaped here; [`crate::rewrite_operators`]
/// turns them into store syntax. Callers are expected to strip reserved
/// keys first.
pub fn filter_candidate(params: &RawParams) -> Document {
    let mut doc = Document::new();
    for (key, raw) in params.iter() {
        let (path, append) = split_key(key);
        let value = leaf_value(&path, raw);
        insert_path(&mut doc, &path, value, append);
    }
    doc
}

/// Coerce a query-string scalar into the closest BSON type.
///
/// Only canonical spellings are converted, so `"02118"` stays a string
/// while `"10000"` becomes an integer.
pub fn coerce_value(raw: &str) -> Bson {
    match raw {
        "true" => return Bson::Boolean(true),
        "false" => return Bson::Boolean(false),
        _ => {}
    }
    if is_canonical_integer(raw) {
        if let Ok(n) = raw.parse::<i64>() {
            return Bson::Int64(n);
        }
    }
    if is_canonical_decimal(raw) {
        if let Ok(f) = raw.parse::<f64>() {
            if f.is_finite() {
                return Bson::Double(f);
            }
        }
    }
    Bson::String(raw.to_string())
}

/// `in` only splits in operator position; a top-level field named `in` is
/// a plain field.
fn leaf_value(path: &[&str], raw: &str) -> Bson {
    let in_operator = path.len() > 1
        && path.last().and_then(|segment| Operator::from_token(segment)) == Some(Operator::In);
    if in_operator {
        Bson::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(coerce_value)
                .collect(),
        )
    } else {
        coerce_value(raw)
    }
}

/// Split `a[b][c]` into `["a", "b", "c"]`. A trailing `[]` sets the append
/// flag. Keys that do not follow the bracket grammar are kept whole.
fn split_key(key: &str) -> (Vec<&str>, bool) {
    let literal = (vec![key], false);
    let Some(open) = key.find('[') else {
        return literal;
    };
    if open == 0 {
        return literal;
    }

    let mut segments = vec![&key[..open]];
    let mut rest = &key[open..];
    let mut append = false;
    while !rest.is_empty() {
        if append || !rest.starts_with('[') {
            return literal;
        }
        let Some(close) = rest.find(']') else {
            return literal;
        };
        let segment = &rest[1..close];
        if segment.is_empty() {
            append = true;
        } else {
            segments.push(segment);
        }
        rest = &rest[close + 1..];
    }
    (segments, append)
}

fn insert_path(doc: &mut Document, path: &[&str], value: Bson, append: bool) {
    let key = path[0];
    if path.len() == 1 {
        merge_leaf(doc, key, value, append);
        return;
    }
    match doc.get_mut(key) {
        Some(Bson::Document(_)) => {}
        Some(existing) => {
            let plain = std::mem::replace(existing, Bson::Null);
            let mut child = Document::new();
            child.insert(EQ, plain);
            *existing = Bson::Document(child);
        }
        None => {
            doc.insert(key, Document::new());
        }
    }
    if let Some(Bson::Document(child)) = doc.get_mut(key) {
        insert_path(child, &path[1..], value, append);
    }
}

fn merge_leaf(doc: &mut Document, key: &str, value: Bson, append: bool) {
    match doc.get_mut(key) {
        Some(Bson::Document(nested)) => merge_leaf(nested, EQ, value, append),
        None => {
            let value = match value {
                Bson::Array(_) => value,
                other if append => Bson::Array(vec![other]),
                other => other,
            };
            doc.insert(key, value);
        }
        Some(Bson::Array(existing)) => match value {
            Bson::Array(items) => existing.extend(items),
            other => existing.push(other),
        },
        Some(existing) => {
            let mut items = vec![existing.clone()];
            match value {
                Bson::Array(more) => items.extend(more),
                other => items.push(other),
            }
            *existing = Bson::Array(items);
        }
    }
}

fn is_canonical_integer(raw: &str) -> bool {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'))
}

fn is_canonical_decimal(raw: &str) -> bool {
    match raw.split_once('.') {
        Some((int_part, frac)) => {
            is_canonical_integer(int_part)
                && !frac.is_empty()
                && frac.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}
