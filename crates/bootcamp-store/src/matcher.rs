use std::cmp::Ordering;

use bson::{Bson, Document};

use crate::compare::{as_number, comparable_cmp, values_eq};
use crate::error::StoreError;
use crate::exec::get_path;

/// A compiled filter document.
///
/// Follows document-store query semantics:
/// - top-level entries are an implicit AND
/// - `{ field: value }` is implicit `$eq`; array fields match on any element
/// - `{ field: { "$gt": v, "$lte": w } }` uses operator sub-documents
/// - `$and` / `$or` take arrays of filter documents
/// - `{ location: { "$geoWithin": { "$centerSphere": [[lng, lat], radians] } } }`
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Eq(String, Bson),
    Cmp(String, CmpOp, Bson),
    In(String, Vec<Bson>),
    Exists(String, bool),
    WithinSphere {
        field: String,
        longitude: f64,
        latitude: f64,
        radians: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CmpOp {
    fn accepts(self, ord: Ordering) -> bool {
        match self {
            CmpOp::Lt => ord == Ordering::Less,
            CmpOp::Lte => ord != Ordering::Greater,
            CmpOp::Gt => ord == Ordering::Greater,
            CmpOp::Gte => ord != Ordering::Less,
        }
    }
}

impl Predicate {
    /// Compile a filter document. An empty document matches everything.
    pub fn compile(filter: &Document) -> Result<Self, StoreError> {
        let mut children = Vec::with_capacity(filter.len());
        for (key, value) in filter {
            match key.as_str() {
                "$and" => children.push(Predicate::And(compile_array(key, value)?)),
                "$or" => children.push(Predicate::Or(compile_array(key, value)?)),
                k if k.starts_with('$') => {
                    return Err(StoreError::Query(format!("unknown top-level operator: {k}")));
                }
                field => children.push(compile_field(field, value)?),
            }
        }

        if children.len() == 1 {
            Ok(children.remove(0))
        } else {
            Ok(Predicate::And(children))
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Predicate::And(children) => children.iter().all(|c| c.matches(doc)),
            Predicate::Or(children) => children.iter().any(|c| c.matches(doc)),
            Predicate::Eq(field, expected) => match get_path(doc, field) {
                None | Some(Bson::Null) => matches!(expected, Bson::Null),
                Some(whole @ Bson::Array(items)) => {
                    values_eq(whole, expected)
                        || items.iter().any(|item| values_eq(item, expected))
                }
                Some(value) => values_eq(value, expected),
            },
            Predicate::Cmp(field, op, bound) => any_value(doc, field, |value| {
                comparable_cmp(value, bound).is_some_and(|ord| op.accepts(ord))
            }),
            Predicate::In(field, candidates) => match get_path(doc, field) {
                None | Some(Bson::Null) => candidates.iter().any(|c| matches!(c, Bson::Null)),
                Some(_) => any_value(doc, field, |value| {
                    candidates.iter().any(|c| values_eq(value, c))
                }),
            },
            Predicate::Exists(field, expected) => get_path(doc, field).is_some() == *expected,
            Predicate::WithinSphere {
                field,
                longitude,
                latitude,
                radians,
            } => get_path(doc, field)
                .and_then(point_of)
                .is_some_and(|(lng, lat)| {
                    central_angle(*longitude, *latitude, lng, lat) <= *radians
                }),
        }
    }
}

/// Apply `test` to the field value, or to each element when it is an array.
fn any_value(doc: &Document, field: &str, test: impl Fn(&Bson) -> bool) -> bool {
    match get_path(doc, field) {
        Some(Bson::Array(items)) => items.iter().any(&test),
        Some(value) => test(value),
        None => false,
    }
}

fn compile_array(key: &str, value: &Bson) -> Result<Vec<Predicate>, StoreError> {
    let Bson::Array(items) = value else {
        return Err(StoreError::Query(format!("{key} value must be an array")));
    };
    if items.is_empty() {
        return Err(StoreError::Query(format!("{key} array must not be empty")));
    }
    items
        .iter()
        .map(|item| match item {
            Bson::Document(sub) => Predicate::compile(sub),
            _ => Err(StoreError::Query(format!(
                "{key} array elements must be documents"
            ))),
        })
        .collect()
}

fn compile_field(field: &str, value: &Bson) -> Result<Predicate, StoreError> {
    let Bson::Document(sub) = value else {
        return Ok(Predicate::Eq(field.to_string(), value.clone()));
    };
    let is_operator_doc = sub.keys().next().is_some_and(|k| k.starts_with('$'));
    if !is_operator_doc {
        return Ok(Predicate::Eq(field.to_string(), value.clone()));
    }

    let mut conditions = Vec::with_capacity(sub.len());
    for (op, operand) in sub {
        let field = field.to_string();
        let predicate = match op.as_str() {
            "$eq" => Predicate::Eq(field, operand.clone()),
            "$lt" => Predicate::Cmp(field, CmpOp::Lt, operand.clone()),
            "$lte" => Predicate::Cmp(field, CmpOp::Lte, operand.clone()),
            "$gt" => Predicate::Cmp(field, CmpOp::Gt, operand.clone()),
            "$gte" => Predicate::Cmp(field, CmpOp::Gte, operand.clone()),
            "$in" => match operand {
                Bson::Array(items) => Predicate::In(field, items.clone()),
                _ => return Err(StoreError::Query("$in needs an array".into())),
            },
            "$exists" => match operand {
                Bson::Boolean(b) => Predicate::Exists(field, *b),
                _ => return Err(StoreError::Query("$exists value must be a boolean".into())),
            },
            "$geoWithin" => compile_geo_within(field, operand)?,
            k if k.starts_with('$') => {
                return Err(StoreError::Query(format!("unknown field operator: {k}")));
            }
            k => {
                return Err(StoreError::Query(format!(
                    "unexpected key alongside operators: {k}"
                )));
            }
        };
        conditions.push(predicate);
    }

    if conditions.len() == 1 {
        Ok(conditions.remove(0))
    } else {
        Ok(Predicate::And(conditions))
    }
}

fn compile_geo_within(field: String, operand: &Bson) -> Result<Predicate, StoreError> {
    let invalid = || {
        StoreError::Query("$geoWithin expects { $centerSphere: [[lng, lat], radians] }".into())
    };

    let sphere = match operand {
        Bson::Document(doc) => doc.get("$centerSphere").ok_or_else(invalid)?,
        _ => return Err(invalid()),
    };
    let Bson::Array(parts) = sphere else {
        return Err(invalid());
    };
    let [center, radius] = parts.as_slice() else {
        return Err(invalid());
    };
    let (longitude, latitude) = point_of(center).ok_or_else(invalid)?;
    let radians = as_number(radius).filter(|r| *r >= 0.0).ok_or_else(invalid)?;

    Ok(Predicate::WithinSphere {
        field,
        longitude,
        latitude,
        radians,
    })
}

/// `[lng, lat]` or a GeoJSON point `{ type: "Point", coordinates: [lng, lat] }`.
fn point_of(value: &Bson) -> Option<(f64, f64)> {
    match value {
        Bson::Array(coords) => match coords.as_slice() {
            [lng, lat] => Some((as_number(lng)?, as_number(lat)?)),
            _ => None,
        },
        Bson::Document(doc) => point_of(doc.get("coordinates")?),
        _ => None,
    }
}

/// Great-circle angle between two points, in radians (haversine).
fn central_angle(lng1: f64, lat1: f64, lng2: f64, lat2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lng2 - lng1).to_radians();
    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt())
}
