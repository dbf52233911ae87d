use std::cmp::Ordering;

use bootcamp_query::{FindOptions, SortDirection};
use bson::{Bson, Document};

use crate::compare::compare_values;
use crate::record::ID;

/// Resolve a dotted path (`location.state`) against a document.
pub fn get_path<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
    if let Some(value) = doc.get(path) {
        return Some(value);
    }
    let (head, rest) = path.split_once('.')?;
    match doc.get(head)? {
        Bson::Document(sub) => get_path(sub, rest),
        _ => None,
    }
}

/// Keep `_id` plus the listed fields. Dotted paths keep the nested shape.
pub fn project(doc: &Document, fields: &[String]) -> Document {
    let mut out = Document::new();
    if let Some(id) = doc.get(ID) {
        out.insert(ID, id.clone());
    }
    for field in fields {
        if let Some(value) = get_path(doc, field) {
            set_path(&mut out, field, value.clone());
        }
    }
    out
}

/// Sort, window and project an already filtered set of records.
pub fn apply_find_options(mut records: Vec<Document>, options: &FindOptions) -> Vec<Document> {
    if !options.sort.is_empty() {
        records.sort_by(|a, b| {
            for sort in &options.sort {
                let ord = compare_values(get_path(a, &sort.field), get_path(b, &sort.field));
                let ord = match sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
    }

    let skip = usize::try_from(options.skip).unwrap_or(usize::MAX);
    let take = options
        .limit
        .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
        .unwrap_or(usize::MAX);

    records
        .into_iter()
        .skip(skip)
        .take(take)
        .map(|doc| match &options.projection {
            Some(fields) => project(&doc, fields),
            None => doc,
        })
        .collect()
}

fn set_path(doc: &mut Document, path: &str, value: Bson) {
    match path.split_once('.') {
        None => {
            doc.insert(path, value);
        }
        Some((head, rest)) => {
            if !matches!(doc.get(head), Some(Bson::Document(_))) {
                doc.insert(head, Document::new());
            }
            if let Some(Bson::Document(sub)) = doc.get_mut(head) {
                set_path(sub, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bootcamp_query::Sort;
    use bson::doc;

    fn records() -> Vec<Document> {
        vec![
            doc! { "_id": 1, "name": "B", "averageCost": 5000, "location": { "state": "MA", "city": "Boston" } },
            doc! { "_id": 2, "name": "A", "averageCost": 12000 },
            doc! { "_id": 3, "name": "C", "averageCost": 5000 },
        ]
    }

    fn ids(docs: &[Document]) -> Vec<i32> {
        docs.iter().map(|d| d.get_i32("_id").unwrap()).collect()
    }

    #[test]
    fn multi_key_sort_breaks_ties() {
        let options = FindOptions {
            sort: vec![Sort::asc("averageCost"), Sort::desc("name")],
            ..Default::default()
        };
        assert_eq!(ids(&apply_find_options(records(), &options)), vec![3, 1, 2]);
    }

    #[test]
    fn skip_and_limit_window_results() {
        let options = FindOptions {
            sort: vec![Sort::asc("name")],
            skip: 1,
            limit: Some(1),
            ..Default::default()
        };
        assert_eq!(ids(&apply_find_options(records(), &options)), vec![1]);
    }

    #[test]
    fn skip_past_end_is_empty() {
        let options = FindOptions {
            skip: 10,
            ..Default::default()
        };
        assert!(apply_find_options(records(), &options).is_empty());
    }

    #[test]
    fn projection_keeps_id_and_nested_fields() {
        let projected = project(
            &records()[0],
            &["name".to_string(), "location.city".to_string(), "missing".to_string()],
        );
        assert_eq!(
            projected,
            doc! { "_id": 1, "name": "B", "location": { "city": "Boston" } }
        );
    }

    #[test]
    fn get_path_prefers_literal_dotted_keys() {
        let doc = doc! { "a.b": 1, "a": { "b": 2 } };
        assert_eq!(get_path(&doc, "a.b"), Some(&Bson::Int32(1)));
        assert_eq!(get_path(&doc! { "a": { "b": 2 } }, "a.b"), Some(&Bson::Int32(2)));
        assert_eq!(get_path(&doc! { "a": 3 }, "a.b"), None);
    }
}
