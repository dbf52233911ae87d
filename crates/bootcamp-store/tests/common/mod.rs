#![allow(dead_code)]

use bootcamp_query::{FindOptions, Sort, radius_filter, GeoPoint};
use bootcamp_store::{Lookup, Store, StoreError};
use bson::{Document, doc};

pub const DEVWORKS_ID: &str = "5d713995b721c3bb38c1f5d0";
pub const MODERN_ID: &str = "5d713a66ec8f2b88b8f830b8";
pub const CODEMASTERS_ID: &str = "5d725a037b292f5f8ceff787";
pub const DEVCENTRAL_ID: &str = "5d725a1b7b292f5f8ceff788";

pub fn seed(store: &dyn Store) {
    store
        .insert_many(vec![
            doc! {
                "_id": DEVWORKS_ID,
                "name": "Devworks Bootcamp",
                "careers": ["Web Development", "UI/UX", "Business"],
                "housing": true,
                "averageCost": 10000,
                "location": { "type": "Point", "coordinates": [-71.104028, 42.350846], "state": "MA" },
                "createdAt": "2020-01-01T00:00:00Z",
            },
            doc! {
                "_id": MODERN_ID,
                "name": "ModernTech Bootcamp",
                "careers": ["Web Development", "UI/UX", "Mobile Development"],
                "housing": false,
                "averageCost": 8000,
                "location": { "type": "Point", "coordinates": [-71.324462, 42.638171], "state": "MA" },
                "createdAt": "2020-01-02T00:00:00Z",
            },
            doc! {
                "_id": CODEMASTERS_ID,
                "name": "Codemasters",
                "careers": ["Web Development", "Data Science", "Business"],
                "housing": false,
                "averageCost": 6000,
                "location": { "type": "Point", "coordinates": [-73.216697, 44.480419], "state": "VT" },
                "createdAt": "2020-01-03T00:00:00Z",
            },
            doc! {
                "_id": DEVCENTRAL_ID,
                "name": "Devcentral Bootcamp",
                "careers": ["Mobile Development", "Web Development", "Data Science", "Business"],
                "housing": false,
                "averageCost": 15000,
                "location": { "type": "Point", "coordinates": [-74.009, 40.713], "state": "NY" },
                "createdAt": "2020-01-04T00:00:00Z",
            },
        ])
        .unwrap();
}

fn names(docs: &[Document]) -> Vec<&str> {
    docs.iter().map(|d| d.get_str("name").unwrap()).collect()
}

fn newest_first() -> FindOptions {
    FindOptions {
        sort: vec![Sort::desc("createdAt")],
        ..Default::default()
    }
}

pub fn find_filters_and_sorts(store: &dyn Store) {
    seed(store);
    let docs = store
        .find(&doc! { "averageCost": { "$lte": 10000_i64 } }, &newest_first())
        .unwrap();
    assert_eq!(
        names(&docs),
        vec!["Codemasters", "ModernTech Bootcamp", "Devworks Bootcamp"]
    );
}

pub fn find_in_operator(store: &dyn Store) {
    seed(store);
    let options = FindOptions {
        sort: vec![Sort::asc("name")],
        ..Default::default()
    };
    let docs = store
        .find(&doc! { "careers": { "$in": ["Data Science"] } }, &options)
        .unwrap();
    assert_eq!(names(&docs), vec!["Codemasters", "Devcentral Bootcamp"]);
}

pub fn find_windows_and_projects(store: &dyn Store) {
    seed(store);
    let options = FindOptions {
        projection: Some(vec!["name".into()]),
        sort: vec![Sort::asc("averageCost")],
        skip: 1,
        limit: Some(2),
    };
    let docs = store.find(&doc! {}, &options).unwrap();
    assert_eq!(names(&docs), vec!["ModernTech Bootcamp", "Devworks Bootcamp"]);
    for doc in &docs {
        assert_eq!(doc.len(), 2, "{doc}");
        assert!(doc.get_object_id("_id").is_ok());
    }
}

pub fn count_matches_filter(store: &dyn Store) {
    seed(store);
    assert_eq!(store.count(&doc! {}).unwrap(), 4);
    assert_eq!(store.count(&doc! { "location.state": "MA" }).unwrap(), 2);
    assert_eq!(store.count(&doc! { "housing": true }).unwrap(), 1);
}

pub fn bad_filter_is_query_error(store: &dyn Store) {
    seed(store);
    let err = store.count(&doc! { "averageCost": { "$near": 1 } }).unwrap_err();
    assert!(matches!(err, StoreError::Query(_)), "{err}");
}

pub fn radius_search(store: &dyn Store) {
    seed(store);
    let boston = GeoPoint {
        latitude: 42.3601,
        longitude: -71.0589,
    };
    let docs = store
        .find(&radius_filter(boston, 30.0), &newest_first())
        .unwrap();
    assert_eq!(names(&docs), vec!["ModernTech Bootcamp", "Devworks Bootcamp"]);
}

pub fn lookup_by_id(store: &dyn Store) {
    seed(store);
    match store.find_by_id(DEVWORKS_ID).unwrap() {
        Lookup::Found(doc) => assert_eq!(doc.get_str("name").unwrap(), "Devworks Bootcamp"),
        Lookup::NotFound => panic!("expected bootcamp"),
    }
    assert_eq!(
        store.find_by_id("5d713995b721c3bb38c1f5ff").unwrap(),
        Lookup::NotFound
    );
    assert!(matches!(
        store.find_by_id("xyz"),
        Err(StoreError::InvalidId(id)) if id == "xyz"
    ));
}

pub fn insert_assigns_id_and_rejects_duplicates(store: &dyn Store) {
    let created = store.insert(doc! { "name": "New Camp" }).unwrap();
    let id = created.get_object_id("_id").unwrap().to_hex();
    assert!(created.get_datetime("createdAt").is_ok());
    assert!(store.find_by_id(&id).unwrap().is_found());

    let err = store.insert(doc! { "_id": id.clone() }).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey(key) if key == id));
}

pub fn insert_many_is_all_or_nothing(store: &dyn Store) {
    let err = store
        .insert_many(vec![
            doc! { "_id": DEVWORKS_ID, "name": "first" },
            doc! { "_id": DEVWORKS_ID, "name": "second" },
        ])
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey(_)));
    assert_eq!(store.count(&doc! {}).unwrap(), 0);
}

pub fn update_and_delete(store: &dyn Store) {
    seed(store);
    let updated = store
        .update_by_id(MODERN_ID, doc! { "housing": true, "averageCost": 9000 })
        .unwrap()
        .into_option()
        .unwrap();
    assert!(updated.get_bool("housing").unwrap());
    assert_eq!(updated.get_i32("averageCost").unwrap(), 9000);
    assert_eq!(updated.get_str("name").unwrap(), "ModernTech Bootcamp");

    let missing = "5d713995b721c3bb38c1f5ff";
    assert_eq!(
        store.update_by_id(missing, doc! { "housing": true }).unwrap(),
        Lookup::NotFound
    );

    assert!(store.delete_by_id(MODERN_ID).unwrap().is_found());
    assert_eq!(store.delete_by_id(MODERN_ID).unwrap(), Lookup::NotFound);
    assert_eq!(store.count(&doc! {}).unwrap(), 3);

    assert_eq!(store.delete_many().unwrap(), 3);
    assert_eq!(store.count(&doc! {}).unwrap(), 0);
}
