use bson::{Bson, doc};
use bootcamp_query::*;

fn translate_query(query: &str) -> QueryDescriptor {
    translate(&RawParams::parse(query))
}

// ── Filter ──────────────────────────────────────────────────────

#[test]
fn reserved_keys_never_reach_the_filter() {
    let descriptor = translate_query(
        "select=name&sort=-name&page=2&limit=5&page%5Bgt%5D=1&housing=true&averageCost%5Blte%5D=9000",
    );
    for key in RESERVED_KEYS {
        assert!(!descriptor.filter.contains_key(key), "{key} leaked into filter");
    }
    assert_eq!(
        descriptor.filter,
        doc! { "housing": true, "averageCost": { "$lte": 9000_i64 } }
    );
}

#[test]
fn bracket_operator_becomes_store_operator() {
    let descriptor = translate_query("rating[gte]=5");
    assert_eq!(descriptor.filter, doc! { "rating": { "$gte": 5_i64 } });
}

#[test]
fn operator_rewrite_is_idempotent_over_translation() {
    let descriptor = translate_query("rating[gte]=5&careers[in]=Business,UI");
    assert_eq!(rewrite_operators(&descriptor.filter), descriptor.filter);
}

#[test]
fn value_equal_to_operator_token_is_preserved() {
    let descriptor = translate_query("name=gte&description[in]=lt,in");
    assert_eq!(
        descriptor.filter,
        doc! { "name": "gte", "description": { "$in": ["lt", "in"] } }
    );
}

#[test]
fn in_operator_builds_array() {
    let descriptor = translate_query("careers[in]=Web+Development,Business");
    let careers = descriptor.filter.get_document("careers").unwrap();
    assert_eq!(
        careers.get_array("$in").unwrap(),
        &vec![
            Bson::String("Web Development".into()),
            Bson::String("Business".into())
        ]
    );
}

#[test]
fn top_level_in_field_stays_a_plain_field() {
    let descriptor = translate_query("in=person");
    assert_eq!(descriptor.filter, doc! { "in": "person" });
}

#[test]
fn plain_and_bracketed_keys_on_one_field_merge_in_either_order() {
    for query in [
        "averageCost=5000&averageCost%5Bgt%5D=100",
        "averageCost%5Bgt%5D=100&averageCost=5000",
    ] {
        let descriptor = translate_query(query);
        let cost = descriptor.filter.get_document("averageCost").unwrap();
        assert_eq!(cost.len(), 2, "{query}");
        assert_eq!(cost.get("$eq"), Some(&Bson::Int64(5000)), "{query}");
        assert_eq!(cost.get("$gt"), Some(&Bson::Int64(100)), "{query}");
    }
}

// ── Shaping ─────────────────────────────────────────────────────

#[test]
fn select_and_sort_are_normalized() {
    let descriptor = translate_query("select=name,%20description&sort=-averageCost,name");
    assert_eq!(
        descriptor.projection,
        Some(vec!["name".to_string(), "description".to_string()])
    );
    assert_eq!(
        descriptor.sort,
        vec![Sort::desc("averageCost"), Sort::asc("name")]
    );
}

#[test]
fn list_forms_of_select_and_sort_are_honored() {
    let descriptor =
        translate_query("select%5B%5D=name&select%5B%5D=housing&sort%5B%5D=-averageCost");
    assert_eq!(
        descriptor.projection,
        Some(vec!["name".to_string(), "housing".to_string()])
    );
    assert_eq!(descriptor.sort, vec![Sort::desc("averageCost")]);
    assert!(descriptor.filter.is_empty());
}

#[test]
fn default_sort_is_newest_first() {
    let descriptor = translate_query("housing=true");
    assert_eq!(descriptor.sort, vec![Sort::desc(DEFAULT_SORT_FIELD)]);
    assert_eq!(descriptor.sort[0].field, "createdAt");
    assert_eq!(descriptor.sort[0].direction, SortDirection::Desc);
}

// ── Paging ──────────────────────────────────────────────────────

#[test]
fn defaults_apply_without_paging_params() {
    let descriptor = translate_query("");
    assert_eq!(descriptor.page, 1);
    assert_eq!(descriptor.skip, 0);
    assert_eq!(descriptor.limit, DEFAULT_LIMIT);
    assert!(descriptor.filter.is_empty());
    assert!(descriptor.projection.is_none());
}

#[test]
fn skip_follows_page_and_limit() {
    let descriptor = translate_query("page=3&limit=10");
    assert_eq!(descriptor.skip, 20);
    assert_eq!(descriptor.limit, 10);

    let pagination = descriptor.pagination(45);
    assert_eq!(pagination.next, Some(PageRef { page: 4, limit: 10 }));
    assert_eq!(pagination.prev, Some(PageRef { page: 2, limit: 10 }));
}

#[test]
fn malformed_paging_degrades_to_defaults() {
    let descriptor = translate_query("page=-1&limit=zero");
    assert_eq!(descriptor.window(), PageWindow::default());
}

#[test]
fn find_options_carry_the_window() {
    let options = translate_query("page=2&limit=5&select=name").find_options();
    assert_eq!(options.skip, 5);
    assert_eq!(options.limit, Some(5));
    assert_eq!(options.projection, Some(vec!["name".to_string()]));
}

#[test]
fn pagination_serializes_only_present_links() {
    let pagination = translate_query("page=1&limit=25").pagination(30);
    assert_eq!(
        serde_json::to_value(pagination).unwrap(),
        serde_json::json!({ "next": { "page": 2, "limit": 25 } })
    );
}
