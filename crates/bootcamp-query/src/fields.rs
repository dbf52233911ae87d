/// Split a comma-separated field list, trimming whitespace and dropping
/// empty entries. Order is preserved.
pub fn normalize_field_list(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect()
}
