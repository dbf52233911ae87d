use crate::fields::normalize_field_list;
use crate::params::RawParams;

/// Creation timestamp, newest first, when no `sort` is given.
pub const DEFAULT_SORT_FIELD: &str = "createdAt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Store spelling: `1` ascending, `-1` descending.
    pub fn as_i32(self) -> i32 {
        match self {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Parse one list entry; a leading `-` means descending. A bare `-`
    /// names no field and yields `None`.
    pub fn parse(entry: &str) -> Option<Self> {
        match entry.strip_prefix('-') {
            Some(field) if field.trim().is_empty() => None,
            Some(field) => Some(Sort::desc(field.trim())),
            None => Some(Sort::asc(entry)),
        }
    }
}

pub fn resolve_sort(params: &RawParams) -> Vec<Sort> {
    let sorts: Vec<Sort> = params
        .get_joined("sort")
        .map(|csv| {
            normalize_field_list(&csv)
                .iter()
                .filter_map(|entry| Sort::parse(entry))
                .collect()
        })
        .unwrap_or_default();

    if sorts.is_empty() {
        vec![Sort::desc(DEFAULT_SORT_FIELD)]
    } else {
        sorts
    }
}
