#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The id is not a well-formed object id.
    #[error("invalid id: {0}")]
    InvalidId(String),

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// The filter cannot be evaluated, e.g. an unknown operator.
    #[error("query error: {0}")]
    Query(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<bson::error::Error> for StoreError {
    fn from(e: bson::error::Error) -> Self {
        StoreError::Encoding(e.to_string())
    }
}
