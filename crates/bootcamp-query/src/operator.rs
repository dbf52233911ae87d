use bson::{Bson, Document};

/// Comparison operators accepted in bracket syntax (`field[gte]=10`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Lt,
    Lte,
    Gt,
    Gte,
    In,
}

impl Operator {
    pub const ALL: [Operator; 5] = [
        Operator::Lt,
        Operator::Lte,
        Operator::Gt,
        Operator::Gte,
        Operator::In,
    ];

    /// Match a bare token exactly. `$gte`, `GTE` and `gte ` are not tokens.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "lt" => Some(Operator::Lt),
            "lte" => Some(Operator::Lte),
            "gt" => Some(Operator::Gt),
            "gte" => Some(Operator::Gte),
            "in" => Some(Operator::In),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::In => "in",
        }
    }

    /// The store's operator spelling.
    pub fn escaped(self) -> &'static str {
        match self {
            Operator::Lt => "$lt",
            Operator::Lte => "$lte",
            Operator::Gt => "$gt",
            Operator::Gte => "$gte",
            Operator::In => "$in",
        }
    }
}

/// Rewrite bare operator keys into store syntax.
///
/// Walks the document structurally: only keys of nested documents are
/// candidates, and only when they equal an operator token exactly. Top-level
/// keys are field names and values are never touched, so a field literally
/// named `in` or a value of `"gte"` passes through unchanged. Applying the
/// rewrite to its own output is a no-op.
pub fn rewrite_operators(candidate: &Document) -> Document {
    candidate
        .iter()
        .map(|(field, value)| (field.clone(), rewrite_value(value)))
        .collect()
}

fn rewrite_value(value: &Bson) -> Bson {
    match value {
        Bson::Document(doc) => Bson::Document(
            doc.iter()
                .map(|(key, inner)| {
                    let key = match Operator::from_token(key) {
                        Some(op) => op.escaped().to_string(),
                        None => key.clone(),
                    };
                    (key, rewrite_value(inner))
                })
                .collect(),
        ),
        Bson::Array(items) => Bson::Array(items.iter().map(rewrite_value).collect()),
        other => other.clone(),
    }
}
