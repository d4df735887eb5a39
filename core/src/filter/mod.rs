//! Filtering: a case-insensitive substring match of one field over the whole
//! collection. Linear scan, non-mutating, insertion order preserved.

use crate::types::{FieldName, Record};

/// A filter request: one field, one substring.
///
/// Matching is case-insensitive via uppercase folding on both sides, which is
/// also how values are normalized on input. Records whose value for `field`
/// is empty never match, regardless of the query text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery {
    pub field: FieldName,
    pub text: String,
}

impl FilterQuery {
    pub fn new(field: FieldName, text: impl Into<String>) -> Self {
        Self {
            field,
            text: text.into(),
        }
    }
}

pub(crate) fn apply<'a>(
    records: &'a [Record],
    query: &FilterQuery,
) -> impl Iterator<Item = &'a Record> + use<'a> {
    let field = query.field;
    let needle = query.text.to_uppercase();
    records.iter().filter(move |record| {
        let value = record.field(field);
        !value.is_empty() && value.to_uppercase().contains(&needle)
    })
}
