//! Exact field-by-field comparison of records returned by the service.

use std::borrow::Cow;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("field {field}: expected {expected:?}, got {actual:?}")]
    Mismatch {
        field: String,
        expected: String,
        actual: String,
    },
    #[error("record has no field named {field}")]
    UnknownField { field: String },
}

/// String-keyed read access to a record, using the JSON field names.
pub trait FieldRecord {
    /// `None` when the record has no field called `name`.
    fn field(&self, name: &str) -> Option<Cow<'_, str>>;
}

/// Compares each `(field, value)` pair against `actual` in iteration order
/// and returns the first failure.
pub fn verify_fields<R, I, K, V>(actual: &R, expected: I) -> Result<(), VerifyError>
where
    R: FieldRecord + ?Sized,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    for (name, value) in expected {
        let name = name.as_ref();
        let value = value.as_ref();
        let found = actual.field(name).ok_or_else(|| VerifyError::UnknownField {
            field: name.to_string(),
        })?;

        if found != value {
            return Err(VerifyError::Mismatch {
                field: name.to_string(),
                expected: value.to_string(),
                actual: found.into_owned(),
            });
        }
    }
    Ok(())
}
