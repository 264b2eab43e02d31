//! Owner records as listed and created by `/api/owners`.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::verify::FieldRecord;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON array of owners, got {0}")]
    NotAnArray(&'static str),
    #[error("owner record #{index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// A clinic client. `id` stays `None` until the server assigns one.
///
/// Fields the service returns beyond the ones modelled here (for example the
/// owner's `pets`) are kept in `extra`, so a record found in a listing can be
/// sent back unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub telephone: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OwnerRecord {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
        telephone: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: address.into(),
            city: city.into(),
            telephone: telephone.into(),
            extra: Map::new(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// The five user-supplied fields, keyed by their wire names.
    pub fn comparable_fields(&self) -> [(&'static str, &str); 5] {
        [
            ("firstName", self.first_name.as_str()),
            ("lastName", self.last_name.as_str()),
            ("address", self.address.as_str()),
            ("city", self.city.as_str()),
            ("telephone", self.telephone.as_str()),
        ]
    }
}

impl FieldRecord for OwnerRecord {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "id" => Some(id_field(self.id)),
            "firstName" => Some(Cow::Borrowed(self.first_name.as_str())),
            "lastName" => Some(Cow::Borrowed(self.last_name.as_str())),
            "address" => Some(Cow::Borrowed(self.address.as_str())),
            "city" => Some(Cow::Borrowed(self.city.as_str())),
            "telephone" => Some(Cow::Borrowed(self.telephone.as_str())),
            _ => None,
        }
    }
}

pub(crate) fn id_field(id: Option<i64>) -> Cow<'static, str> {
    match id {
        Some(id) => Cow::Owned(id.to_string()),
        None => Cow::Borrowed("null"),
    }
}

/// Decodes a `GET /api/owners` body, checking every element carries the
/// required owner fields before anything is compared.
pub fn parse_owners(body: &str) -> Result<Vec<OwnerRecord>, ParseError> {
    let value: Value = serde_json::from_str(body)?;
    let items = match value {
        Value::Array(items) => items,
        other => return Err(ParseError::NotAnArray(json_kind(&other))),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|err| ParseError::InvalidRecord {
                index,
                reason: err.to_string(),
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
