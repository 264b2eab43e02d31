//! Pet records as created by `/api/pets`.

use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::owner::{id_field, OwnerRecord};
use crate::verify::FieldRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetType {
    pub id: i64,
    pub name: String,
}

impl PetType {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Default for PetType {
    fn default() -> Self {
        Self::new(3, "lizard")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(with = "birth_date")]
    pub birth_date: NaiveDate,
    #[serde(rename = "type")]
    pub pet_type: PetType,
    /// Always present on requests; responses may leave it out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerRecord>,
}

impl PetRecord {
    pub fn new(
        name: impl Into<String>,
        birth_date: NaiveDate,
        pet_type: PetType,
        owner: OwnerRecord,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            birth_date,
            pet_type,
            owner: Some(owner),
        }
    }
}

impl FieldRecord for PetRecord {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "id" => Some(id_field(self.id)),
            "name" => Some(Cow::Borrowed(self.name.as_str())),
            "birthDate" => Some(Cow::Owned(birth_date::format(&self.birth_date))),
            "type" => Some(Cow::Borrowed(self.pet_type.name.as_str())),
            _ => None,
        }
    }
}

/// `yyyy/MM/dd` on the wire. ISO dates are accepted when reading.
pub mod birth_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y/%m/%d";
    const ISO_FORMAT: &str = "%Y-%m-%d";

    pub fn format(date: &NaiveDate) -> String {
        date.format(FORMAT).to_string()
    }

    pub fn parse(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
        NaiveDate::parse_from_str(raw, FORMAT).or_else(|_| NaiveDate::parse_from_str(raw, ISO_FORMAT))
    }

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(|err| de::Error::custom(format!("invalid birthDate {raw:?}: {err}")))
    }
}
