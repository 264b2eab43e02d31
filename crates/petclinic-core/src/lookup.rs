//! Owner lookup by surname over a `GET /api/owners` listing.
//!
//! The service does not enforce unique surnames. The first match in listing
//! order wins; use [`count_owners`] to detect ambiguity.

use thiserror::Error;
use tracing::debug;

use crate::owner::OwnerRecord;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("owner {last_name:?} was not found")]
    NotFound { last_name: String },
}

pub fn find_owner<'a>(
    records: &'a [OwnerRecord],
    last_name: &str,
) -> Result<&'a OwnerRecord, LookupError> {
    let found = records.iter().position(|owner| owner.last_name == last_name);
    debug!(last_name, scanned = records.len(), found = ?found, "owner lookup");

    found
        .map(|index| &records[index])
        .ok_or_else(|| LookupError::NotFound {
            last_name: last_name.to_string(),
        })
}

pub fn count_owners(records: &[OwnerRecord], last_name: &str) -> usize {
    records
        .iter()
        .filter(|owner| owner.last_name == last_name)
        .count()
}
