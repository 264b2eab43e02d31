//! Pet clinic domain types and the checks run against the REST API.
//!
//! - `owner` / `pet`: records exchanged with the service
//! - `lookup`: locating an owner by surname in a listing
//! - `verify`: exact field-by-field comparison of a record
//! - `generate`: random field values for new records

pub mod generate;
pub mod lookup;
pub mod owner;
pub mod pet;
pub mod verify;

pub use generate::{random_digits, random_name};
pub use lookup::{count_owners, find_owner, LookupError};
pub use owner::{parse_owners, OwnerRecord, ParseError};
pub use pet::{PetRecord, PetType};
pub use verify::{verify_fields, FieldRecord, VerifyError};

pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");
