//! Checks run against a live pet clinic service.
//!
//! Each check is self-contained and stops at the first failure; nothing is
//! retried.

use std::fmt;

use chrono::NaiveDate;
use petclinic_core::{
    count_owners, find_owner, random_digits, random_name, verify_fields, LookupError, OwnerRecord,
    PetRecord, PetType, VerifyError,
};
use rand::Rng;
use thiserror::Error;
use tracing::{info, warn};

use crate::{ClientError, PetclinicClient};

const GENERATED_LEN: usize = 5;
const PET_AGE_DAYS: i64 = 7;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("verification failed: {0}")]
    Verify(#[from] VerifyError),
}

/// Lists all owners and returns the first one named `last_name`.
pub async fn lookup_owner(
    client: &PetclinicClient,
    last_name: &str,
) -> Result<OwnerRecord, CheckError> {
    let owners = client.list_owners().await?;
    let matches = count_owners(&owners, last_name);
    if matches > 1 {
        warn!(last_name, matches, "last name is not unique, using first match");
    }
    Ok(find_owner(&owners, last_name)?.clone())
}

/// Adds a pet to an existing owner and checks the service echoes its name.
pub async fn find_owner_and_add_pet(
    client: &PetclinicClient,
    owner_last_name: &str,
    name: &str,
    birth_date: NaiveDate,
) -> Result<PetRecord, CheckError> {
    let owner = lookup_owner(client, owner_last_name).await?;
    add_pet_to_owner(client, owner, name, birth_date).await
}

/// Adds a pet embedding an owner already read from the listing.
pub async fn add_pet_to_owner(
    client: &PetclinicClient,
    owner: OwnerRecord,
    name: &str,
    birth_date: NaiveDate,
) -> Result<PetRecord, CheckError> {
    let owner_last_name = owner.last_name.clone();
    let pet = PetRecord::new(name, birth_date, PetType::default(), owner);

    let created = client.create_pet(&pet).await?;
    verify_fields(&created, [("name", name)])?;

    info!(pet_id = ?created.id, name, owner = %owner_last_name, "pet added");
    Ok(created)
}

/// Creates `owner`, then checks the listing holds a record with the same
/// five fields.
pub async fn validate_added_owner(
    client: &PetclinicClient,
    owner: &OwnerRecord,
) -> Result<OwnerRecord, CheckError> {
    let created = client.create_owner(owner).await?;
    verify_fields(&created, [("lastName", owner.last_name.as_str())])?;
    info!(owner_id = ?created.id, last_name = %owner.last_name, "owner added");

    let listed = lookup_owner(client, &owner.last_name).await?;
    verify_fields(&listed, owner.comparable_fields())?;
    Ok(listed)
}

pub fn random_owner<R: Rng + ?Sized>(rng: &mut R) -> OwnerRecord {
    OwnerRecord::new(
        random_name(rng, GENERATED_LEN),
        random_name(rng, GENERATED_LEN),
        random_name(rng, GENERATED_LEN),
        random_name(rng, GENERATED_LEN),
        random_digits(rng, GENERATED_LEN),
    )
}

#[derive(Debug, Clone)]
pub struct CheckReport {
    pub seeded_owner: OwnerRecord,
    pub added_pet: PetRecord,
    pub added_owner: OwnerRecord,
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "ok  find owner: {} {} (id {})",
            self.seeded_owner.first_name,
            self.seeded_owner.last_name,
            display_id(self.seeded_owner.id)
        )?;
        writeln!(
            f,
            "ok  add pet: {} (id {})",
            self.added_pet.name,
            display_id(self.added_pet.id)
        )?;
        write!(
            f,
            "ok  add owner: {} {} (id {})",
            self.added_owner.first_name,
            self.added_owner.last_name,
            display_id(self.added_owner.id)
        )
    }
}

fn display_id(id: Option<i64>) -> String {
    id.map_or_else(|| "unassigned".to_string(), |id| id.to_string())
}

/// Runs every check in order: find the seeded owner, add a pet born a week
/// before `today` to it, then add and re-read a random owner.
pub async fn run_all<R: Rng + ?Sized>(
    client: &PetclinicClient,
    rng: &mut R,
    today: NaiveDate,
    seeded_last_name: &str,
) -> Result<CheckReport, CheckError> {
    let seeded_owner = lookup_owner(client, seeded_last_name).await?;

    let pet_name = random_name(rng, GENERATED_LEN);
    let birth_date = today - chrono::Duration::days(PET_AGE_DAYS);
    let added_pet = add_pet_to_owner(client, seeded_owner.clone(), &pet_name, birth_date).await?;

    let owner = random_owner(rng);
    let added_owner = validate_added_owner(client, &owner).await?;

    Ok(CheckReport {
        seeded_owner,
        added_pet,
        added_owner,
    })
}
