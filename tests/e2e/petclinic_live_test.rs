//! Live checks against a running pet clinic REST service.
//!
//! The service must be seeded with the sample owner "Franklin".
//! Run with: cargo test -p petclinic-client --test petclinic_live_test -- --ignored

mod integration;

use chrono::Local;
use integration::fixtures::live_client;
use petclinic_client::{
    find_owner_and_add_pet, lookup_owner, random_owner, run_all, validate_added_owner,
};
use petclinic_core::random_name;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[tokio::test]
#[ignore = "requires running petclinic"]
async fn seeded_owner_is_listed() {
    let client = live_client();
    let owner = lookup_owner(&client, "Franklin").await.unwrap();
    assert_eq!(owner.last_name, "Franklin");
    assert!(owner.id.is_some());
}

#[tokio::test]
#[ignore = "requires running petclinic"]
async fn should_find_owner_and_add_pet() {
    let client = live_client();
    let mut rng = StdRng::from_entropy();
    let name = random_name(&mut rng, 5);
    let birth_date = Local::now().date_naive() - chrono::Duration::days(7);

    let pet = find_owner_and_add_pet(&client, "Franklin", &name, birth_date)
        .await
        .unwrap();

    assert_eq!(pet.name, name);
    println!("added pet with id={:?}", pet.id);
}

#[tokio::test]
#[ignore = "requires running petclinic"]
async fn should_validate_added_owner() {
    let client = live_client();
    let mut rng = StdRng::from_entropy();
    let owner = random_owner(&mut rng);

    let listed = validate_added_owner(&client, &owner).await.unwrap();

    assert!(listed.id.is_some());
    assert_eq!(listed.comparable_fields(), owner.comparable_fields());
}

#[tokio::test]
#[ignore = "requires running petclinic"]
async fn full_check_run() {
    let client = live_client();
    let mut rng = StdRng::from_entropy();
    let report = run_all(&client, &mut rng, Local::now().date_naive(), "Franklin")
        .await
        .unwrap();
    println!("{report}");
}
