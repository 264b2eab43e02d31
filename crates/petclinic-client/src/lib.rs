use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use petclinic_core::pet::birth_date;
use petclinic_core::{parse_owners, random_digits, random_name, OwnerRecord, ParseError, PetRecord};
use rand::rngs::StdRng;
use rand::SeedableRng;
use reqwest::header::ACCEPT;
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod config;
pub mod scenario;

pub use config::ClientConfig;
pub use scenario::{
    add_pet_to_owner, find_owner_and_add_pet, lookup_owner, random_owner, run_all,
    validate_added_owner, CheckError, CheckReport,
};

const JSON: &str = "application/json";

pub fn crate_name() -> &'static str {
    "petclinic-client"
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "petclinic-check",
    version,
    about = "Pet clinic REST API checker",
    long_about = "Lists and creates owners and pets on a pet clinic REST service and verifies the records it returns"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "PETCLINIC_BASE_URL",
        default_value = config::DEFAULT_BASE_URL,
        help = "Pet clinic base HTTP URL"
    )]
    pub base_url: String,
    #[arg(
        long,
        global = true,
        env = "PETCLINIC_TIMEOUT_SECS",
        default_value_t = config::DEFAULT_TIMEOUT_SECS,
        help = "Request timeout in seconds"
    )]
    pub timeout_secs: u64,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    #[command(about = "List all owners")]
    ListOwners,
    #[command(about = "Find an owner by last name")]
    FindOwner {
        #[arg(help = "Owner last name (case-sensitive)")]
        last_name: String,
    },
    #[command(about = "Add an owner and verify it is listed with the same fields")]
    AddOwner {
        #[arg(long, help = "First name (random when omitted)")]
        first_name: Option<String>,
        #[arg(long, help = "Last name (random when omitted)")]
        last_name: Option<String>,
        #[arg(long, help = "Address (random when omitted)")]
        address: Option<String>,
        #[arg(long, help = "City (random when omitted)")]
        city: Option<String>,
        #[arg(long, help = "Telephone digits (random when omitted)")]
        telephone: Option<String>,
    },
    #[command(about = "Add a pet to an existing owner")]
    AddPet {
        #[arg(help = "Last name of the owner")]
        owner: String,
        #[arg(long, help = "Pet name (random when omitted)")]
        name: Option<String>,
        #[arg(
            long,
            value_parser = parse_birth_date,
            help = "Birth date as yyyy/MM/dd (a week ago when omitted)"
        )]
        birth_date: Option<NaiveDate>,
    },
    #[command(about = "Run every check against the service")]
    Check {
        #[arg(
            long,
            default_value = "Franklin",
            help = "Last name of an owner the service is seeded with"
        )]
        owner: String,
    },
}

fn parse_birth_date(raw: &str) -> Result<NaiveDate, String> {
    birth_date::parse(raw).map_err(|err| format!("expected yyyy/MM/dd: {err}"))
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("http transport error: {0}")]
    HttpTransport(String),
    #[error("expected http status {expected}, got {status}: {body}")]
    UnexpectedStatus {
        expected: ExpectedStatus,
        status: u16,
        body: String,
    },
    #[error("json decode error: {0}")]
    Decode(String),
    #[error("invalid owner listing: {0}")]
    InvalidListing(#[from] ParseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedStatus {
    Success,
    Exactly(StatusCode),
}

impl ExpectedStatus {
    fn matches(self, status: StatusCode) -> bool {
        match self {
            ExpectedStatus::Success => status.is_success(),
            ExpectedStatus::Exactly(expected) => status == expected,
        }
    }
}

impl fmt::Display for ExpectedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedStatus::Success => write!(f, "2xx"),
            ExpectedStatus::Exactly(status) => write!(f, "{}", status.as_u16()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PetclinicClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl PetclinicClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ClientError::HttpTransport(err.to_string()))?;
        debug!(
            base_url = config.base_url(),
            timeout_ms = config.timeout.as_millis() as u64,
            "http client ready"
        );
        Ok(Self { config, http })
    }

    /// `GET /api/owners`; any 2xx status is accepted.
    pub async fn list_owners(&self) -> Result<Vec<OwnerRecord>, ClientError> {
        let url = self.config.endpoint("/api/owners");
        debug!(%url, "listing owners");

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, JSON)
            .send()
            .await
            .map_err(|err| ClientError::HttpTransport(err.to_string()))?;

        let body = read_body(response, ExpectedStatus::Success).await?;
        let owners = parse_owners(&body)?;
        debug!(count = owners.len(), "owners listed");
        Ok(owners)
    }

    /// `POST /api/owners`; the service must answer 201 Created.
    pub async fn create_owner(&self, owner: &OwnerRecord) -> Result<OwnerRecord, ClientError> {
        self.post_created("/api/owners", owner).await
    }

    /// `POST /api/pets`; the service must answer 201 Created.
    pub async fn create_pet(&self, pet: &PetRecord) -> Result<PetRecord, ClientError> {
        self.post_created("/api/pets", pet).await
    }

    async fn post_created<TReq, TRes>(&self, path: &str, payload: &TReq) -> Result<TRes, ClientError>
    where
        TReq: Serialize + Sync,
        TRes: for<'de> Deserialize<'de>,
    {
        let url = self.config.endpoint(path);
        debug!(%url, "posting record");

        let response = self
            .http
            .post(&url)
            .header(ACCEPT, JSON)
            .json(payload)
            .send()
            .await
            .map_err(|err| ClientError::HttpTransport(err.to_string()))?;

        let body = read_body(response, ExpectedStatus::Exactly(StatusCode::CREATED)).await?;
        serde_json::from_str(&body).map_err(|err| ClientError::Decode(err.to_string()))
    }
}

async fn read_body(response: Response, expected: ExpectedStatus) -> Result<String, ClientError> {
    let status = response.status();
    if !expected.matches(status) {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unable to read body>".to_string());
        return Err(ClientError::UnexpectedStatus {
            expected,
            status: status.as_u16(),
            body,
        });
    }

    response
        .text()
        .await
        .map_err(|err| ClientError::HttpTransport(err.to_string()))
}

fn describe_owner(owner: &OwnerRecord) -> String {
    let id = owner.id.map_or_else(|| "-".to_string(), |id| id.to_string());
    format!(
        "[{id}] {} {}, {}, {}, tel. {}",
        owner.first_name, owner.last_name, owner.address, owner.city, owner.telephone
    )
}

pub async fn run(cli: Cli) -> Result<String, CheckError> {
    let config = ClientConfig::new(&cli.base_url, Duration::from_secs(cli.timeout_secs))?;
    let client = PetclinicClient::new(config)?;
    let mut rng = StdRng::from_entropy();
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Commands::ListOwners => {
            let owners = client.list_owners().await?;
            if owners.is_empty() {
                return Ok("No owners found.".to_string());
            }
            let mut output = String::new();
            for owner in &owners {
                output.push_str(&describe_owner(owner));
                output.push('\n');
            }
            output.push_str(&format!("Total: {} owners", owners.len()));
            Ok(output)
        }
        Commands::FindOwner { last_name } => {
            let owner = lookup_owner(&client, &last_name).await?;
            Ok(describe_owner(&owner))
        }
        Commands::AddOwner {
            first_name,
            last_name,
            address,
            city,
            telephone,
        } => {
            let owner = OwnerRecord::new(
                first_name.unwrap_or_else(|| random_name(&mut rng, 5)),
                last_name.unwrap_or_else(|| random_name(&mut rng, 5)),
                address.unwrap_or_else(|| random_name(&mut rng, 5)),
                city.unwrap_or_else(|| random_name(&mut rng, 5)),
                telephone.unwrap_or_else(|| random_digits(&mut rng, 5)),
            );
            let listed = validate_added_owner(&client, &owner).await?;
            Ok(format!("owner added: {}", describe_owner(&listed)))
        }
        Commands::AddPet {
            owner,
            name,
            birth_date,
        } => {
            let name = name.unwrap_or_else(|| random_name(&mut rng, 5));
            let birth_date = birth_date.unwrap_or(today - chrono::Duration::days(7));
            let pet = find_owner_and_add_pet(&client, &owner, &name, birth_date).await?;
            let id = pet.id.map_or_else(|| "-".to_string(), |id| id.to_string());
            Ok(format!("pet added: [{id}] {} for owner {owner}", pet.name))
        }
        Commands::Check { owner } => {
            let report = run_all(&client, &mut rng, today, &owner).await?;
            Ok(report.to_string())
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::client_for;
    use super::{Cli, ClientConfig, ClientError, Commands, ExpectedStatus, PetclinicClient};
    use chrono::NaiveDate;
    use clap::Parser;
    use httpmock::{
        Method::{GET, POST},
        MockServer,
    };
    use petclinic_core::{OwnerRecord, PetRecord, PetType};
    use reqwest::StatusCode;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn cli_parses_find_owner_command() {
        let cli = Cli::parse_from(["petclinic-check", "find-owner", "Franklin"]);
        match cli.command {
            Commands::FindOwner { last_name } => assert_eq!(last_name, "Franklin"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_parses_add_pet_with_slash_date() {
        let cli = Cli::parse_from([
            "petclinic-check",
            "--base-url",
            "http://127.0.0.1:9966/petclinic",
            "add-pet",
            "Franklin",
            "--name",
            "Rolfo",
            "--birth-date",
            "2024/01/08",
        ]);
        assert_eq!(cli.base_url, "http://127.0.0.1:9966/petclinic");
        match cli.command {
            Commands::AddPet {
                owner,
                name,
                birth_date,
            } => {
                assert_eq!(owner, "Franklin");
                assert_eq!(name.as_deref(), Some("Rolfo"));
                assert_eq!(birth_date, chrono::NaiveDate::from_ymd_opt(2024, 1, 8));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_malformed_birth_date() {
        let result = Cli::try_parse_from([
            "petclinic-check",
            "add-pet",
            "Franklin",
            "--birth-date",
            "yesterday",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn check_defaults_to_seeded_owner() {
        let cli = Cli::parse_from(["petclinic-check", "check"]);
        match cli.command {
            Commands::Check { owner } => assert_eq!(owner, "Franklin"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn expected_status_display() {
        assert_eq!(ExpectedStatus::Success.to_string(), "2xx");
        assert_eq!(ExpectedStatus::Exactly(StatusCode::CREATED).to_string(), "201");
    }

    #[tokio::test]
    async fn list_owners_requests_json_listing() {
        let server = MockServer::start_async().await;
        let owners_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/petclinic/api/owners")
                    .header("accept", "application/json");
                then.status(200).json_body(json!([
                    {"id": 1, "firstName": "George", "lastName": "Franklin", "address": "110 W. Liberty St.", "city": "Madison", "telephone": "6085551023", "pets": []}
                ]));
            })
            .await;

        let owners = client_for(&server).list_owners().await.unwrap();

        owners_mock.assert_async().await;
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0].last_name, "Franklin");
        assert_eq!(owners[0].id, Some(1));
    }

    #[tokio::test]
    async fn list_owners_rejects_non_success_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/petclinic/api/owners");
                then.status(500).body("boom");
            })
            .await;

        let error = client_for(&server).list_owners().await.unwrap_err();
        match error {
            ClientError::UnexpectedStatus {
                expected,
                status,
                body,
            } => {
                assert_eq!(expected, ExpectedStatus::Success);
                assert_eq!(status, 500);
                assert!(body.contains("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_owners_reports_incomplete_records() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/petclinic/api/owners");
                then.status(200).json_body(json!([{"id": 1, "firstName": "George"}]));
            })
            .await;

        let error = client_for(&server).list_owners().await.unwrap_err();
        assert!(matches!(error, ClientError::InvalidListing(_)));
    }

    #[tokio::test]
    async fn create_owner_sends_null_id_and_expects_created() {
        let server = MockServer::start_async().await;
        let create_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/petclinic/api/owners")
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "id": null,
                        "firstName": "Abcde",
                        "lastName": "Fghij",
                        "address": "Klmno",
                        "city": "Pqrst",
                        "telephone": "12345"
                    }));
                then.status(201).json_body(json!({
                    "id": 11,
                    "firstName": "Abcde",
                    "lastName": "Fghij",
                    "address": "Klmno",
                    "city": "Pqrst",
                    "telephone": "12345"
                }));
            })
            .await;

        let owner = OwnerRecord::new("Abcde", "Fghij", "Klmno", "Pqrst", "12345");
        let created = client_for(&server).create_owner(&owner).await.unwrap();

        create_mock.assert_async().await;
        assert_eq!(created.id, Some(11));
        assert_eq!(created.last_name, "Fghij");
    }

    #[tokio::test]
    async fn create_owner_treats_200_as_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/petclinic/api/owners");
                then.status(200).json_body(json!({"id": 11}));
            })
            .await;

        let owner = OwnerRecord::new("Abcde", "Fghij", "Klmno", "Pqrst", "12345");
        let error = client_for(&server).create_owner(&owner).await.unwrap_err();
        match error {
            ClientError::UnexpectedStatus { expected, status, .. } => {
                assert_eq!(expected, ExpectedStatus::Exactly(StatusCode::CREATED));
                assert_eq!(status, 200);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_pet_reports_undecodable_created_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/petclinic/api/pets");
                then.status(201).json_body(json!({
                    "id": 14,
                    "name": "Rolfo",
                    "birthDate": "2024/01/08"
                }));
            })
            .await;

        let owner = OwnerRecord::new("George", "Franklin", "110 W. Liberty St.", "Madison", "6085551023")
            .with_id(6);
        let birth = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        let pet = PetRecord::new("Rolfo", birth, PetType::default(), owner);

        let error = client_for(&server).create_pet(&pet).await.unwrap_err();
        match error {
            ClientError::Decode(message) => assert!(message.contains("type")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_failure_is_surfaced() {
        let config = ClientConfig::new("http://127.0.0.1:1/petclinic", Duration::from_secs(2)).unwrap();
        let client = PetclinicClient::new(config).unwrap();
        let error = client.list_owners().await.unwrap_err();
        assert!(matches!(error, ClientError::HttpTransport(_)));
    }
}
