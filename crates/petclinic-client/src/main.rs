//! `petclinic-check` - command line driver for the pet clinic checks.

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "petclinic_client=info,petclinic_core=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = petclinic_client::Cli::parse();
    tracing::debug!(
        base_url = %cli.base_url,
        core_version = petclinic_core::CORE_VERSION,
        "starting {}",
        petclinic_client::crate_name()
    );

    match petclinic_client::run(cli).await {
        Ok(output) => {
            println!("{output}");
        }
        Err(err) => {
            eprintln!("{} {err}", "error:".red());
            std::process::exit(1);
        }
    }
}
