//! Shared setup for live checks

pub mod fixtures {
    use std::sync::Once;

    use petclinic_client::{ClientConfig, PetclinicClient};

    static INIT: Once = Once::new();

    /// Initialize logging once per test binary
    pub fn init() {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter("petclinic_client=debug,petclinic_core=debug")
                .with_test_writer()
                .try_init();
        });
    }

    /// Client for the service named by `PETCLINIC_BASE_URL` (or the local default)
    pub fn live_client() -> PetclinicClient {
        init();
        let config = ClientConfig::from_env().expect("petclinic config should load");
        PetclinicClient::new(config).expect("http client should build")
    }
}
