use std::sync::Arc;

use anyhow::Context;

use korp_api::{
    ApiClient, ClassifierClient, ClientOptions, FileTokenStore, KeyringTokenStore,
    MemoryTokenStore, Session, TokenStore,
};
use korp_config::KorpConfig;
use korp_corpus::{Console, ReconcilePolicy};

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: KorpConfig,
    pub console: Console,
}

impl AppContext {
    pub fn init(config: KorpConfig) -> anyhow::Result<Self> {
        let options = ClientOptions {
            timeout: config.server.timeout(),
            user_agent: config.server.user_agent.clone(),
        };
        let client = ApiClient::new(&config.server.base_url, &options)
            .context("failed to build HTTP client")?;

        let session = Session::new(client.clone(), token_store(&config)?);
        let console = Console::new(
            session,
            ClassifierClient::new(client),
            ReconcilePolicy::from(&config.retrain),
        );

        Ok(Self { config, console })
    }
}

/// Keychain with file fallback, or memory only when persistence is off.
fn token_store(config: &KorpConfig) -> anyhow::Result<Arc<dyn TokenStore>> {
    if !config.session.persist {
        return Ok(Arc::new(MemoryTokenStore::new()));
    }
    let path = config
        .session
        .resolved_credentials_path()
        .context("home directory not found; set session.credentials_path or session.persist = false")?;
    Ok(Arc::new(KeyringTokenStore::new(
        &config.session.keyring_service,
        FileTokenStore::new(path),
    )))
}
