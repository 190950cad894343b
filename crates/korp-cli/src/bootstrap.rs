use anyhow::Context;

use korp_config::KorpConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, the layered config, then apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<KorpConfig> {
    load_dotenv()?;

    let mut config = KorpConfig::load().context("failed to load korpus configuration")?;
    if let Some(server) = &flags.server {
        config.server.base_url.clone_from(server);
        config.validate().context("invalid --server")?;
    }
    tracing::debug!(base_url = %config.server.base_url, "configuration loaded");
    Ok(config)
}

fn load_dotenv() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let env_path = cwd.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}
