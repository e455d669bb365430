//! Config commands

use crate::config::{mask_key, Config};
use crate::ConfigCommands;

pub async fn handle(action: ConfigCommands, profile: Option<&str>) -> anyhow::Result<()> {
    match action {
        ConfigCommands::Init => {
            let config = Config::default();
            let path = config.save(profile)?;
            println!("Configuration initialized at {}", path.display());
        }
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load(profile)?;
            match key.as_str() {
                "api_key" => config.api_key = Some(value),
                "tenant_id" => config.tenant_id = Some(value),
                "api_url" => config.api_url = Some(value),
                "default_format" => config.default_format = Some(value),
                "search_policy" => {
                    config.gate.search_policy = serde_json::from_value(serde_json::Value::String(value))
                        .map_err(|_| anyhow::anyhow!("search_policy must be `bypass` or `enforce`"))?
                }
                _ => anyhow::bail!("Unknown config key: {}", key),
            }
            config.save(profile)?;
            println!("Set {} successfully", key);
        }
        ConfigCommands::Get { key } => {
            let config = Config::load(profile)?;
            let value = match key.as_str() {
                "api_key" => config.api_key.map(|k| mask_key(&k)),
                "tenant_id" => config.tenant_id,
                "api_url" => config.api_url,
                "default_format" => config.default_format,
                "search_policy" => Some(format!("{:?}", config.gate.search_policy).to_lowercase()),
                _ => anyhow::bail!("Unknown config key: {}", key),
            };
            println!("{}: {}", key, value.unwrap_or_else(|| "(not set)".into()));
        }
        ConfigCommands::List => {
            let config = Config::load(profile)?;
            println!("api_url: {}", config.api_url.unwrap_or_else(|| "(not set)".into()));
            println!("tenant_id: {}", config.tenant_id.unwrap_or_else(|| "(not set)".into()));
            println!("api_key: {}", config.api_key.map(|k| mask_key(&k)).unwrap_or_else(|| "(not set)".into()));
            println!("default_format: {}", config.default_format.unwrap_or_else(|| "(not set)".into()));
            println!("[gate]\n{}", toml::to_string_pretty(&config.gate)?);
        }
    }
    Ok(())
}
