//! Show or persist the effective configuration.

use gazemap_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, write: bool) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);

    if write {
        let path = config
            .save()
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", config_file_path().display()))?;
        println!("Saved to: {}", path.display());
    }

    Ok(())
}
