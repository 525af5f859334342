use std::path::Path;

use anyhow::bail;

use folio_core::FolioConfig;
use folio_modules::ContentLibrary;

/// Write `folio.toml` and an empty `content.json` under `path`.
pub fn init(path: &Path, name: &str, force: bool) -> anyhow::Result<()> {
    let config_path = path.join("folio.toml");
    let content_path = path.join("content.json");
    if !force {
        for existing in [&config_path, &content_path] {
            if existing.exists() {
                bail!("{} already exists (use --force to overwrite)", existing.display());
            }
        }
    }

    std::fs::create_dir_all(path)?;
    std::fs::write(&config_path, FolioConfig::scaffold(name).to_toml_string()?)?;
    println!("✓ Generated {}", config_path.display());
    std::fs::write(&content_path, serde_json::to_string_pretty(&ContentLibrary::default())?)?;
    println!("✓ Generated {}", content_path.display());
    Ok(())
}
