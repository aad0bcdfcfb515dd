use std::path::Path;

use magnetboard_core::BoardConfig;

pub fn init(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    std::fs::write(path, BoardConfig::scaffold().to_toml_string()?)?;
    println!("✓ Generated {}", path.display());
    Ok(())
}
