use std::path::Path;

use anyhow::bail;
use splitgrid_core::SplitConfig;

pub fn init(path: &Path) -> anyhow::Result<()> {
    let output = path.join("splitgrid.toml");
    if output.exists() {
        bail!("{} already exists", output.display());
    }

    std::fs::write(&output, SplitConfig::scaffold().to_toml_string()?)?;
    println!("✓ Generated {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_parsable_config() {
        let dir = tempfile::tempdir().unwrap();
        init(dir.path()).unwrap();

        let config = SplitConfig::from_file(&dir.path().join("splitgrid.toml")).unwrap();
        assert!(config.partition.is_some());
        assert!(config.discover.is_some());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("splitgrid.toml"), "# mine\n").unwrap();

        assert!(init(dir.path()).is_err());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("splitgrid.toml")).unwrap(),
            "# mine\n"
        );
    }
}
