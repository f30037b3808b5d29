use std::fs;
use std::path::Path;

use crate::model::WorkspaceConfig;

pub const CONFIG_FILE: &str = "canopy.toml";

/// Load canopy.toml from the workspace directory. A missing or
/// unparsable file degrades to the default config.
pub fn load_config(dir: &Path) -> WorkspaceConfig {
    let path = dir.join(CONFIG_FILE);
    let Ok(content) = fs::read_to_string(&path) else {
        return WorkspaceConfig::default();
    };
    toml::from_str(&content).unwrap_or_default()
}

/// Write canopy.toml (used by init)
pub fn write_config(dir: &Path, config: &WorkspaceConfig) -> Result<(), std::io::Error> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    fs::write(dir.join(CONFIG_FILE), content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path());
        assert!(config.ui.expand_tasks);
    }

    #[test]
    fn write_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut config = WorkspaceConfig::default();
        config.workspace.name = "home".into();
        config.ui.expand_tasks = false;
        write_config(dir.path(), &config).unwrap();

        let loaded = load_config(dir.path());
        assert_eq!(loaded.workspace.name, "home");
        assert!(!loaded.ui.expand_tasks);
    }

    #[test]
    fn malformed_config_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "not [valid").unwrap();
        let config = load_config(dir.path());
        assert!(config.ui.expand_tasks);
    }
}
