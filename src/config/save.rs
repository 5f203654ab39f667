use crate::config::types::ExtractorSettings;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn save_settings(settings: &ExtractorSettings, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write settings to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    #[test]
    fn test_saved_settings_load_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        let settings = ExtractorSettings {
            jpeg_quality: 5,
            num_processes: 2,
            ..ExtractorSettings::default()
        };

        save_settings(&settings, &path).unwrap();
        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.settings, settings);
    }
}
