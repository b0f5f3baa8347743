// Editor settings
// Loaded from ~/.config/vtable/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use vtable_engine::MergeContent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Merge
    #[serde(rename = "merge.content")]
    pub merge_content: MergeContent,

    // Rows
    #[serde(rename = "rows.keepOneRow")]
    pub keep_one_row: bool,

    // Output
    #[serde(rename = "output.pretty")]
    pub pretty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            merge_content: MergeContent::KeepFirst,
            keep_one_row: true,
            pretty: true,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vtable");
        config_dir.join("settings.json")
    }

    /// Load settings from the user config dir, writing a commented default
    /// file on first run
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file(&path);
            return settings;
        }

        Self::load_from(&path)
    }

    /// Load settings from an explicit path, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("Error parsing {}: {}", path.display(), e);
                    eprintln!("Using default settings");
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&cleaned)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| e.to_string())?;

        fs::write(path, json).map_err(|e| e.to_string())
    }

    fn create_default_file(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!("Error creating config directory: {}", e);
                return;
            }
        }

        if let Err(e) = fs::write(path, DEFAULT_SETTINGS) {
            eprintln!("Error writing default settings.json: {}", e);
        }
    }
}

const DEFAULT_SETTINGS: &str = r#"{
    // Merge: "keepFirst" keeps the top-left content,
    // "keepAll" joins every non-empty cell with <br>
    "merge.content": "keepFirst",

    // Refuse to delete the last row of a section while other sections have rows
    "rows.keepOneRow": true,

    // Pretty-print table JSON written by the CLI
    "output.pretty": true
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_parses_to_defaults() {
        assert_eq!(Settings::parse(DEFAULT_SETTINGS).unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let settings = Settings::parse(r#"{ "merge.content": "keepAll" }"#).unwrap();
        assert_eq!(settings.merge_content, MergeContent::KeepAll);
        assert!(settings.keep_one_row);
        assert!(settings.pretty);
    }

    #[test]
    fn test_comment_lines_stripped() {
        let settings = Settings::parse(
            "{\n  // compact output\n  \"output.pretty\": false\n}",
        )
        .unwrap();
        assert!(!settings.pretty);
    }

    #[test]
    fn test_unknown_merge_policy_is_error() {
        assert!(Settings::parse(r#"{ "merge.content": "keepSome" }"#).is_err());
    }

    #[test]
    fn test_load_from_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Settings::load_from(&dir.path().join("absent.json")), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            merge_content: MergeContent::KeepAll,
            keep_one_row: false,
            pretty: false,
        };
        settings.save_to(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"rows.keepOneRow\": false"));
        assert_eq!(Settings::load_from(&path), settings);
    }
}
