//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/famtree/famtree.toml`
//! 3. Local config: `<dir>/.famtree.toml` (usually the working directory)
//! 4. Environment variables: `FAMTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::persistence::DEFAULT_STORAGE_KEY;
use crate::application::{ApplicationError, FileOp, IoResultExt};
use crate::infrastructure::traits::FileSystem;

/// Export layout settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExportConfig {
    /// Lines per page of the exported document
    pub lines_per_page: usize,
    /// Directory receiving exports when no output path is given
    pub dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            lines_per_page: 60,
            dir: PathBuf::from("."),
        }
    }
}

/// Raw export config for intermediate parsing (`None` → not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawExportConfig {
    pub lines_per_page: Option<usize>,
    pub dir: Option<PathBuf>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub storage_key: Option<String>,
    pub admin_code: Option<String>,
    pub language: Option<String>,
    pub family_name: Option<String>,
    pub family_origin: Option<String>,
    #[serde(default)]
    pub export: RawExportConfig,
}

/// Unified configuration for famtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the stored tree (default: XDG data dir)
    pub data_dir: PathBuf,
    /// Storage key; the tree is kept in `<data_dir>/<storage_key>.json`
    pub storage_key: String,
    /// Shared secret unlocking add/delete
    pub admin_code: String,
    /// UI language code (en, es, fr)
    pub language: String,
    /// Family name shown in titles and exports
    pub family_name: String,
    /// Where the family started off, shown in exports
    pub family_origin: String,
    pub export: ExportConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: dirs_default_data_dir(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            admin_code: "1234".to_string(),
            language: "en".to_string(),
            family_name: "James".to_string(),
            family_origin: "USA".to_string(),
            export: ExportConfig::default(),
        }
    }
}

/// Get the default data directory.
fn dirs_default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "famtree")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.famtree"))
}

/// Get the XDG config directory for famtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "famtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("famtree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".famtree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Path of the stored tree.
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.storage_key))
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.data_dir = PathBuf::from(expand_env_vars(&self.data_dir.to_string_lossy()));
        self.export.dir = PathBuf::from(expand_env_vars(&self.export.dir.to_string_lossy()));
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_dir: overlay
                .data_dir
                .clone()
                .unwrap_or_else(|| self.data_dir.clone()),
            storage_key: overlay
                .storage_key
                .clone()
                .unwrap_or_else(|| self.storage_key.clone()),
            admin_code: overlay
                .admin_code
                .clone()
                .unwrap_or_else(|| self.admin_code.clone()),
            language: overlay
                .language
                .clone()
                .unwrap_or_else(|| self.language.clone()),
            family_name: overlay
                .family_name
                .clone()
                .unwrap_or_else(|| self.family_name.clone()),
            family_origin: overlay
                .family_origin
                .clone()
                .unwrap_or_else(|| self.family_origin.clone()),
            export: ExportConfig {
                lines_per_page: overlay
                    .export
                    .lines_per_page
                    .unwrap_or(self.export.lines_per_page),
                dir: overlay
                    .export
                    .dir
                    .clone()
                    .unwrap_or_else(|| self.export.dir.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.famtree.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), local_dir)
    }

    /// Same as [`Settings::load`] with an explicit global config file.
    pub fn load_from(
        global_path: Option<&Path>,
        local_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_path {
            if global_path.exists() {
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply FAMTREE_* environment variables as explicit overrides.
    ///
    /// Nested keys use a double underscore: `FAMTREE_EXPORT__LINES_PER_PAGE`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("FAMTREE")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("data_dir") {
            settings.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("storage_key") {
            settings.storage_key = val;
        }
        if let Ok(val) = config.get_string("admin_code") {
            settings.admin_code = val;
        }
        if let Ok(val) = config.get_string("language") {
            settings.language = val;
        }
        if let Ok(val) = config.get_string("family_name") {
            settings.family_name = val;
        }
        if let Ok(val) = config.get_string("family_origin") {
            settings.family_origin = val;
        }
        if let Ok(val) = config.get::<usize>("export.lines_per_page") {
            settings.export.lines_per_page = val;
        }
        if let Ok(val) = config.get_string("export.dir") {
            settings.export.dir = PathBuf::from(val);
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# famtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/famtree/famtree.toml
#   Local:  ./.famtree.toml
#   Env:    FAMTREE_* environment variables (FAMTREE_EXPORT__DIR for [export] dir)

# Directory holding the stored tree
# data_dir = "~/.local/share/famtree"

# Storage key: the tree is kept in <data_dir>/<storage_key>.json
# storage_key = "familyTreeData"

# Shared code unlocking add/delete (prefer FAMTREE_ADMIN_CODE)
# admin_code = "1234"

# UI language: en, es, fr
# language = "en"

# family_name = "James"
# family_origin = "USA"

[export]
# lines_per_page = 60
# dir = "."
"#
        .to_string()
    }
}

/// Write [`Settings::template`] to `path`, refusing to replace an existing file.
pub fn write_template(fs: &dyn FileSystem, path: &Path) -> Result<(), ApplicationError> {
    if fs.exists(path) {
        return Err(ApplicationError::Config {
            message: format!("config already exists: {}", path.display()),
        });
    }
    fs.ensure_parent(path).file_context(FileOp::CreateDir, path)?;
    fs.write_atomic(path, &Settings::template())
        .file_context(FileOp::WriteConfig, path)
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_created_then_match_widget_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.storage_key, "familyTreeData");
        assert_eq!(settings.admin_code, "1234");
        assert_eq!(settings.family_name, "James");
        assert_eq!(settings.family_origin, "USA");
        assert_eq!(settings.export.lines_per_page, 60);
    }

    #[test]
    fn given_tilde_in_data_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            data_dir: PathBuf::from("~/.famtree"),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let dir = settings.data_dir.to_string_lossy();
        assert!(dir.starts_with(&home), "data_dir should start with home: {dir}");
        assert!(!dir.contains('~'), "data_dir should not contain tilde: {dir}");
    }

    #[test]
    fn given_partial_overlay_when_merging_then_only_specified_fields_change() {
        let base = Settings::default();
        let overlay = RawSettings {
            family_name: Some("Okafor".to_string()),
            export: RawExportConfig {
                lines_per_page: Some(20),
                dir: None,
            },
            ..RawSettings::default()
        };

        let result = base.merge_with(&overlay);

        assert_eq!(result.family_name, "Okafor");
        assert_eq!(result.family_origin, base.family_origin);
        assert_eq!(result.export.lines_per_page, 20);
        assert_eq!(result.export.dir, base.export.dir);
    }

    #[test]
    fn given_settings_when_serialized_then_template_keys_round_trip() {
        let toml = Settings::default().to_toml().unwrap();
        let raw: RawSettings = toml::from_str(&toml).unwrap();
        assert_eq!(raw.storage_key.as_deref(), Some("familyTreeData"));
        assert_eq!(raw.export.lines_per_page, Some(60));
        let template: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(template.family_name.is_none());
    }

    #[test]
    fn given_storage_key_when_resolving_path_then_json_file_in_data_dir() {
        let settings = Settings {
            data_dir: PathBuf::from("/tmp/ft"),
            storage_key: "k".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.storage_path(), PathBuf::from("/tmp/ft/k.json"));
    }
}
