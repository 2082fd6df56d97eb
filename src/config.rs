//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/tocedit/tocedit.toml`
//! 3. Local config: `<dir>/.tocedit.toml`
//! 4. Environment variables: `TOCEDIT_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ids::{IdGenerator, IdStrategy};
use crate::application::session::SessionOptions;
use crate::application::ApplicationError;
use crate::domain::Forest;

/// Node id generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IdConfig {
    /// `uuid` or `sequential`
    pub strategy: IdStrategy,
    /// Prefix for sequential ids (e.g. "n" → n1, n2, ...)
    pub prefix: String,
}

impl Default for IdConfig {
    fn default() -> Self {
        Self {
            strategy: IdStrategy::Uuid,
            prefix: "n".into(),
        }
    }
}

/// Tree rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    /// Append `[id]` to every title
    pub show_ids: bool,
    /// Marker in front of a collapsed node that has children
    pub collapsed_marker: String,
    /// Marker in front of an expanded node
    pub expanded_marker: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            show_ids: false,
            collapsed_marker: "▸".into(),
            expanded_marker: "▾".into(),
        }
    }
}

/// Raw id settings for intermediate parsing (`None` → inherit from base).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawIdConfig {
    pub strategy: Option<IdStrategy>,
    pub prefix: Option<String>,
}

/// Raw render settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderConfig {
    pub show_ids: Option<bool>,
    pub collapsed_marker: Option<String>,
    pub expanded_marker: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub default_title: Option<String>,
    pub expand_on_add: Option<bool>,
    pub ids: RawIdConfig,
    pub render: RawRenderConfig,
}

/// Unified configuration for tocedit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Title given to nodes added with a blank title
    pub default_title: String,
    /// Expand the parent when a child is added
    pub expand_on_add: bool,
    /// Id generation
    pub ids: IdConfig,
    /// Tree rendering
    pub render: RenderConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_title: "Untitled".into(),
            expand_on_add: true,
            ids: IdConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

/// Get the global config directory (`$XDG_CONFIG_HOME/tocedit`).
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tocedit").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the global config file path.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("tocedit.toml"))
}

/// Get the local config file path inside `dir`.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".tocedit.toml")
}

fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {e}", path.display()),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {e}", path.display()),
    })
}

fn load_local_raw(dir: &Path) -> Result<Option<RawSettings>, ApplicationError> {
    let local_path = local_config_path(dir);
    if !local_path.exists() {
        return Ok(None);
    }
    load_raw_settings(&local_path).map(Some)
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            default_title: overlay
                .default_title
                .clone()
                .unwrap_or_else(|| self.default_title.clone()),
            expand_on_add: overlay.expand_on_add.unwrap_or(self.expand_on_add),
            ids: IdConfig {
                strategy: overlay.ids.strategy.unwrap_or(self.ids.strategy),
                prefix: overlay
                    .ids
                    .prefix
                    .clone()
                    .unwrap_or_else(|| self.ids.prefix.clone()),
            },
            render: RenderConfig {
                show_ids: overlay.render.show_ids.unwrap_or(self.render.show_ids),
                collapsed_marker: overlay
                    .render
                    .collapsed_marker
                    .clone()
                    .unwrap_or_else(|| self.render.collapsed_marker.clone()),
                expanded_marker: overlay
                    .render
                    .expanded_marker
                    .clone()
                    .unwrap_or_else(|| self.render.expanded_marker.clone()),
            },
        }
    }

    /// Load settings: defaults → global → local (`local_dir`) → env vars.
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(raw) = local_dir.map(load_local_raw).transpose()?.flatten() {
            current = current.merge_with(&raw);
        }

        // 4. Environment variables (explicit override)
        Self::apply_env_overrides(current)
    }

    /// Load only the local config in `dir` on top of the defaults.
    ///
    /// Returns `None` if `dir` has no `.tocedit.toml`. Neither the global
    /// config nor environment variables are consulted.
    pub fn load_local_only(dir: &Path) -> Result<Option<Self>, ApplicationError> {
        Ok(load_local_raw(dir)?.map(|raw| Self::default().merge_with(&raw)))
    }

    /// Apply TOCEDIT_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TOCEDIT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("default_title") {
            settings.default_title = val;
        }
        if let Ok(val) = config.get_bool("expand_on_add") {
            settings.expand_on_add = val;
        }
        if let Ok(val) = config.get_string("ids.strategy") {
            settings.ids.strategy = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_string("ids.prefix") {
            settings.ids.prefix = val;
        }
        if let Ok(val) = config.get_bool("render.show_ids") {
            settings.render.show_ids = val;
        }
        if let Ok(val) = config.get_string("render.collapsed_marker") {
            settings.render.collapsed_marker = val;
        }
        if let Ok(val) = config.get_string("render.expanded_marker") {
            settings.render.expanded_marker = val;
        }

        Ok(settings)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            default_title: self.default_title.clone(),
            expand_on_add: self.expand_on_add,
        }
    }

    /// Id generator for a session starting from `forest`.
    pub fn id_generator(&self, forest: &Forest) -> Box<dyn IdGenerator> {
        self.ids.strategy.generator(&self.ids.prefix, forest)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# tocedit configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/tocedit/tocedit.toml
#   Local:  <dir>/.tocedit.toml
#   Env:    TOCEDIT_* environment variables (nested keys use "__", e.g. TOCEDIT_IDS__STRATEGY)

# Title for nodes added without one
# default_title = "Untitled"

# Expand the parent when a child is added
# expand_on_add = true

[ids]
# "uuid" or "sequential"
# strategy = "uuid"

# Prefix for sequential ids
# prefix = "n"

[render]
# Append [id] to titles
# show_ids = false

# collapsed_marker = "▸"
# expanded_marker = "▾"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
