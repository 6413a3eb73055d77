//! Configuration management for the reflector
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schema-reflect.toml)
//! - Environment variables (SCHEMA_REFLECT__*)
//!
//! ## Example config file (schema-reflect.toml):
//! ```toml
//! [naming]
//! definitions_prefix = "#/components/schemas/"
//! property_name_tag = "json"
//! additional_property_name_tags = ["yaml"]
//!
//! [behavior]
//! root_ref = true
//! envelop_nullability = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::reflector::options::{self, ReflectOption};
use crate::schema::DEFAULT_DEFINITIONS_PREFIX;

/// Reflector defaults that can be expressed as data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReflectorConfig {
    /// Names and references
    #[serde(default)]
    pub naming: NamingConfig,

    /// Walker toggles
    #[serde(default)]
    pub behavior: BehaviorConfig,
}

/// Naming configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Prefix of definition references
    #[serde(default = "default_definitions_prefix")]
    pub definitions_prefix: String,

    /// Tag key holding property names
    #[serde(default = "default_property_name_tag")]
    pub property_name_tag: String,

    /// Fallback tag keys, consulted in order
    #[serde(default)]
    pub additional_property_name_tags: Vec<String>,
}

/// Behavior toggles, all off by default
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BehaviorConfig {
    #[serde(default)]
    pub inline_refs: bool,
    #[serde(default)]
    pub root_ref: bool,
    #[serde(default)]
    pub root_nullable: bool,
    #[serde(default)]
    pub skip_unsupported_properties: bool,
    #[serde(default)]
    pub require_tags: bool,
    #[serde(default)]
    pub envelop_nullability: bool,
    #[serde(default)]
    pub skip_null_for_containers: bool,
}

// Default value functions
fn default_definitions_prefix() -> String {
    DEFAULT_DEFINITIONS_PREFIX.to_string()
}

fn default_property_name_tag() -> String {
    "json".to_string()
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            definitions_prefix: default_definitions_prefix(),
            property_name_tag: default_property_name_tag(),
            additional_property_name_tags: Vec::new(),
        }
    }
}

impl ReflectorConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a specific file that must exist
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "schema-reflect.toml",
            ".schema-reflect.toml",
            "config/schema-reflect.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "schema-reflect", "schema-reflect") {
            let xdg_config = config_dir.config_dir().join("schema-reflect.toml");
            if xdg_config.exists() {
                debug!(path = %xdg_config.display(), "loading user configuration");
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // SCHEMA_REFLECT__BEHAVIOR__ROOT_REF=true
        builder = builder.add_source(
            Environment::with_prefix("SCHEMA_REFLECT")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Options equivalent to this configuration
    pub fn into_options(self) -> Vec<ReflectOption> {
        let NamingConfig {
            definitions_prefix,
            property_name_tag,
            additional_property_name_tags,
        } = self.naming;
        let behavior = self.behavior;

        let mut opts = vec![
            options::definitions_prefix(definitions_prefix),
            options::property_name_tag(property_name_tag),
        ];
        if !additional_property_name_tags.is_empty() {
            opts.push(options::property_name_additional_tags(
                additional_property_name_tags,
            ));
        }

        let toggles: [(bool, fn() -> ReflectOption); 7] = [
            (behavior.inline_refs, options::inline_refs),
            (behavior.root_ref, options::root_ref),
            (behavior.root_nullable, options::root_nullable),
            (behavior.skip_unsupported_properties, options::skip_unsupported_properties),
            (behavior.require_tags, options::require_tags),
            (behavior.envelop_nullability, options::envelop_nullability),
            (behavior.skip_null_for_containers, options::skip_null_for_containers),
        ];
        opts.extend(
            toggles
                .into_iter()
                .filter(|(enabled, _)| *enabled)
                .map(|(_, option)| option()),
        );
        opts
    }
}
