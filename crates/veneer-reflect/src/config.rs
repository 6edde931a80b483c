//! Resolver configuration (TOML)
//!
//! The configuration carries the host-specific knowledge the engine needs:
//! how qualified names are separated, where the version token sits in the
//! host's root type path, how to probe for the legacy naming scheme, and
//! the namespaces locators resolve against.
//!
//! ```toml
//! [layout]
//! separator = "."
//! version_segment = 3
//!
//! [probe]
//! legacy_type = "net.minecraft.server.{version}.WorldServer"
//! depth_threshold = 3
//!
//! [namespaces.nms]
//! prefix = "net.minecraft"
//! legacy_infix = "server"
//!
//! [namespaces.obc]
//! prefix = "org.bukkit.craftbukkit"
//! versioning = "root_depth"
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder substituted with the host version token in `legacy_type`
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete resolver configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReflectConfig {
    /// Qualified-name layout
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Naming-scheme probe settings
    #[serde(default)]
    pub probe: ProbeConfig,

    /// Namespaces available to locators, by name
    #[serde(default)]
    pub namespaces: HashMap<String, NamespaceConfig>,
}

/// How qualified names are laid out on the host
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoutConfig {
    /// Segment separator (default: ".")
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Index of the version token among the root type's package segments (default: 3)
    #[serde(default = "default_version_segment")]
    pub version_segment: usize,
}

fn default_separator() -> String {
    ".".to_string()
}

fn default_version_segment() -> usize {
    3
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            version_segment: default_version_segment(),
        }
    }
}

/// Settings for the standard naming-scheme probe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeConfig {
    /// Fully-qualified type that only exists under the legacy scheme.
    /// `{version}` is replaced with the host version token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_type: Option<String>,

    /// Root package depth above which the modern scheme is assumed (default: 3)
    #[serde(default = "default_depth_threshold")]
    pub depth_threshold: usize,
}

fn default_depth_threshold() -> usize {
    3
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            legacy_type: None,
            depth_threshold: default_depth_threshold(),
        }
    }
}

/// A namespace that relative type names are resolved against
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NamespaceConfig {
    /// Package prefix shared by every type in the namespace
    pub prefix: String,

    /// Segment inserted before the version token under the legacy scheme
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_infix: Option<String>,

    /// How this namespace decides whether its names carry the version token
    #[serde(default)]
    pub versioning: Versioning,
}

/// Per-namespace rule for choosing between the legacy and modern layouts.
///
/// Hosts can version one package tree and not another (a versioned server
/// root next to unversioned internals), so each namespace picks its own.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Versioning {
    /// Follow the host-wide scheme reported by the probe
    #[default]
    Probe,
    /// Versioned exactly when the root package is deeper than `probe.depth_threshold`
    RootDepth,
}

impl NamespaceConfig {
    /// Namespace with just a prefix
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            legacy_infix: None,
            versioning: Versioning::Probe,
        }
    }

    /// Set the legacy infix
    pub fn with_legacy_infix(mut self, infix: &str) -> Self {
        self.legacy_infix = Some(infix.to_string());
        self
    }

    /// Set the versioning rule
    pub fn with_versioning(mut self, versioning: Versioning) -> Self {
        self.versioning = versioning;
        self
    }
}

impl ReflectConfig {
    /// Parse and validate configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: ReflectConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Add or replace a namespace
    pub fn with_namespace(mut self, name: &str, namespace: NamespaceConfig) -> Self {
        self.namespaces.insert(name.to_string(), namespace);
        self
    }

    /// Set the legacy probe type template
    pub fn with_legacy_probe(mut self, template: &str) -> Self {
        self.probe.legacy_type = Some(template.to_string());
        self
    }

    /// Look up a namespace
    pub fn namespace(&self, name: &str) -> Option<&NamespaceConfig> {
        self.namespaces.get(name)
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.separator.is_empty() {
            return Err(ConfigError::Invalid("layout.separator must not be empty".to_string()));
        }
        for (name, namespace) in &self.namespaces {
            if namespace.prefix.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "namespaces.{}.prefix must not be empty",
                    name
                )));
            }
        }
        if let Some(template) = &self.probe.legacy_type {
            if !template.contains(VERSION_PLACEHOLDER) {
                tracing::debug!(template = %template, "legacy probe type has no version placeholder");
            }
        }
        Ok(())
    }
}
