//! Compiler configuration loaded from `msggen.toml`

use crate::error::ConfigError;
use crate::model::ScalarType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Top-level compiler configuration.
///
/// Every field has a default, so an absent or empty `msggen.toml` yields the
/// conventions the generated trees were originally laid out with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub syntax: SyntaxConfig,
    pub targets: TargetConfig,
    pub output: OutputConfig,

    /// Extra scalar type names, mapped to one of the built-in C names.
    ///
    /// ```toml
    /// [aliases]
    /// "Addr_t" = "uint32_t"
    /// ```
    pub aliases: BTreeMap<String, String>,
}

/// Schema surface characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntaxConfig {
    pub marker: char,
    pub comment: char,
}

impl Default for SyntaxConfig {
    fn default() -> Self {
        Self {
            marker: '*',
            comment: '#',
        }
    }
}

/// Interface-name infixes that select the target representations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub host_infix: String,
    pub embedded_infix: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            host_infix: "GS_".to_string(),
            embedded_infix: "FC_".to_string(),
        }
    }
}

/// Naming of the generated artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// C++ namespace wrapping every host class.
    pub namespace: String,
    /// Name of the master type enumeration and its header.
    pub type_enum: String,
    /// Name of the address enumeration and its header.
    pub address_enum: String,
    /// Comment placed at the top of every generated file.
    pub banner: Option<String>,
    /// Hand-written enum header wrapped into `msg_enums.h` for both trees.
    pub shared_enums: Option<PathBuf>,
    /// Hand-written type definitions wrapped into `common_types.h` for both trees.
    pub common_types: Option<PathBuf>,
    /// Host stream operators for the common types, appended to the host copy only.
    pub common_types_stream: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            namespace: "QuadGS".to_string(),
            type_enum: "messageTypes".to_string(),
            address_enum: "msgAddr".to_string(),
            banner: None,
            shared_enums: None,
            common_types: None,
            common_types_stream: None,
        }
    }
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse and validate configuration text. Empty text yields the defaults.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: CompilerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.targets.host_infix.is_empty() || self.targets.embedded_infix.is_empty() {
            return Err(ConfigError::Invalid(
                "target infixes must not be empty".to_string(),
            ));
        }
        if self.targets.host_infix == self.targets.embedded_infix {
            return Err(ConfigError::Invalid(format!(
                "host and embedded infix are both '{}'",
                self.targets.host_infix
            )));
        }
        for (name, c) in [
            ("marker", self.syntax.marker),
            ("comment", self.syntax.comment),
        ] {
            if c.is_alphanumeric() || c.is_whitespace() || c == '_' {
                return Err(ConfigError::Invalid(format!(
                    "{name} character '{c}' could start an identifier"
                )));
            }
        }
        if self.syntax.marker == self.syntax.comment {
            return Err(ConfigError::Invalid(
                "marker and comment characters must differ".to_string(),
            ));
        }
        for (key, target) in &self.aliases {
            if ScalarType::from_c_name(target).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "alias '{key}' targets unknown scalar type '{target}'"
                )));
            }
        }
        if self.output.common_types_stream.is_some() && self.output.common_types.is_none() {
            return Err(ConfigError::Invalid(
                "output.common_types_stream requires output.common_types".to_string(),
            ));
        }
        for (name, value) in [
            ("namespace", &self.output.namespace),
            ("type_enum", &self.output.type_enum),
            ("address_enum", &self.output.address_enum),
        ] {
            if !crate::naming::is_identifier(value) {
                return Err(ConfigError::Invalid(format!(
                    "output.{name} '{value}' is not a valid identifier"
                )));
            }
        }
        Ok(())
    }

    /// Resolve a declared type name to a scalar, following aliases.
    pub fn resolve_scalar(&self, type_name: &str) -> Option<ScalarType> {
        ScalarType::from_c_name(type_name).or_else(|| {
            self.aliases
                .get(type_name)
                .and_then(|target| ScalarType::from_c_name(target))
        })
    }
}
