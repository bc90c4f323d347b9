//! Rendering configuration for chain levels

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// How much of a chain to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    /// The level's own causes and context
    #[default]
    Short,
    /// Every level from this one down to the root, one per line
    Full,
    /// [`Verbosity::Full`] followed by the root level's stack trace
    FullWithStack,
}

/// Separators used when a level is rendered
///
/// Single-cause levels render as `cause` or `cause<legacy_separator>context`.
/// Multi-cause levels render as a bullet list:
///
/// ```text
///  -  first cause
///     second cause
///     context: message
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainFormat {
    /// Prefix of the first cause of a multi-cause level
    pub first_bullet: Cow<'static, str>,
    /// Prefix of every following line of a multi-cause level
    pub indent: Cow<'static, str>,
    /// Label placed before the context message of a multi-cause level
    pub context_label: Cow<'static, str>,
    /// Joins cause and context of a single-cause level
    pub legacy_separator: Cow<'static, str>,
}

impl ChainFormat {
    /// Layout used by `Display` and `Debug`
    pub const STANDARD: ChainFormat = ChainFormat {
        first_bullet: Cow::Borrowed(" -  "),
        indent: Cow::Borrowed("    "),
        context_label: Cow::Borrowed("context: "),
        legacy_separator: Cow::Borrowed(": "),
    };

    /// Parse a format from JSON; omitted fields keep their standard value
    pub fn from_json(json: &str) -> Result<Self> {
        let format: Self = serde_json::from_str(json)?;
        format.validate()?;
        Ok(format)
    }

    /// Reject separators that would break the one-line-per-cause layout
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("first_bullet", &self.first_bullet),
            ("indent", &self.indent),
            ("context_label", &self.context_label),
            ("legacy_separator", &self.legacy_separator),
        ];
        for (field, value) in fields {
            if value.contains(['\n', '\r']) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "line breaks are not allowed".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for ChainFormat {
    fn default() -> Self {
        Self::STANDARD
    }
}
