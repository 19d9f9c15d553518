//! This module provides the HypothesisExtension struct representing an optional reaction

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How an extension hypothesis is merged into the core reaction block
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtensionMode {
    /// The reaction is appended after the core reactions
    Additive,
    /// The reaction substitutes the core reaction named by `to_replace`
    Replace,
}

impl FromStr for ExtensionMode {
    type Err = ExtensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "additive" => Ok(ExtensionMode::Additive),
            "replace" => Ok(ExtensionMode::Replace),
            _ => Err(ExtensionError::UnknownMode {
                mode: s.to_string(),
            }),
        }
    }
}

impl Display for ExtensionMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtensionMode::Additive => write!(f, "additive"),
            ExtensionMode::Replace => write!(f, "replace"),
        }
    }
}

/// Represents an optional reaction layered on top of the core model
///
/// # Examples
/// ```rust
/// use combars_core::model::extension::{ExtensionMode, HypothesisExtensionBuilder};
/// let extension = HypothesisExtensionBuilder::default()
///     .name("CrossTalkR4".to_string())
///     .reaction("Erk => pErk".to_string())
///     .rate_law("kAktActivateErk*Erk*pAkt".to_string())
///     .build()
///     .unwrap();
/// assert_eq!(extension.mode, ExtensionMode::Additive);
/// ```
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct HypothesisExtension {
    /// Reaction name, unique within a model definition
    pub name: String,
    /// Reaction stoichiometry, e.g. `Smad2 => pSmad2`
    pub reaction: String,
    /// Kinetic rate law governing the reaction
    pub rate_law: String,
    /// How the reaction is merged into the core model
    #[builder(default = "ExtensionMode::Additive")]
    pub mode: ExtensionMode,
    /// Name of the core reaction being overridden, required iff mode is Replace
    #[builder(default = "None")]
    pub to_replace: Option<String>,
}

impl HypothesisExtensionBuilder {
    fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("name", &self.name),
            ("reaction", &self.reaction),
            ("rate_law", &self.rate_law),
        ] {
            if let Some(text) = value {
                if text.trim().is_empty() {
                    return Err(format!("attribute \"{}\" must not be blank", field));
                }
            }
        }
        let mode = self.mode.unwrap_or(ExtensionMode::Additive);
        let to_replace = self.to_replace.clone().flatten();
        match (mode, to_replace) {
            (ExtensionMode::Replace, None) => Err(
                "mode \"replace\" requires `to_replace` to name a core reaction".to_string(),
            ),
            (ExtensionMode::Additive, Some(target)) => Err(format!(
                "mode \"additive\" must not set `to_replace` (got \"{}\")",
                target
            )),
            _ => Ok(()),
        }
    }
}

impl Display for HypothesisExtension {
    /// Renders the reaction line emitted into assembled reaction blocks
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}; {}", self.name, self.reaction, self.rate_law)
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ExtensionError {
    #[error("unknown extension mode \"{mode}\", expected \"additive\" or \"replace\"")]
    UnknownMode { mode: String },
}
