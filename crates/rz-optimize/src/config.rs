//! Pass configuration.
//!
//! Loaded from JSON with every field optional, then overridden from the
//! environment (`RAZOR_OPT_LEVEL`, `RAZOR_DISABLED_PASSES`,
//! `RAZOR_TRACE_PASSES`).

use eyre::eyre;
use rz_core::Result;
use serde::{Deserialize, Serialize};

use crate::error::generic_error;

pub const ENV_OPT_LEVEL: &str = "RAZOR_OPT_LEVEL";
pub const ENV_DISABLED_PASSES: &str = "RAZOR_DISABLED_PASSES";
pub const ENV_TRACE_PASSES: &str = "RAZOR_TRACE_PASSES";

/// What a function-typed result leaf is replaced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosurePlaceholderPolicy {
    /// `razor.op.abs` applied to a ones constant.
    #[default]
    AbsOfOnes,
    /// The ones constant itself.
    Ones,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassConfig {
    pub opt_level: u8,
    pub disabled_passes: Vec<String>,
    /// Run regardless of `opt_level` and `disabled_passes`.
    pub required_passes: Vec<String>,
    pub entry_function: String,
    pub closure_placeholder: ClosurePlaceholderPolicy,
    /// Log the whole module after every pass.
    pub trace_passes: bool,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            opt_level: 2,
            disabled_passes: Vec::new(),
            required_passes: Vec::new(),
            entry_function: "main".to_string(),
            closure_placeholder: ClosurePlaceholderPolicy::default(),
            trace_passes: false,
        }
    }
}

fn env_true(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && !matches!(trimmed, "0" | "false" | "FALSE" | "False")
}

/// Canonical spelling of a pass name: lower case, `-` folded into `_`.
pub fn normalize_pass_name(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace('-', "_")
}

impl PassConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_OPT_LEVEL) {
            self.opt_level = level.trim().parse().map_err(|_| {
                generic_error(eyre!("{} must be a small integer, got {:?}", ENV_OPT_LEVEL, level))
            })?;
        }
        if let Some(disabled) = lookup(ENV_DISABLED_PASSES) {
            self.disabled_passes = disabled
                .split(',')
                .map(normalize_pass_name)
                .filter(|name| !name.is_empty())
                .collect();
        }
        if let Some(trace) = lookup(ENV_TRACE_PASSES) {
            self.trace_passes = env_true(&trace);
        }
        Ok(self)
    }

    pub fn is_disabled(&self, pass: &str) -> bool {
        let pass = normalize_pass_name(pass);
        self.disabled_passes
            .iter()
            .any(|name| normalize_pass_name(name) == pass)
    }

    pub fn is_required(&self, pass: &str) -> bool {
        let pass = normalize_pass_name(pass);
        self.required_passes
            .iter()
            .any(|name| normalize_pass_name(name) == pass)
    }
}
