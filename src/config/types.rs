//! Core configuration types
//!
//! This module defines the engine settings, as read from a cmdlex.yml file.

use crate::resolve::Comparison;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Characters that mark a named-parameter token by default
pub const DEFAULT_SIGILS: &str = "-/@=";

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Compare command and parameter names without regard to case
    pub ignore_case: bool,

    /// Drop the first pre-split argument (the program path)
    pub skip_initial: bool,

    /// Leading characters that mark a token as a parameter name
    pub sigils: String,

    /// Fallback documentation side-file for groups without their own
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<PathBuf>,

    /// Command used to call back into the program from completion scripts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,

    /// Log filter directive (e.g. "debug" or "cmdlex=trace")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,

    /// Colorize error output on a terminal
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            ignore_case: true,
            skip_initial: true,
            sigils: DEFAULT_SIGILS.to_string(),
            documentation: None,
            program: None,
            log: None,
            color: false,
        }
    }
}

impl Settings {
    /// Case rule to use for every name comparison
    pub fn comparison(&self) -> Comparison {
        Comparison::from_ignore_case(self.ignore_case)
    }

    /// Sigil typed when completing a name without one
    pub fn default_sigil(&self) -> char {
        self.sigils.chars().next().unwrap_or('-')
    }

    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    pub fn with_skip_initial(mut self, skip_initial: bool) -> Self {
        self.skip_initial = skip_initial;
        self
    }

    pub fn with_sigils(mut self, sigils: impl Into<String>) -> Self {
        self.sigils = sigils.into();
        self
    }

    pub fn with_documentation(mut self, path: impl Into<PathBuf>) -> Self {
        self.documentation = Some(path.into());
        self
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }
}
