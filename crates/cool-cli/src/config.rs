//! `coolgen.toml` handling
//!
//! The file carries a single `[codegen]` table with the same keys as
//! [`CodegenOptions`]. Flags given on the command line win over the file.

use std::path::Path;

use anyhow::Context;
use cool_cgen::{CodegenOptions, GcMode};
use serde::{Deserialize, Serialize};

/// Parsed configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub codegen: CodegenOptions,
}

impl ConfigFile {
    /// Read and parse a configuration file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Parse configuration from a string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Command-line settings that may override the file
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub collector: Option<GcMode>,
    pub gc_test: bool,
}

/// Merge the file's options with the command-line overrides
pub fn resolve(file: Option<&ConfigFile>, overrides: Overrides) -> CodegenOptions {
    let mut options = file.map(|f| f.codegen).unwrap_or_default();
    if let Some(collector) = overrides.collector {
        options.collector = collector;
    }
    if overrides.gc_test {
        options.gc_test = true;
    }
    options
}
