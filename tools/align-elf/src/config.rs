//! Alignment configuration.
//!
//! Settings come from an optional TOML file and are overridden by
//! command-line flags:
//!
//! ```toml
//! page_size = 16384
//! require_power_of_two = true
//! ```

use std::path::Path;

use elf_align::{AlignOptions, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::AlignElfError;

/// Effective settings for one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct AlignConfig {
    /// Target `p_align` in bytes.
    pub page_size: u64,
    /// Refuse page sizes that are not a power of two.
    pub require_power_of_two: bool,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            require_power_of_two: false,
        }
    }
}

impl AlignConfig {
    /// Build the effective config: defaults, then `--config`, then flags.
    pub fn resolve(cli: &Cli) -> Result<Self, AlignElfError> {
        let mut config = match &cli.config {
            Some(path) => load(path)?,
            None => Self::default(),
        };
        if let Some(page_size) = cli.page_size {
            config.page_size = page_size;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AlignElfError> {
        if self.page_size == 0 {
            return Err(AlignElfError::ConfigInvalid(
                "page_size must be positive".to_string(),
            ));
        }
        if self.require_power_of_two && !self.page_size.is_power_of_two() {
            return Err(AlignElfError::ConfigInvalid(format!(
                "page_size {} is not a power of two",
                self.page_size
            )));
        }
        Ok(())
    }

    pub fn options(&self, dry_run: bool) -> AlignOptions {
        let options = AlignOptions::new(self.page_size);
        if dry_run {
            options.dry_run()
        } else {
            options
        }
    }
}

/// Load a config from a TOML file.
pub fn load(path: &Path) -> Result<AlignConfig, AlignElfError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AlignElfError::ConfigParse(format!("config file not found: {}", path.display()))
        } else {
            AlignElfError::Io(e)
        }
    })?;
    parse(&content)
}

/// Parse a config from a TOML string. Missing keys take their defaults.
pub fn parse(content: &str) -> Result<AlignConfig, AlignElfError> {
    toml::from_str(content).map_err(|e| AlignElfError::ConfigParse(format!("invalid TOML: {e}")))
}
