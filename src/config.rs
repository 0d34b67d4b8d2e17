//! Command line configuration.

use anyhow::{Result, bail};
use clap::Parser;
use std::path::PathBuf;

/// Command line configuration for docwright.
#[derive(Debug, Clone, Parser)]
#[command(name = "docwright", version, about, long_about = None)]
pub struct Config {
    /// Project directory
    #[arg(default_value = ".")]
    pub project: PathBuf,

    /// Site configuration file (relative to the project directory)
    #[arg(short, long, default_value = "site.toml")]
    pub config: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "dist")]
    pub output: PathBuf,

    /// Do not open the generated site in a browser
    #[arg(long)]
    pub no_open: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parses configuration from command line arguments.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Validates configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the project directory or site configuration does
    /// not exist.
    pub fn validate(&self) -> Result<()> {
        if !self.project.is_dir() {
            bail!("Project directory does not exist: {}", self.project.display());
        }

        let config_path = self.config_path();
        if !config_path.is_file() {
            bail!("Site configuration not found: {}", config_path.display());
        }

        Ok(())
    }

    /// Returns site configuration path resolved against the project.
    pub fn config_path(&self) -> PathBuf {
        self.project.join(&self.config)
    }

    /// Returns log filter implied by the verbosity flag.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }
}
