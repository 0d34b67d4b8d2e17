use anyhow::{Context, Result};
use docwright::{Config, SiteConfig};
use log::warn;

fn main() -> Result<()> {
    let config = Config::parse();

    env_logger::Builder::new()
        .filter_level(config.log_level())
        .parse_default_env()
        .init();

    config.validate().context("Invalid configuration")?;

    let site = SiteConfig::load(config.config_path()).context("Failed to load site config")?;

    // Relative output paths are resolved against the working directory
    let report = docwright::build(&config.project, &config.output, &site)
        .context("Failed to build site")?;

    println!(
        "Generated {} pages ({} external links) in {}",
        report.pages,
        report.external_links,
        config.output.display()
    );

    if !config.no_open && report.index.is_file() {
        if let Err(e) = open::that(&report.index) {
            warn!("Failed to open {}: {}", report.index.display(), e);
        }
    }

    Ok(())
}
