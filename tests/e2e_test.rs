//! End-to-end tests for the docwright binary.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn demo_project() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/piccione")
}

/// Tests full binary execution on the demo project.
#[test]
fn test_build_demo_site_e2e() -> Result<()> {
    // Arrange
    let output = TempDir::new()?;

    // Act
    let status = Command::new(env!("CARGO_BIN_EXE_docwright"))
        .arg(demo_project())
        .arg("-o")
        .arg(output.path())
        .arg("--no-open")
        .status()?;

    // Assert
    assert!(status.success(), "Build should succeed");

    let page = fs::read_to_string(output.path().join("getting_started/index.html"))?;
    assert!(page.contains("Getting started | Piccione"));
    assert!(page.contains(
        "<a href=\"https://developers.zenodo.org/\" target=\"_blank\" rel=\"noopener noreferrer\">"
    ));
    assert!(page.contains("<a href=\"#installation\">installation</a>"));

    let index = fs::read_to_string(output.path().join("index.html"))?;
    assert!(index.contains("<a href=\"/piccione/getting_started/\">getting started guide</a>"));
    Ok(())
}

/// Tests that a missing site configuration is reported.
#[test]
fn test_missing_config_e2e() -> Result<()> {
    // Arrange
    let project = TempDir::new()?;

    // Act
    let output = Command::new(env!("CARGO_BIN_EXE_docwright"))
        .arg(project.path())
        .arg("--no-open")
        .output()?;

    // Assert
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("site.toml"), "{}", stderr);
    Ok(())
}
