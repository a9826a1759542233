use anyhow::{Context, Result};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, run};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["catalogRoot"], "./public/locales");
    assert_eq!(parsed["sourceRoot"], "./src");
    assert_eq!(parsed["languages"], serde_json::json!(["en", "de"]));
    assert_eq!(parsed["globalNamespace"], "translation");
    assert_eq!(parsed["pruneUnused"], false);

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let (output, stdout) = run(test.command().arg("init"))?;

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.starts_with("✓ Created"), "{}", stdout);
    assert!(test.root().join(".catsyncrc.json").exists());

    let content = test.read_file(".catsyncrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".catsyncrc.json", "{}")?;

    let (output, stdout) = run(test.command().arg("init"))?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("already exists"), "{}", stdout);
    assert_eq!(test.read_file(".catsyncrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_then_sync() -> Result<()> {
    let test = CliTest::with_layout()?;
    test.write_file("src/app.tsx", r#"useTranslation("app"); t("menu.open");"#)?;

    run(test.command().arg("init"))?;
    let (output, _) = run(&mut test.sync_command())?;

    assert_eq!(output.status.code(), Some(0));
    assert!(test.root().join("public/locales/de/app.json").exists());

    Ok(())
}
