use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::{CliTest, run};

const RECIPE_FORM: &str = r#"
import { useTranslation } from "react-i18next";

export function RecipeForm() {
    const [t] = useTranslation("recipe");
    const [tg] = useTranslation();
    return (
        <form title={t("stepper.meta-title")}>
            <label>{tg("label.name")}</label>
            <button>{t("save")}</button>
        </form>
    );
}
"#;

fn read_json(test: &CliTest, path: &str) -> Result<Value> {
    Ok(serde_json::from_str(&test.read_file(path)?)?)
}

#[test]
fn test_sync_creates_catalogs_for_every_language() -> Result<()> {
    let test = CliTest::with_layout()?;
    test.write_file("src/components/recipe-form.tsx", RECIPE_FORM)?;

    let (output, stdout) = run(&mut test.sync_command())?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout,
        "✓ Scanned 1 source file, added 6 keys, created 4 catalogs\n"
    );
    for language in ["en", "de"] {
        assert_eq!(
            read_json(&test, &format!("public/locales/{}/recipe.json", language))?,
            json!({"save": "save", "stepper": {"meta-title": "stepper.meta-title"}})
        );
        assert_eq!(
            read_json(&test, &format!("public/locales/{}/translation.json", language))?,
            json!({"label": {"name": "label.name"}})
        );
    }

    Ok(())
}

#[test]
fn test_sync_keeps_translations_and_sorts() -> Result<()> {
    let test = CliTest::with_layout()?;
    test.write_file(
        "public/locales/de/recipe.json",
        r#"{"stepper":{"meta-title":"Allgemeine Angaben"},"old":"Alt"}"#,
    )?;
    test.write_file("src/recipe-form.tsx", RECIPE_FORM)?;

    let (output, _) = run(&mut test.sync_command())?;

    assert_eq!(output.status.code(), Some(0));
    insta::assert_snapshot!(test.read_file("public/locales/de/recipe.json")?, @r#"
    {
        "old": "Alt",
        "save": "save",
        "stepper": {
            "meta-title": "Allgemeine Angaben"
        }
    }
    "#);

    Ok(())
}

#[test]
fn test_sync_prune_removes_unused_keys() -> Result<()> {
    let test = CliTest::with_layout()?;
    test.write_file(
        "public/locales/en/recipe.json",
        r#"{"save": "Save", "stepper": {"meta-title": "General", "gone": "Gone"}}"#,
    )?;
    test.write_file("src/recipe-form.tsx", RECIPE_FORM)?;

    let (output, stdout) = run(test.sync_command().arg("--prune"))?;

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("  - en/recipe: stepper.gone\n"), "{}", stdout);
    assert!(stdout.contains("✓ Removed 1 unused key from 1 catalog\n"), "{}", stdout);
    assert_eq!(
        read_json(&test, "public/locales/en/recipe.json")?,
        json!({"save": "Save", "stepper": {"meta-title": "General"}})
    );

    Ok(())
}

#[test]
fn test_sync_prune_from_config() -> Result<()> {
    let test = CliTest::with_layout()?;
    test.write_file(".catsyncrc.json", r#"{ "pruneUnused": true }"#)?;
    test.write_file("public/locales/en/legacy.json", r#"{"unused": "Unused"}"#)?;

    let (output, _) = run(&mut test.sync_command())?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(test.read_file("public/locales/en/legacy.json")?, "{}\n");

    Ok(())
}

#[test]
fn test_sync_refuses_to_prune_after_unreadable_file() -> Result<()> {
    let test = CliTest::with_layout()?;
    test.write_file("public/locales/en/recipe.json", r#"{"kept": "Kept"}"#)?;
    test.write_file("src/recipe-form.tsx", RECIPE_FORM)?;
    std::fs::write(test.root().join("src/broken.tsx"), [0xff, 0xfe, 0x80])?;

    let (output, stdout) = run(test.sync_command().arg("--prune"))?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("(1 file unreadable)"), "{}", stdout);
    assert!(stdout.contains("✘ Nothing pruned"), "{}", stdout);
    assert_eq!(
        read_json(&test, "public/locales/en/recipe.json")?["kept"],
        "Kept"
    );

    Ok(())
}

#[test]
fn test_sync_uses_configured_roots_and_languages() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".catsyncrc.json",
        r#"{
            "catalogRoot": "./frontend/public/locales",
            "sourceRoot": "./frontend/src",
            "languages": ["en", "de", "fr"],
            "globalNamespace": "common"
        }"#,
    )?;
    std::fs::create_dir_all(test.root().join("frontend/public/locales"))?;
    test.write_file("frontend/src/app.tsx", RECIPE_FORM)?;

    let (output, _) = run(&mut test.sync_command())?;

    assert_eq!(output.status.code(), Some(0));
    for language in ["en", "de", "fr"] {
        assert_eq!(
            read_json(&test, &format!("frontend/public/locales/{}/common.json", language))?,
            json!({"label": {"name": "label.name"}})
        );
    }

    Ok(())
}

#[test]
fn test_sync_flags_override_config() -> Result<()> {
    let test = CliTest::with_layout()?;
    test.write_file(".catsyncrc.json", r#"{ "languages": ["en", "de"] }"#)?;
    test.write_file("lib/app.ts", r#"useTranslation("app"); t("a.b");"#)?;

    let (output, _) = run(
        test.sync_command()
            .args(["--source-root", "lib", "--languages", "en"]),
    )?;

    assert_eq!(output.status.code(), Some(0));
    assert!(test.root().join("public/locales/en/app.json").exists());
    assert!(!test.root().join("public/locales/de/app.json").exists());

    Ok(())
}

#[test]
fn test_sync_missing_source_root_is_an_error() -> Result<()> {
    let test = CliTest::new()?;
    std::fs::create_dir_all(test.root().join("public/locales"))?;

    let (output, _) = run(&mut test.sync_command())?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("Error: source directory"), "{}", stderr);

    Ok(())
}

#[test]
fn test_sync_invalid_config_is_an_error() -> Result<()> {
    let test = CliTest::with_layout()?;
    test.write_file(".catsyncrc.json", r#"{ "languages": [] }"#)?;

    let (output, _) = run(&mut test.sync_command())?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("'languages' must not be empty"), "{}", stderr);

    Ok(())
}

#[test]
fn test_sync_unwritable_catalog_exits_with_failure() -> Result<()> {
    let test = CliTest::with_layout()?;
    test.write_file("public/locales/en/recipe.json", r#"{"save": "Save"}"#)?;
    std::fs::create_dir(test.root().join("public/locales/en/recipe.json.tmp"))?;
    test.write_file("src/recipe-form.tsx", RECIPE_FORM)?;

    let (output, stdout) = run(&mut test.sync_command())?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("not written"), "{}", stdout);
    assert_eq!(
        test.read_file("public/locales/en/recipe.json")?,
        r#"{"save": "Save"}"#
    );
    assert_eq!(
        read_json(&test, "public/locales/de/recipe.json")?,
        json!({"save": "save", "stepper": {"meta-title": "stepper.meta-title"}})
    );

    Ok(())
}

#[test]
fn test_sync_keeps_namespaces_inside_the_catalog_root() -> Result<()> {
    let test = CliTest::with_layout()?;
    test.write_file(
        "src/app.tsx",
        r#"useTranslation("../../escaped"); useTranslation("sub/ns"); t("k.v");"#,
    )?;

    let (output, _) = run(&mut test.sync_command())?;

    assert_eq!(output.status.code(), Some(0));
    assert!(!test.root().join("escaped.json").exists());
    assert!(!test.root().join("public/locales/en/sub").exists());

    Ok(())
}
