use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, run};

#[test]
fn test_sort_formats_every_catalog() -> Result<()> {
    let test = CliTest::with_layout()?;
    test.write_file(
        "public/locales/de/recipe.json",
        r#"{"stepper":{"title":"Titel","meta":"Meta"},"add":"Hinzufügen"}"#,
    )?;
    // Not a configured language, sorted all the same.
    test.write_file("public/locales/fr/recipe.json", r#"{"b":"B","a":"A"}"#)?;

    let (output, stdout) = run(&mut test.sort_command())?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout, "✓ Sorted 2 catalogs\n");
    insta::assert_snapshot!(test.read_file("public/locales/de/recipe.json")?, @r#"
    {
        "add": "Hinzufügen",
        "stepper": {
            "meta": "Meta",
            "title": "Titel"
        }
    }
    "#);
    assert_eq!(
        test.read_file("public/locales/fr/recipe.json")?,
        "{\n    \"a\": \"A\",\n    \"b\": \"B\"\n}\n"
    );
    // Sorting does not create catalogs for other languages.
    assert!(!test.root().join("public/locales/en/recipe.json").exists());

    Ok(())
}

#[test]
fn test_sort_is_idempotent() -> Result<()> {
    let test = CliTest::with_layout()?;
    test.write_file("public/locales/en/tags.json", r#"{"z": {"b": "1", "a": "2"}}"#)?;

    run(&mut test.sort_command())?;
    let first = test.read_file("public/locales/en/tags.json")?;
    run(&mut test.sort_command())?;

    assert_eq!(test.read_file("public/locales/en/tags.json")?, first);

    Ok(())
}

#[test]
fn test_sort_ignores_source_root() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("public/locales/en/tags.json", r#"{"b": "B", "a": "A"}"#)?;

    let (output, _) = run(&mut test.sort_command())?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        test.read_file("public/locales/en/tags.json")?,
        "{\n    \"a\": \"A\",\n    \"b\": \"B\"\n}\n"
    );

    Ok(())
}

#[test]
fn test_sort_missing_catalog_root_is_an_error() -> Result<()> {
    let test = CliTest::new()?;

    let (output, _) = run(&mut test.sort_command())?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("Error: catalog directory"), "{}", stderr);

    Ok(())
}
