//! Integration tests for the formgen binary

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn formgen() -> Command {
    let mut cmd = Command::cargo_bin("formgen").unwrap();
    cmd.arg("--definitions").arg(common::definitions_dir());
    cmd
}

#[test]
fn test_generate_writes_header_and_source() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("dialog.yaml");
    std::fs::write(
        &project,
        r#"
object:
  class: Project
  properties:
    file: dialog
  children:
    - class: Frame
      properties:
        name: AboutFrame
      children:
        - class: wxBoxSizer
          children:
            - class: wxStaticText
              properties:
                label: Version 1.0
"#,
    )
    .unwrap();
    let output_dir = temp_dir.path().join("out");

    formgen()
        .arg("generate")
        .arg("--project")
        .arg(&project)
        .arg("--output-dir")
        .arg(&output_dir)
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::diff("[]").trim());

    let header = std::fs::read_to_string(output_dir.join("dialog.h")).unwrap();
    let source = std::fs::read_to_string(output_dir.join("dialog.cpp")).unwrap();
    assert!(header.contains("class AboutFrame : public wxFrame"));
    assert!(source.contains("#include \"dialog.h\""));
    assert!(source.contains("wxT(\"Version 1.0\")"));
}

#[test]
fn test_generate_missing_project_fails() {
    let temp_dir = TempDir::new().unwrap();

    formgen()
        .arg("generate")
        .arg("--project")
        .arg(temp_dir.path().join("missing.yaml"))
        .arg("--output-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_config_supplies_first_id() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("formgen.toml");
    std::fs::write(&config, "first_id = 7000\n").unwrap();
    let project = temp_dir.path().join("ids.yaml");
    std::fs::write(
        &project,
        r#"
object:
  class: Project
  properties:
    file: ids
  children:
    - class: Frame
      properties:
        id: ID_MAIN
"#,
    )
    .unwrap();

    formgen()
        .arg("--config")
        .arg(&config)
        .arg("generate")
        .arg("--project")
        .arg(&project)
        .arg("--output-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    let header = std::fs::read_to_string(temp_dir.path().join("ids.h")).unwrap();
    assert!(header.contains("#define ID_MAIN 7000"));
}

#[test]
fn test_unsupported_language_in_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("formgen.toml");
    std::fs::write(&config, "language = \"Python\"\n").unwrap();

    formgen()
        .arg("--config")
        .arg(&config)
        .arg("types")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported language"));
}

#[test]
fn test_types_lists_palette() {
    formgen()
        .arg("types")
        .assert()
        .success()
        .stdout(predicate::str::contains("common:"))
        .stdout(predicate::str::contains("wxButton"))
        .stdout(predicate::str::contains("sizeritem").not());

    let output = formgen().args(["types", "--json"]).assert().success();
    let palette: serde_json::Value = serde_json::from_slice(&output.get_output().stdout).unwrap();
    assert!(palette["layout"].as_array().unwrap().contains(&serde_json::json!("wxBoxSizer")));
}
