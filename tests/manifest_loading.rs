// tests/manifest_loading.rs

use std::io::Write;

use prun::config::load_and_validate;
use prun::errors::PrunError;
use prun::types::CommandSpec;
use tempfile::{Builder, NamedTempFile};

#[test]
fn loads_original_json_manifest() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
  {{"Command": "go", "Args": ["test", "./..."]}},
  {{"Command": "golint"}}
]"#
    )
    .unwrap();

    let manifest = load_and_validate(file.path()).unwrap();
    assert_eq!(
        manifest.commands(),
        &[
            CommandSpec::new("go").arg("test").arg("./..."),
            CommandSpec::new("golint"),
        ]
    );
}

#[test]
fn null_args_mean_no_arguments() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"[{{"Command": "golint", "Args": null}}]"#).unwrap();

    let manifest = load_and_validate(file.path()).unwrap();
    assert_eq!(manifest.commands(), &[CommandSpec::new("golint")]);
}

#[test]
fn loads_toml_manifest_by_extension() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    write!(
        file,
        r#"
[[command]]
program = "cargo"
args = ["build"]
"#
    )
    .unwrap();

    let manifest = load_and_validate(file.path()).unwrap();
    assert_eq!(manifest.commands(), &[CommandSpec::new("cargo").arg("build")]);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_and_validate(dir.path().join("prun.json"));
    assert!(matches!(result, Err(PrunError::IoError(_))));
}

#[test]
fn malformed_json_is_parse_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"[{{"Command": "x", "Args": "not-a-list"}}]"#).unwrap();

    let result = load_and_validate(file.path());
    assert!(matches!(result, Err(PrunError::JsonError(_))));
}

#[test]
fn empty_program_is_manifest_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"[{{"Command": ""}}]"#).unwrap();

    match load_and_validate(file.path()) {
        Err(PrunError::ManifestError(msg)) => assert!(msg.contains("empty program")),
        Err(e) => panic!("Expected ManifestError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}
