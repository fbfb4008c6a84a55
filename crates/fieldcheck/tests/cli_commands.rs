#![cfg(feature = "cli")]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

const CREATE_USER: &str = r#"
root:
  email: { required: true, type: string, pattern: "^.+@.+$" }
  tags: { type: array, min: 1, schema: tag }
tag:
  name: { required: true, type: string }
"#;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "fieldcheck-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("file should be writable");
    path
}

fn fieldcheck(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fieldcheck"))
        .args(["--log-level", "error", "--format", "json"])
        .args(args)
        .env_remove("FIELDCHECK_SCHEMA_DIR")
        .output()
        .expect("fieldcheck should run")
}

fn report(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be a JSON report")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

#[test]
fn check_accepts_valid_document() {
    let dir = unique_temp_dir("check-valid");
    let schema = write(&dir, "create_user.yml", CREATE_USER);
    let body = write(&dir, "body.json", r#"{"email":"a@b.com","tags":[{"name":"x"}]}"#);

    let output = fieldcheck(&["check", "--schema", path_str(&schema), path_str(&body)]);

    assert!(output.status.success());
    let json = report(&output);
    assert_eq!(json["status"], "valid");
    assert_eq!(json["route"], "create_user");
    assert!(json["schema_id"]
        .as_str()
        .unwrap()
        .ends_with("validation-report.schema.json"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn check_reports_child_field_and_exits_60() {
    let dir = unique_temp_dir("check-invalid");
    let schema = write(&dir, "create_user.yml", CREATE_USER);
    let body = write(&dir, "body.yaml", "email: a@b.com\ntags:\n  - {}\n");

    let output = fieldcheck(&["check", "--schema", path_str(&schema), path_str(&body)]);

    assert_eq!(output.status.code(), Some(60));
    let json = report(&output);
    assert_eq!(json["status"], "invalid");
    assert_eq!(json["error"]["kind"], "missing_field");
    assert_eq!(json["error"]["field"], "tag.name");
    assert_eq!(json["error"]["message"], "Missing tag.name field");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn check_reads_stdin() {
    let dir = unique_temp_dir("check-stdin");
    let schema = write(&dir, "create_user.yml", CREATE_USER);

    let mut child = Command::new(env!("CARGO_BIN_EXE_fieldcheck"))
        .args(["--log-level", "error", "--format", "json", "check", "--schema"])
        .arg(&schema)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("check should start");
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(br#"{"email":"bad"}"#)
        .expect("stdin should accept the body");
    let output = child.wait_with_output().expect("check should finish");

    assert_eq!(output.status.code(), Some(60));
    let json = report(&output);
    assert_eq!(json["document"], "<stdin>");
    assert_eq!(json["error"]["kind"], "invalid_type");
    assert_eq!(json["error"]["field"], "email");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn empty_body_is_skipped_unless_strict() {
    let dir = unique_temp_dir("check-empty");
    let schema = write(&dir, "create_user.yml", CREATE_USER);
    let body = write(&dir, "body.json", "");

    let lenient = fieldcheck(&["check", "--schema", path_str(&schema), path_str(&body)]);
    assert!(lenient.status.success());
    assert_eq!(report(&lenient)["status"], "no_document");

    let strict = fieldcheck(&[
        "check",
        "--schema",
        path_str(&schema),
        path_str(&body),
        "--strict",
    ]);
    assert_eq!(strict.status.code(), Some(60));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn check_missing_schema_file_is_usage_error() {
    let dir = unique_temp_dir("check-missing");
    let body = write(&dir, "body.json", "{}");
    let missing = dir.join("absent.yml");

    let output = fieldcheck(&["check", "--schema", path_str(&missing), path_str(&body)]);
    assert_eq!(output.status.code(), Some(64));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn check_malformed_schema_is_config_error() {
    let dir = unique_temp_dir("check-malformed");
    let schema = write(&dir, "broken.yml", "root:\n  a: { type: integer }\n");
    let body = write(&dir, "body.json", "{}");

    let output = fieldcheck(&["check", "--schema", path_str(&schema), path_str(&body)]);
    assert_eq!(output.status.code(), Some(78));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed loading schema"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn route_validates_through_schema_directory() {
    let dir = unique_temp_dir("route");
    let schemas = dir.join("schema_validator");
    std::fs::create_dir_all(&schemas).expect("schema dir should be creatable");
    write(&schemas, "create_user.yml", CREATE_USER);
    let body = write(&dir, "body.json", r#"{"email":"a@b.com","tags":[]}"#);

    let invalid = fieldcheck(&[
        "route",
        "create_user",
        path_str(&body),
        "--dir",
        path_str(&schemas),
    ]);
    assert_eq!(invalid.status.code(), Some(60));
    let json = report(&invalid);
    assert_eq!(json["error"]["kind"], "invalid_type");
    assert_eq!(json["error"]["field"], "tags");

    let unknown = fieldcheck(&[
        "route",
        "delete_user",
        path_str(&body),
        "--dir",
        path_str(&schemas),
    ]);
    assert!(unknown.status.success());
    assert_eq!(report(&unknown)["status"], "no_schema");

    let strict = fieldcheck(&[
        "route",
        "delete_user",
        path_str(&body),
        "--dir",
        path_str(&schemas),
        "--strict",
    ]);
    assert_eq!(strict.status.code(), Some(1));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn lint_flags_dangling_reference() {
    let dir = unique_temp_dir("lint");
    write(&dir, "create_user.yml", CREATE_USER);
    write(
        &dir,
        "add_items.yml",
        "root:\n  items: { type: array, schema: missing_schema_name }\n",
    );

    let output = fieldcheck(&["lint", path_str(&dir)]);

    assert_eq!(output.status.code(), Some(78));
    let json = report(&output);
    assert_eq!(json["overall"], "fail");
    let issues = json["issues"].as_array().expect("issues should be a list");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["source"], "add_items");
    assert_eq!(issues[0]["kind"], "dangling_reference");
    assert_eq!(issues[0]["field"], "items");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn lint_clean_file_passes() {
    let dir = unique_temp_dir("lint-clean");
    let schema = write(&dir, "create_user.yml", CREATE_USER);

    let output = fieldcheck(&["lint", path_str(&schema)]);

    assert!(output.status.success());
    assert_eq!(report(&output)["overall"], "pass");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn version_prints_package_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_fieldcheck"))
        .arg("version")
        .output()
        .expect("version should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("fieldcheck "));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn envinfo_reports_schema_id() {
    let output = fieldcheck(&["envinfo"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("envinfo.schema.json"));
}
