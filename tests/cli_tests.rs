//! End-to-end integration tests for the relctl binaries.
//!
//! These tests run the actual compiled binaries with a clean environment and
//! an isolated temp directory for each test.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const CATALOG: &[(&str, usize)] = &[
    ("DB_PASSWORD", 20),
    ("ADMIN_PASSWORD", 20),
    ("APP_SECRET_KEY", 43),
];

/// Helper to create a command running in an isolated temp directory.
fn bin(name: &str, temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(name).unwrap();
    cmd.current_dir(temp.path());
    for var in [
        "ENV_FILE",
        "USERS_FILE",
        "ADMIN_USERNAME",
        "MIN_PASSWORD_LENGTH",
        "DEFAULT_PASSWORD_LENGTH",
        "RELCTL_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn env_value<'a>(contents: &'a str, key: &str) -> Option<&'a str> {
    contents
        .lines()
        .find_map(|l| l.strip_prefix(&format!("{}=", key)))
}

#[test]
fn test_generate_creates_env_with_catalog() {
    let temp = TempDir::new().unwrap();

    bin("generate-secrets", &temp)
        .assert()
        .success()
        .stdout(predicate::str::contains("secrets written"));

    let contents = fs::read_to_string(temp.path().join(".env")).unwrap();
    assert!(contents.contains("# Generated secrets"));
    for (key, length) in CATALOG {
        let value = env_value(&contents, key).expect("catalog key missing");
        assert_eq!(value.len(), *length, "{} has wrong length", key);
    }
}

#[test]
fn test_generate_twice_rotates_without_duplicates() {
    let temp = TempDir::new().unwrap();

    bin("generate-secrets", &temp).assert().success();
    let first = fs::read_to_string(temp.path().join(".env")).unwrap();

    bin("generate-secrets", &temp).assert().success();
    let second = fs::read_to_string(temp.path().join(".env")).unwrap();

    assert_eq!(first.lines().count(), second.lines().count());
    for (key, _) in CATALOG {
        assert_eq!(second.matches(&format!("{}=", key)).count(), 1);
        assert_ne!(
            env_value(&first, key).unwrap(),
            env_value(&second, key).unwrap(),
            "{} was not rotated",
            key
        );
    }
}

#[test]
fn test_generate_preserves_existing_lines_and_replaces_in_place() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(".env"),
        "# deploy notes\nFOO=bar\nDB_PASSWORD=old-value\nweird unparseable line\n",
    )
    .unwrap();

    bin("generate-secrets", &temp).assert().success();

    let contents = fs::read_to_string(temp.path().join(".env")).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "# deploy notes");
    assert_eq!(lines[1], "FOO=bar");
    assert!(lines[2].starts_with("DB_PASSWORD="));
    assert_ne!(lines[2], "DB_PASSWORD=old-value");
    assert_eq!(lines[3], "weird unparseable line");
    assert_eq!(contents.matches("DB_PASSWORD=").count(), 1);
    assert!(contents.contains("# Generated secrets"));
}

#[test]
fn test_generate_never_prints_values() {
    let temp = TempDir::new().unwrap();

    let assert = bin("generate-secrets", &temp).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    let contents = fs::read_to_string(temp.path().join(".env")).unwrap();
    for (key, _) in CATALOG {
        let value = env_value(&contents, key).unwrap();
        assert!(!stdout.contains(value), "{} value leaked to stdout", key);
    }
}

#[cfg(unix)]
#[test]
fn test_generate_env_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    bin("generate-secrets", &temp).assert().success();

    let mode = fs::metadata(temp.path().join(".env"))
        .unwrap()
        .permissions()
        .mode()
        & 0o777;
    assert_eq!(mode, 0o600);
}

#[test]
fn test_passwd_piped_updates_store() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("users.passwd"), "admin:x\n").unwrap();

    bin("change-admin-password", &temp)
        .write_stdin("a-long-piped-password-123\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("password for admin updated"))
        .stdout(predicate::str::contains("a-long-piped-password-123").not());

    let store =
        relctl::core::users::FileUserStore::new(temp.path().join("users.passwd"));
    assert!(store
        .verify_password("admin", "a-long-piped-password-123")
        .unwrap());
}

#[test]
fn test_passwd_unknown_user_fails() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("users.passwd"), "alice:x\n").unwrap();

    bin("change-admin-password", &temp)
        .write_stdin("a-long-piped-password-123\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("user not found: admin"));

    assert_eq!(
        fs::read_to_string(temp.path().join("users.passwd")).unwrap(),
        "alice:x\n"
    );
}

#[test]
fn test_passwd_random_disclosed_once_and_stored() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("users.passwd"), "admin:x\n").unwrap();

    let assert = bin("change-admin-password", &temp)
        .args(["--random-password", "--random-password-length", "32"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let password = stdout
        .lines()
        .find_map(|l| l.strip_prefix("New password: "))
        .expect("generated password was not disclosed")
        .trim();
    assert_eq!(password.len(), 32);

    let store =
        relctl::core::users::FileUserStore::new(temp.path().join("users.passwd"));
    assert!(store.verify_password("admin", password).unwrap());
}

#[test]
fn test_passwd_length_flag_requires_random_flag() {
    let temp = TempDir::new().unwrap();

    bin("change-admin-password", &temp)
        .args(["--random-password-length", "32"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--random-password"));
}

#[test]
fn test_passwd_out_of_range_length_rejected() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("users.passwd"), "admin:x\n").unwrap();

    bin("change-admin-password", &temp)
        .args(["--random-password", "--random-password-length", "300"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("random-password-length"));

    assert_eq!(
        fs::read_to_string(temp.path().join("users.passwd")).unwrap(),
        "admin:x\n"
    );
}

#[test]
fn test_passwd_short_piped_password_rejected() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("users.passwd"), "admin:x\n").unwrap();

    bin("change-admin-password", &temp)
        .write_stdin("short\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 16"));

    assert_eq!(
        fs::read_to_string(temp.path().join("users.passwd")).unwrap(),
        "admin:x\n"
    );
}

#[test]
fn test_passwd_username_from_environment() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("users.passwd"), "ops:x\n").unwrap();

    bin("change-admin-password", &temp)
        .env("ADMIN_USERNAME", "ops")
        .write_stdin("a-long-piped-password-123\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("password for ops updated"));
}

#[test]
fn test_passwd_explicit_username_flag() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("users.passwd"), "deploy:x\n").unwrap();

    bin("change-admin-password", &temp)
        .args(["--username", "deploy"])
        .write_stdin("a-long-piped-password-123\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("password for deploy updated"));
}
