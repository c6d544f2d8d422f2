//! End-to-end tests for the `find_replace` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const WARNING: &str = "** Consider using file patterns to speed up the process **";

fn tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("a.php"), "test find test\nfind test\n").unwrap();
    fs::write(dir.path().join("nested/b.html"), "find ").unwrap();
    fs::write(dir.path().join("c.txt"), "find ").unwrap();
    dir
}

fn bin() -> Command {
    let mut cmd = Command::cargo_bin("find_replace").unwrap();
    cmd.env_remove("FIND_REPLACE_LOG")
        .env_remove("FIND_REPLACE_WRITE_MODE")
        .env_remove("FIND_REPLACE_FORMAT");
    cmd
}

#[test]
fn test_warning_without_file_patterns() {
    let dir = tree();
    bin()
        .arg(dir.path())
        .args(["find", "found"])
        .assert()
        .success()
        .stdout(predicate::str::contains(WARNING));
}

#[test]
fn test_no_warning_with_file_patterns() {
    let dir = tree();
    bin()
        .arg(dir.path())
        .args(["find", "found", "*.php"])
        .assert()
        .success()
        .stdout(predicate::str::contains(WARNING).not());
}

#[test]
fn test_progress_and_summary_block() {
    let dir = tree();
    let output = bin()
        .arg(dir.path())
        .args(["find ", "found ", "*.php", "*.html"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let tail = &stdout[stdout.find("Progress: 100%").unwrap()..];
    assert_eq!(
        tail,
        "Progress: 100%\n\nOccurrences replaced: 3\n\
         Files skipped (Permission denied): 0\nTotal files searched: 2\n"
    );
    assert_eq!(fs::read_to_string(dir.path().join("c.txt")).unwrap(), "find ");
    assert_eq!(fs::read_to_string(dir.path().join("nested/b.html")).unwrap(), "found ");
}

#[test]
fn test_regex_flag() {
    let dir = tree();
    bin()
        .arg("--regex")
        .arg(dir.path())
        .args([r"f[i,o]n?d\s", "found ", "*.php"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Occurrences replaced: 2"));
    assert_eq!(
        fs::read_to_string(dir.path().join("a.php")).unwrap(),
        "test found test\nfound test\n"
    );
}

#[test]
fn test_json_summary() {
    let dir = tree();
    let output = bin()
        .args(["--format", "json"])
        .arg(dir.path())
        .args(["find ", "found "])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["total_occurrences"], 4);
    assert_eq!(value["files_filtered"], 3);
    assert_eq!(value["files_changed"], 3);
    assert!(String::from_utf8_lossy(&output.stderr).contains(WARNING));
}

#[test]
fn test_quiet_prints_only_summary() {
    let dir = tree();
    bin()
        .arg("-q")
        .arg(dir.path())
        .args(["find", "found", "*.txt"])
        .assert()
        .success()
        .stdout("Occurrences replaced: 1\nFiles skipped (Permission denied): 0\nTotal files searched: 1\n");
}

#[test]
fn test_invalid_root_fails() {
    let dir = TempDir::new().unwrap();
    bin()
        .arg(dir.path().join("missing"))
        .args(["find", "found", "*.php"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid root"));
}

#[test]
fn test_file_as_root_fails() {
    let dir = tree();
    bin()
        .arg(dir.path().join("a.php"))
        .args(["find", "found"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn test_invalid_regex_fails() {
    let dir = tree();
    bin()
        .arg("-e")
        .arg(dir.path())
        .args(["(", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Pattern compilation failed"));
}

#[test]
fn test_write_mode_from_environment() {
    let dir = tree();
    bin()
        .env("FIND_REPLACE_WRITE_MODE", "atomic")
        .arg(dir.path())
        .args(["find", "found", "*.php"])
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(dir.path().join("a.php")).unwrap(),
        "test found test\nfound test\n"
    );
}

#[cfg(unix)]
#[test]
fn test_permission_skips_keep_zero_exit_status() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tree();
    let locked = dir.path().join("a.php");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o111)).unwrap();
    let enforced = fs::File::open(&locked).is_err();

    let expected = if enforced {
        "Files skipped (Permission denied): 1"
    } else {
        "Files skipped (Permission denied): 0"
    };
    bin()
        .arg(dir.path())
        .args(["find", "found", "*.php"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected));
}
