use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_mentions_screening_flags() {
    Command::cargo_bin("artcheck")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--lang"))
        .stdout(predicate::str::contains("--dump-text"));
}

#[test]
fn missing_file_argument_fails() {
    Command::cargo_bin("artcheck")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("No file specified"));
}

#[test]
fn nonexistent_file_fails() {
    Command::cargo_bin("artcheck")
        .unwrap()
        .arg("definitely-not-here.pdf")
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn rejects_unknown_language_profile() {
    Command::cargo_bin("artcheck")
        .unwrap()
        .args(["--lang", "fra", "whatever.pdf"])
        .assert()
        .failure();
}
