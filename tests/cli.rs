use assert_cmd::cargo::cargo_bin_cmd;
use drybones::testing::{dry_text, sample_text};
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// `dry` with an empty home directory (no user config) running in `dir`.
fn dry(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("dry");
    cmd.current_dir(dir).env("HOME", dir).env_remove("DRYBONES_LOG");
    cmd
}

fn workspace_with_sample() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Kaikai.dry"), sample_text()).unwrap();
    dir
}

#[test]
fn read_dry_format_reproduces_file() {
    let dir = workspace_with_sample();
    dry(dir.path())
        .args(["read", "Kaikai.dry", "--format", "dry", "--no-pager"])
        .assert()
        .success()
        .stdout(sample_text());
}

#[rstest]
#[case::blank_lines_at_end(format!("{}\n\n", sample_text()))]
#[case::no_final_newline(sample_text().trim_end().to_string())]
#[case::no_residues(dry_text(&["N: A 1\nBaseline: kati anu"]))]
fn read_dry_format_keeps_trailing_bytes(#[case] text: String) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Kaikai.dry"), &text).unwrap();
    dry(dir.path())
        .args(["read", "Kaikai.dry", "--format", "dry", "--no-pager"])
        .assert()
        .success()
        .stdout(text);
}

#[test]
fn read_json_ends_in_one_newline() {
    let dir = workspace_with_sample();
    let output = dry(dir.path())
        .args(["read", "Kaikai.dry", "--format", "json", "--no-pager"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.ends_with("}\n") || stdout.ends_with("]\n"), "{stdout:?}");
    assert!(!stdout.ends_with("\n\n"));
}

#[test]
fn read_pretty_aligns_columns() {
    let dir = workspace_with_sample();
    dry(dir.path())
        .args(["read", "Kaikai.dry", "--width", "80", "--no-pager"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gloss:       dog-NOM | run"))
        .stderr(predicate::str::contains("Warning"));
}

#[test]
fn read_single_line() {
    let dir = workspace_with_sample();
    dry(dir.path())
        .args(["read", "Kaikai.dry", "--line", "Kaikai 2", "--format", "dry"])
        .assert()
        .success()
        .stdout(predicate::str::contains("N: Kaikai 2").and(predicate::str::contains("Kaikai 1").not()));
}

#[test]
fn check_reports_bad_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("good.dry"), dry_text(&["N: A 1\nBaseline: kati anu"])).unwrap();
    fs::write(
        dir.path().join("bad.dry"),
        dry_text(&["N: A 1\nBaseline: kati anu\nGloss: dog"]),
    )
    .unwrap();

    dry(dir.path())
        .args(["check", "good.dry", "bad.dry"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("good.dry: 1 lines"))
        .stderr(
            predicate::str::contains("bad.dry")
                .and(predicate::str::contains("1 of 2 files failed to parse"))
                .and(predicate::str::contains("project error").not()),
        );
}

#[test]
fn map_writes_dryout_sibling() {
    let dir = workspace_with_sample();
    dry(dir.path())
        .args(["map", "Kaikai.dry", "--mapping", "Translation:Free"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Relabeled 2 rows"));

    let written = fs::read_to_string(dir.path().join("Kaikai_dryout.dry")).unwrap();
    assert_eq!(written, sample_text().replace("Translation:", "Free:"));
    assert_eq!(fs::read_to_string(dir.path().join("Kaikai.dry")).unwrap(), sample_text());

    // A second run refuses to clobber the first output.
    dry(dir.path())
        .args(["map", "Kaikai.dry", "-m", "Translation:Free"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn map_rejects_unknown_label() {
    let dir = workspace_with_sample();
    dry(dir.path())
        .args(["map", "Kaikai.dry", "-m", "Wordgloss:Gloss2", "--overwrite"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Wordgloss"));
    assert_eq!(fs::read_to_string(dir.path().join("Kaikai.dry")).unwrap(), sample_text());
}

#[test]
fn wrap_reads_stdin() {
    let dir = tempfile::tempdir().unwrap();
    dry(dir.path())
        .args(["wrap", "Production", "--text-name", "Hevi"])
        .write_stdin("kati anu\n  anu kati \n")
        .assert()
        .success()
        .stdout(dry_text(&[
            "N: Hevi 1\nProduction: kati anu",
            "N: Hevi 2\nProduction: anu kati",
        ]));
}

#[test]
fn project_texts_and_name_lookup() {
    let dir = tempfile::tempdir().unwrap();
    dry(dir.path())
        .args(["project", "create", "Daool"])
        .assert()
        .success();

    let root = dir.path().join("Daool");
    fs::create_dir_all(root.join("texts")).unwrap();
    fs::write(root.join("texts/Kaikai.dry"), sample_text()).unwrap();

    dry(&root)
        .arg("texts")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Kaikai\t"));

    dry(&root.join("texts"))
        .args(["read", "kaikai", "--format", "dry"])
        .assert()
        .success()
        .stdout(sample_text());

    dry(&root)
        .args(["search", "dog"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Kaikai 1] Gloss: dog-NOM run"));
}

#[test]
fn config_prints_defaults() {
    let dir = tempfile::tempdir().unwrap();
    dry(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("output_suffix: _dryout"));
}

fn project_with_accents() -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    dry(dir.path()).args(["project", "create", "Daool"]).assert().success();
    let root = dir.path().join("Daool");
    fs::write(root.join(".drybones/diacritics.conf"), "é e e\\u0301 e'\n").unwrap();
    (dir, root)
}

#[test]
fn accent_table_lists_entries() {
    let (_dir, root) = project_with_accents();
    dry(&root)
        .args(["accent", "table"])
        .assert()
        .success()
        .stdout("Accented characters and sequences that are treated as equivalent:\né (base: e) <- e\u{301} , e'\n");
}

#[test]
fn accent_convert_string_from_argument_and_stdin() {
    let (_dir, root) = project_with_accents();
    dry(&root)
        .args(["accent", "convert-string", "cafe'"])
        .assert()
        .success()
        .stdout("café\n");
    dry(&root)
        .args(["accent", "convert-string", "--to-base"])
        .write_stdin("café\nkate'\n")
        .assert()
        .success()
        .stdout("cafe\nkate\n");
}

#[test]
fn accent_convert_file_rewrites_rows_only() {
    let (_dir, root) = project_with_accents();
    let text = format!(
        "% recorded by Be'e\n{}",
        dry_text(&["N: A 1\nBaseline: kate' anu\nTranslation: the cafe' dog"])
    );
    fs::write(root.join("Kaikai.dry"), &text).unwrap();

    dry(&root)
        .args(["accent", "convert-file", "Kaikai.dry", "--overwrite"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted 1 lines"));

    let written = fs::read_to_string(root.join("Kaikai.dry")).unwrap();
    assert_eq!(
        written,
        text.replace("kate'", "katé").replace("cafe'", "café")
    );
}

#[test]
fn accent_without_table_fails() {
    let dir = tempfile::tempdir().unwrap();
    dry(dir.path()).args(["project", "create", "Daool"]).assert().success();
    dry(&dir.path().join("Daool"))
        .args(["accent", "table"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("diacritics.conf"));
}

#[test]
fn project_delete_asks_before_removing_marker() {
    let dir = tempfile::tempdir().unwrap();
    dry(dir.path()).args(["project", "create", "Daool"]).assert().success();
    let root = dir.path().join("Daool");
    fs::write(root.join("Kaikai.dry"), sample_text()).unwrap();

    dry(dir.path())
        .args(["project", "delete", "Daool"])
        .write_stdin("no\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Aborting."));
    assert!(root.join(".drybones").is_dir());

    dry(dir.path())
        .args(["project", "delete", "Daool"])
        .write_stdin("yes\n")
        .assert()
        .success();
    assert!(!root.join(".drybones").exists());
    assert_eq!(fs::read_to_string(root.join("Kaikai.dry")).unwrap(), sample_text());

    dry(dir.path())
        .args(["project", "delete", "Daool", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no project named \"Daool\""));
}
