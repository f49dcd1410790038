//! CLI integration tests for lens commands.
//!
//! These tests check exit codes and the parts of the output that carry meaning (which
//! snippets became context views, what was released), not exact formatting.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;

const GUIDE: &str = "# Guide\n\n## Setup\n\nInstall Rust first.\n\n```rust\nlet rust = 1;\n```\n\nMore rust here.\n";

/// Helper to create a temp directory for tests.
fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

/// Helper to get a lens command.
fn lens() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("lens").unwrap()
}

/// Runs `lens` in `dir` with HOME isolated under it, so no global config leaks in.
fn lens_in(dir: &Path) -> Command {
    let home = dir.join("home");
    fs::create_dir_all(&home).unwrap();
    let mut cmd = lens();
    cmd.env("HOME", home)
        .env_remove("LENS_LOG")
        .env_remove("NO_COLOR")
        .current_dir(dir);
    cmd
}

/// Creates a temp dir holding `guide.md`.
fn guide_dir() -> tempfile::TempDir {
    let dir = temp_dir();
    fs::write(dir.path().join("guide.md"), GUIDE).unwrap();
    dir
}

mod search {
    use super::*;

    #[test]
    fn shows_context_view() {
        let dir = guide_dir();

        lens_in(dir.path())
            .args(["search", "rust", "guide.md"])
            .assert()
            .success()
            .stdout(predicate::str::contains("# Guide"))
            .stdout(predicate::str::contains("## Setup"))
            .stdout(predicate::str::contains("│ Install Rust first."))
            .stdout(predicate::str::contains("│ More rust here."))
            .stdout(predicate::str::contains("let rust = 1;"))
            .stdout(predicate::str::contains("1 with context"))
            .stdout(predicate::str::contains("released 1 context views"));
    }

    #[test]
    fn native_leaves_snippets_alone() {
        let dir = guide_dir();

        lens_in(dir.path())
            .args(["search", "--native", "rust", "guide.md"])
            .assert()
            .success()
            .stdout(predicate::str::contains("> Install Rust first."))
            .stdout(predicate::str::contains("## Setup").not())
            .stdout(predicate::str::contains("released 0 context views"));
    }

    #[test]
    fn disabled_in_config_behaves_natively() {
        let dir = guide_dir();
        fs::write(
            dir.path().join(".lens.toml"),
            "root = true\n[settings]\nenabled = false\n",
        )
        .unwrap();

        lens_in(dir.path())
            .args(["search", "rust", "guide.md"])
            .assert()
            .success()
            .stdout(predicate::str::contains("> Install Rust first."))
            .stdout(predicate::str::contains("0 with context"));
    }

    #[test]
    fn context_lines_cut_blocks() {
        let dir = temp_dir();
        fs::write(
            dir.path().join("long.md"),
            "one\ntwo\nthree\nfour rust\nfive\nsix\nseven\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(".lens.toml"),
            "root = true\n[render]\ncontext_lines = 1\n",
        )
        .unwrap();

        lens_in(dir.path())
            .args(["search", "rust", "long.md"])
            .assert()
            .success()
            .stdout(predicate::str::contains("│ …three"))
            .stdout(predicate::str::contains("│ five…"))
            .stdout(predicate::str::contains("seven").not());
    }

    #[test]
    fn backlinks_keep_link_action() {
        let dir = temp_dir();
        fs::write(dir.path().join("mention.md"), "# Notes\n\nSee rust here.\n").unwrap();

        lens_in(dir.path())
            .args(["search", "--backlinks", "rust", "mention.md"])
            .assert()
            .success()
            .stdout(predicate::str::contains("# Notes"))
            .stdout(predicate::str::contains("[link]"));
    }

    #[test]
    fn json_output() {
        let dir = guide_dir();

        let output = lens_in(dir.path())
            .args(["search", "--json", "rust", "guide.md"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["query"], "rust");
        assert_eq!(json["augmented"], true);
        assert_eq!(json["items"][0]["path"], "guide.md");
        assert_eq!(json["items"][0]["mounted"], true);
        assert_eq!(json["items"][0]["matches"], 3);
        assert_eq!(json["stats"]["mounted"], 1);
        assert_eq!(json["released"], 1);
        assert_eq!(json["notices"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn no_results() {
        let dir = guide_dir();

        lens_in(dir.path())
            .args(["search", "python", "guide.md"])
            .assert()
            .success()
            .stdout(predicate::str::contains("no results"));
    }

    #[test]
    fn missing_file_fails() {
        let dir = temp_dir();

        lens_in(dir.path())
            .args(["search", "rust", "absent.md"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("error:"));
    }

    #[test]
    fn invalid_config_fails() {
        let dir = guide_dir();
        fs::write(dir.path().join(".lens.toml"), "[settings\n").unwrap();

        lens_in(dir.path())
            .args(["search", "rust", "guide.md"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("error:"));
    }

    #[test]
    fn requires_files() {
        lens().args(["search", "rust"]).assert().failure();
    }
}

mod inspect {
    use super::*;

    #[test]
    fn shows_sections_and_headings() {
        let dir = guide_dir();

        lens_in(dir.path())
            .args(["inspect", "guide.md"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Sections (5)"))
            .stdout(predicate::str::contains("paragraph"))
            .stdout(predicate::str::contains("code"))
            .stdout(predicate::str::contains("Headings (2)"))
            .stdout(predicate::str::contains("## Setup"));
    }

    #[test]
    fn shows_properties() {
        let dir = temp_dir();
        fs::write(
            dir.path().join("tagged.md"),
            "---\nstatus: draft\n---\n\n# Tagged\n",
        )
        .unwrap();

        lens_in(dir.path())
            .args(["inspect", "tagged.md"])
            .assert()
            .success()
            .stdout(predicate::str::contains("yaml"))
            .stdout(predicate::str::contains("status: draft"));
    }

    #[test]
    fn json_output() {
        let dir = guide_dir();

        let output = lens_in(dir.path())
            .args(["inspect", "--json", "guide.md"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["extension"], "md");
        assert_eq!(json["sections"].as_array().unwrap().len(), 5);
        assert_eq!(json["sections"][3]["type"], "code");
        assert_eq!(json["headings"][1]["heading"], "Setup");
        assert_eq!(json["headings"][1]["level"], 2);
    }

    #[test]
    fn plain_text_has_no_structure() {
        let dir = temp_dir();
        fs::write(dir.path().join("notes.txt"), "just text\n").unwrap();

        lens_in(dir.path())
            .args(["inspect", "notes.txt"])
            .assert()
            .success()
            .stdout(predicate::str::contains("no structure"));
    }

    #[test]
    fn unsupported_type_fails() {
        let dir = temp_dir();
        fs::write(dir.path().join("image.png"), "not really").unwrap();

        lens_in(dir.path())
            .args(["inspect", "image.png"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unsupported document type"));
    }

    #[test]
    fn works_with_invalid_config() {
        let dir = guide_dir();
        fs::write(dir.path().join(".lens.toml"), "not toml [").unwrap();

        lens_in(dir.path())
            .args(["inspect", "guide.md"])
            .assert()
            .success();
    }
}

mod config {
    use super::*;

    #[test]
    fn shows_defaults_without_files() {
        let dir = temp_dir();

        lens_in(dir.path())
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("no .lens.toml found"))
            .stdout(predicate::str::contains("enabled = true"))
            .stdout(predicate::str::contains("context_lines = 0"))
            .stdout(predicate::str::contains("Warnings").not());
    }

    #[test]
    fn shows_sources_and_warnings() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".lens.toml"),
            "root = true\n[settings]\nenabled = false\nnotice_timeout_ms = 0\n",
        )
        .unwrap();

        lens_in(dir.path())
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains(".lens.toml"))
            .stdout(predicate::str::contains("(local)"))
            .stdout(predicate::str::contains("enabled = false"))
            .stdout(predicate::str::contains("Warnings (2)"))
            .stdout(predicate::str::contains("augmentation is disabled"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let dir = temp_dir();
        fs::write(dir.path().join(".lens.toml"), "[settings]\nbogus = 1\n").unwrap();

        lens_in(dir.path())
            .arg("config")
            .assert()
            .failure()
            .stderr(predicate::str::contains("error:"));
    }
}
