// Non-interactive entry points of the binary. HOME and XDG_CONFIG_HOME point
// at a temp dir so config, stats and logs never touch the real profile.

use assert_cmd::Command;
use tempfile::{tempdir, TempDir};

fn kanaquiz(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("kanaquiz").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env_remove("RUST_LOG")
        .write_stdin("");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{output:?}");
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn list_groups_prints_both_scripts() {
    let home = tempdir().unwrap();
    let out = stdout_of(kanaquiz(&home).arg("--list-groups"));

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 52);
    assert!(lines.iter().any(|l| l.starts_with("hiragana") && l.contains("か")));
    assert!(lines.iter().any(|l| l.starts_with("katakana") && l.contains("キャ")));
}

#[test]
fn list_groups_for_one_script() {
    let home = tempdir().unwrap();
    let out = stdout_of(kanaquiz(&home).args(["--list-groups", "-S", "katakana"]));
    assert_eq!(out.lines().count(), 26);
    assert!(out.lines().all(|l| l.starts_with("katakana")));
}

#[test]
fn export_stats_without_history() {
    let home = tempdir().unwrap();
    let target = home.path().join("stats.csv");
    let out = stdout_of(kanaquiz(&home).arg("--export-stats").arg(&target));
    assert!(out.contains("wrote 0 characters"));
    assert!(target.exists());
}

#[test]
fn clear_stats_succeeds_on_fresh_profile() {
    let home = tempdir().unwrap();
    let out = stdout_of(kanaquiz(&home).arg("--clear-stats"));
    assert!(out.contains("statistics cleared"));
    assert!(home
        .path()
        .join(".local/state/kanaquiz/stats.db")
        .exists());
}

#[test]
fn unknown_group_is_rejected() {
    let home = tempdir().unwrap();
    let output = kanaquiz(&home).args(["-g", "nope"]).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nope"), "{stderr}");
}

#[test]
fn too_many_options_are_rejected() {
    let home = tempdir().unwrap();
    let output = kanaquiz(&home)
        .args(["-m", "word", "-w", "5"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn quiz_requires_a_tty_but_saves_config() {
    let home = tempdir().unwrap();
    let output = kanaquiz(&home).args(["-m", "word"]).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("tty"));

    let saved = std::fs::read_to_string(home.path().join("config/kanaquiz/config.json")).unwrap();
    assert!(saved.contains(r#""game_mode": "word""#));
}
