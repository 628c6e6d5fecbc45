// Drives the compiled binary through a PTY: real raw mode, alternate screen
// and crossterm input.
//
// Notes:
// - Requires a TTY; expectrl allocates a pseudo terminal.
// - Unix-only and ignored by default.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn minimal_session_answers_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempfile::tempdir()?;
    let bin = assert_cmd::cargo::cargo_bin("kanaquiz");
    let cmd = format!(
        "env HOME={home} XDG_CONFIG_HOME={home}/config {bin} -g ka",
        home = home.path().display(),
        bin = bin.display()
    );

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(300));

    // Whatever the question, a few option picks and a screen switch must not
    // take the app down
    p.send("1")?;
    p.send("2")?;
    p.send("\t")?;
    std::thread::sleep(Duration::from_millis(200));
    p.send("s")?;
    std::thread::sleep(Duration::from_millis(200));

    p.send("\x1b")?; // ESC
    p.expect(Eof)?;

    assert!(home.path().join(".local/state/kanaquiz/stats.db").exists());
    Ok(())
}
