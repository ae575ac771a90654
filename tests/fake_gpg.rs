//! Drives the real subprocess runner against a stand-in `gpg` script.
//!
//! Everything runs inside one test so no other thread in this binary can
//! fork while the script is open for writing.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use keyring_verify::{Config, Error, KeyringStage, Verifier};

const SCRIPT: &str = r#"#!/bin/sh
echo "env LC_ALL=$LC_ALL HOME=${HOME:-unset}" >> "$FAKE_GPG_LOG"
echo "args $*" >> "$FAKE_GPG_LOG"
case " $* " in
  *" --recv-keys "*0BADBAD0*)
    echo "gpg: keyserver receive failed: No data" >&2
    exit 2
    ;;
esac
prev=""
for arg in "$@"; do
  if [ "$prev" = "--output" ]; then
    printf 'exported keyring' > "$arg"
  fi
  prev="$arg"
done
case " $* " in
  *" --verify "*tampered*)
    echo "gpg: BAD signature from \"Release <release@example.org>\"" >&2
    exit 1
    ;;
esac
exit 0
"#;

fn read_log(log: &Path) -> Vec<String> {
    let lines = std::fs::read_to_string(log).unwrap_or_default();
    std::fs::remove_file(log).ok();
    lines.lines().map(str::to_string).collect()
}

fn args_of(line: &str) -> Vec<&str> {
    line.strip_prefix("args ")
        .unwrap()
        .split_whitespace()
        .collect()
}

#[tokio::test]
async fn test_fake_gpg_end_to_end() {
    let work = tempfile::tempdir().unwrap();
    let script = work.path().join("gpg");
    std::fs::write(&script, SCRIPT).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let root = work.path().join("keyrings");
    std::fs::create_dir(&root).unwrap();
    let log = work.path().join("gpg.log");

    let config = Config {
        gpg_program: script.clone(),
        temp_root: root.clone(),
        ..Config::default()
    }
    .with_env("FAKE_GPG_LOG", &log);
    let verifier = Verifier::with_config(config);

    // Detached signature accepted.
    let valid = verifier
        .verify_file(
            "rootfs.tar.xz",
            "rootfs.tar.xz.asc",
            &["deadbeef"],
            "hkps://keyserver.ubuntu.com",
        )
        .await
        .unwrap();
    assert!(valid);

    let lines = read_log(&log);
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "env LC_ALL=C HOME=unset");
    let recv = args_of(&lines[1]);
    let home = recv[1];
    assert_eq!(
        recv,
        [
            "--homedir",
            home,
            "--keyserver",
            "hkps://keyserver.ubuntu.com",
            "--recv-keys",
            "deadbeef"
        ]
    );
    let artifact = format!("{home}/keyring.gpg");
    assert_eq!(
        args_of(&lines[3]),
        ["--homedir", home, "--export", "--output", artifact.as_str()]
    );
    assert_eq!(
        args_of(&lines[5]),
        [
            "--homedir",
            home,
            "--keyring",
            artifact.as_str(),
            "--verify",
            "rootfs.tar.xz.asc",
            "rootfs.tar.xz"
        ]
    );
    assert!(!Path::new(home).exists());

    // Inline signature rejected.
    let err = verifier
        .verify_file("tampered.asc", "", &["DEADBEEF"], "")
        .await
        .unwrap_err();
    match &err {
        Error::Verification { status, output } => {
            assert_eq!(*status, 1);
            assert!(output.contains("BAD signature"));
        }
        other => panic!("expected Verification, got {other:?}"),
    }
    let lines = read_log(&log);
    let verify = args_of(&lines[5]);
    assert_eq!(verify[4..], ["--verify", "tampered.asc"]);
    assert!(!Path::new(verify[1]).exists());

    // Unknown key fails before verification.
    let err = verifier
        .verify_file("rootfs.tar.xz", "", &["0BADBAD0"], "")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::KeyringCreation {
            stage: KeyringStage::Receive,
            status: 2,
            ..
        }
    ));
    assert_eq!(read_log(&log).len(), 2);

    // Concurrent verifications get separate keyrings.
    let (a, b) = tokio::join!(
        verifier.verify_file("a.tar.xz", "a.tar.xz.asc", &["DEADBEEF"], ""),
        verifier.verify_file("b.tar.xz", "b.tar.xz.asc", &["786C63F330D7CB92"], ""),
    );
    assert!(a.unwrap());
    assert!(b.unwrap());
    let homes: std::collections::HashSet<String> = read_log(&log)
        .iter()
        .filter(|l| l.starts_with("args "))
        .map(|l| args_of(l)[1].to_string())
        .collect();
    assert_eq!(homes.len(), 2);

    assert_eq!(std::fs::read_dir(&root).unwrap().count(), 0);
}
