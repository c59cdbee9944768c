//! End-to-end tests for koi-ctl against a scripted stand-in for the koi CLI
#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ECHO: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7";
const MAKO: &str = "16fd2706-8baf-433b-82eb-8c7fada847da";

/// Write a fake koi binary. It skips `-f <file>` pairs, records its
/// arguments to `args.log` and answers based on the subcommand.
fn fake_koi(dir: &Path) -> PathBuf {
    let log = dir.join("args.log");
    let script = format!(
        r#"#!/bin/sh
echo "$@" >> "{log}"
while [ "$1" = "-f" ]; do shift 2; done
cmd="$1"
shift
case "$cmd" in
status)
    if [ -n "$1" ]; then
        echo "From: {MAKO}"
        echo "name: $1"
        echo "uuid: {MAKO}"
        exit 0
    fi
    cat <<EOF
From: {ECHO}
maintenance: false
manual-master: false
master: {ECHO}
target: 00000000-0000-0000-0000-000000000000

[node]
addr: 10.0.0.1:42001
name: echo
seen: 2012-Mar-14 10:22:01
services: [echo:Promoted:none:+, mako:Promoted:none:+]
state: Master
target-action: none
uuid: {ECHO}
[end]
[node]
addr: 10.0.0.2:42001
lastfailed: 1984-Jan-01 00:00:00
name: mako
seen: 2012-Mar-14 10:22:02
services: []
state: Slave
uuid: {MAKO}
[end]
EOF
    ;;
local)
    echo "From: {ECHO}"
    echo "name: echo"
    echo "port: 42001"
    echo "uuid: {ECHO}"
    ;;
failures)
    echo "From: {ECHO}"
    echo "Last 0 failures"
    ;;
maintenance)
    echo "From: {ECHO}"
    echo "Maintenance Mode $1"
    ;;
promote)
    echo "From: {ECHO}"
    echo "Redirect: 10.0.0.1:42001 promote"
    echo "Promoting $1"
    ;;
*)
    echo "Unknown command." >&2
    exit 1
    ;;
esac
"#,
        log = log.display()
    );

    let path = dir.join("koi");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn koi_ctl(fake: &Path) -> Command {
    let mut cmd = Command::cargo_bin("koi-ctl").unwrap();
    cmd.env_remove("KOI_BINARY")
        .env_remove("RUST_LOG")
        .arg("--binary")
        .arg(fake)
        // Keep the host's /etc/koi/koi.conf out of the picture
        .arg("-f")
        .arg("/nonexistent/koi.conf");
    cmd
}

fn logged_args(dir: &Path) -> String {
    std::fs::read_to_string(dir.join("args.log")).unwrap_or_default()
}

#[test]
fn status_prints_report() {
    let dir = TempDir::new().unwrap();
    let fake = fake_koi(dir.path());

    koi_ctl(&fake)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Maintenance mode: false\nManual master mode: false\n",
        ))
        .stdout(predicate::str::contains(format!("Master: echo ({ECHO})")))
        .stdout(predicate::str::contains("   State: Master (none)"))
        .stdout(predicate::str::contains("      echo (Promoted)"))
        .stdout(predicate::str::contains("Last Failed").not())
        .stdout(predicate::str::contains("Target master").not());
}

#[test]
fn status_json_keys_nodes_by_uuid() {
    let dir = TempDir::new().unwrap();
    let fake = fake_koi(dir.path());

    let output = koi_ctl(&fake).args(["status", "--json"]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["elector"]["manual-master"], "false");
    assert_eq!(json["nodes"][ECHO]["uuid"], ECHO);
    assert_eq!(json["nodes"][MAKO]["name"], "mako");
    assert_eq!(json["nodes"][ECHO]["services"][1]["name"], "mako");
}

#[test]
fn local_and_local_uuid() {
    let dir = TempDir::new().unwrap();
    let fake = fake_koi(dir.path());

    koi_ctl(&fake)
        .arg("local")
        .assert()
        .success()
        .stdout(format!("uuid: {ECHO}\nname: echo\nport: 42001\n"));

    koi_ctl(&fake)
        .arg("local-uuid")
        .assert()
        .success()
        .stdout(format!("{ECHO}\n"));
}

#[test]
fn node_status_passes_node_argument() {
    let dir = TempDir::new().unwrap();
    let fake = fake_koi(dir.path());

    koi_ctl(&fake)
        .args(["node", "mako"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("uuid: {MAKO}")))
        .stdout(predicate::str::contains("name: mako"));
    assert!(logged_args(dir.path()).contains("status mako"));
}

#[test]
fn zero_failures_prints_nothing() {
    let dir = TempDir::new().unwrap();
    let fake = fake_koi(dir.path());

    koi_ctl(&fake).arg("failures").assert().success().stdout("");
}

#[test]
fn maintenance_coerces_boolean_like_values() {
    let dir = TempDir::new().unwrap();
    let fake = fake_koi(dir.path());

    koi_ctl(&fake)
        .args(["maintenance", "true"])
        .assert()
        .success()
        .stdout("Maintenance Mode on\n");
    koi_ctl(&fake)
        .args(["maintenance", "0"])
        .assert()
        .success()
        .stdout("Maintenance Mode off\n");
}

#[test]
fn maintenance_rejects_bogus_without_invoking() {
    let dir = TempDir::new().unwrap();
    let fake = fake_koi(dir.path());

    koi_ctl(&fake)
        .args(["maintenance", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"));
    assert!(logged_args(dir.path()).is_empty());
}

#[test]
fn promote_strips_routing_headers() {
    let dir = TempDir::new().unwrap();
    let fake = fake_koi(dir.path());

    koi_ctl(&fake)
        .args(["promote", "mako"])
        .assert()
        .success()
        .stdout("Promoting mako\n");
}

#[test]
fn daemon_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    let fake = fake_koi(dir.path());

    koi_ctl(&fake)
        .arg("demote")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown command."));
}

#[test]
fn config_files_are_forwarded_when_present() {
    let dir = TempDir::new().unwrap();
    let fake = fake_koi(dir.path());
    let conf = dir.path().join("koi.conf");
    std::fs::write(&conf, "").unwrap();

    koi_ctl(&fake)
        .arg("-f")
        .arg(&conf)
        .arg("failures")
        .assert()
        .success();
    assert_eq!(
        logged_args(dir.path()).trim(),
        format!("-f {} failures", conf.display())
    );
}

#[test]
fn missing_binary_fails_cleanly() {
    let dir = TempDir::new().unwrap();

    koi_ctl(&dir.path().join("no-such-koi"))
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to spawn"));
}
