use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("blockfold").unwrap();
    cmd.current_dir(dir)
        .env_remove("BLOCKFOLD_SOURCES")
        .env_remove("BLOCKFOLD_DIALECT")
        .env("RUST_LOG", "off");
    cmd
}

fn write_list(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, body).expect("write list");
    path.display().to_string()
}

#[test]
fn converts_local_sources_into_payloads() {
    let tmp = TempDir::new().expect("temp dir");
    let hosts = write_list(
        tmp.path(),
        "hosts.txt",
        "# hosts\n0.0.0.0 x.com\n0.0.0.0 y.com\n0.0.0.0 Tracker.Example.com\n",
    );
    let abp = write_list(tmp.path(), "abp.txt", "[Adblock Plus 2.0]\n@@||y.com^\n||ads.example.net^$important\n");

    cmd(tmp.path())
        .args(["--source", &hosts, "--source", &abp])
        .args(["--blocked-output", "out/blocked.yaml", "--allowed-output", "out/allowed.yaml"])
        .assert()
        .success()
        .stdout(contains("Wrote out/blocked.yaml with 3 entries."))
        .stdout(contains("Wrote out/allowed.yaml with 1 entries."));

    let blocked = fs::read_to_string(tmp.path().join("out/blocked.yaml")).expect("blocked payload");
    assert!(blocked.starts_with("# Sources:\n# - file://"));
    assert!(blocked.contains("hosts.txt (plain: +3 block, +0 allow)\n"));
    assert!(blocked.contains("abp.txt (ABP: +1 block, +1 allow)\n"));
    assert!(blocked.ends_with(
        "payload:\n  - 'ads.example.net'\n  - 'tracker.example.com'\n  - 'x.com'\n"
    ));

    let allowed = fs::read_to_string(tmp.path().join("out/allowed.yaml")).expect("allowed payload");
    assert!(allowed.ends_with("payload:\n  - 'y.com'\n"));
}

#[test]
fn empty_blocklist_exits_with_distinct_status() {
    let tmp = TempDir::new().expect("temp dir");
    let list = write_list(tmp.path(), "empty.txt", "# nothing here\n127.0.0.1 localhost\n");

    cmd(tmp.path())
        .args(["--source", &list])
        .assert()
        .code(2)
        .stderr(contains("block list empty"));

    assert!(!tmp.path().join("oisd-stash.yaml").exists());
    assert!(!tmp.path().join("allowlist.yaml").exists());
}

#[test]
fn failing_source_does_not_abort_the_run() {
    let tmp = TempDir::new().expect("temp dir");
    let good = write_list(tmp.path(), "good.txt", "kept.example.com\n");
    let missing = tmp.path().join("missing.txt").display().to_string();

    cmd(tmp.path())
        .args(["--source", &missing, "--source", &good])
        .assert()
        .success()
        .stdout(contains("Wrote oisd-stash.yaml with 1 entries."));

    let blocked = fs::read_to_string(tmp.path().join("oisd-stash.yaml")).expect("payload");
    assert!(blocked.contains("missing.txt (error: read error:"));
    assert!(blocked.ends_with("payload:\n  - 'kept.example.com'\n"));
}

#[test]
fn dry_run_and_forced_dialect() {
    let tmp = TempDir::new().expect("temp dir");
    let list = write_list(tmp.path(), "hosts.txt", "0.0.0.0 a.example.com\n# mirrors || b\n");

    cmd(tmp.path())
        .args(["--source", &list, "--dialect", "plain", "--dry-run"])
        .assert()
        .success()
        .stdout(contains("dry run: 1 blocked, 0 allowed from 1 sources"));

    assert!(!tmp.path().join("oisd-stash.yaml").exists());
}
