use assert_fs::{prelude::*, TempDir};

/// S6 — `status -r` is read-only: running it twice in a row, with nothing
/// else happening in between, changes nothing on disk or in the store and
/// reports the same classification both times.
#[test_log::test]
fn status_remote_is_dry_run_and_idempotent() {
    let store = TempDir::new().expect("tempdir");

    let peer_a = TempDir::new().expect("tempdir");
    peer_a.child("a.txt").write_str("hi").expect("write a.txt");
    crate::dat(peer_a.path(), store.path())
        .args(["init", "shared"])
        .assert()
        .success();
    crate::dat(peer_a.path(), store.path()).arg("push").assert().success();

    let peer_b = TempDir::new().expect("tempdir");
    crate::dat(peer_b.path(), store.path())
        .args(["clone", "shared", "."])
        .assert()
        .success();

    // Diverge peer A's remote copy without peer B pulling, so `status -r`
    // has something to report.
    peer_a.child("a.txt").write_str("a changed this").expect("edit on a");
    crate::dat(peer_a.path(), store.path()).arg("push").assert().success();

    let local_before = std::fs::read_to_string(peer_b.child(".dat/local").path()).expect("read local before");
    let working_before = std::fs::read_to_string(peer_b.child("a.txt").path()).expect("read working before");

    let first = crate::dat(peer_b.path(), store.path())
        .args(["status", "-r"])
        .output()
        .expect("run status -r once");
    let second = crate::dat(peer_b.path(), store.path())
        .args(["status", "-r"])
        .output()
        .expect("run status -r twice");

    assert_eq!(first.stdout, second.stdout, "status -r must report the same thing on repeated runs");

    let local_after = std::fs::read_to_string(peer_b.child(".dat/local").path()).expect("read local after");
    let working_after = std::fs::read_to_string(peer_b.child("a.txt").path()).expect("read working after");
    assert_eq!(local_before, local_after, "status -r must not touch .dat/local");
    assert_eq!(working_before, working_after, "status -r must not touch the working tree");

    store.child("shared/a.txt").assert("a changed this");
}
