use assert_fs::{prelude::*, TempDir};
use predicates::prelude::*;

/// S1 — first push creates the remote prefix, uploads the new file and
/// `.dat/master`, and flips `pushed` to `true` in the local config.
#[test_log::test]
fn first_push_uploads_and_flips_pushed() {
    let store = TempDir::new().expect("tempdir");
    let working = TempDir::new().expect("tempdir");
    working.child("a.txt").write_str("hi").expect("write a.txt");

    crate::dat(working.path(), store.path())
        .args(["init", "peer-a"])
        .assert()
        .success();

    crate::dat(working.path(), store.path())
        .arg("push")
        .assert()
        .success();

    working
        .child(".dat/local")
        .assert(predicate::str::contains("a.txt\t"));
    working
        .child(".dat/config")
        .assert(predicate::str::contains("pushed: True"));
    store.child("peer-a/a.txt").assert(predicate::path::is_file());
    store.child("peer-a/.dat/master").assert(predicate::path::is_file());
}

/// S2 — a second peer cloning after S1 sees the file that was pushed and
/// ends up with a matching `.dat/local`.
#[test_log::test]
fn clone_pulls_in_everything_pushed_so_far() {
    let store = TempDir::new().expect("tempdir");
    let peer_a = TempDir::new().expect("tempdir");
    peer_a.child("a.txt").write_str("hi").expect("write a.txt");

    crate::dat(peer_a.path(), store.path())
        .args(["init", "peer-a"])
        .assert()
        .success();
    crate::dat(peer_a.path(), store.path()).arg("push").assert().success();

    let workspace = TempDir::new().expect("tempdir");
    crate::dat(workspace.path(), store.path())
        .args(["clone", "peer-a", "peer-b"])
        .assert()
        .success();

    let peer_b = workspace.child("peer-b");
    peer_b.child("a.txt").assert("hi");

    let peer_a_local = std::fs::read_to_string(peer_a.child(".dat/local").path()).expect("read local a");
    let peer_b_local = std::fs::read_to_string(peer_b.child(".dat/local").path()).expect("read local b");
    assert_eq!(peer_a_local, peer_b_local);

    // A `pull` afterwards with nothing new on the remote is a no-op.
    crate::dat(peer_b.path(), store.path()).arg("pull").assert().success();
}

/// Property 3 — running `push` twice with no intervening edits leaves
/// `.dat/local` byte-identical after the second run.
#[test_log::test]
fn second_push_with_no_edits_is_a_no_op() {
    let store = TempDir::new().expect("tempdir");
    let working = TempDir::new().expect("tempdir");
    working.child("a.txt").write_str("hi").expect("write a.txt");

    crate::dat(working.path(), store.path())
        .args(["init", "peer-a"])
        .assert()
        .success();
    crate::dat(working.path(), store.path()).arg("push").assert().success();

    let local_after_first = std::fs::read_to_string(working.child(".dat/local").path()).expect("read local");
    crate::dat(working.path(), store.path()).arg("push").assert().success();
    let local_after_second = std::fs::read_to_string(working.child(".dat/local").path()).expect("read local");

    assert_eq!(local_after_first, local_after_second);
}

/// S6 — `push -d` reports what would be uploaded without touching the
/// remote or `.dat/local`.
#[test_log::test]
fn push_dry_run_changes_nothing() {
    let store = TempDir::new().expect("tempdir");
    let working = TempDir::new().expect("tempdir");
    working.child("a.txt").write_str("hi").expect("write a.txt");

    crate::dat(working.path(), store.path())
        .args(["init", "peer-a"])
        .assert()
        .success();

    crate::dat(working.path(), store.path())
        .args(["push", "-d"])
        .assert()
        .success();

    working.child(".dat/local").assert(predicate::path::missing());
    working
        .child(".dat/config")
        .assert(predicate::str::contains("pushed: False"));
    store.child("peer-a").assert(predicate::path::missing());
}
