use assert_fs::{prelude::*, TempDir};

/// S3 — peer A deletes and pushes `a.txt`; peer B, having modified it
/// locally, sees a `kill_conflict` on pull: no file changes, `.dat/local`
/// stays as it was before the pull attempt.
#[test_log::test]
fn delete_vs_modify_is_a_kill_conflict() {
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

    std::fs::remove_file(peer_a.child("a.txt").path()).expect("delete a.txt on peer a");
    crate::dat(peer_a.path(), store.path()).arg("push").assert().success();

    peer_b.child("a.txt").write_str("modified by b").expect("modify a.txt on peer b");
    let local_before = std::fs::read_to_string(peer_b.child(".dat/local").path()).expect("read local before");

    crate::dat(peer_b.path(), store.path()).arg("pull").assert().success();

    peer_b.child("a.txt").assert("modified by b");
    let local_after = std::fs::read_to_string(peer_b.child(".dat/local").path()).expect("read local after");
    assert_eq!(local_before, local_after, ".dat/local must not change when a conflict is left unresolved");
}

/// S4 — both peers edit `a.txt` to different contents; the second `push`
/// reports a `push_conflict` for the path and leaves the remote as the
/// first pusher left it.
#[test_log::test]
fn modify_vs_modify_is_a_push_conflict() {
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

    peer_a.child("a.txt").write_str("a's version").expect("edit on a");
    crate::dat(peer_a.path(), store.path()).arg("push").assert().success();

    peer_b.child("a.txt").write_str("b's version").expect("edit on b");
    crate::dat(peer_b.path(), store.path()).arg("push").assert().success();

    store.child("shared/a.txt").assert("a's version");
}
