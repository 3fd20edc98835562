use assert_fs::{prelude::*, TempDir};

/// S5 — starting from the delete-vs-modify conflict of S3, `stash` moves
/// the conflicted file aside so the following `pull` succeeds; `stash pop`
/// without `--hard` refuses to clobber the file that `pull` brought back,
/// but `--hard` overwrites it.
#[test_log::test]
fn stash_unblocks_a_pull_then_pop_requires_hard_to_overwrite() {
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
    peer_b.child("a.txt").write_str("b's edit").expect("modify a.txt on peer b");

    crate::dat(peer_b.path(), store.path()).arg("stash").assert().success();
    peer_b.child("a.txt").assert(predicates::path::missing());
    peer_b.child(".dat/stash/a.txt").assert("b's edit");

    crate::dat(peer_b.path(), store.path()).arg("pull").assert().success();
    peer_b.child("a.txt").assert(predicates::path::missing());

    crate::dat(peer_b.path(), store.path())
        .args(["stash", "pop"])
        .assert()
        .success();
    peer_b.child("a.txt").assert("b's edit");

    // Stash again and pop without --hard should refuse once the path exists.
    peer_b.child(".dat/stash").create_dir_all().expect("recreate stash dir");
    peer_b
        .child(".dat/stash/a.txt")
        .write_str("stashed again")
        .expect("seed stash");
    crate::dat(peer_b.path(), store.path())
        .args(["stash", "pop"])
        .assert()
        .failure();
    peer_b.child("a.txt").assert("b's edit");

    crate::dat(peer_b.path(), store.path())
        .args(["stash", "pop", "--hard"])
        .assert()
        .success();
    peer_b.child("a.txt").assert("stashed again");
}
