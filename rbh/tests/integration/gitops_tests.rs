use rbh_common::{gitops, CommandFailed};

use crate::common::{init_test_logging, GitFixture};

#[tokio::test]
async fn toplevel_resolves_from_a_subdirectory() {
    init_test_logging();
    crate::test_log!("TEST START: toplevel_resolves_from_a_subdirectory");

    let fixture = GitFixture::new();
    let toplevel = gitops::repo_toplevel(&fixture.path().join("src"))
        .await
        .expect("toplevel");

    // Canonicalize both sides; the temp dir may sit behind a symlink.
    assert_eq!(
        toplevel.canonicalize().expect("canonicalize"),
        fixture.path().canonicalize().expect("canonicalize")
    );

    crate::test_log!("TEST PASS: toplevel_resolves_from_a_subdirectory");
}

#[tokio::test]
async fn merge_base_is_branch_tip_for_a_descendant() {
    init_test_logging();
    crate::test_log!("TEST START: merge_base_is_branch_tip_for_a_descendant");

    let fixture = GitFixture::new();
    let master_tip = fixture.git(&["rev-parse", "master"]);
    fixture.git(&["checkout", "-q", "-b", "topic"]);
    fixture.write("src/extra.rs", "pub fn two() -> u32 { 2 }\n");
    fixture.commit_all("topic work");

    let base = gitops::merge_base(fixture.path(), "master")
        .await
        .expect("merge-base");
    assert_eq!(base, master_tip);

    crate::test_log!("TEST PASS: merge_base_is_branch_tip_for_a_descendant");
}

#[tokio::test]
async fn clean_tree_has_no_changes() {
    init_test_logging();
    crate::test_log!("TEST START: clean_tree_has_no_changes");

    let fixture = GitFixture::new();
    let base = fixture.git(&["rev-parse", "HEAD"]);

    let changes = gitops::diff_name_status(fixture.path(), &base)
        .await
        .expect("diff");
    assert!(changes.is_empty());

    crate::test_log!("TEST PASS: clean_tree_has_no_changes");
}

#[tokio::test]
async fn diff_keeps_adds_and_modifies_but_not_deletes() {
    init_test_logging();
    crate::test_log!("TEST START: diff_keeps_adds_and_modifies_but_not_deletes");

    let fixture = GitFixture::new();
    let base = fixture.git(&["rev-parse", "HEAD"]);

    fixture.write("src/lib.rs", "pub fn one() -> u32 { 11 }\n");
    fixture.write("docs/notes.md", "notes\n");
    fixture.git(&["rm", "-q", "README.md"]);
    fixture.git(&["add", "."]);

    let changes = gitops::diff_name_status(fixture.path(), &base)
        .await
        .expect("diff");
    assert!(changes.contains("src/lib.rs"));
    assert!(changes.contains("docs/notes.md"));
    assert!(!changes.contains("README.md"), "deletion must not sync");

    crate::test_log!("TEST PASS: diff_keeps_adds_and_modifies_but_not_deletes");
}

#[tokio::test]
async fn renames_keep_the_destination_path() {
    init_test_logging();
    crate::test_log!("TEST START: renames_keep_the_destination_path");

    let fixture = GitFixture::new();
    let base = fixture.git(&["rev-parse", "HEAD"]);
    fixture.git(&["mv", "src/lib.rs", "src/moved.rs"]);

    let changes = gitops::diff_name_status(fixture.path(), &base)
        .await
        .expect("diff");
    assert!(changes.contains("src/moved.rs"));
    assert!(!changes.contains("src/lib.rs"));

    crate::test_log!("TEST PASS: renames_keep_the_destination_path");
}

#[tokio::test]
async fn unknown_branch_fails_with_the_git_code() {
    init_test_logging();
    crate::test_log!("TEST START: unknown_branch_fails_with_the_git_code");

    let fixture = GitFixture::new();
    let err = gitops::merge_base(fixture.path(), "no-such-branch")
        .await
        .expect_err("merge-base must fail");

    let failure = err
        .downcast_ref::<CommandFailed>()
        .expect("failure carries the exit code");
    assert_eq!(failure.program, "git");
    assert_ne!(failure.code, 0);

    crate::test_log!("TEST PASS: unknown_branch_fails_with_the_git_code");
}
