mod common;

use common::{create_branch, create_monorepo, git_add_and_commit, write};
use predicates::str::contains;

#[test]
fn check_fails_when_source_changed_without_bump() {
    let repo = create_monorepo();
    create_branch(&repo, "feature");
    write(&repo, "sdk/src/index.ts", "export const x = 1;\n");
    git_add_and_commit(&repo, "Change sdk");

    assert_cmd::cargo::cargo_bin_cmd!("bumpwright")
        .args(["check", "--base", "main"])
        .current_dir(repo.path())
        .assert()
        .failure()
        .stderr(contains("Source changed but version not bumped:"))
        .stderr(contains("sdk 1.4.2 -> 1.4.3"))
        .stderr(contains("cli 0.9.0 -> 0.9.1"));
}

#[test]
fn check_passes_after_bump() {
    let repo = create_monorepo();
    create_branch(&repo, "feature");
    write(&repo, "cli/src/main.ts", "console.log('changed');\n");
    git_add_and_commit(&repo, "Change cli");

    assert_cmd::cargo::cargo_bin_cmd!("bumpwright")
        .args(["bump", "--base", "main"])
        .current_dir(repo.path())
        .assert()
        .success();
    git_add_and_commit(&repo, "Bump cli");

    assert_cmd::cargo::cargo_bin_cmd!("bumpwright")
        .args(["check", "--base", "main"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(contains("All changed packages have bumped versions"));
}

#[test]
fn check_passes_after_dependency_cascade_bump() {
    let repo = create_monorepo();
    create_branch(&repo, "feature");
    write(&repo, "sdk/src/index.ts", "export const x = 1;\n");
    git_add_and_commit(&repo, "Change sdk");

    assert_cmd::cargo::cargo_bin_cmd!("bumpwright")
        .args(["bump", "--base", "main"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(contains("cli 0.9.0 -> 0.9.1 (dependency changed)"));
    git_add_and_commit(&repo, "Bump sdk and cli");

    assert_cmd::cargo::cargo_bin_cmd!("bumpwright")
        .args(["check", "--base", "main"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(contains("All changed packages have bumped versions"));
}

#[test]
fn check_ignores_documentation_changes() {
    let repo = create_monorepo();

    assert_cmd::cargo::cargo_bin_cmd!("bumpwright")
        .args(["check", "README.md"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(contains("No packages affected by changes"));
}

#[test]
fn check_rejects_staged_with_base() {
    let repo = create_monorepo();

    assert_cmd::cargo::cargo_bin_cmd!("bumpwright")
        .args(["check", "--staged", "--base", "main"])
        .current_dir(repo.path())
        .assert()
        .failure();
}

#[test]
fn check_falls_back_to_previous_commit_for_unknown_base() {
    let repo = create_monorepo();
    write(&repo, "cli/src/main.ts", "console.log('changed');\n");
    git_add_and_commit(&repo, "Change cli");

    assert_cmd::cargo::cargo_bin_cmd!("bumpwright")
        .args(["check", "--base", "does-not-exist"])
        .current_dir(repo.path())
        .assert()
        .failure()
        .stderr(contains("cli 0.9.0 -> 0.9.1 (source changed)"));
}
