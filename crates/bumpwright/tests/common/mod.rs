#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

pub const REGISTRY: &str = r#"
[settings]
ignored-files = ["**/*.snap"]

[packages.sdk]
source-dirs = ["sdk/src/"]
manifests = [{ path = "sdk/package.json" }]

[packages.cli]
source-dirs = ["cli/src/"]
manifests = [{ path = "cli/package.json", dependencies = { sdk = ["dependencies", "@acme/sdk"] } }]

[packages.mcp]
source-dirs = ["mcp/src/"]
manifests = [{ path = "mcp/Cargo.toml", version-field = "package.version" }]
"#;

fn git(dir: &Path, args: &[&str]) {
    Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
}

pub fn init_git_repo(dir: &TempDir) {
    git(dir.path(), &["init", "--initial-branch=main"]);
    git(dir.path(), &["config", "user.email", "test@example.com"]);
    git(dir.path(), &["config", "user.name", "Test"]);
}

pub fn git_add(dir: &TempDir) {
    git(dir.path(), &["add", "-A"]);
}

pub fn git_add_and_commit(dir: &TempDir, message: &str) {
    git_add(dir);
    git(dir.path(), &["commit", "-m", message]);
}

pub fn create_branch(dir: &TempDir, name: &str) {
    git(dir.path(), &["checkout", "-b", name]);
}

pub fn write(dir: &TempDir, relative: &str, content: &str) {
    let path = dir.path().join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create parent dir");
    }
    fs::write(&path, content).expect("failed to write file");
}

pub fn read(dir: &TempDir, relative: &str) -> String {
    fs::read_to_string(dir.path().join(relative)).expect("failed to read file")
}

/// Three packages on `main`: `cli` pins `sdk` with a caret range, `mcp` is
/// a standalone Cargo crate.
pub fn create_monorepo() -> TempDir {
    let dir = TempDir::new().expect("failed to create temp dir");
    init_git_repo(&dir);

    write(&dir, "bumpwright.toml", REGISTRY);
    write(
        &dir,
        "sdk/package.json",
        "{\n  \"name\": \"@acme/sdk\",\n  \"version\": \"1.4.2\"\n}\n",
    );
    write(&dir, "sdk/src/index.ts", "export {};\n");
    write(
        &dir,
        "cli/package.json",
        "{\n  \"name\": \"@acme/cli\",\n  \"version\": \"0.9.0\",\n  \"dependencies\": {\n    \"@acme/sdk\": \"^1.4.2\"\n  }\n}\n",
    );
    write(&dir, "cli/src/main.ts", "console.log('hi');\n");
    write(
        &dir,
        "mcp/Cargo.toml",
        "# server crate\n[package]\nname = \"acme-mcp\"\nversion = \"0.3.1\"\n",
    );
    write(&dir, "mcp/src/lib.rs", "");
    write(&dir, "README.md", "# acme\n");

    git_add_and_commit(&dir, "Initial commit");
    dir
}
