//! Embeds `STRAPI_CLI_VERSION`: the crate version, plus the commit it was
//! built from when a git checkout is available (`0.1.0+3fa2c1d`, with a
//! `.dirty` suffix for uncommitted changes).

use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let mut version = env!("CARGO_PKG_VERSION").to_string();
    if let Some(commit) = git(&["rev-parse", "--short", "HEAD"]) {
        version.push('+');
        version.push_str(&commit);
        if git(&["status", "--porcelain", "--untracked-files=no"]).is_some() {
            version.push_str(".dirty");
        }
    }

    println!("cargo:rustc-env=STRAPI_CLI_VERSION={version}");
}

/// Trimmed stdout of a successful, non-empty git command.
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
