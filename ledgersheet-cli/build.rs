use std::env;
use std::path::Path;
use std::process::Command;

const SHA_VAR: &str = "LEDGERSHEET_BUILD_SHA";

/// `git describe` of the enclosing checkout, `-dirty` when the tree has
/// local edits. None outside a git checkout.
fn describe(repo_root: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(repo_root)
        .args(["describe", "--always", "--dirty", "--abbrev=10"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let text = String::from_utf8(out.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn main() {
    println!("cargo:rerun-if-env-changed={SHA_VAR}");

    // packagers building from a tarball pass the revision in
    let sha = match env::var(SHA_VAR) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => {
            let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into());
            let repo_root = Path::new(&manifest_dir).join("..");
            for watched in [".git/HEAD", ".git/index"] {
                let p = repo_root.join(watched);
                if p.exists() {
                    println!("cargo:rerun-if-changed={}", p.display());
                }
            }
            describe(&repo_root).unwrap_or_else(|| "unknown".into())
        }
    };

    println!("cargo:rustc-env={SHA_VAR}={sha}");
}
