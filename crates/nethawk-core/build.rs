//! Build script for nethawk-core.
//!
//! Sets `NETHAWK_REPO_ROOT` for runtime source-checkout detection and drops
//! a marker file so a relocated binary can tell whether the baked-in path
//! still points at the repo it was built from.

use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    // The repo root is two levels up from this crate's manifest dir
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let repo_root = manifest_dir
        .ancestors()
        .nth(2)
        .expect("crate manifest should live under <repo>/crates/")
        .to_path_buf();

    // Emit this as a compile-time environment variable
    println!("cargo:rustc-env=NETHAWK_REPO_ROOT={}", repo_root.display());

    // Also write it to a marker file for runtime verification
    let data_dir = repo_root.join("nethawk").join("data");
    fs::create_dir_all(&data_dir).unwrap();

    let marker_file = data_dir.join(".nethawk_repo_path");
    fs::write(&marker_file, repo_root.to_string_lossy().as_bytes()).unwrap();

    println!("cargo:rerun-if-changed=build.rs");
}
