//! Injects the version and git SHA reported by `/status`.
//!
//! OTB_VERSION and OTB_GIT_SHA may be set by the packaging environment;
//! otherwise the crate version and `git rev-parse` are used.

use std::process::Command;

fn main() {
    let version = env_or("OTB_VERSION", || env!("CARGO_PKG_VERSION").to_string());
    let git_sha = env_or("OTB_GIT_SHA", git_short_sha);

    println!("cargo:rustc-env=OTB_VERSION={}", version);
    println!("cargo:rustc-env=OTB_GIT_SHA={}", git_sha);
    println!("cargo:rerun-if-env-changed=OTB_VERSION");
    println!("cargo:rerun-if-env-changed=OTB_GIT_SHA");
}

fn env_or(name: &str, fallback: impl FnOnce() -> String) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(fallback)
}

fn git_short_sha() -> String {
    Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".into())
}
