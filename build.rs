use std::process::Command;

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Short commit hash from git, or `GIT_SHA` when building outside a checkout
fn git_short_sha() -> Option<String> {
    let from_git = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string());

    from_git
        .or_else(|| std::env::var("GIT_SHA").ok())
        .filter(|s| !s.is_empty())
}

fn main() {
    let base = env!("CARGO_PKG_VERSION");
    let sha = git_short_sha();

    let version = match (env_flag("CHARGELOG_NIGHTLY"), sha.as_deref()) {
        (true, Some(s)) => format!("{}-nightly+{}", base, s),
        (true, None) => format!("{}-nightly", base),
        (false, _) => base.to_string(),
    };

    println!("cargo:rustc-env=APP_VERSION={}", version);
    println!(
        "cargo:rustc-env=APP_GIT_SHA={}",
        sha.as_deref().unwrap_or("unknown")
    );

    println!("cargo:rerun-if-env-changed=CHARGELOG_NIGHTLY");
    println!("cargo:rerun-if-env-changed=GIT_SHA");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads");
}
