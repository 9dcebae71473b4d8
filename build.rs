use std::process::Command;

fn git(args: &[&str]) -> String {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let hash = git(&["rev-parse", "--short", "HEAD"]);
    let commit_date = git(&["log", "-1", "--format=%cd", "--date=format:%Y-%m-%d"]);

    // Shown by `element --version`; empty outside a checkout.
    let build_info = if hash.is_empty() {
        String::new()
    } else {
        format!(" ({} {})", hash, commit_date)
    };

    println!("cargo:rustc-env=ELEMENT_BUILD_INFO={}", build_info);
}
