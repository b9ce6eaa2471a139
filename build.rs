fn main() {
    let rev = git_rev();
    let rev = rev.as_deref().unwrap_or("unknown");
    println!("cargo:rustc-env=REACTIVE_PRACTICE_GIT_REVISION={}", rev);
}

fn git_rev() -> Option<String> {
    std::process::Command::new("git")
        .args(&["rev-parse", "--short=12", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|data| {
            std::str::from_utf8(&data.stdout)
                .ok()
                .map(|s| s.trim())
                .map(ToString::to_string)
        })
        .filter(|s| !s.is_empty())
}
