use std::process::Command;

/// `git describe` の結果。git が無い・リポジトリ外なら None。
fn git_describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--always", "--dirty", "--tags"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!version.is_empty()).then_some(version)
}

fn main() {
    // HEAD が変わったら (commit, checkout など) 再実行
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    // 待機画面の BUILD 表示に使う
    let version = git_describe().unwrap_or_else(|| "local".to_string());
    println!("cargo:rustc-env=GIT_VERSION={}", version);
}
