use std::fmt::Display;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// RUST_LOG が無いときのフィルタ
pub const DEFAULT_FILTER: &str = "info";

/// セッションごとのログファイル名 (intake_YYYYmmdd_HHMMSS.log)
pub fn log_file_name<Tz: TimeZone>(started: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    format!("intake_{}.log", started.format("%Y%m%d_%H%M%S"))
}

/// stderr と log_dir 内のセッションファイルの両方に出力する subscriber を登録する。
/// 作成したログファイルのパスを返す。
pub fn init(log_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log dir: {}", log_dir.display()))?;
    let path = log_dir.join(log_file_name(&Local::now()));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_log_file_name() {
        let t = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(log_file_name(&t), "intake_20240309_070501.log");
    }
}
