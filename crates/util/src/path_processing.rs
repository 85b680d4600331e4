use std::env;
use std::path::PathBuf;

use dirs_next::{data_local_dir, home_dir};

/// Environment variable overriding where the tracing log file is written.
pub const LOG_PATH_ENV: &str = "PIPEGATE_LOG_PATH";

const LOG_FILE_NAME: &str = "pipegate.log";

pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    if trimmed == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = trimmed.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    if let Some(rest) = trimmed.strip_prefix("~\\") {
        // Windows-style
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(trimmed)
}

/// Resolve the log file path: `PIPEGATE_LOG_PATH` first, then the platform data dir.
pub fn default_log_path() -> PathBuf {
    if let Ok(path) = env::var(LOG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }
    data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pipegate")
        .join(LOG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_home_prefix_only() {
        assert_eq!(expand_tilde("/tmp/fixture.yaml"), PathBuf::from("/tmp/fixture.yaml"));
        if let Some(home) = home_dir() {
            assert_eq!(expand_tilde("~/pipegate.yaml"), home.join("pipegate.yaml"));
        }
    }
}
