mod config;
mod path_processing;

use once_cell::sync::Lazy;
use regex::Regex;

pub use config::{AppConfig, CONFIG_PATH_ENV, ConfigError, default_config_path};
pub use path_processing::{LOG_PATH_ENV, default_log_path, expand_tilde};

static REDACTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(token[=:]\s*)([\w\-\.]+)",
        r"(?i)(authorization:\s*)([\w\-\.=:/+]+)",
        r"(?i)((?:aws_)?(?:secret_access_key|session_token|access_key_id)[=:]\s*)([^\s]+)",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Redacts values that look like secrets in a string.
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for re in REDACTION_PATTERNS.iter() {
        redacted = re
            .replace_all(&redacted, |caps: &regex::Captures| {
                let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{}<redacted>", prefix)
            })
            .to_string();
    }
    redacted
}

/// Shortens an approval token for display, keeping only its first characters.
pub fn mask_token(token: &str) -> String {
    if token.chars().count() <= 6 {
        return token.to_string();
    }
    let visible: String = token.chars().take(6).collect();
    format!("{visible}…")
}
