use std::{collections::HashMap, fs};

use serde::Deserialize;
use tracing::warn;

pub const SETTINGS_FILE: &str = "relay.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub bind_addr: String,
    pub backend_url: String,
    pub body_limit_bytes: usize,
    pub backend_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".into(),
            backend_url: "http://127.0.0.1:8000/simulate".into(),
            body_limit_bytes: 64 * 1024,
            backend_timeout_secs: 120,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());

    settings
}

pub(crate) fn apply_file(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<HashMap<String, toml::Value>>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(error) => {
            warn!(%error, file = SETTINGS_FILE, "ignoring unreadable settings file");
            return;
        }
    };

    let text = |key: &str| match file_cfg.get(key) {
        Some(toml::Value::String(v)) => Some(v.clone()),
        Some(toml::Value::Integer(v)) => Some(v.to_string()),
        _ => None,
    };

    if let Some(v) = text("bind_addr") {
        settings.bind_addr = v;
    }
    if let Some(v) = text("backend_url") {
        settings.backend_url = v;
    }
    if let Some(v) = text("body_limit_bytes").and_then(|v| v.parse().ok()) {
        settings.body_limit_bytes = v;
    }
    if let Some(v) = text("backend_timeout_secs").and_then(|v| v.parse().ok()) {
        settings.backend_timeout_secs = v;
    }
}

/// `APP__*` names win over `RELAY_*` names when both are set.
pub(crate) fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let var = |short: &str, long: &str| lookup(long).or_else(|| lookup(short));

    if let Some(v) = var("RELAY_BIND", "APP__BIND_ADDR") {
        settings.bind_addr = v;
    }
    if let Some(v) = var("RELAY_BACKEND_URL", "APP__BACKEND_URL") {
        settings.backend_url = v;
    }
    if let Some(v) = var("RELAY_BODY_LIMIT_BYTES", "APP__BODY_LIMIT_BYTES") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.body_limit_bytes = parsed;
        }
    }
    if let Some(v) = var("RELAY_BACKEND_TIMEOUT_SECS", "APP__BACKEND_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.backend_timeout_secs = parsed;
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
