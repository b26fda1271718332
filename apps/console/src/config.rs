use std::{collections::HashMap, fs, time::Duration};

use notification_client::ClientSettings;
use tracing::warn;

const CONFIG_FILE: &str = "console.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub heartbeat_timeout_secs: u64,
    pub max_retries: u32,
    pub reconnect_delay_ms: u64,
    pub throttle_window_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            base_url: "http://127.0.0.1:8080".into(),
            heartbeat_timeout_secs: client.heartbeat_timeout.as_secs(),
            max_retries: client.max_retries,
            reconnect_delay_ms: client.reconnect_delay.as_millis() as u64,
            throttle_window_ms: client.throttle_window.as_millis() as u64,
        }
    }
}

impl Settings {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            heartbeat_timeout: Duration::from_secs(self.heartbeat_timeout_secs),
            max_retries: self.max_retries,
            reconnect_delay: Duration::from_millis(self.reconnect_delay_ms),
            throttle_window: Duration::from_millis(self.throttle_window_ms),
            ..ClientSettings::default()
        }
    }
}

pub fn load_settings() -> Settings {
    let file = fs::read_to_string(CONFIG_FILE).ok();
    load_settings_from(file.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then `console.toml`, then `APP__*` variables.
pub fn load_settings_from(file: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match toml::from_str::<HashMap<String, toml::Value>>(raw) {
            Ok(file_cfg) => apply(&mut settings, |key| {
                file_cfg.get(key).map(|value| match value {
                    toml::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
            }),
            Err(err) => warn!(error = %err, file = CONFIG_FILE, "ignoring unreadable config file"),
        }
    }

    apply(&mut settings, |key| env(&format!("APP__{}", key.to_uppercase())));
    settings
}

fn apply(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("base_url") {
        settings.base_url = v;
    }
    if let Some(v) = parsed(&lookup, "heartbeat_timeout_secs") {
        settings.heartbeat_timeout_secs = v;
    }
    if let Some(v) = parsed(&lookup, "max_retries") {
        settings.max_retries = v;
    }
    if let Some(v) = parsed(&lookup, "reconnect_delay_ms") {
        settings.reconnect_delay_ms = v;
    }
    if let Some(v) = parsed(&lookup, "throttle_window_ms") {
        settings.throttle_window_ms = v;
    }
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring invalid setting");
            None
        }
    }
}
