use std::fs;

use intake_core::export::DEFAULT_EXPORT_PREFIX;
use serde::Deserialize;
use storage::StorageLocation;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub storage_url: String,
    pub seed_sample_data: bool,
    pub export_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:3001".into(),
            storage_url: StorageLocation::DEFAULT.into(),
            seed_sample_data: true,
            export_prefix: DEFAULT_EXPORT_PREFIX.into(),
        }
    }
}

/// Keys accepted in `server.toml`; anything absent keeps its default.
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    storage_url: Option<String>,
    seed_sample_data: Option<bool>,
    export_prefix: Option<String>,
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());

    settings
}

fn apply_file(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<FileSettings>(raw) {
        Ok(cfg) => cfg,
        Err(error) => {
            warn!(%error, "ignoring unreadable server.toml");
            return;
        }
    };

    if let Some(v) = file_cfg.bind_addr {
        settings.server_bind = v;
    }
    if let Some(v) = file_cfg.storage_url {
        settings.storage_url = v;
    }
    if let Some(v) = file_cfg.seed_sample_data {
        settings.seed_sample_data = v;
    }
    if let Some(v) = file_cfg.export_prefix {
        settings.export_prefix = v;
    }
}

/// Later names win: `APP__*` overrides the short form.
fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = var("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = var("STORAGE_URL") {
        settings.storage_url = v;
    }
    if let Some(v) = var("APP__STORAGE_URL") {
        settings.storage_url = v;
    }

    if let Some(v) = var("APP__SEED_SAMPLE_DATA") {
        match parse_flag(&v) {
            Some(flag) => settings.seed_sample_data = flag,
            None => warn!(value = %v, "APP__SEED_SAMPLE_DATA is not a boolean; keeping default"),
        }
    }

    if let Some(v) = var("APP__EXPORT_PREFIX") {
        if !v.trim().is_empty() {
            settings.export_prefix = v.trim().to_string();
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
