use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::shared::config::model::{Settings, load_settings};

/// Settings loaded once per process. An unreadable config file falls back
/// to the defaults; the error goes to stderr since logging may not be up yet.
pub static CONFIG: Lazy<Arc<Settings>> = Lazy::new(|| {
    Arc::new(load_settings().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration, using defaults: {e}");
        Settings::default()
    }))
});
