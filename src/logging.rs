// src/logging.rs

use color_eyre::eyre::Result;
use directories::ProjectDirs;
use lazy_static::lazy_static;
use std::path::PathBuf;
use time::macros::format_description;
use time::UtcOffset;
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::{self, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref LOG_ENV: String = format!("{}_LOGLEVEL", PROJECT_NAME.clone());
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "vanguard-rs", env!("CARGO_PKG_NAME"))
}

pub fn get_data_dir() -> PathBuf {
    if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_log_path() -> PathBuf {
    get_data_dir().join(LOG_FILE.clone())
}

/// Default filter when neither `RUST_LOG` nor the project variable is set.
fn default_filter() -> String {
    format!("{}=info", env!("CARGO_CRATE_NAME"))
}

/// Initializes file-based logging using the tracing subscriber.
///
/// The terminal belongs to the UI, so every event goes to
/// `<data dir>/vanguard-phish.log`, timestamped in local time.
pub fn initialize_logging() -> Result<()> {
    let directory = get_data_dir();
    std::fs::create_dir_all(&directory)?;
    let log_file = std::fs::File::create(get_log_path())?;

    let file_log_level = std::env::var("RUST_LOG")
        .or_else(|_| std::env::var(LOG_ENV.clone()))
        .unwrap_or_else(|_| default_filter());

    // Must be read before the runtime spawns threads, or it falls back to UTC.
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let timer = OffsetTime::new(offset, format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"));

    let file_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_timer(timer)
        .with_target(false)
        .with_ansi(false)
        .with_filter(EnvFilter::new(file_log_level));

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_derive_from_the_crate() {
        assert_eq!(*LOG_ENV, "VANGUARD_PHISH_LOGLEVEL");
        assert_eq!(*LOG_FILE, "vanguard-phish.log");
        assert_eq!(default_filter(), "vanguard_phish=info");
    }

    #[test]
    fn log_file_lives_in_the_data_dir() {
        assert!(get_log_path().starts_with(get_data_dir()));
    }
}
