use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "RecoveryTracker";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Users resolved per surgery date query during backfill.
pub const LOOKUP_CHUNK_SIZE: usize = 200;

/// Database file name inside the data directory
pub const DATABASE_FILE: &str = "recovery.db";

/// Get the application data directory
/// Platform data dir (e.g. ~/.local/share/RecoveryTracker), home as fallback.
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default database location
pub fn database_path() -> PathBuf {
    app_data_dir().join(DATABASE_FILE)
}

/// Log filter used when RUST_LOG is unset
pub fn default_log_filter() -> &'static str {
    "recovery_tracker=info,recovery_admin=info,warn"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_lives_under_app_data() {
        let db = database_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with(DATABASE_FILE));
    }

    #[test]
    fn app_data_dir_is_named_after_app() {
        assert!(app_data_dir().ends_with(APP_NAME));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn default_filter_parses() {
        assert!(tracing_subscriber::EnvFilter::try_new(default_log_filter()).is_ok());
    }

    #[test]
    fn chunk_size_fits_sqlite_variable_limit() {
        assert!(LOOKUP_CHUNK_SIZE > 0 && LOOKUP_CHUNK_SIZE <= 999);
    }
}
