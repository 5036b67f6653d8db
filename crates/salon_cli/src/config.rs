//! Environment-driven runtime configuration.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

pub struct Config {
    pub port: u16,
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: String,
}

impl Config {
    /// Reads `SALON_*` variables, falling back to defaults when unset.
    ///
    /// # Errors
    /// Returns a readable message when a variable is set but cannot be parsed,
    /// or when the working directory needed for defaults is unavailable.
    pub fn load() -> Result<Self, String> {
        let default_log_dir = env::current_dir()
            .map_err(|err| format!("cannot resolve working directory: {err}"))?
            .join("logs");

        Ok(Self {
            port: try_load("SALON_PORT", "3000")?,
            db_path: try_load("SALON_DB_PATH", "salon.sqlite3")?,
            log_level: try_load("SALON_LOG_LEVEL", salon_core::default_log_level())?,
            log_dir: try_load("SALON_LOG_DIR", &default_log_dir.to_string_lossy())?,
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, String>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse()
        .map_err(|err| format!("invalid {key} value `{raw}`: {err}"))
}

#[cfg(test)]
mod tests {
    use super::try_load;

    #[test]
    fn try_load_uses_default_for_unset_variable() {
        let port: u16 = try_load("SALON_TEST_UNSET_PORT", "3000").unwrap();
        assert_eq!(port, 3000);
    }

    #[test]
    fn try_load_reports_unparseable_default() {
        let err = try_load::<u16>("SALON_TEST_UNSET_PORT", "not-a-port").unwrap_err();
        assert!(err.contains("SALON_TEST_UNSET_PORT"));
    }
}
