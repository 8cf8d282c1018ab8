//! Runtime configuration loaded via OrthoConfig.
//!
//! `DatabaseSettings` reads `DB_*` variables and `SeedSettings` reads `SEED_*`
//! variables. Every struct carries at least one defaulted field so it loads
//! even when none of its variables are set; required values are checked when
//! converting into domain types.

use std::ffi::OsString;
use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{
    DEFAULT_DELAY, DEFAULT_MAX_ATTEMPTS, NewUser, RetryPolicy, UserValidationError,
};
use crate::outbound::persistence::ConnectionParams;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 5432;
const DEFAULT_SEED_NAME: &str = "Alice";
const DEFAULT_SEED_EMAIL: &str = "alice@example.com";

/// Errors raised while turning settings into domain values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Settings could not be read from the environment.
    #[error("failed to load configuration: {message}")]
    Load {
        /// Loader diagnostic.
        message: String,
    },
    /// A required variable was unset.
    #[error("required environment variable {variable} is not set")]
    Missing {
        /// Name of the missing variable.
        variable: &'static str,
    },
    /// `DB_CONNECT_ATTEMPTS` was zero.
    #[error("DB_CONNECT_ATTEMPTS must be at least 1")]
    ZeroAttempts,
    /// The seed user failed validation.
    #[error("invalid seed user: {0}")]
    InvalidSeedUser(#[from] UserValidationError),
}

/// Connection and retry settings.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DB")]
pub struct DatabaseSettings {
    /// Login role (`DB_USER`, required).
    pub user: Option<String>,
    /// Login password (`DB_PASSWORD`, required).
    pub password: Option<String>,
    /// Database name (`DB_NAME`, required).
    pub name: Option<String>,
    /// Server host, socket directory or IP literal (`DB_HOST`, default
    /// `localhost`).
    #[ortho_config(default = DEFAULT_HOST.to_owned())]
    pub host: String,
    /// Server port (`DB_PORT`, default `5432`).
    #[ortho_config(default = DEFAULT_PORT)]
    pub port: u16,
    /// Connection attempts before giving up (`DB_CONNECT_ATTEMPTS`, default 10).
    pub connect_attempts: Option<u32>,
    /// Seconds between attempts (`DB_CONNECT_DELAY_SECS`, default 3).
    pub connect_delay_secs: Option<u64>,
}

fn required(value: Option<&String>, variable: &'static str) -> Result<String, ConfigError> {
    value.cloned().ok_or(ConfigError::Missing { variable })
}

impl DatabaseSettings {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from(env!("CARGO_PKG_NAME"))]).map_err(|error| {
            ConfigError::Load {
                message: error.to_string(),
            }
        })
    }

    /// Validate into connection parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] naming the first unset required
    /// variable.
    pub fn connection_params(&self) -> Result<ConnectionParams, ConfigError> {
        let user = required(self.user.as_ref(), "DB_USER")?;
        let password = required(self.password.as_ref(), "DB_PASSWORD")?;
        let database = required(self.name.as_ref(), "DB_NAME")?;
        Ok(ConnectionParams::new(
            self.host.as_str(),
            self.port,
            database,
            user,
            password,
        ))
    }

    /// Validate into a retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroAttempts`] when zero attempts are configured.
    pub fn retry_policy(&self) -> Result<RetryPolicy, ConfigError> {
        let max_attempts = match self.connect_attempts {
            Some(raw) => NonZeroU32::new(raw).ok_or(ConfigError::ZeroAttempts)?,
            None => DEFAULT_MAX_ATTEMPTS,
        };
        let delay = self
            .connect_delay_secs
            .map_or(DEFAULT_DELAY, Duration::from_secs);
        Ok(RetryPolicy::new(max_attempts, delay))
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("connect_attempts", &self.connect_attempts)
            .field("connect_delay_secs", &self.connect_delay_secs)
            .finish()
    }
}

/// The user inserted by the seed run.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SEED")]
pub struct SeedSettings {
    /// Name to insert (`SEED_USER_NAME`, default `Alice`).
    #[ortho_config(default = DEFAULT_SEED_NAME.to_owned())]
    pub user_name: String,
    /// Email to insert (`SEED_USER_EMAIL`, default `alice@example.com`).
    #[ortho_config(default = DEFAULT_SEED_EMAIL.to_owned())]
    pub user_email: String,
}

impl SeedSettings {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from(env!("CARGO_PKG_NAME"))]).map_err(|error| {
            ConfigError::Load {
                message: error.to_string(),
            }
        })
    }

    /// Validate into the insert candidate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSeedUser`] when the name or email is
    /// empty or too long.
    pub fn candidate(&self) -> Result<NewUser, ConfigError> {
        Ok(NewUser::try_from_strings(
            self.user_name.as_str(),
            self.user_email.as_str(),
        )?)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for configuration parsing and validation.

    use super::*;

    use env_lock::lock_env;
    use rstest::rstest;

    const DB_VARS: [&str; 7] = [
        "DB_USER",
        "DB_PASSWORD",
        "DB_NAME",
        "DB_HOST",
        "DB_PORT",
        "DB_CONNECT_ATTEMPTS",
        "DB_CONNECT_DELAY_SECS",
    ];

    fn db_env(overrides: &[(&'static str, &str)]) -> Vec<(&'static str, Option<String>)> {
        DB_VARS
            .iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    fn complete_settings() -> DatabaseSettings {
        DatabaseSettings {
            user: Some("app".to_owned()),
            password: Some("s3cret".to_owned()),
            name: Some("app_db".to_owned()),
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            connect_attempts: None,
            connect_delay_secs: None,
        }
    }

    fn required_only() -> Vec<(&'static str, Option<String>)> {
        db_env(&[
            ("DB_USER", "app"),
            ("DB_PASSWORD", "s3cret"),
            ("DB_NAME", "app_db"),
        ])
    }

    #[rstest]
    fn defaults_fill_optional_values() {
        let _guard = lock_env(required_only());

        let settings = DatabaseSettings::from_env().expect("config should load");
        let params = settings.connection_params().expect("required values set");

        assert_eq!(params.host(), "localhost");
        assert_eq!(params.port(), 5432);
        assert_eq!(params.database(), "app_db");
        assert_eq!(params.user(), "app");
        assert_eq!(
            settings.retry_policy().expect("default policy"),
            RetryPolicy::default()
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(db_env(&[
            ("DB_USER", "app"),
            ("DB_PASSWORD", "s3cret"),
            ("DB_NAME", "app_db"),
            ("DB_HOST", "postgres"),
            ("DB_PORT", "6543"),
            ("DB_CONNECT_ATTEMPTS", "4"),
            ("DB_CONNECT_DELAY_SECS", "1"),
        ]));

        let settings = DatabaseSettings::from_env().expect("config should load");
        let params = settings.connection_params().expect("required values set");
        let policy = settings.retry_policy().expect("valid policy");

        assert_eq!(params.target(), "postgres:6543/app_db");
        assert_eq!(policy.max_attempts().get(), 4);
        assert_eq!(policy.delay(), Duration::from_secs(1));
    }

    #[rstest]
    #[case("DB_USER")]
    #[case("DB_PASSWORD")]
    #[case("DB_NAME")]
    fn missing_required_variable_is_named(#[case] variable: &'static str) {
        let settings = complete_settings();
        let settings = match variable {
            "DB_USER" => DatabaseSettings {
                user: None,
                ..settings
            },
            "DB_PASSWORD" => DatabaseSettings {
                password: None,
                ..settings
            },
            _ => DatabaseSettings {
                name: None,
                ..settings
            },
        };

        assert_eq!(
            settings.connection_params(),
            Err(ConfigError::Missing { variable })
        );
    }

    #[rstest]
    fn zero_attempts_are_rejected() {
        let settings = DatabaseSettings {
            connect_attempts: Some(0),
            ..complete_settings()
        };

        assert_eq!(settings.retry_policy(), Err(ConfigError::ZeroAttempts));
    }

    #[rstest]
    fn debug_output_redacts_password() {
        let settings = DatabaseSettings {
            password: Some("s3cret".to_owned()),
            ..complete_settings()
        };

        assert!(!format!("{settings:?}").contains("s3cret"));
    }

    #[rstest]
    fn seed_user_defaults_to_alice() {
        let _guard = lock_env([
            ("SEED_USER_NAME", None::<String>),
            ("SEED_USER_EMAIL", None::<String>),
        ]);

        let candidate = SeedSettings::from_env()
            .expect("config should load")
            .candidate()
            .expect("defaults are valid");

        assert_eq!(candidate.name().as_ref(), "Alice");
        assert_eq!(candidate.email().as_ref(), "alice@example.com");
    }

    #[rstest]
    fn only_required_variables_are_enough_to_load_everything() {
        let mut vars = required_only();
        vars.push(("SEED_USER_NAME", None));
        vars.push(("SEED_USER_EMAIL", None));
        let _guard = lock_env(vars);

        let database = DatabaseSettings::from_env().expect("database config should load");
        let seed = SeedSettings::from_env().expect("seed config should load");

        assert_eq!(
            database.connection_params().expect("required values set").target(),
            "localhost:5432/app_db"
        );
        assert_eq!(seed.candidate().expect("defaults are valid").name().as_ref(), "Alice");
    }

    #[rstest]
    fn whitespace_password_is_passed_through() {
        let settings = DatabaseSettings {
            password: Some(" ".to_owned()),
            ..complete_settings()
        };

        assert!(settings.connection_params().is_ok());
    }

    #[rstest]
    fn database_settings_load_with_no_variables_set() {
        let _guard = lock_env(db_env(&[]));

        let settings = DatabaseSettings::from_env().expect("config should load");

        assert_eq!(
            settings.connection_params(),
            Err(ConfigError::Missing { variable: "DB_USER" })
        );
    }

    #[rstest]
    fn seed_user_is_validated() {
        let settings = SeedSettings {
            user_name: String::new(),
            user_email: DEFAULT_SEED_EMAIL.to_owned(),
        };

        assert_eq!(
            settings.candidate(),
            Err(ConfigError::InvalidSeedUser(UserValidationError::EmptyName))
        );
    }
}
