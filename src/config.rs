use std::{env, time::Duration};

/// AppConfig
///
/// Holds the application's entire configuration state. Immutable once loaded and shared with
/// handlers through `FromRef`, alongside the session and draft state in `AppState`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls the log output format.
    pub env: Env,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Fixed delays standing in for network round-trips.
    pub latency: Latency,
}

/// Env
///
/// Defines the runtime context: human-readable logs while developing, JSON logs in production.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// Latency
///
/// The simulated delays of every flow. None of these guard a real remote call; they only
/// produce the "loading" and "success" windows the screens display.
#[derive(Clone, Debug, PartialEq)]
pub struct Latency {
    pub login: Duration,
    pub register: Duration,
    pub feedback_submit: Duration,
    /// How long the feedback success indicator stays up before the draft is cleared.
    pub feedback_reset: Duration,
    /// How long the form-builder success indicator stays up before the builder is cleared.
    pub form_reset: Duration,
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            login: Duration::from_millis(1000),
            register: Duration::from_millis(1000),
            feedback_submit: Duration::from_millis(800),
            feedback_reset: Duration::from_millis(3000),
            form_reset: Duration::from_millis(2000),
        }
    }
}

impl Latency {
    /// Every delay set to zero. Used by tests that only care about the outcome of a flow.
    pub fn instant() -> Self {
        Self {
            login: Duration::ZERO,
            register: Duration::ZERO,
            feedback_submit: Duration::ZERO,
            feedback_reset: Duration::ZERO,
            form_reset: Duration::ZERO,
        }
    }
}

impl Default for AppConfig {
    /// default
    ///
    /// Provides a non-panicking AppConfig for test setup, without touching environment variables.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: "0.0.0.0:3000".to_string(),
            latency: Latency::default(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// The canonical function for initializing the configuration at startup. Reads every
    /// parameter from environment variables and follows the **fail-fast** principle.
    ///
    /// # Panics
    /// Panics if `BIND_ADDR` is missing in production, or if any `*_DELAY_MS` variable is set
    /// to something other than a whole number of milliseconds.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let bind_addr = match env {
            Env::Production => {
                env::var("BIND_ADDR").expect("FATAL: BIND_ADDR must be set in production.")
            }
            Env::Local => env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
        };

        let defaults = Latency::default();
        let latency = Latency {
            login: delay_from_env("LOGIN_DELAY_MS", defaults.login),
            register: delay_from_env("REGISTER_DELAY_MS", defaults.register),
            feedback_submit: delay_from_env("FEEDBACK_SUBMIT_DELAY_MS", defaults.feedback_submit),
            feedback_reset: delay_from_env("FEEDBACK_RESET_DELAY_MS", defaults.feedback_reset),
            form_reset: delay_from_env("FORM_RESET_DELAY_MS", defaults.form_reset),
        };

        Self {
            env,
            bind_addr,
            latency,
        }
    }
}

/// Reads a millisecond delay, falling back to `default` when the variable is unset.
fn delay_from_env(key: &str, default: Duration) -> Duration {
    match env::var(key) {
        Ok(raw) => {
            let millis: u64 = raw
                .trim()
                .parse()
                .unwrap_or_else(|_| panic!("FATAL: {key} must be a whole number of milliseconds"));
            Duration::from_millis(millis)
        }
        Err(_) => default,
    }
}
