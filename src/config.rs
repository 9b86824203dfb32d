use std::env;

/// AppConfig
///
/// The gateway's configuration, immutable once loaded and shared through the
/// application state via FromRef.
#[derive(Clone)]
pub struct AppConfig {
    // Runtime environment marker. Controls log formatting and fail-fast rules.
    pub env: Env,
    // Address the HTTP listener binds to.
    pub bind_addr: String,
    // Deployment base path prefixed onto every route table path ("" = root).
    pub base_path: String,
    // Path of the login route the guard redirects unauthenticated
    // navigations to. Must name a public route in the table.
    pub login_path: String,
}

/// Env
///
/// Defines the runtime context, used to switch between development
/// conveniences (pretty logs, defaulted bind address) and production
/// behavior (JSON logs, mandatory explicit configuration).
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Safe, non-panicking values for test scaffolding, so tests can build
    /// application state without touching environment variables.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: "127.0.0.1:3000".to_string(),
            base_path: String::new(),
            login_path: "/login".to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// The canonical startup initializer. Reads all parameters from
    /// environment variables.
    ///
    /// # Panics
    /// Panics when `APP_ENV=production` and `BIND_ADDR` is not set. A
    /// production gateway must not fall back to a guessed listen address.
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

        // "" and "/" both mean "deployed at the root".
        let base_path = match env::var("BASE_PATH") {
            Ok(base) if base != "/" => base,
            _ => String::new(),
        };

        // When BASE_PATH is set, LOGIN_PATH should be set to the prefixed
        // login route; the default assumes a root deployment.
        let login_path = env::var("LOGIN_PATH").unwrap_or_else(|_| "/login".to_string());

        Self {
            env,
            bind_addr,
            base_path,
            login_path,
        }
    }
}
