use pac_gateway::config::{AppConfig, Env};
use serial_test::serial;
use std::{env, panic};

// --- Setup/Teardown Utilities ---

/// Utility to run a test function and restore environment variables afterward
fn run_with_env<T, R>(test: T, cleanup_vars: Vec<&'static str>) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    // Save current environment variables
    let originals: Vec<(String, Option<String>)> = cleanup_vars
        .iter()
        .map(|&var| (var.to_string(), env::var(var).ok()))
        .collect();

    // Run the test
    let result = panic::catch_unwind(test);

    // Restore original environment variables
    for (key, original_value) in originals.into_iter().rev() {
        unsafe {
            if let Some(val) = original_value {
                env::set_var(&key, val);
            } else {
                env::remove_var(&key);
            }
        }
    }

    // Re-panic if the test failed
    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_app_config_production_fail_fast() {
    // Production must not start with a guessed listen address.
    let result = run_with_env(
        || {
            panic::catch_unwind(|| {
                unsafe {
                    env::set_var("APP_ENV", "production");
                    env::remove_var("BIND_ADDR");
                }
                AppConfig::load()
            })
        },
        vec!["APP_ENV", "BIND_ADDR"],
    );

    assert!(
        result.is_err(),
        "Production config loading should panic without BIND_ADDR"
    );
}

#[test]
#[serial]
fn test_app_config_local_env_defaults() {
    let config = run_with_env(
        || {
            unsafe {
                env::set_var("APP_ENV", "local");
                // Clear other variables to test fallbacks
                env::remove_var("BIND_ADDR");
                env::remove_var("BASE_PATH");
                env::remove_var("LOGIN_PATH");
            }
            AppConfig::load()
        },
        vec!["APP_ENV", "BIND_ADDR", "BASE_PATH", "LOGIN_PATH"],
    );

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.bind_addr, "0.0.0.0:3000");
    assert_eq!(config.base_path, "");
    assert_eq!(config.login_path, "/login");
}

#[test]
#[serial]
fn test_app_config_base_path_slash_means_root() {
    let config = run_with_env(
        || {
            unsafe {
                env::set_var("APP_ENV", "local");
                env::set_var("BASE_PATH", "/");
            }
            AppConfig::load()
        },
        vec!["APP_ENV", "BASE_PATH"],
    );

    assert_eq!(config.base_path, "");
}
