use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, contains_substring, eq, err};
use serial_test::serial;

// =========================================================================
// Validation Tests - Persistence
// =========================================================================

#[test]
#[serial]
fn given_pointer_path_with_traversal_when_validate_then_error() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _path = EnvGuard::set("BD_PERSISTENCE_PATH", "../../context.json");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
    let err_msg = format!("{}", result.unwrap_err());
    assert_that!(err_msg, contains_substring(".."));
}

#[test]
#[serial]
fn given_absolute_pointer_path_when_validate_then_error() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _path = EnvGuard::set("BD_PERSISTENCE_PATH", "/tmp/context.json");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_persistence_disabled_env_when_load_then_disabled() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _enabled = EnvGuard::set("BD_PERSISTENCE_ENABLED", "false");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.persistence.enabled, eq(false));
}

#[test]
#[serial]
fn given_session_path_with_traversal_when_validate_then_error_names_key() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _path = EnvGuard::set("BD_PERSISTENCE_SESSION_PATH", "../session.json");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
    let err_msg = format!("{}", result.unwrap_err());
    assert_that!(err_msg, contains_substring("persistence.session_path"));
}

#[test]
#[serial]
fn given_session_path_equal_to_pointer_path_when_validate_then_error() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _path = EnvGuard::set("BD_PERSISTENCE_SESSION_PATH", "context.json");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
    let err_msg = format!("{}", result.unwrap_err());
    assert_that!(err_msg, contains_substring("must differ"));
}
