use crate::error::CliError;
use crate::{build_store, render, session_user};

use bd_config::Config;

use serde_json::json;

#[test]
fn given_no_user_anywhere_when_resolving_then_missing_user() {
    let config = Config::default();

    let result = session_user(&config, None);

    assert!(matches!(result.unwrap_err(), CliError::MissingUser));
}

#[test]
fn given_blank_flag_when_resolving_then_missing_user() {
    let config = Config::default();

    assert!(matches!(
        session_user(&config, Some("  ")).unwrap_err(),
        CliError::MissingUser
    ));
}

#[test]
fn given_flag_and_config_when_resolving_then_flag_wins_and_profile_from_config() {
    // Given
    let mut config = Config::default();
    config.session.user_id = Some(String::from("from-config"));
    config.session.display_name = Some(String::from("Ada"));
    config.session.email = Some(String::from("ada@example.com"));

    // When
    let user = session_user(&config, Some("from-flag")).unwrap();

    // Then
    assert_eq!(user.id, "from-flag");
    assert_eq!(user.name.as_deref(), Some("Ada"));
    assert_eq!(user.email.as_deref(), Some("ada@example.com"));
}

#[test]
fn given_config_user_only_when_resolving_then_config_used() {
    let mut config = Config::default();
    config.session.user_id = Some(String::from("from-config"));

    assert_eq!(session_user(&config, None).unwrap().id, "from-config");
}

#[test]
fn given_persistence_disabled_when_building_store_then_succeeds() {
    let mut config = Config::default();
    config.persistence.enabled = false;

    assert!(build_store(&config, Some("http://127.0.0.1:1")).is_ok());
}

#[test]
fn given_value_when_rendered_then_compact_or_pretty() {
    let value = json!({"granted": true});

    assert_eq!(render(&value, false).unwrap(), r#"{"granted":true}"#);
    assert!(render(&value, true).unwrap().contains('\n'));
}
