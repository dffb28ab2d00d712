use crate::{Client, ClientError};

use bd_core::DirectoryError;

#[test]
fn test_base_url_trailing_slash_trimmed() {
    let client = Client::new("http://localhost:8000/", None);
    assert_eq!(client.base_url, "http://localhost:8000");
}

#[test]
fn test_base_url_no_trailing_slash() {
    let client = Client::new("http://localhost:8000", None);
    assert_eq!(client.base_url, "http://localhost:8000");
}

#[test]
fn test_credential_stored() {
    let client = Client::new("http://localhost:8000", Some("token-123"));
    assert_eq!(client.credential(), Some("token-123".to_string()));
}

#[test]
fn test_credential_none() {
    let client = Client::new("http://localhost:8000", None);
    assert!(client.credential().is_none());
}

#[test]
fn given_server_error_when_classified_then_transient() {
    let err = ClientError::api_error(503, "UNAVAILABLE".into(), "down".into());

    assert!(err.is_transient());
    assert!(!err.is_denied());
}

#[test]
fn given_forbidden_when_mapped_to_directory_error_then_denied() {
    let err = ClientError::api_error(403, "FORBIDDEN".into(), "not a member".into());

    let mapped: DirectoryError = err.into();

    assert!(matches!(mapped, DirectoryError::Denied { .. }));
    assert!(!mapped.is_transient());
}

#[test]
fn given_throttled_when_mapped_to_directory_error_then_unavailable() {
    let err = ClientError::api_error(429, "RATE_LIMITED".into(), "slow down".into());

    let mapped: DirectoryError = err.into();

    assert!(mapped.is_transient());
}

#[test]
fn given_bad_json_when_mapped_to_directory_error_then_invalid_response() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: ClientError = json_err.into();

    let mapped: DirectoryError = err.into();

    assert!(matches!(mapped, DirectoryError::InvalidResponse { .. }));
}
