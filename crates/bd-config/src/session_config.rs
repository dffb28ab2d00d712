use serde::Deserialize;

/// Signed-in session details handed over by the authentication flow.
///
/// `credential` is a bearer secret and is never written to logs.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SessionConfig {
    pub user_id: Option<String>,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub credential: Option<String>,
}
