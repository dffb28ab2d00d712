mod session;

use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// Orgs `p` (default, owner) and `t` (admin) for user `u1`, with their workspaces.
pub(crate) async fn mount_directory(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/users/u1/organizations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organizations": [
                {"id": "p", "name": "Personal", "subscription_tier": "free", "role": "owner", "is_default": true},
                {"id": "t", "name": "Team", "subscription_tier": "pro", "role": "admin"}
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/organizations/p/workspaces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "workspaces": [
                {"id": "p-main", "name": "Main", "organization_id": "p", "role": "admin", "is_default": true}
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/organizations/t/workspaces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "workspaces": [
                {"id": "t-a", "name": "Alpha", "organization_id": "t", "role": "editor"},
                {"id": "t-b", "name": "Beta", "organization_id": "t", "role": "viewer", "is_default": true}
            ]
        })))
        .mount(server)
        .await;
}
