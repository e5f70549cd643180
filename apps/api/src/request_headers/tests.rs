use axum::http::{HeaderMap, HeaderValue};
use blend_application::DirectoryCredentials;
use blend_core::{AppError, SecretString};

use super::{
    BASE_URL_HEADER, CLIENT_ID_HEADER, CLIENT_SECRET_HEADER, PERSONAL_ACCESS_TOKEN_HEADER,
    RequestCredentials, WEBHOOK_SECRET_HEADER,
};
use crate::state::CredentialDefaults;

fn headers(values: &[(&'static str, &'static str)]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in values {
        headers.insert(*name, HeaderValue::from_static(value));
    }
    headers
}

fn single_tenant() -> CredentialDefaults {
    CredentialDefaults {
        personal_access_token: Some(SecretString::new("env_token")),
        directory: Some(DirectoryCredentials {
            base_url: "https://env.cloud.looker.com".to_owned(),
            client_id: "env_client".to_owned(),
            client_secret: SecretString::new("env_secret"),
        }),
    }
}

#[test]
fn missing_token_and_base_url_are_rejected() {
    let credentials = RequestCredentials::from_headers(&HeaderMap::new());
    let defaults = CredentialDefaults::default();

    assert!(matches!(
        credentials.personal_access_token(&defaults),
        Err(AppError::Validation(message)) if message == "missing or invalid personal access token"
    ));
    assert!(matches!(
        credentials.base_url(&defaults),
        Err(AppError::Validation(message)) if message == "missing or invalid sdk base url"
    ));
    assert!(credentials.directory(&defaults).is_none());
}

#[test]
fn blank_headers_count_as_absent() {
    let credentials = RequestCredentials::from_headers(&headers(&[
        (PERSONAL_ACCESS_TOKEN_HEADER, "   "),
        (WEBHOOK_SECRET_HEADER, ""),
    ]));

    assert!(
        credentials
            .personal_access_token(&CredentialDefaults::default())
            .is_err()
    );
    assert!(credentials.webhook_secret().is_none());
}

#[test]
fn header_token_wins_over_configured_token() {
    let credentials =
        RequestCredentials::from_headers(&headers(&[(PERSONAL_ACCESS_TOKEN_HEADER, "ghp_header")]));

    let token = credentials
        .personal_access_token(&single_tenant())
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(token.expose(), "ghp_header");
}

#[test]
fn directory_requires_the_complete_header_set() {
    let partial = RequestCredentials::from_headers(&headers(&[
        (BASE_URL_HEADER, "https://acme.cloud.looker.com"),
        (CLIENT_ID_HEADER, "client"),
    ]));
    let complete = RequestCredentials::from_headers(&headers(&[
        (BASE_URL_HEADER, "https://acme.cloud.looker.com"),
        (CLIENT_ID_HEADER, "client"),
        (CLIENT_SECRET_HEADER, "secret"),
    ]));
    let defaults = CredentialDefaults::default();

    assert!(partial.directory(&defaults).is_none());
    let directory = complete
        .directory(&defaults)
        .unwrap_or_else(|| unreachable!());
    assert_eq!(directory.client_id, "client");
    assert_eq!(directory.client_secret.expose(), "secret");
}

#[test]
fn configured_instance_overrides_headers() {
    let credentials = RequestCredentials::from_headers(&headers(&[
        (BASE_URL_HEADER, "https://acme.cloud.looker.com"),
        (CLIENT_ID_HEADER, "client"),
        (CLIENT_SECRET_HEADER, "secret"),
    ]));

    let directory = credentials
        .directory(&single_tenant())
        .unwrap_or_else(|| unreachable!());
    let base_url = RequestCredentials::default()
        .base_url(&single_tenant())
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(directory.client_id, "env_client");
    assert_eq!(base_url, "https://env.cloud.looker.com");
}
