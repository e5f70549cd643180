use std::sync::Arc;

use blend_application::{BlendPublishService, DirectoryConnector, DirectoryCredentials};
use blend_core::SecretString;

/// Credentials configured for the process rather than per request.
#[derive(Debug, Clone, Default)]
pub struct CredentialDefaults {
    pub personal_access_token: Option<SecretString>,
    pub directory: Option<DirectoryCredentials>,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blend_publish_service: BlendPublishService,
    pub directory_connector: Arc<dyn DirectoryConnector>,
    pub credential_defaults: CredentialDefaults,
}
