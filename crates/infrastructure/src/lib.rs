//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod github_source_control;
mod http_deploy_webhook;
mod http_error;
mod looker_directory_client;

#[cfg(test)]
mod test_server;

pub use github_source_control::GithubSourceControl;
pub use http_deploy_webhook::HttpDeployWebhook;
pub use looker_directory_client::{LookerDirectoryClient, LookerDirectoryConnector};
