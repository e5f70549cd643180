//! Application services and ports.

#![forbid(unsafe_code)]

mod access_grant_service;
mod blend_publish_service;
mod directory_ports;
mod publish_ports;
mod user_attribute_sync_service;

#[cfg(test)]
mod test_support;

pub use access_grant_service::AccessGrantResolver;
pub use blend_publish_service::{
    BlendPublishService, PublishBlendInput, PublishCredentials, PublishedBlend,
};
pub use directory_ports::{
    DirectoryClient, DirectoryConnector, DirectoryCredentials, UserListQuery,
};
pub use publish_ports::{
    DeployRequest, DeployWebhook, SourceControl, SourceFileChange, SourceFileUpsert,
};
pub use user_attribute_sync_service::{
    SyncFailure, SyncMode, SyncSummary, USER_FETCH_CONCURRENCY, USER_PAGE_SIZE,
    USER_WRITE_CONCURRENCY, UserAttributeSyncer,
};
