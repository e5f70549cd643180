mod client;
mod connector;

pub use client::{DirectoryClient, UserListQuery};
pub use connector::{DirectoryConnector, DirectoryCredentials};
