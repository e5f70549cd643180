use async_trait::async_trait;

use blend_core::{AppResult, SecretString};

/// File write request against a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFileUpsert {
    /// Repository in `owner/name` form.
    pub repo_name: String,
    /// Path of the file inside the repository.
    pub path: String,
    /// Full file content.
    pub content: String,
    /// Commit message used when the file is created.
    pub create_message: String,
    /// Commit message used when the file already exists.
    pub update_message: String,
}

/// Outcome of a file upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFileChange {
    /// File did not exist and was created.
    Created,
    /// Existing file was replaced.
    Updated,
}

impl SourceFileChange {
    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
        }
    }
}

/// Port for committing files into version control.
#[async_trait]
pub trait SourceControl: Send + Sync {
    /// Creates or replaces a file with a single commit.
    async fn upsert_file(
        &self,
        access_token: &SecretString,
        upsert: SourceFileUpsert,
    ) -> AppResult<SourceFileChange>;
}
